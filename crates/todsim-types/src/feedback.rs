//! Post-conversation feedback form: seven 1-5 ratings plus free-text comments.

use serde::{Deserialize, Serialize};

use crate::MAX_MESSAGE_CHARS;

/// Lowest and highest value of every rating scale
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Maximum length of the comments field, in characters
pub const MAX_COMMENT_CHARS: usize = MAX_MESSAGE_CHARS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingField {
    TaskSuccessRate,
    UserSatisfaction,
    Appropriateness,
    Naturalness,
    Coherence,
    Efficiency,
    Conciseness,
}

impl RatingField {
    pub const ALL: [RatingField; 7] = [
        RatingField::TaskSuccessRate,
        RatingField::UserSatisfaction,
        RatingField::Appropriateness,
        RatingField::Naturalness,
        RatingField::Coherence,
        RatingField::Efficiency,
        RatingField::Conciseness,
    ];

    /// Form field name
    pub fn key(&self) -> &'static str {
        match self {
            RatingField::TaskSuccessRate => "task_success_rate",
            RatingField::UserSatisfaction => "user_satisfaction",
            RatingField::Appropriateness => "appropriateness",
            RatingField::Naturalness => "naturalness",
            RatingField::Coherence => "coherence",
            RatingField::Efficiency => "efficiency",
            RatingField::Conciseness => "conciseness",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatingField::TaskSuccessRate => "Task Success Rate",
            RatingField::UserSatisfaction => "User Satisfaction",
            RatingField::Appropriateness => "Appropriateness",
            RatingField::Naturalness => "Naturalness",
            RatingField::Coherence => "Coherence",
            RatingField::Efficiency => "Efficiency",
            RatingField::Conciseness => "Conciseness",
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            RatingField::TaskSuccessRate => "How successfully did the system help you complete your task?",
            RatingField::UserSatisfaction => "How satisfied are you with the overall interaction?",
            RatingField::Appropriateness => "How appropriate were the system's responses?",
            RatingField::Naturalness => "How natural did the conversation feel?",
            RatingField::Coherence => "How coherent and logical were the responses?",
            RatingField::Efficiency => "How efficiently did the system handle your request?",
            RatingField::Conciseness => "Were the responses appropriately concise?",
        }
    }

    /// Per-value captions; only the task-level scales have them
    pub fn scale_labels(&self) -> Option<[&'static str; 5]> {
        match self {
            RatingField::TaskSuccessRate => Some([
                "Not at all successful",
                "Slightly successful",
                "Moderately successful",
                "Very successful",
                "Extremely successful",
            ]),
            RatingField::UserSatisfaction => Some([
                "Very dissatisfied",
                "Dissatisfied",
                "Neutral",
                "Satisfied",
                "Very satisfied",
            ]),
            _ => None,
        }
    }
}

/// Feedback collected for one session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedbackForm {
    pub session_id: String,
    #[serde(default)]
    pub ratings: Vec<(RatingField, u8)>,
    #[serde(default)]
    pub comments: String,
}

impl FeedbackForm {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Default::default()
        }
    }

    /// Set or replace one rating
    pub fn rate(&mut self, field: RatingField, value: u8) -> &mut Self {
        match self.ratings.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = value,
            None => self.ratings.push((field, value)),
        }
        self
    }

    pub fn rating(&self, field: RatingField) -> Option<u8> {
        self.ratings
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| *v)
    }

    /// Fraction of ratings filled in, for the progress bar
    pub fn completion(&self) -> f32 {
        let filled = RatingField::ALL
            .iter()
            .filter(|f| self.rating(**f).is_some())
            .count();
        filled as f32 / RatingField::ALL.len() as f32
    }

    /// Every problem with the form; empty when it can be submitted
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.session_id.trim().is_empty() {
            errors.push("Missing session_id".to_string());
        }

        for field in RatingField::ALL {
            match self.rating(field) {
                None => errors.push(format!("Missing required field: {}", field.key())),
                Some(v) if !RATING_RANGE.contains(&v) => {
                    errors.push(format!("Field {} must be between 1 and 5", field.key()))
                }
                Some(_) => {}
            }
        }

        if self.comments.chars().count() > MAX_COMMENT_CHARS {
            errors.push("Comments field must be less than 1000 characters".to_string());
        }

        errors
    }

    /// Form-encoded body for the submission endpoint
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("session_id".to_string(), self.session_id.clone())];
        for field in RatingField::ALL {
            if let Some(v) = self.rating(field) {
                fields.push((field.key().to_string(), v.to_string()));
            }
        }
        fields.push(("comments".to_string(), self.comments.trim().to_string()));
        fields
    }
}
