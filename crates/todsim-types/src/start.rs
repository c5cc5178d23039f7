//! Validation of the domain/model selection form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Domain, ModelKind};

/// How the dialogue model is chosen for a new session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentMethod {
    Random,
    Manual,
}

impl AssignmentMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "" | "random" => Some(AssignmentMethod::Random),
            "manual" => Some(AssignmentMethod::Manual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("Please select a domain.")]
    MissingDomain,
    #[error("Invalid domain: {0}. Available domains: hotel, restaurant, flight")]
    UnknownDomain(String),
    #[error("Invalid assignment type.")]
    UnknownAssignment(String),
    #[error("Please select a model for manual assignment.")]
    MissingModel,
    #[error("Invalid model: {0}. Available models: bedrock, grpotod, sagemaker-grpotod")]
    UnknownModel(String),
}

/// A validated start-form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub domain: Domain,
    pub assignment: AssignmentMethod,
    /// Only set for manual assignment
    pub model: Option<ModelKind>,
}

impl StartRequest {
    /// Validate raw form values the way the start page does before posting
    pub fn from_form(domain: &str, assignment: &str, model_type: &str) -> Result<Self, StartError> {
        let domain_value = domain.trim();
        if domain_value.is_empty() {
            return Err(StartError::MissingDomain);
        }
        let domain = Domain::parse(domain_value)
            .ok_or_else(|| StartError::UnknownDomain(domain_value.to_string()))?;

        let assignment = AssignmentMethod::parse(assignment)
            .ok_or_else(|| StartError::UnknownAssignment(assignment.to_string()))?;

        let model = match assignment {
            AssignmentMethod::Random => None,
            AssignmentMethod::Manual => {
                let model_value = model_type.trim();
                if model_value.is_empty() {
                    return Err(StartError::MissingModel);
                }
                Some(
                    ModelKind::parse(model_value)
                        .ok_or_else(|| StartError::UnknownModel(model_value.to_string()))?,
                )
            }
        };

        Ok(Self {
            domain,
            assignment,
            model,
        })
    }

    /// Form fields as posted to the start endpoint
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("domain", self.domain.as_str().to_string()),
            (
                "assignment_type",
                match self.assignment {
                    AssignmentMethod::Random => "random".to_string(),
                    AssignmentMethod::Manual => "manual".to_string(),
                },
            ),
        ];
        if let Some(model) = self.model {
            fields.push(("model_type", model.as_str().to_string()));
        }
        fields
    }
}
