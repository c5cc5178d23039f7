use todsim_types::{FeedbackForm, RatingField, MAX_MESSAGE_CHARS};
use wasm_bindgen::JsValue;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlButtonElement};

use crate::client::FetchClient;
use crate::dom;
use crate::utils;

const FORM_ID: &str = "feedbackForm";
const PROGRESS_FILL_ID: &str = "progressFill";
const PROGRESS_TEXT_ID: &str = "progressText";
const COMMENTS_ID: &str = "comments";
const COMMENT_COUNT_ID: &str = "commentCount";
const ERRORS_ID: &str = "formErrors";
const SUBMIT_ID: &str = "submitButton";
const THANK_YOU_ID: &str = "thankYou";

/// Post-conversation questionnaire
pub struct FeedbackPage {
    document: Document,
    session_id: String,
}

impl FeedbackPage {
    pub fn new() -> Result<Self, JsValue> {
        let document = crate::document()?;
        let session_id = utils::first_present([
            dom::input_value(&document, "sessionId"),
            utils::query_param("session_id"),
        ])
        .unwrap_or_default();
        if session_id.is_empty() {
            log::warn!("Feedback page opened without a session id");
        }
        Ok(Self {
            document,
            session_id,
        })
    }

    pub fn start(self) -> Result<(), JsValue> {
        for field in RatingField::ALL {
            let radios = self
                .document
                .query_selector_all(&format!("input[name=\"{}\"]", field.key()))?;
            for i in 0..radios.length() {
                if let Some(radio) = radios.item(i) {
                    let document = self.document.clone();
                    dom::add_listener(&radio, "change", move || update_progress(&document))?;
                }
            }
        }

        if let Ok(comments) = dom::get_textarea_by_id(&self.document, COMMENTS_ID) {
            let document = self.document.clone();
            dom::add_listener(&comments, "input", move || update_comment_count(&document))?;
        }

        let form = dom::get_element_by_id(&self.document, FORM_ID)?;
        let document = self.document.clone();
        let session_id = self.session_id.clone();
        dom::add_event_listener(&form, "submit", move |event: Event| {
            event.prevent_default();
            let form = read_form(&document, &session_id);
            let errors = form.validate();
            if !errors.is_empty() {
                show_errors(&document, &errors);
                return;
            }
            show_errors(&document, &[]);
            let document = document.clone();
            wasm_bindgen_futures::spawn_local(async move {
                submit(&document, form).await;
            });
        })?;

        update_progress(&self.document);
        update_comment_count(&self.document);
        Ok(())
    }
}

fn read_form(document: &Document, session_id: &str) -> FeedbackForm {
    let mut form = FeedbackForm::new(session_id);
    for field in RatingField::ALL {
        if let Some(value) = dom::checked_radio_value(document, field.key())
            .and_then(|v| v.trim().parse::<u8>().ok())
        {
            form.rate(field, value);
        }
    }
    form.comments = dom::get_textarea_by_id(document, COMMENTS_ID)
        .map(|c| c.value())
        .unwrap_or_default();
    form
}

fn update_progress(document: &Document) {
    let completion = read_form(document, "").completion();
    let percent = (completion * 100.0).round();
    if let Ok(fill) = dom::get_html_element_by_id(document, PROGRESS_FILL_ID) {
        let _ = fill.style().set_property("width", &format!("{}%", percent));
    }
    if let Some(text) = document.get_element_by_id(PROGRESS_TEXT_ID) {
        dom::set_text_content(&text, &format!("{}% complete", percent));
    }
}

fn update_comment_count(document: &Document) {
    let Ok(comments) = dom::get_textarea_by_id(document, COMMENTS_ID) else {
        return;
    };
    if let Some(counter) = document.get_element_by_id(COMMENT_COUNT_ID) {
        let count = comments.value().chars().count();
        dom::set_text_content(&counter, &format!("{}/{}", count, MAX_MESSAGE_CHARS));
        counter.set_class_name(if count > MAX_MESSAGE_CHARS {
            "char-count over-limit"
        } else {
            "char-count"
        });
    }
}

fn show_errors(document: &Document, errors: &[String]) {
    let Ok(area) = dom::get_html_element_by_id(document, ERRORS_ID) else {
        for error in errors {
            log::warn!("Feedback form: {}", error);
        }
        return;
    };
    if errors.is_empty() {
        dom::hide_element(&area);
        return;
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", utils::escape_html(e)))
        .collect();
    area.set_inner_html(&format!("<ul>{}</ul>", items));
    dom::show_element(&area);
}

fn set_submitting(document: &Document, submitting: bool) {
    if let Some(button) = document
        .get_element_by_id(SUBMIT_ID)
        .and_then(|e| e.dyn_into::<HtmlButtonElement>().ok())
    {
        button.set_disabled(submitting);
        button.set_text_content(Some(if submitting { "Submitting..." } else { "Submit Feedback" }));
    }
}

async fn submit(document: &Document, form: FeedbackForm) {
    set_submitting(document, true);
    let client = FetchClient::default();
    match client.submit_feedback(&form).await {
        Ok(reply) if reply.is_success() => {
            log::info!("Feedback submitted for session {}", form.session_id);
            match reply.redirect.filter(|r| !r.is_empty()) {
                Some(url) => {
                    if let Some(window) = document.default_view() {
                        let _ = window.location().set_href(&url);
                    }
                }
                None => show_thank_you(document),
            }
        }
        Ok(reply) => {
            let message = reply
                .error
                .unwrap_or_else(|| "Failed to submit feedback.".to_string());
            show_errors(document, &[message]);
            set_submitting(document, false);
        }
        Err(e) => {
            log::error!("Feedback submission failed: {}", e);
            show_errors(document, &[e.user_message()]);
            set_submitting(document, false);
        }
    }
}

fn show_thank_you(document: &Document) {
    if let Ok(form) = dom::get_html_element_by_id(document, FORM_ID) {
        dom::hide_element(&form);
    }
    match dom::get_html_element_by_id(document, THANK_YOU_ID) {
        Ok(thanks) => dom::show_element(&thanks),
        Err(_) => log::info!("Thank you for your feedback!"),
    }
}
