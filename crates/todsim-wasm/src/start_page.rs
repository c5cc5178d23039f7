use todsim_types::{Domain, StartRequest};
use wasm_bindgen::JsValue;
use web_sys::{Document, Event, HtmlElement};

use crate::dom;

const FORM_ID: &str = "startForm";
const DOMAIN_SELECT_ID: &str = "domain";
const DESCRIPTION_ID: &str = "domainDescription";
const MODEL_SECTION_ID: &str = "modelSelection";
const MODEL_SELECT_ID: &str = "modelType";
const ERROR_ID: &str = "formError";
const ASSIGNMENT_GROUP: &str = "assignment_type";

/// Domain and model selection before a session exists
pub struct StartPage {
    document: Document,
}

impl StartPage {
    pub fn new() -> Result<Self, JsValue> {
        Ok(Self {
            document: crate::document()?,
        })
    }

    pub fn start(self) -> Result<(), JsValue> {
        self.setup_domain_description()?;
        self.setup_assignment_toggle()?;
        self.setup_validation()?;

        update_description(&self.document);
        update_model_section(&self.document);
        Ok(())
    }

    fn setup_domain_description(&self) -> Result<(), JsValue> {
        let select = dom::get_select_by_id(&self.document, DOMAIN_SELECT_ID)?;
        let document = self.document.clone();
        dom::add_listener(&select, "change", move || update_description(&document))
    }

    fn setup_assignment_toggle(&self) -> Result<(), JsValue> {
        let radios = self
            .document
            .query_selector_all(&format!("input[name=\"{}\"]", ASSIGNMENT_GROUP))?;
        for i in 0..radios.length() {
            if let Some(radio) = radios.item(i) {
                let document = self.document.clone();
                dom::add_listener(&radio, "change", move || update_model_section(&document))?;
            }
        }
        Ok(())
    }

    fn setup_validation(&self) -> Result<(), JsValue> {
        let form = dom::get_element_by_id(&self.document, FORM_ID)?;
        let document = self.document.clone();
        dom::add_event_listener(&form, "submit", move |event: Event| {
            match validate(&document) {
                Ok(request) => {
                    log::info!(
                        "Starting {} session ({:?})",
                        request.domain.as_str(),
                        request.assignment
                    );
                    show_error(&document, None);
                }
                Err(message) => {
                    event.prevent_default();
                    show_error(&document, Some(&message));
                }
            }
        })
    }
}

fn validate(document: &Document) -> Result<StartRequest, String> {
    let domain = dom::get_select_by_id(document, DOMAIN_SELECT_ID)
        .map(|s| s.value())
        .unwrap_or_default();
    let assignment = dom::checked_radio_value(document, ASSIGNMENT_GROUP).unwrap_or_default();
    let model = dom::get_select_by_id(document, MODEL_SELECT_ID)
        .map(|s| s.value())
        .unwrap_or_default();

    StartRequest::from_form(&domain, &assignment, &model).map_err(|e| e.to_string())
}

fn update_description(document: &Document) {
    let Ok(select) = dom::get_select_by_id(document, DOMAIN_SELECT_ID) else {
        return;
    };
    let Some(description) = document.get_element_by_id(DESCRIPTION_ID) else {
        return;
    };
    let text = Domain::parse(&select.value())
        .map(|d| format!("{}: {}", d.info().title, d.info().description))
        .unwrap_or_default();
    dom::set_text_content(&description, &text);
}

fn update_model_section(document: &Document) {
    let Ok(section) = dom::get_html_element_by_id(document, MODEL_SECTION_ID) else {
        return;
    };
    if dom::checked_radio_value(document, ASSIGNMENT_GROUP).as_deref() == Some("manual") {
        dom::show_element(&section);
    } else {
        dom::hide_element(&section);
    }
}

fn show_error(document: &Document, message: Option<&str>) {
    let Ok(area) = dom::get_html_element_by_id(document, ERROR_ID) else {
        if let Some(message) = message {
            log::warn!("Start form invalid: {}", message);
        }
        return;
    };
    match message {
        Some(message) => {
            dom::set_text_content(&area, message);
            dom::show_element(&area);
        }
        None => hide(&area),
    }
}

fn hide(element: &HtmlElement) {
    dom::set_text_content(element, "");
    dom::hide_element(element);
}
