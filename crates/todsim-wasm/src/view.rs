use std::cell::Cell;
use std::rc::Rc;

use todsim_chat::{ChatView, Notice, NoticeKind, RetryOffer};
use todsim_types::Turn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlAnchorElement, HtmlButtonElement, HtmlElement};

use crate::dom;
use crate::utils;

pub const MESSAGES_ID: &str = "chatMessages";
pub const INPUT_ID: &str = "messageInput";
pub const SEND_BUTTON_ID: &str = "sendButton";
pub const END_BUTTON_ID: &str = "endButton";
pub const TYPING_ID: &str = "typingIndicator";
pub const NOTICE_ID: &str = "noticeArea";
pub const RETRY_PANEL_ID: &str = "retryPanel";
pub const RETRY_BUTTON_ID: &str = "retryButton";
pub const CANCEL_RETRY_ID: &str = "cancelRetryButton";
pub const HANDOFF_PANEL_ID: &str = "handoffPanel";
pub const FEEDBACK_LINK_ID: &str = "feedbackLink";
pub const COUNTDOWN_ID: &str = "countdownText";
pub const STAY_BUTTON_ID: &str = "stayButton";
pub const FEEDBACK_NOW_ID: &str = "feedbackNowButton";

/// Chat page rendering. Elements are looked up per call; missing ones are skipped
pub struct DomView {
    document: Document,
    /// Bumped per notice so an older auto-hide does not hide a newer notice
    notice_generation: Rc<Cell<u32>>,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            notice_generation: Rc::new(Cell::new(0)),
        }
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn html_element(&self, id: &str) -> Option<HtmlElement> {
        self.element(id).and_then(|e| e.dyn_into::<HtmlElement>().ok())
    }

    fn set_visible(&self, id: &str, visible: bool) {
        if let Some(element) = self.html_element(id) {
            if visible {
                dom::show_element(&element);
            } else {
                dom::hide_element(&element);
            }
        }
    }

    fn set_disabled(&self, id: &str, disabled: bool) {
        if let Some(element) = self.element(id) {
            if let Ok(button) = element.clone().dyn_into::<HtmlButtonElement>() {
                button.set_disabled(disabled);
            } else if let Ok(input) = element.dyn_into::<web_sys::HtmlTextAreaElement>() {
                input.set_disabled(disabled);
            }
        }
    }

    fn render_turn(&self, turn: &Turn) -> Result<(), JsValue> {
        let container = dom::get_element_by_id(&self.document, MESSAGES_ID)?;
        let class = format!("message {}-message", turn.sender.as_str());
        let message = dom::create_element_with_class(&self.document, "div", &class)?;

        let html = format!(
            r#"<div class="message-content">{}</div><div class="message-time">{}</div>"#,
            utils::escape_html(&turn.content),
            utils::escape_html(&utils::format_time(&turn.timestamp))
        );
        message.set_inner_html(&html);
        container.append_child(&message)?;
        dom::scroll_to_bottom(&container);
        Ok(())
    }

    fn render_notice(&self, notice: &Notice) -> Result<(), JsValue> {
        let area = dom::get_html_element_by_id(&self.document, NOTICE_ID)?;
        let kind = match notice.kind {
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        };
        area.set_class_name(&format!("notice notice-{}", kind));
        dom::set_text_content(&area, &notice.text);
        dom::show_element(&area);

        let generation = self.notice_generation.get().wrapping_add(1);
        self.notice_generation.set(generation);

        if let Some(duration) = notice.duration {
            let current = self.notice_generation.clone();
            let millis = duration.as_millis().min(u32::MAX as u128) as u32;
            wasm_bindgen_futures::spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(millis).await;
                if current.get() == generation {
                    dom::hide_element(&area);
                }
            });
        }
        Ok(())
    }
}

impl ChatView for DomView {
    fn append_turn(&self, turn: &Turn) {
        if let Err(e) = self.render_turn(turn) {
            log::error!("Failed to render message: {:?}", e);
        }
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.set_disabled(INPUT_ID, !enabled);
        self.set_disabled(SEND_BUTTON_ID, !enabled);
        self.set_disabled(END_BUTTON_ID, !enabled);
        if enabled {
            if let Some(input) = self.html_element(INPUT_ID) {
                let _ = input.focus();
            }
        }
    }

    fn clear_input(&self) {
        if let Ok(input) = dom::get_textarea_by_id(&self.document, INPUT_ID) {
            input.set_value("");
        }
    }

    fn set_composing(&self, visible: bool) {
        self.set_visible(TYPING_ID, visible);
    }

    fn show_notice(&self, notice: &Notice) {
        if let Err(e) = self.render_notice(notice) {
            log::warn!("Notice not shown ({:?}): {}", e, notice.text);
        }
    }

    fn offer_retry(&self, offer: &RetryOffer) {
        if let Some(button) = self.element(RETRY_BUTTON_ID) {
            dom::set_text_content(&button, &format!("Retry ({})", offer.label()));
        }
        self.set_visible(RETRY_PANEL_ID, true);
    }

    fn clear_retry_offer(&self) {
        self.set_visible(RETRY_PANEL_ID, false);
    }

    fn offer_handoff(&self, url: &str) {
        if let Some(link) = self
            .element(FEEDBACK_LINK_ID)
            .and_then(|e| e.dyn_into::<HtmlAnchorElement>().ok())
        {
            link.set_href(url);
        }
        self.set_visible(HANDOFF_PANEL_ID, true);
    }

    fn update_countdown(&self, seconds_left: Option<u32>) {
        match seconds_left {
            Some(seconds) => {
                if let Some(text) = self.element(COUNTDOWN_ID) {
                    dom::set_text_content(
                        &text,
                        &format!("Redirecting to feedback in {} second(s)...", seconds),
                    );
                }
                self.set_visible(COUNTDOWN_ID, true);
                self.set_visible(STAY_BUTTON_ID, true);
            }
            None => {
                self.set_visible(COUNTDOWN_ID, false);
                self.set_visible(STAY_BUTTON_ID, false);
            }
        }
    }

    fn navigate(&self, url: &str) {
        log::info!("Navigating to {}", url);
        if let Some(window) = self.document.default_view() {
            if let Err(e) = window.location().set_href(url) {
                log::error!("Navigation failed: {:?}", e);
            }
        }
    }
}
