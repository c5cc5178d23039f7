use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use todsim_chat::{ChatController, ConversationApi, ControllerConfig, HandoffStep};
use todsim_types::{ChatRequest, SessionFields, SNAPSHOT_INTERVAL_SECS};
use wasm_bindgen::JsValue;
use web_sys::{Document, KeyboardEvent};

use crate::client::FetchClient;
use crate::dom;
use crate::store::LocalStorageStore;
use crate::utils;
use crate::view::{self, DomView};

type Controller = ChatController<FetchClient, Rc<DomView>, LocalStorageStore>;
type Shared = Rc<RefCell<Controller>>;

const END_CONFIRMATION: &str = "Are you sure you want to end this conversation?";

pub struct ChatPage {
    document: Document,
    fields: SessionFields,
    controller: Shared,
}

impl ChatPage {
    pub fn new() -> Result<Self, JsValue> {
        let document = crate::document()?;
        let fields = session_fields(&document);
        let view = Rc::new(DomView::new(document.clone()));
        let controller = ChatController::new(
            FetchClient::default(),
            view,
            LocalStorageStore::new(),
            ControllerConfig::default(),
        );

        Ok(Self {
            document,
            fields,
            controller: Rc::new(RefCell::new(controller)),
        })
    }

    pub fn start(self) -> Result<(), JsValue> {
        if let Err(e) = self.controller.borrow_mut().initialize(&self.fields) {
            // The controller has already told the user; leave the page inert
            log::error!("Chat page not started: {}", e);
            return Ok(());
        }

        self.setup_message_input()?;
        self.setup_retry_buttons()?;
        self.setup_end_button()?;
        self.setup_handoff_buttons()?;
        self.setup_timers();
        self.setup_unload_snapshot()?;

        Ok(())
    }

    fn setup_message_input(&self) -> Result<(), JsValue> {
        let button = dom::get_element_by_id(&self.document, view::SEND_BUTTON_ID)?;
        let controller = self.controller.clone();
        let document = self.document.clone();
        dom::add_click_listener(&button, move || send_from_input(&controller, &document))?;

        let input = dom::get_textarea_by_id(&self.document, view::INPUT_ID)?;
        let controller = self.controller.clone();
        let document = self.document.clone();
        dom::add_event_listener(&input, "keydown", move |event: KeyboardEvent| {
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                send_from_input(&controller, &document);
            }
        })
    }

    fn setup_retry_buttons(&self) -> Result<(), JsValue> {
        if let Some(retry) = self.document.get_element_by_id(view::RETRY_BUTTON_ID) {
            let controller = self.controller.clone();
            dom::add_click_listener(&retry, move || {
                let request = match controller.try_borrow_mut() {
                    Ok(mut c) => c.begin_retry().ok(),
                    Err(_) => None,
                };
                if let Some(request) = request {
                    dispatch(controller.clone(), request);
                }
            })?;
        }

        if let Some(cancel) = self.document.get_element_by_id(view::CANCEL_RETRY_ID) {
            let controller = self.controller.clone();
            dom::add_click_listener(&cancel, move || {
                if let Ok(mut c) = controller.try_borrow_mut() {
                    c.cancel_retry();
                }
            })?;
        }
        Ok(())
    }

    fn setup_end_button(&self) -> Result<(), JsValue> {
        let Some(button) = self.document.get_element_by_id(view::END_BUTTON_ID) else {
            log::debug!("No end button on this page");
            return Ok(());
        };
        let controller = self.controller.clone();
        dom::add_click_listener(&button, move || {
            if !controller.borrow().is_active() {
                return;
            }
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message(END_CONFIRMATION).ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let (request, api) = {
                let mut c = controller.borrow_mut();
                (c.begin_end(), c.api().clone())
            };
            if let Some(request) = request {
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = api.end_conversation(&request).await {
                        log::warn!("End notification failed (ignored): {}", e);
                    }
                });
            }
        })
    }

    fn setup_handoff_buttons(&self) -> Result<(), JsValue> {
        if let Some(stay) = self.document.get_element_by_id(view::STAY_BUTTON_ID) {
            let controller = self.controller.clone();
            dom::add_click_listener(&stay, move || {
                if let Ok(mut c) = controller.try_borrow_mut() {
                    c.cancel_handoff();
                }
            })?;
        }

        if let Some(now) = self.document.get_element_by_id(view::FEEDBACK_NOW_ID) {
            let controller = self.controller.clone();
            dom::add_click_listener(&now, move || {
                if let Ok(mut c) = controller.try_borrow_mut() {
                    c.handoff_now();
                }
            })?;
        }
        Ok(())
    }

    fn setup_timers(&self) {
        let controller = self.controller.clone();
        Interval::new(1000, move || {
            if let Ok(mut c) = controller.try_borrow_mut() {
                if let HandoffStep::Counting(seconds) = c.handoff_tick() {
                    log::debug!("Feedback hand-off in {}s", seconds);
                }
            }
        })
        .forget();

        let controller = self.controller.clone();
        Interval::new((SNAPSHOT_INTERVAL_SECS * 1000) as u32, move || {
            if let Ok(c) = controller.try_borrow() {
                c.periodic_snapshot();
            }
        })
        .forget();
    }

    fn setup_unload_snapshot(&self) -> Result<(), JsValue> {
        let window = crate::window()?;
        let controller = self.controller.clone();
        // Navigation from inside a handler can fire this while the controller is borrowed
        dom::add_listener(&window, "beforeunload", move || {
            if let Ok(c) = controller.try_borrow() {
                c.before_unload();
            }
        })
    }
}

/// Session identity from hidden inputs, falling back to query parameters
fn session_fields(document: &Document) -> SessionFields {
    let greeting = document
        .get_element_by_id("initialGreeting")
        .and_then(|e| e.text_content())
        .filter(|g| !g.trim().is_empty());

    SessionFields {
        session_id: utils::first_present([
            dom::input_value(document, "sessionId"),
            utils::query_param("session_id"),
        ]),
        domain: utils::first_present([
            dom::input_value(document, "domain"),
            utils::query_param("domain"),
        ]),
        model_type: utils::first_present([
            dom::input_value(document, "modelType"),
            utils::query_param("model_type"),
        ]),
        greeting,
    }
}

fn send_from_input(controller: &Shared, document: &Document) {
    let text = match dom::get_textarea_by_id(document, view::INPUT_ID) {
        Ok(input) => input.value(),
        Err(e) => {
            log::error!("Message input missing: {:?}", e);
            return;
        }
    };

    let request = match controller.try_borrow_mut() {
        Ok(mut c) => match c.begin_submit(&text) {
            Ok(request) => request,
            Err(e) => {
                log::debug!("Message not sent: {}", e);
                return;
            }
        },
        Err(_) => return,
    };
    dispatch(controller.clone(), request);
}

/// Issue the call without holding the controller across the await
fn dispatch(controller: Shared, request: ChatRequest) {
    let api = controller.borrow().api().clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = api.send_message(&request).await;
        let outcome = controller.borrow_mut().handle_response(result);
        log::debug!("Request outcome: {:?}", outcome);
    });
}
