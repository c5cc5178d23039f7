use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

mod chat_page;
mod client;
mod dom;
mod feedback_page;
mod start_page;
mod store;
mod utils;
mod view;

pub use client::FetchClient;
pub use store::LocalStorageStore;
pub use view::DomView;

/// Initialize the WASM application
/// This sets up panic hooks and logging
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("TOD simulator WASM initialized");
}

/// Initialize the domain/model selection page
#[wasm_bindgen]
pub fn init_start_page() -> Result<(), JsValue> {
    log::info!("Initializing start page");
    start_page::StartPage::new()?.start()
}

/// Initialize the chat page
#[wasm_bindgen]
pub fn init_chat_page() -> Result<(), JsValue> {
    log::info!("Initializing chat page");
    chat_page::ChatPage::new()?.start()
}

/// Initialize the feedback page
#[wasm_bindgen]
pub fn init_feedback_page() -> Result<(), JsValue> {
    log::info!("Initializing feedback page");
    feedback_page::FeedbackPage::new()?.start()
}

/// Get the window object
fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

/// Get the document object
fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}
