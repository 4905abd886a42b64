// ============================================================================
// CALLBACK VIEW - Pantalla mientras se procesa el retorno del hosted UI
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::services::CallbackState;
use crate::dom::ElementBuilder;
use crate::views::WebAppState;

/// Solo pinta el estado; el handler lo lanza `App` una única vez
pub fn render_callback(state: &WebAppState) -> Result<Element, JsValue> {
    let (text, class) = match state.callback_state.snapshot() {
        CallbackState::Pending => ("Processing login…".to_string(), "callback-screen pending"),
        CallbackState::Authenticated => ("Login complete, redirecting…".to_string(), "callback-screen success"),
        CallbackState::Failed { reason } => (format!("Login failed: {}", reason), "callback-screen error"),
    };
    Ok(ElementBuilder::new("div")?
        .class(class)
        .child(ElementBuilder::new("p")?.text(&text).build())?
        .build())
}
