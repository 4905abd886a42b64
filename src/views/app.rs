// ============================================================================
// APP VIEW - Router por pathname
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::utils::{ROUTE_CALLBACK, ROUTE_PORTAL};
use crate::views::{render_callback, render_login, render_portal, WebAppState};

pub fn render_app(state: &WebAppState, route: &str) -> Result<Element, JsValue> {
    match route {
        ROUTE_CALLBACK => render_callback(state),
        ROUTE_PORTAL => render_portal(state),
        _ => render_login(state),
    }
}
