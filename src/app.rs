// ============================================================================
// APP - Aplicación principal: routing, callback y ciclo de vida del poller
// ============================================================================

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{append_child, get_element_by_id, set_inner_html};
use crate::services::{resolve_route, BrowserNavigator, CallbackState, EventPoller, GlooHttpClient, Navigator};
use crate::state::AppState;
use crate::utils::{LocalStorage, ROUTE_CALLBACK, ROUTE_LOGIN, ROUTE_PORTAL};
use crate::views::{render_app, WebAppState};

/// Aplicación principal
pub struct App {
    state: WebAppState,
    root: Element,
    poller: Option<EventPoller>,
    callback_started: bool,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app").ok_or_else(|| JsValue::from_str("No #app element found"))?;
        let state = AppState::new((*CONFIG).clone(), LocalStorage, GlooHttpClient);

        // Batchear varios cambios seguidos en un solo re-render
        state.subscribe_to_changes(|| {
            Timeout::new(0, crate::rerender_app).forget();
        });

        Ok(Self { state, root, poller: None, callback_started: false })
    }

    pub fn render(&mut self) -> Result<(), JsValue> {
        let path = BrowserNavigator::current_path();
        let callback_finished = self.state.callback_state.snapshot().is_terminal();
        let route = resolve_route(&path, self.state.session.is_authenticated(), callback_finished);
        if route != path {
            log::info!("🔒 [APP] {} → {}", path, route);
            BrowserNavigator.replace_url(route);
        }

        self.sync_poller(route);
        if route == ROUTE_CALLBACK {
            self.start_callback();
        }

        set_inner_html(&self.root, "");
        let view = render_app(&self.state, route)?;
        append_child(&self.root, &view)?;
        Ok(())
    }

    /// El poller vive solo mientras se muestra el portal con sesión
    fn sync_poller(&mut self, route: &str) {
        let should_poll = route == ROUTE_PORTAL && self.state.session.is_authenticated();
        match (should_poll, self.poller.is_some()) {
            (true, false) => {
                self.poller = Some(EventPoller::start(
                    self.state.api.clone(),
                    self.state.feed.clone(),
                    self.state.config.event_poll_interval_ms,
                ));
            }
            (false, true) => {
                self.poller = None;
                if !self.state.session.is_authenticated() {
                    self.state.feed.update(|f| f.clear());
                }
            }
            _ => {}
        }
    }

    /// Lanza el callback una sola vez por carga de página
    fn start_callback(&mut self) {
        if self.callback_started {
            return;
        }
        self.callback_started = true;

        let handler = self.state.callback_handler();
        let callback_state = self.state.callback_state.clone();
        // fuera del render: el handler navega y eso re-renderiza
        spawn_local(async move {
            let result = match (handler, BrowserNavigator::current_url()) {
                (Some(mut handler), Some(href)) => handler.complete(&href, &BrowserNavigator).await,
                (None, _) => {
                    log::error!("❌ [CALLBACK] Hosted login no configurado");
                    BrowserNavigator.navigate(ROUTE_LOGIN);
                    CallbackState::Failed { reason: "Hosted login is not configured".to_string() }
                }
                (Some(_), None) => {
                    BrowserNavigator.navigate(ROUTE_LOGIN);
                    CallbackState::Failed { reason: "No callback URL".to_string() }
                }
            };
            callback_state.set(result);
        });
    }
}
