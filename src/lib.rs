// ============================================================================
// SCHOOLCLOUD PORTAL - FRONTEND MVVM (RUST PURO)
// ============================================================================
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado + Lógica UI
// - Services: sesión, API, OAuth callback, feed de actividad
// - State: State Management con Rc<RefCell>
// - Models: Estructuras compartidas con backend
// Solo app/dom/views dependen del navegador; el resto compila y se testea nativo.
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod views;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use crate::app::App;
    use crate::config::CONFIG;
    use crate::dom::on_window_event;
    use crate::utils::ROUTE_CHANGE_EVENT;

    // Instancia global de App
    thread_local! {
        static APP: RefCell<Option<App>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let level = if CONFIG.is_logging_enabled() { log::Level::Debug } else { log::Level::Warn };
        wasm_logger::init(wasm_logger::Config::new(level));
        log::info!("🚀 SchoolCloud Portal ({})", CONFIG.environment);

        let mut app = App::new()?;
        app.render()?;
        APP.with(|cell| *cell.borrow_mut() = Some(app));

        // Listeners globales: se registran una sola vez aquí
        on_window_event(ROUTE_CHANGE_EVENT, |_| rerender_app())?;
        on_window_event("popstate", |_| rerender_app())?;

        Ok(())
    }

    /// Re-render completo. Si ya hay un render en curso se reprograma.
    pub fn rerender_app() {
        APP.with(|cell| match cell.try_borrow_mut() {
            Ok(mut app) => {
                if let Some(app) = app.as_mut() {
                    if let Err(e) = app.render() {
                        log::error!("❌ [RERENDER] {:?}", e);
                    }
                }
            }
            Err(_) => gloo_timers::callback::Timeout::new(0, rerender_app).forget(),
        });
    }

    /// Re-render invocable desde JavaScript
    #[wasm_bindgen]
    pub fn rerender_app_wasm() {
        rerender_app();
    }
}
