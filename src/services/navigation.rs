// ============================================================================
// NAVIGATION - Cambios de ruta e historial
// ============================================================================

use crate::utils::{ROUTE_CALLBACK, ROUTE_LOGIN, ROUTE_PORTAL};

/// Operaciones de navegación que necesita el flujo de autenticación
pub trait Navigator {
    /// Reemplaza la URL visible sin recargar (history.replaceState)
    fn replace_url(&self, url: &str);
    /// Navega a una ruta interna del SPA
    fn navigate(&self, route: &str);
    /// Sale de la app hacia una URL externa (hosted UI)
    fn redirect(&self, url: &str);
}

/// Ruta que realmente se pinta para `path`. El portal sin sesión cae al login.
/// `/callback` solo se pinta mientras el callback de esta carga no ha terminado;
/// después (p.ej. volviendo con Back) se resuelve como cualquier otra ruta.
pub fn resolve_route(path: &str, authenticated: bool, callback_finished: bool) -> &'static str {
    match path {
        ROUTE_CALLBACK if !callback_finished => ROUTE_CALLBACK,
        ROUTE_PORTAL | ROUTE_CALLBACK | "/" if authenticated => ROUTE_PORTAL,
        _ => ROUTE_LOGIN,
    }
}

/// Navegación real del navegador. Las rutas internas se empujan al historial
/// y se notifica a la app con el evento `routechange`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

#[cfg(target_arch = "wasm32")]
impl BrowserNavigator {
    /// URL completa actual (incluye query y fragmento)
    pub fn current_url() -> Option<String> {
        web_sys::window()?.location().href().ok()
    }

    /// Ruta actual (pathname)
    pub fn current_path() -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl Navigator for BrowserNavigator {
    fn replace_url(&self, url: &str) {
        let history = web_sys::window().and_then(|w| w.history().ok());
        match history {
            Some(history) => {
                if history
                    .replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(url))
                    .is_err()
                {
                    log::error!("❌ [NAV] replaceState falló para {}", url);
                }
            }
            None => log::error!("❌ [NAV] Sin acceso a window.history"),
        }
    }

    fn navigate(&self, route: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Ok(history) = window.history() {
            if history
                .push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(route))
                .is_err()
            {
                log::error!("❌ [NAV] pushState falló para {}", route);
            }
        }
        log::info!("🧭 [NAV] → {}", route);
        if let Ok(event) = web_sys::Event::new(crate::utils::ROUTE_CHANGE_EVENT) {
            let _ = window.dispatch_event(&event);
        }
    }

    fn redirect(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            log::info!("↗️ [NAV] Redirigiendo a {}", url);
            if window.location().set_href(url).is_err() {
                log::error!("❌ [NAV] No se pudo redirigir a {}", url);
            }
        }
    }
}
