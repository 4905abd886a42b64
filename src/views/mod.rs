pub mod app;
pub mod callback;
pub mod login;
pub mod portal;

pub use app::render_app;
pub use callback::render_callback;
pub use login::render_login;
pub use portal::render_portal;

use crate::services::GlooHttpClient;
use crate::state::AppState;
use crate::utils::LocalStorage;
use crate::viewmodels::StatusMessage;

pub const LOGIN_STATUS_ID: &str = "login-status";
pub const PORTAL_STATUS_ID: &str = "portal-status";

/// Estado concreto en el navegador
pub type WebAppState = AppState<LocalStorage, GlooHttpClient>;

/// Pinta el último mensaje del viewmodel en el elemento `status_id` montado
/// ahora; el de cuando se lanzó la acción puede haber sido reemplazado.
pub(crate) fn paint_message(message: &Option<StatusMessage>, status_id: &str) {
    let (Some(message), Some(status)) = (message, crate::dom::get_element_by_id(status_id)) else {
        return;
    };
    crate::dom::update_status(&status, message.text(), message.css_class());
}
