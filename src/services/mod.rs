pub mod http;
pub mod session_manager;
pub mod api_client;
pub mod auth_service;
pub mod navigation;
pub mod oauth_callback;
pub mod event_poller;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use session_manager::SessionManager;
pub use api_client::{ApiBody, ApiClient, EncryptionPolicy, RequestAuth};
pub use auth_service::{AuthService, LoginSuccess};
pub use navigation::{resolve_route, Navigator};
pub use oauth_callback::{exchange_code, CallbackHandler, CallbackParams, CallbackState};
pub use event_poller::{poll_once, EventFeed};

#[cfg(target_arch = "wasm32")]
pub use http::GlooHttpClient;
#[cfg(target_arch = "wasm32")]
pub use navigation::BrowserNavigator;
#[cfg(target_arch = "wasm32")]
pub use event_poller::EventPoller;
