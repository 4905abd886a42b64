// ============================================================================
// LOGIN VIEWMODEL - Estado + lógica de la pantalla de login
// ============================================================================
// La vista solo pinta `message` y llama a estos métodos.
// ============================================================================

use crate::error::AuthError;
use crate::models::SignupRequest;
use crate::services::{AuthService, HttpClient, Navigator};
use crate::state::ReactiveState;
use crate::utils::{KeyValueStore, ROUTE_PORTAL};

/// Mensaje inline bajo el formulario
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    Pending(String),
    Success(String),
    Failure(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Pending(t) | StatusMessage::Success(t) | StatusMessage::Failure(t) => t,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            StatusMessage::Pending(_) => "status-message pending",
            StatusMessage::Success(_) => "status-message success",
            StatusMessage::Failure(_) => "status-message error",
        }
    }
}

/// ViewModel de login
#[derive(Clone)]
pub struct LoginViewModel<S: KeyValueStore, H: HttpClient> {
    auth: AuthService<S, H>,
    pub message: ReactiveState<Option<StatusMessage>>,
}

impl<S: KeyValueStore, H: HttpClient> LoginViewModel<S, H> {
    pub fn new(auth: AuthService<S, H>, message: ReactiveState<Option<StatusMessage>>) -> Self {
        Self { auth, message }
    }

    pub fn hosted_login_enabled(&self) -> bool {
        self.auth.hosted_login().is_some()
    }

    /// Login local. Devuelve true si se estableció la sesión.
    pub async fn login<N: Navigator>(&self, email: &str, password: &str, navigator: &N) -> bool {
        self.message.set(Some(StatusMessage::Pending("🔄 Logging in...".to_string())));
        let result = self.auth.login_with_password(email, password).await;
        self.finish(result.map(|_| "✅ Login successful!"), navigator)
    }

    pub async fn signup<N: Navigator>(&self, request: SignupRequest, navigator: &N) -> bool {
        self.message.set(Some(StatusMessage::Pending("🔄 Creating account...".to_string())));
        let result = self.auth.signup(request).await;
        self.finish(result.map(|_| "✅ Account created!"), navigator)
    }

    /// Sale hacia el hosted UI
    pub fn hosted_login<N: Navigator>(&self, navigator: &N) {
        if let Err(e) = self.auth.begin_hosted_login(navigator) {
            log::error!("❌ [LOGIN] {}", e);
            self.message.set(Some(StatusMessage::Failure(format!("❌ {}", e))));
        }
    }

    fn finish<N: Navigator>(&self, result: Result<&str, AuthError>, navigator: &N) -> bool {
        match result {
            Ok(text) => {
                self.message.set(Some(StatusMessage::Success(text.to_string())));
                navigator.navigate(ROUTE_PORTAL);
                true
            }
            Err(e) => {
                log::error!("❌ [LOGIN] {}", e);
                self.message.set(Some(StatusMessage::Failure(format!("❌ {}", e.user_message()))));
                false
            }
        }
    }
}
