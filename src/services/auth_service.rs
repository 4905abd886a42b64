// ============================================================================
// AUTH SERVICE - Login local, signup, hosted UI y logout
// ============================================================================

use crate::config::HostedLoginConfig;
use crate::error::AuthError;
use crate::models::{AuthResponse, LoginRequest, Provenance, Session, SignupRequest, Tokens, UserProfile};
use crate::services::api_client::{ApiClient, RequestAuth};
use crate::services::http::HttpClient;
use crate::services::navigation::Navigator;
use crate::services::session_manager::SessionManager;
use crate::utils::{KeyValueStore, ROUTE_LOGIN};

/// Result of a successful local login or signup
#[derive(Clone, Debug, PartialEq)]
pub struct LoginSuccess {
    pub session: Session,
    pub user: Option<UserProfile>,
}

/// Establishes and tears down the session through either login path.
#[derive(Clone)]
pub struct AuthService<S: KeyValueStore, H: HttpClient> {
    api: ApiClient<S, H>,
    hosted: Option<HostedLoginConfig>,
}

impl<S: KeyValueStore, H: HttpClient> AuthService<S, H> {
    pub fn new(api: ApiClient<S, H>, hosted: Option<HostedLoginConfig>) -> Self {
        Self { api, hosted }
    }

    pub fn session(&self) -> &SessionManager<S> {
        self.api.session()
    }

    pub fn hosted_login(&self) -> Option<&HostedLoginConfig> {
        self.hosted.as_ref()
    }

    /// Perform login with email and password against the backing API.
    /// One request, no retry; the session is untouched on failure.
    pub async fn login_with_password(&self, email: &str, password: &str) -> Result<LoginSuccess, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        log::info!("🔐 Login local para: {}", email);
        let request = LoginRequest { email: email.to_string(), password: password.to_string() };
        let response: AuthResponse = self
            .api
            .post_json("/auth/login", &request, RequestAuth::Anonymous)
            .await?;

        let session = self
            .session()
            .set_session(Tokens::from_id_token(response.token), Provenance::LocalDemo)?;
        log::info!("✅ Login local correcto");
        Ok(LoginSuccess { session, user: response.user })
    }

    /// Create an account; the returned token becomes the session's access token
    pub async fn signup(&self, request: SignupRequest) -> Result<LoginSuccess, AuthError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        log::info!("📝 Alta de cuenta para: {} ({})", request.email, request.role.as_str());
        let response: AuthResponse = self
            .api
            .post_json("/auth/signup", &request, RequestAuth::Anonymous)
            .await?;

        let session = self
            .session()
            .set_session(Tokens::from_access_token(response.token), Provenance::LocalDemo)?;
        Ok(LoginSuccess { session, user: response.user })
    }

    /// Authorize URL of the hosted UI for the configured grant
    pub fn authorize_url(&self) -> Result<String, AuthError> {
        let hosted = self.hosted.as_ref().ok_or(AuthError::HostedLoginDisabled)?;
        hosted.authorize_url().map_err(|e| {
            log::error!("❌ URL de authorize inválida: {}", e);
            AuthError::HostedLoginDisabled
        })
    }

    /// Leave the app for the identity provider
    pub fn begin_hosted_login<N: Navigator>(&self, navigator: &N) -> Result<(), AuthError> {
        let url = self.authorize_url()?;
        navigator.redirect(&url);
        Ok(())
    }

    /// Clear every token and go back to the login view. Idempotent.
    pub fn logout<N: Navigator>(&self, navigator: &N) {
        self.session().clear_session();
        navigator.navigate(ROUTE_LOGIN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrantFlow;
    use crate::error::ApiError;
    use crate::models::UserRole;
    use crate::services::http::testing::ScriptedHttpClient;
    use crate::services::navigation::testing::{NavAction, RecordingNavigator};
    use crate::utils::{MemoryStorage, STORAGE_KEY_ACCESS_TOKEN, STORAGE_KEY_ID_TOKEN};
    use futures::executor::block_on;

    const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJkZW1vIn0.sig";

    fn service(hosted: Option<HostedLoginConfig>) -> (AuthService<MemoryStorage, ScriptedHttpClient>, ScriptedHttpClient, MemoryStorage) {
        let store = MemoryStorage::new();
        let http = ScriptedHttpClient::new();
        let api = ApiClient::new("http://api.test", SessionManager::new(store.clone()), http.clone());
        (AuthService::new(api, hosted), http, store)
    }

    fn hosted(grant: GrantFlow) -> HostedLoginConfig {
        HostedLoginConfig {
            domain: "https://idp.test".into(),
            client_id: "client-1".into(),
            redirect_uri: "http://localhost:3000/callback".into(),
            scope: "openid".into(),
            grant,
        }
    }

    #[test]
    fn test_local_login_stores_token() {
        let (auth, http, store) = service(None);
        http.respond_json(200, &format!(r#"{{"token":"{}","user":{{"email":"a@b.edu","role":"teacher"}}}}"#, TOKEN));

        let success = block_on(auth.login_with_password("a@b.edu", "pw")).unwrap();
        assert_eq!(success.user.unwrap().role.as_deref(), Some("teacher"));
        assert_eq!(store.get_item(STORAGE_KEY_ID_TOKEN).as_deref(), Some(TOKEN));
        assert!(auth.session().is_authenticated());

        let body: serde_json::Value = serde_json::from_str(http.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"email": "a@b.edu", "password": "pw"}));
    }

    #[test]
    fn test_local_login_failure_keeps_session() {
        let (auth, http, store) = service(None);
        auth.session().set_session(Tokens::from_id_token(TOKEN), Provenance::HostedIdp).unwrap();
        http.respond_json(401, r#"{"error":"invalid credentials"}"#);

        let err = block_on(auth.login_with_password("a@b.edu", "nope")).unwrap_err();
        assert_eq!(err.user_message(), "invalid credentials");
        assert_eq!(store.get_item(STORAGE_KEY_ID_TOKEN).as_deref(), Some(TOKEN));
        assert_eq!(http.requests().len(), 1);
    }

    #[test]
    fn test_local_login_network_error_and_malformed_body() {
        let (auth, http, store) = service(None);
        http.fail(ApiError::Network("offline".into()));
        http.respond_json(200, r#"{"nope":1}"#);

        assert!(matches!(
            block_on(auth.login_with_password("a@b.edu", "pw")),
            Err(AuthError::Api(ApiError::Network(_)))
        ));
        assert!(matches!(
            block_on(auth.login_with_password("a@b.edu", "pw")),
            Err(AuthError::Api(ApiError::Parse(_)))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_local_login_rejects_non_jwt_token() {
        let (auth, http, store) = service(None);
        http.respond_json(200, r#"{"token":"fake-jwt-demo"}"#);
        let err = block_on(auth.login_with_password("demo", "demo")).unwrap_err();
        assert_eq!(err, AuthError::MalformedToken);
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_credentials_never_hit_the_network() {
        let (auth, http, _) = service(None);
        assert_eq!(block_on(auth.login_with_password("  ", "pw")), Err(AuthError::MissingCredentials));
        assert!(http.requests().is_empty());
    }

    #[test]
    fn test_signup_stores_access_token() {
        let (auth, http, store) = service(None);
        http.respond_json(200, &format!(r#"{{"token":"{}"}}"#, TOKEN));

        let request = SignupRequest {
            email: "new@b.edu".into(),
            password: "pw".into(),
            role: UserRole::Student,
            school_id: "S-1".into(),
            dob: "2010-01-01".into(),
        };
        block_on(auth.signup(request)).unwrap();
        assert_eq!(store.get_item(STORAGE_KEY_ACCESS_TOKEN).as_deref(), Some(TOKEN));
        assert!(store.get_item(STORAGE_KEY_ID_TOKEN).is_none());
        assert_eq!(http.requests()[0].url, "http://api.test/auth/signup");
    }

    #[test]
    fn test_hosted_login_redirects_to_authorize() {
        let (auth, _, _) = service(Some(hosted(GrantFlow::AuthorizationCode)));
        let nav = RecordingNavigator::default();
        auth.begin_hosted_login(&nav).unwrap();

        match &nav.actions()[0] {
            NavAction::Redirect(url) => {
                assert!(url.starts_with("https://idp.test/oauth2/authorize?response_type=code"));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_hosted_login_disabled_without_config() {
        let (auth, _, _) = service(None);
        let nav = RecordingNavigator::default();
        assert_eq!(auth.begin_hosted_login(&nav), Err(AuthError::HostedLoginDisabled));
        assert!(nav.actions().is_empty());
    }

    #[test]
    fn test_logout_twice_matches_logout_once() {
        let (auth, _, store) = service(None);
        auth.session().set_session(Tokens::from_id_token(TOKEN), Provenance::LocalDemo).unwrap();
        let nav = RecordingNavigator::default();

        auth.logout(&nav);
        assert!(store.is_empty());
        auth.logout(&nav);
        assert!(store.is_empty());
        assert!(!auth.session().is_authenticated());
        assert_eq!(nav.last_route().as_deref(), Some(ROUTE_LOGIN));
    }
}
