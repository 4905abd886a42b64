// ============================================================================
// OAUTH CALLBACK - Cierre del redirect del hosted UI
// ============================================================================
// Una estrategia por configuración (GrantFlow). El handler despacha solo a esa
// estrategia: un `code` y un fragmento con tokens son señales excluyentes.
// Pending → {Authenticated, Failed}, ambos terminales, sin reintentos.
// ============================================================================

use std::collections::HashMap;
use url::Url;

use crate::config::{GrantFlow, HostedLoginConfig};
use crate::error::AuthError;
use crate::models::{Provenance, TokenResponse, Tokens};
use crate::services::http::{HttpClient, HttpRequest};
use crate::services::navigation::Navigator;
use crate::services::session_manager::SessionManager;
use crate::utils::{KeyValueStore, ROUTE_LOGIN, ROUTE_PORTAL};

/// Estado de un intento de callback
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackState {
    Pending,
    Authenticated,
    Failed { reason: String },
}

impl CallbackState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CallbackState::Pending)
    }
}

/// Parámetros de la URL de retorno, fragmento y query por separado
#[derive(Clone, Debug, PartialEq)]
pub struct CallbackParams {
    url: Url,
    fragment: HashMap<String, String>,
    query: HashMap<String, String>,
}

impl CallbackParams {
    pub fn parse(href: &str) -> Result<Self, AuthError> {
        let url = Url::parse(href).map_err(|e| AuthError::InvalidUrl(e.to_string()))?;
        let fragment = url
            .fragment()
            .map(|f| url::form_urlencoded::parse(f.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        let query = url.query_pairs().into_owned().collect();
        Ok(Self { url, fragment, query })
    }

    pub fn fragment(&self, key: &str) -> Option<&str> {
        self.fragment.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// `error_description`, si no `error`; primero en el fragmento, luego en la query
    pub fn provider_error(&self) -> Option<String> {
        self.fragment("error_description")
            .or_else(|| self.fragment("error"))
            .or_else(|| self.query("error_description"))
            .or_else(|| self.query("error"))
            .map(str::to_string)
    }

    /// path + query, sin fragmento
    pub fn url_without_fragment(&self) -> String {
        match self.url.query() {
            Some(q) if !q.is_empty() => format!("{}?{}", self.url.path(), q),
            _ => self.url.path().to_string(),
        }
    }

    /// path + query sin `code`/`state`, sin fragmento
    pub fn url_without_code(&self) -> String {
        let remaining: Vec<(String, String)> = self
            .url
            .query_pairs()
            .into_owned()
            .filter(|(k, _)| k != "code" && k != "state")
            .collect();
        if remaining.is_empty() {
            return self.url.path().to_string();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(remaining)
            .finish();
        format!("{}?{}", self.url.path(), query)
    }
}

/// Completa el login del hosted UI para el grant configurado
pub struct CallbackHandler<S: KeyValueStore, H: HttpClient> {
    session: SessionManager<S>,
    http: H,
    config: HostedLoginConfig,
    state: CallbackState,
}

impl<S: KeyValueStore, H: HttpClient> CallbackHandler<S, H> {
    pub fn new(session: SessionManager<S>, http: H, config: HostedLoginConfig) -> Self {
        Self { session, http, config, state: CallbackState::Pending }
    }

    pub fn state(&self) -> &CallbackState {
        &self.state
    }

    /// Procesa la URL de retorno una sola vez; llamadas posteriores devuelven
    /// el estado terminal sin tocar nada.
    pub async fn complete<N: Navigator>(&mut self, href: &str, navigator: &N) -> CallbackState {
        if self.state.is_terminal() {
            log::warn!("⚠️ [CALLBACK] Ya procesado, se ignora");
            return self.state.clone();
        }

        let result = match CallbackParams::parse(href) {
            Ok(params) => match self.config.grant {
                GrantFlow::Implicit => self.complete_implicit(&params),
                GrantFlow::AuthorizationCode => self.complete_code(&params).await,
            },
            Err(e) => Err(e),
        };

        self.state = match result {
            Ok(clean_url) => {
                // sin fragmento/código, un reload no reprocesa tokens viejos
                navigator.replace_url(&clean_url);
                navigator.navigate(ROUTE_PORTAL);
                log::info!("✅ [CALLBACK] Sesión establecida");
                CallbackState::Authenticated
            }
            Err(e) => {
                log::error!("❌ [CALLBACK] {}", e);
                navigator.navigate(ROUTE_LOGIN);
                CallbackState::Failed { reason: e.to_string() }
            }
        };
        self.state.clone()
    }

    fn complete_implicit(&self, params: &CallbackParams) -> Result<String, AuthError> {
        if let Some(error) = params.provider_error() {
            return Err(AuthError::Provider(error));
        }

        match params.fragment("id_token") {
            Some(id_token) => {
                let tokens = Tokens {
                    id_token: Some(id_token.to_string()),
                    access_token: params.fragment("access_token").map(str::to_string),
                };
                self.session.set_session(tokens, Provenance::HostedIdp)?;
                Ok(params.url_without_fragment())
            }
            None if params.query("code").is_some() => Err(AuthError::GrantMismatch(
                "received an authorization code but the implicit grant is configured".to_string(),
            )),
            None => Err(AuthError::MissingParameters),
        }
    }

    async fn complete_code(&self, params: &CallbackParams) -> Result<String, AuthError> {
        if let Some(error) = params.provider_error() {
            return Err(AuthError::Provider(error));
        }

        let code = match params.query("code") {
            Some(code) => code,
            None if params.fragment("id_token").is_some() => {
                return Err(AuthError::GrantMismatch(
                    "received tokens in the fragment but the authorization-code grant is configured".to_string(),
                ))
            }
            None => return Err(AuthError::MissingParameters),
        };

        let tokens = exchange_code(&self.http, &self.config, code).await?;
        self.session.set_session(tokens, Provenance::HostedIdp)?;
        Ok(params.url_without_code())
    }
}

/// Intercambia el código por tokens: un único POST form-encoded al token endpoint
pub async fn exchange_code<H: HttpClient>(
    http: &H,
    config: &HostedLoginConfig,
    code: &str,
) -> Result<Tokens, AuthError> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "authorization_code")
        .append_pair("client_id", &config.client_id)
        .append_pair("code", code)
        .append_pair("redirect_uri", &config.redirect_uri)
        .finish();
    let request = HttpRequest::post(config.token_endpoint())
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body);

    log::info!("🔄 [CALLBACK] Intercambiando código en {}", config.token_endpoint());
    let response = http
        .send(request)
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    if !response.ok() {
        return Err(AuthError::TokenExchange(format!(
            "HTTP {} {}: {}",
            response.status,
            response.status_text,
            response.body.trim()
        )));
    }

    let token_response: TokenResponse = response
        .json()
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;
    if token_response.id_token.is_none() {
        return Err(AuthError::TokenExchange("response has no id_token".to_string()));
    }
    Ok(token_response.into())
}
