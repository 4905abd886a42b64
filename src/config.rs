use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/callback";
const DEFAULT_SCOPE: &str = "openid profile email";
const DEFAULT_EVENT_POLL_INTERVAL_MS: u32 = 3000;

/// Grant OAuth que usa el portal. Se elige uno solo en configuración;
/// el callback nunca prueba el otro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantFlow {
    /// Tokens en el fragmento (`#id_token=...&access_token=...`)
    Implicit,
    /// `?code=...` que se intercambia en el token endpoint
    AuthorizationCode,
}

impl GrantFlow {
    /// Valor de `response_type` para el authorize endpoint
    pub fn response_type(&self) -> &'static str {
        match self {
            GrantFlow::Implicit => "token",
            GrantFlow::AuthorizationCode => "code",
        }
    }
}

impl FromStr for GrantFlow {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "implicit" | "token" => Ok(GrantFlow::Implicit),
            "code" | "authorization_code" => Ok(GrantFlow::AuthorizationCode),
            other => Err(ConfigError::UnknownGrant(other.to_string())),
        }
    }
}

/// Configuración del hosted UI (Cognito)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostedLoginConfig {
    pub domain: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub grant: GrantFlow,
}

impl HostedLoginConfig {
    pub fn authorize_endpoint(&self) -> String {
        format!("{}/oauth2/authorize", self.domain.trim_end_matches('/'))
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/token", self.domain.trim_end_matches('/'))
    }

    /// URL completa del authorize endpoint con los parámetros del grant configurado
    pub fn authorize_url(&self) -> Result<String, ConfigError> {
        let url = url::Url::parse_with_params(
            &self.authorize_endpoint(),
            &[
                ("response_type", self.grant.response_type()),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
            ],
        )
        .map_err(|e| ConfigError::InvalidValue {
            key: "COGNITO_DOMAIN",
            value: format!("{} ({})", self.domain, e),
        })?;
        Ok(url.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub environment: String,
    pub enable_logging: bool,
    pub event_poll_interval_ms: u32,
    /// `None` cuando no hay dominio/client id: solo login local
    pub hosted_login: Option<HostedLoginConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            event_poll_interval_ms: DEFAULT_EVENT_POLL_INTERVAL_MS,
            hosted_login: None,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación.
    /// Si la configuración es inválida se usa la de por defecto (solo login local).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| compile_time_var(key).map(str::to_string)).unwrap_or_else(|e| {
            log::error!("❌ Configuración inválida, usando valores por defecto: {}", e);
            Self::default()
        })
    }

    /// Construye la configuración a partir de una función de búsqueda de claves
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let enable_logging = match get("ENABLE_LOGGING") {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue { key: "ENABLE_LOGGING", value: v })?,
            None => true,
        };
        let event_poll_interval_ms = match get("EVENT_POLL_INTERVAL_MS") {
            Some(v) => match v.parse::<u32>() {
                Ok(ms) if ms > 0 => ms,
                _ => return Err(ConfigError::InvalidValue { key: "EVENT_POLL_INTERVAL_MS", value: v }),
            },
            None => DEFAULT_EVENT_POLL_INTERVAL_MS,
        };

        let hosted_login = match (get("COGNITO_DOMAIN"), get("COGNITO_CLIENT_ID")) {
            (Some(domain), Some(client_id)) => {
                let grant = match get("COGNITO_GRANT") {
                    Some(v) => v.parse()?,
                    None => GrantFlow::Implicit,
                };
                Some(HostedLoginConfig {
                    domain,
                    client_id,
                    redirect_uri: get("COGNITO_REDIRECT_URI").unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
                    scope: get("COGNITO_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
                    grant,
                })
            }
            (Some(_), None) => return Err(ConfigError::MissingValue("COGNITO_CLIENT_ID")),
            (None, Some(_)) => return Err(ConfigError::MissingValue("COGNITO_DOMAIN")),
            (None, None) => None,
        };

        Ok(Self {
            api_base_url: get("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            enable_logging,
            event_poll_interval_ms,
            hosted_login,
        })
    }

    /// URL base del backend sin barra final
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

// option_env! necesita literales, de ahí el match
fn compile_time_var(key: &str) -> Option<&'static str> {
    match key {
        "API_BASE_URL" => option_env!("API_BASE_URL"),
        "ENVIRONMENT" => option_env!("ENVIRONMENT"),
        "ENABLE_LOGGING" => option_env!("ENABLE_LOGGING"),
        "EVENT_POLL_INTERVAL_MS" => option_env!("EVENT_POLL_INTERVAL_MS"),
        "COGNITO_DOMAIN" => option_env!("COGNITO_DOMAIN"),
        "COGNITO_CLIENT_ID" => option_env!("COGNITO_CLIENT_ID"),
        "COGNITO_REDIRECT_URI" => option_env!("COGNITO_REDIRECT_URI"),
        "COGNITO_SCOPE" => option_env!("COGNITO_SCOPE"),
        "COGNITO_GRANT" => option_env!("COGNITO_GRANT"),
        _ => None,
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
