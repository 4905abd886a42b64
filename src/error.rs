// ============================================================================
// ERRORES - Tipos de error del portal
// ============================================================================

use thiserror::Error;

/// Errores de la capa HTTP contra el backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Fallo de red (fetch rechazado, CORS, sin conexión)
    #[error("Network error: {0}")]
    Network(String),

    /// Respuesta no-2xx; `message` es el texto del backend o "<status> <status text>"
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Cuerpo de respuesta que no se pudo interpretar
    #[error("Parse error: {0}")]
    Parse(String),

    /// Cuerpo de petición que no se pudo serializar
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Errores del flujo de autenticación (login local y callback OAuth).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Email and password are required")]
    MissingCredentials,

    /// `error` / `error_description` devuelto por el proveedor de identidad
    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Callback URL carries no tokens, code or error")]
    MissingParameters,

    /// El proveedor respondió con el grant que no está configurado
    #[error("Grant mismatch: {0}")]
    GrantMismatch(String),

    #[error("Invalid callback URL: {0}")]
    InvalidUrl(String),

    /// El token no tiene la forma header.payload.signature
    #[error("Malformed token")]
    MalformedToken,

    #[error("Hosted login is not configured")]
    HostedLoginDisabled,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Mensaje para mostrar al usuario. Solo los errores HTTP del backend
    /// llevan su propio texto; el resto se pliega a un fallo genérico.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Api(ApiError::Http { message, .. }) => message.clone(),
            AuthError::MissingCredentials => self.to_string(),
            _ => "Login failed".to_string(),
        }
    }
}

/// Errores al construir la configuración.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown grant flow '{0}' (expected 'implicit' or 'code')")]
    UnknownGrant(String),

    #[error("Missing value for {0}")]
    MissingValue(&'static str),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
