use serde::{Deserialize, Serialize};

/// Camino de login que produjo la sesión
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Email/password contra el backend
    LocalDemo,
    /// Redirect del hosted UI (Cognito)
    HostedIdp,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::LocalDemo => "local_demo",
            Provenance::HostedIdp => "hosted_idp",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "local_demo" => Some(Provenance::LocalDemo),
            "hosted_idp" => Some(Provenance::HostedIdp),
            _ => None,
        }
    }
}

/// Tokens recibidos de un login, antes de persistirse
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tokens {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
}

impl Tokens {
    pub fn from_id_token(token: impl Into<String>) -> Self {
        Self { id_token: Some(token.into()), access_token: None }
    }

    pub fn from_access_token(token: impl Into<String>) -> Self {
        Self { id_token: None, access_token: Some(token.into()) }
    }

    pub fn is_empty(&self) -> bool {
        self.id_token.is_none() && self.access_token.is_none()
    }
}

/// Sesión persistida. Solo `SessionManager` la lee y escribe en storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
    pub provenance: Provenance,
}

impl Session {
    /// Token que decide si la sesión está autenticada: id_token, si no access_token
    pub fn primary_token(&self) -> Option<&str> {
        self.id_token.as_deref().or(self.access_token.as_deref())
    }

    /// Token para `Authorization: Bearer`: access_token, si no id_token
    pub fn bearer_token(&self) -> Option<&str> {
        self.access_token.as_deref().or(self.id_token.as_deref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.primary_token().map(is_well_formed_token).unwrap_or(false)
    }
}

/// Comprobación de forma JWT: exactamente tres segmentos separados por punto,
/// header y payload no vacíos. No verifica la firma.
pub fn is_well_formed_token(token: &str) -> bool {
    let segments: Vec<&str> = token.split('.').collect();
    segments.len() == 3 && !segments[0].is_empty() && !segments[1].is_empty()
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
    #[serde(default)]
    pub school_id: String,
    #[serde(default)]
    pub dob: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Teacher,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Teacher => "teacher",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(UserRole::Student),
            "teacher" => Some(UserRole::Teacher),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// Respuesta de `/auth/login` y `/auth/signup`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub school_id: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
}

/// Respuesta del token endpoint del proveedor
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl From<TokenResponse> for Tokens {
    fn from(response: TokenResponse) -> Self {
        Tokens { id_token: response.id_token, access_token: response.access_token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        assert!(is_well_formed_token("aaa.bbb.ccc"));
        assert!(is_well_formed_token("aaa.bbb."));
        assert!(!is_well_formed_token("fake-jwt-demo"));
        assert!(!is_well_formed_token("aaa.bbb"));
        assert!(!is_well_formed_token("a.b.c.d"));
        assert!(!is_well_formed_token(".bbb.ccc"));
        assert!(!is_well_formed_token(""));
    }

    #[test]
    fn test_session_token_preference() {
        let session = Session {
            id_token: Some("id.token.sig".into()),
            access_token: Some("access.token.sig".into()),
            provenance: Provenance::HostedIdp,
        };
        assert_eq!(session.primary_token(), Some("id.token.sig"));
        assert_eq!(session.bearer_token(), Some("access.token.sig"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_malformed_primary_token_is_not_authenticated() {
        let session = Session {
            id_token: Some("not-a-jwt".into()),
            access_token: Some("access.token.sig".into()),
            provenance: Provenance::LocalDemo,
        };
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_auth_response_without_user() {
        let response: AuthResponse = serde_json::from_str(r#"{"token":"a.b.c"}"#).unwrap();
        assert_eq!(response.token, "a.b.c");
        assert!(response.user.is_none());
    }
}
