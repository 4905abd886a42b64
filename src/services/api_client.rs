// ============================================================================
// API CLIENT - Comunicación HTTP con el backend
// ============================================================================
// Decora las llamadas protegidas con `Authorization: Bearer` y limpia la
// sesión ante un 401. No tiene lógica de negocio.
// ============================================================================

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::ActivityEvent;
use crate::services::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::services::session_manager::SessionManager;
use crate::utils::KeyValueStore;

/// Si la llamada lleva el token de sesión
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestAuth {
    /// Adjunta el bearer si hay sesión; un 401 invalida la sesión
    Session,
    /// Login/signup: sin bearer y un 401 no toca la sesión
    Anonymous,
}

/// Cuerpo de respuesta: JSON si el content-type lo indica, si no texto
#[derive(Clone, Debug, PartialEq)]
pub enum ApiBody {
    Json(serde_json::Value),
    Text(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncryptionPolicy {
    SseS3,
    SseKms,
}

impl EncryptionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncryptionPolicy::SseS3 => "SSE-S3",
            EncryptionPolicy::SseKms => "SSE-KMS",
        }
    }
}

/// Cliente API. Stateless salvo por la sesión compartida.
#[derive(Clone)]
pub struct ApiClient<S: KeyValueStore, H: HttpClient> {
    base_url: String,
    session: SessionManager<S>,
    http: H,
}

impl<S: KeyValueStore, H: HttpClient> ApiClient<S, H> {
    pub fn new(base_url: impl Into<String>, session: SessionManager<S>, http: H) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, session, http }
    }

    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Envía la petición y aplica las reglas comunes: bearer, 401 y errores no-2xx
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        auth: RequestAuth,
    ) -> Result<HttpResponse, ApiError> {
        let mut request = HttpRequest::new(method, self.url(path));
        if let Some(body) = body {
            let json = serde_json::to_string(&body).map_err(|e| ApiError::Serialization(e.to_string()))?;
            request = request.header("Content-Type", "application/json").body(json);
        }
        if auth == RequestAuth::Session {
            match self.session.bearer_token() {
                Some(token) => request = request.header("Authorization", &format!("Bearer {}", token)),
                None => log::warn!("⚠️ [API] {} sin sesión, se envía sin Authorization", path),
            }
        }

        let response = self.http.send(request).await.map_err(|e| {
            log::error!("❌ [API] {} {}", path, e);
            e
        })?;

        if response.status == 401 && auth == RequestAuth::Session {
            log::warn!("🔒 [API] 401 en {}, invalidando sesión", path);
            self.session.clear_session();
        }

        if !response.ok() {
            let message = error_message(&response);
            log::error!("❌ [API] {} HTTP {}: {}", path, response.status, message);
            return Err(ApiError::Http { status: response.status, message });
        }

        Ok(response)
    }

    /// Igual que `request` pero interpreta el cuerpo (JSON o texto)
    pub async fn fetch(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiBody, ApiError> {
        let response = self.request(method, path, body, RequestAuth::Session).await?;
        if response.is_json() {
            Ok(ApiBody::Json(response.json()?))
        } else {
            Ok(ApiBody::Text(response.body))
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiBody, ApiError> {
        self.fetch(HttpMethod::Get, path, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiBody, ApiError> {
        self.fetch(HttpMethod::Post, path, Some(to_value(body)?)).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiBody, ApiError> {
        self.fetch(HttpMethod::Put, path, Some(to_value(body)?)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiBody, ApiError> {
        self.fetch(HttpMethod::Delete, path, None).await
    }

    /// POST con cuerpo y respuesta JSON tipados
    pub async fn post_json<B, T>(&self, path: &str, body: &B, auth: RequestAuth) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self.request(HttpMethod::Post, path, Some(to_value(body)?), auth).await?;
        response.json()
    }

    /// Eventos de actividad posteriores a `since` (ms)
    pub async fn fetch_events(&self, since: i64) -> Result<Vec<ActivityEvent>, ApiError> {
        let path = format!("/events?since={}", since);
        let response = self.request(HttpMethod::Get, &path, None, RequestAuth::Session).await?;
        response.json()
    }

    pub async fn set_encryption_policy(&self, policy: EncryptionPolicy) -> Result<ApiBody, ApiError> {
        log::info!("🛡️ [API] Política de cifrado: {}", policy.as_str());
        self.post("/identity/policy", &serde_json::json!({ "encryption": policy.as_str() })).await
    }

    pub async fn add_to_group(&self, group: &str) -> Result<ApiBody, ApiError> {
        log::info!("👥 [API] Añadiendo al grupo: {}", group);
        self.post("/identity/group", &serde_json::json!({ "group": group })).await
    }
}

fn to_value<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Texto del error: `{"error": ...}` del backend, el cuerpo crudo, o "<status> <status text>"
fn error_message(response: &HttpResponse) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&response.body) {
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            return message.to_string();
        }
    }
    let text = response.body.trim();
    if text.is_empty() {
        format!("{} {}", response.status, response.status_text).trim().to_string()
    } else {
        text.to_string()
    }
}
