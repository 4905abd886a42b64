// ============================================================================
// HTTP - Transporte mínimo (gloo-net en el navegador)
// ============================================================================

use serde::de::DeserializeOwned;

use crate::error::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Valor de una cabecera (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Transporte HTTP. Sin `Send`: todo corre en el hilo único del navegador.
#[allow(async_fn_in_trait)]
pub trait HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Cliente basado en `fetch` vía gloo-net
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooHttpClient;

#[cfg(target_arch = "wasm32")]
impl HttpClient for GlooHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        use gloo_net::http::Request;

        let mut builder = match request.method {
            HttpMethod::Get => Request::get(&request.url),
            HttpMethod::Post => Request::post(&request.url),
            HttpMethod::Put => Request::put(&request.url),
            HttpMethod::Delete => Request::delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| ApiError::Serialization(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let status_text = response.status_text();
        let content_type = response.headers().get("content-type");
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(HttpResponse { status, status_text, content_type, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Cliente con respuestas programadas que registra cada petición
    #[derive(Clone, Default)]
    pub struct ScriptedHttpClient {
        responses: Rc<RefCell<VecDeque<Result<HttpResponse, ApiError>>>>,
        requests: Rc<RefCell<Vec<HttpRequest>>>,
    }

    impl ScriptedHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond_json(&self, status: u16, body: &str) -> &Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                status_text: status_text(status).to_string(),
                content_type: Some("application/json".to_string()),
                body: body.to_string(),
            }));
            self
        }

        pub fn respond_text(&self, status: u16, body: &str) -> &Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                status_text: status_text(status).to_string(),
                content_type: Some("text/plain".to_string()),
                body: body.to_string(),
            }));
            self
        }

        pub fn fail(&self, error: ApiError) -> &Self {
            self.responses.borrow_mut().push_back(Err(error));
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }
    }

    fn status_text(status: u16) -> &'static str {
        match status {
            200 => "OK",
            400 => "Bad Request",
            401 => "Unauthorized",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "",
        }
    }

    impl HttpClient for ScriptedHttpClient {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_string())))
        }
    }
}
