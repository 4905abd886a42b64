use serde::{Deserialize, Serialize};

/// Evento del feed de actividad (`GET /events`). Datos transitorios, solo display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Milisegundos desde epoch
    #[serde(default)]
    pub ts: i64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub sk: Option<String>,
}

impl ActivityEvent {
    /// Texto para la fila del feed
    pub fn summary(&self) -> String {
        let kind = self.kind.as_deref().or(self.action.as_deref()).unwrap_or("event");
        match &self.message {
            Some(message) => format!("{}: {}", kind, message),
            None => kind.to_string(),
        }
    }
}
