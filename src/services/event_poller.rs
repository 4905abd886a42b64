// ============================================================================
// EVENT POLLER - Feed de actividad mientras hay sesión
// ============================================================================

use crate::error::ApiError;
use crate::models::ActivityEvent;
use crate::services::api_client::ApiClient;
use crate::services::http::HttpClient;
use crate::state::ReactiveState;
use crate::utils::{KeyValueStore, MAX_FEED_EVENTS};

/// Eventos recibidos (más recientes primero) y cursor `since`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventFeed {
    events: Vec<ActivityEvent>,
    cursor: i64,
}

impl EventFeed {
    pub fn events(&self) -> &[ActivityEvent] {
        &self.events
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Antepone el lote, recorta a MAX_FEED_EVENTS y avanza el cursor al mayor `ts`.
    /// Devuelve cuántos eventos se añadieron.
    pub fn merge_batch(&mut self, batch: Vec<ActivityEvent>) -> usize {
        if batch.is_empty() {
            return 0;
        }
        let added = batch.len();
        if let Some(max_ts) = batch.iter().map(|e| e.ts).max() {
            self.cursor = self.cursor.max(max_ts);
        }
        let mut merged = batch;
        merged.append(&mut self.events);
        merged.truncate(MAX_FEED_EVENTS);
        self.events = merged;
        added
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.cursor = 0;
    }
}

/// Una pasada del poller. Sin sesión autenticada no hace nada, y un lote que
/// llega después de un logout o cambio de sesión se descarta.
pub async fn poll_once<S, H>(api: &ApiClient<S, H>, feed: &ReactiveState<EventFeed>) -> Result<usize, ApiError>
where
    S: KeyValueStore,
    H: HttpClient,
{
    if !api.session().is_authenticated() {
        return Ok(0);
    }
    let owner = api.session().bearer_token();
    let since = feed.get().borrow().cursor();
    let batch = api.fetch_events(since).await?;
    if !api.session().is_authenticated() || api.session().bearer_token() != owner {
        log::info!("📰 [FEED] Sesión cambiada durante el polling, lote descartado");
        return Ok(0);
    }
    if batch.is_empty() {
        return Ok(0);
    }
    let mut added = 0;
    feed.update(|f| added = f.merge_batch(batch));
    log::info!("📰 [FEED] {} eventos nuevos", added);
    Ok(added)
}

/// Poller periódico. El intervalo se cancela al hacer drop.
#[cfg(target_arch = "wasm32")]
pub struct EventPoller {
    _interval: gloo_timers::callback::Interval,
}

#[cfg(target_arch = "wasm32")]
impl EventPoller {
    pub fn start<S, H>(api: ApiClient<S, H>, feed: ReactiveState<EventFeed>, period_ms: u32) -> Self
    where
        S: KeyValueStore + Clone + 'static,
        H: HttpClient + Clone + 'static,
    {
        use std::cell::Cell;
        use std::rc::Rc;

        let in_flight = Rc::new(Cell::new(false));
        let interval = gloo_timers::callback::Interval::new(period_ms, move || {
            // no solapar peticiones si el backend tarda más que el periodo
            if in_flight.get() {
                return;
            }
            in_flight.set(true);
            let api = api.clone();
            let feed = feed.clone();
            let in_flight = in_flight.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = poll_once(&api, &feed).await {
                    log::warn!("⚠️ [FEED] Polling falló: {}", e);
                }
                in_flight.set(false);
            });
        });
        log::info!("▶️ [FEED] Polling cada {} ms", period_ms);
        Self { _interval: interval }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for EventPoller {
    fn drop(&mut self) {
        log::info!("⏹️ [FEED] Polling detenido");
    }
}
