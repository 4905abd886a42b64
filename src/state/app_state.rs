// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================
// Un único SessionManager compartido por API client, auth service y poller.
// ============================================================================

use crate::config::AppConfig;
use crate::services::{ApiClient, AuthService, CallbackHandler, CallbackState, EventFeed, HttpClient, SessionManager};
use crate::state::ReactiveState;
use crate::utils::KeyValueStore;
use crate::viewmodels::{LoginViewModel, PortalViewModel, StatusMessage};

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState<S: KeyValueStore, H: HttpClient> {
    pub config: AppConfig,
    pub session: SessionManager<S>,
    pub api: ApiClient<S, H>,
    pub auth: AuthService<S, H>,
    http: H,

    // UI State
    pub feed: ReactiveState<EventFeed>,
    pub login_message: ReactiveState<Option<StatusMessage>>,
    pub portal_message: ReactiveState<Option<StatusMessage>>,
    pub callback_state: ReactiveState<CallbackState>,
}

impl<S, H> AppState<S, H>
where
    S: KeyValueStore + Clone,
    H: HttpClient + Clone,
{
    pub fn new(config: AppConfig, store: S, http: H) -> Self {
        let session = SessionManager::new(store);
        let api = ApiClient::new(config.api_base_url(), session.clone(), http.clone());
        let auth = AuthService::new(api.clone(), config.hosted_login.clone());
        if session.is_authenticated() {
            log::info!("💾 [APP] Sesión encontrada en storage");
        }
        Self {
            config,
            session,
            api,
            auth,
            http,
            feed: ReactiveState::default(),
            login_message: ReactiveState::new(None),
            portal_message: ReactiveState::new(None),
            callback_state: ReactiveState::new(CallbackState::Pending),
        }
    }

    pub fn login_viewmodel(&self) -> LoginViewModel<S, H> {
        LoginViewModel::new(self.auth.clone(), self.login_message.clone())
    }

    pub fn portal_viewmodel(&self) -> PortalViewModel<S, H> {
        PortalViewModel::new(self.api.clone(), self.feed.clone(), self.portal_message.clone())
    }

    /// Handler del callback; `None` si el login alojado no está configurado
    pub fn callback_handler(&self) -> Option<CallbackHandler<S, H>> {
        self.config
            .hosted_login
            .clone()
            .map(|hosted| CallbackHandler::new(self.session.clone(), self.http.clone(), hosted))
    }

    /// Suscribirse a los cambios que requieren re-render completo.
    /// El mensaje del login se pinta en sitio para no vaciar el formulario;
    /// el del portal re-renderiza, así un re-render por el feed no lo deja viejo.
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + Clone + 'static,
    {
        self.session.subscribe(callback.clone());
        self.feed.subscribe(callback.clone());
        self.portal_message.subscribe(callback.clone());
        self.callback_state.subscribe(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Provenance, Tokens};
    use crate::services::http::testing::ScriptedHttpClient;
    use crate::utils::{MemoryStorage, STORAGE_KEY_ID_TOKEN};
    use futures::executor::block_on;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_unauthorized_call_clears_shared_session_and_notifies() {
        let store = MemoryStorage::new();
        let http = ScriptedHttpClient::new();
        let state = AppState::new(AppConfig::default(), store.clone(), http.clone());
        state.session.set_session(Tokens::from_id_token("h.p.s"), Provenance::LocalDemo).unwrap();

        let renders = Rc::new(Cell::new(0));
        {
            let renders = renders.clone();
            state.subscribe_to_changes(move || renders.set(renders.get() + 1));
        }

        http.respond_json(401, r#"{"error":"unauthorized"}"#);
        let err = block_on(state.api.get("/identity/me")).unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!state.auth.session().is_authenticated());
        assert!(!store.contains_key(STORAGE_KEY_ID_TOKEN));
        assert!(renders.get() >= 1);
    }

    #[test]
    fn test_portal_action_result_triggers_render_after_feed_update() {
        let http = ScriptedHttpClient::new();
        let state = AppState::new(AppConfig::default(), MemoryStorage::new(), http.clone());
        state.session.set_session(Tokens::from_id_token("h.p.s"), Provenance::LocalDemo).unwrap();
        let portal = state.portal_viewmodel();

        let renders = Rc::new(Cell::new(0));
        {
            let renders = renders.clone();
            state.subscribe_to_changes(move || renders.set(renders.get() + 1));
        }

        // el feed re-renderiza primero; el resultado de la acción debe volver a pintar
        http.respond_json(200, r#"[{"ts":1}]"#);
        block_on(portal.refresh_feed()).unwrap();
        let after_feed = renders.get();

        http.respond_json(200, r#"{"ok":true}"#);
        block_on(portal.add_to_group("student"));

        assert!(renders.get() > after_feed);
        assert_eq!(
            state.portal_message.snapshot(),
            Some(StatusMessage::Success("Added to student group".into()))
        );
    }

    #[test]
    fn test_restores_session_from_storage() {
        let store = MemoryStorage::new();
        store.set_item(STORAGE_KEY_ID_TOKEN, "h.p.s").unwrap();
        let state = AppState::new(AppConfig::default(), store, ScriptedHttpClient::new());
        assert!(state.session.is_authenticated());
        assert!(state.callback_handler().is_none());
    }
}
