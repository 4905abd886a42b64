// ============================================================================
// SESSION MANAGER - Único dueño de los tokens en storage
// ============================================================================
// Ningún otro módulo toca las claves id_token / access_token / demo_token.
// ============================================================================

use crate::error::AuthError;
use crate::models::{Provenance, Session, Tokens};
use crate::state::ReactiveState;
use crate::utils::{
    KeyValueStore, SESSION_KEYS, STORAGE_KEY_ACCESS_TOKEN, STORAGE_KEY_ID_TOKEN, STORAGE_KEY_PROVENANCE,
};

const WRITTEN_KEYS: [&str; 3] = [STORAGE_KEY_ID_TOKEN, STORAGE_KEY_ACCESS_TOKEN, STORAGE_KEY_PROVENANCE];

/// Dueño de la sesión persistida. Los clones comparten store y subscribers.
#[derive(Clone)]
pub struct SessionManager<S: KeyValueStore> {
    store: S,
    // solo notificación: el estado vive en storage
    changes: ReactiveState<()>,
}

impl<S: KeyValueStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self { store, changes: ReactiveState::new(()) }
    }

    /// Sesión actual leída de storage (last writer wins)
    pub fn get_session(&self) -> Option<Session> {
        self.read_session()
    }

    /// Persiste los tokens. Un token ausente borra su clave para no dejar
    /// valores de una sesión anterior. Rechaza tokens que no autenticarían.
    pub fn set_session(&self, tokens: Tokens, provenance: Provenance) -> Result<Session, AuthError> {
        let session = Session {
            id_token: tokens.id_token,
            access_token: tokens.access_token,
            provenance,
        };
        if !session.is_authenticated() {
            log::warn!("⚠️ [SESSION] Token con forma inválida, no se guarda la sesión");
            return Err(AuthError::MalformedToken);
        }

        // todo o nada: si una escritura falla se restaura lo anterior
        let previous: Vec<(&str, Option<String>)> = WRITTEN_KEYS
            .iter()
            .map(|key| (*key, self.store.get_item(key)))
            .collect();
        if let Err(e) = self.write_session(&session) {
            log::error!("❌ [SESSION] No se pudo guardar la sesión: {}", e);
            self.restore(previous);
            return Err(e);
        }

        log::info!("🔐 [SESSION] Sesión guardada ({})", provenance.as_str());
        self.changes.notify();
        Ok(session)
    }

    /// Borra todas las claves de sesión. Idempotente y sin errores:
    /// un fallo al borrar una clave solo se registra.
    pub fn clear_session(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.store.remove_item(key) {
                log::error!("❌ [SESSION] {}", e);
            }
        }
        log::info!("👋 [SESSION] Sesión eliminada");
        self.changes.notify();
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_session().map(|s| s.is_authenticated()).unwrap_or(false)
    }

    /// Token para la cabecera `Authorization`, si hay sesión
    pub fn bearer_token(&self) -> Option<String> {
        self.read_session().and_then(|s| s.bearer_token().map(str::to_string))
    }

    /// Registrar un listener que corre después de cada set/clear
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.changes.subscribe(callback);
    }

    fn read_session(&self) -> Option<Session> {
        let id_token = self.store.get_item(STORAGE_KEY_ID_TOKEN);
        let access_token = self.store.get_item(STORAGE_KEY_ACCESS_TOKEN);
        if id_token.is_none() && access_token.is_none() {
            return None;
        }
        let provenance = self
            .store
            .get_item(STORAGE_KEY_PROVENANCE)
            .and_then(|p| Provenance::parse(&p))
            .unwrap_or(Provenance::LocalDemo);
        Some(Session { id_token, access_token, provenance })
    }

    fn write_session(&self, session: &Session) -> Result<(), AuthError> {
        self.write_key(STORAGE_KEY_ID_TOKEN, session.id_token.as_deref())?;
        self.write_key(STORAGE_KEY_ACCESS_TOKEN, session.access_token.as_deref())?;
        self.write_key(STORAGE_KEY_PROVENANCE, Some(session.provenance.as_str()))
    }

    /// Vuelve a los valores previos. Si un valor no se puede reescribir se
    /// borra la clave: nunca queda una sesión a medias.
    fn restore(&self, previous: Vec<(&str, Option<String>)>) {
        for (key, value) in previous {
            if self.write_key(key, value.as_deref()).is_err() {
                if let Err(e) = self.store.remove_item(key) {
                    log::error!("❌ [SESSION] {}", e);
                }
            }
        }
    }

    fn write_key(&self, key: &str, value: Option<&str>) -> Result<(), AuthError> {
        match value {
            Some(v) => self.store.set_item(key, v),
            None => self.store.remove_item(key),
        }
        .map_err(AuthError::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{MemoryStorage, STORAGE_KEY_LEGACY_DEMO_TOKEN};
    use std::cell::Cell;
    use std::rc::Rc;

    const ID: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhQGIuZWR1In0.c2ln";
    const ACCESS: &str = "eyJraWQiOiJrMSJ9.eyJzY29wZSI6Im9wZW5pZCJ9.c2ln";

    fn manager() -> (SessionManager<MemoryStorage>, MemoryStorage) {
        let store = MemoryStorage::new();
        (SessionManager::new(store.clone()), store)
    }

    #[test]
    fn test_set_and_get_session() {
        let (manager, _) = manager();
        assert!(manager.get_session().is_none());
        assert!(!manager.is_authenticated());

        manager
            .set_session(
                Tokens { id_token: Some(ID.into()), access_token: Some(ACCESS.into()) },
                Provenance::HostedIdp,
            )
            .unwrap();

        let session = manager.get_session().unwrap();
        assert_eq!(session.provenance, Provenance::HostedIdp);
        assert!(manager.is_authenticated());
        assert_eq!(manager.bearer_token().as_deref(), Some(ACCESS));
    }

    #[test]
    fn test_set_session_replaces_stale_token() {
        let (manager, store) = manager();
        manager
            .set_session(
                Tokens { id_token: Some(ID.into()), access_token: Some(ACCESS.into()) },
                Provenance::HostedIdp,
            )
            .unwrap();
        manager.set_session(Tokens::from_id_token(ID), Provenance::LocalDemo).unwrap();

        assert!(!store.contains_key(STORAGE_KEY_ACCESS_TOKEN));
        assert_eq!(manager.bearer_token().as_deref(), Some(ID));
    }

    #[test]
    fn test_malformed_token_is_rejected_and_nothing_stored() {
        let (manager, store) = manager();
        let err = manager
            .set_session(Tokens::from_id_token("fake-jwt-demo"), Provenance::LocalDemo)
            .unwrap_err();
        assert_eq!(err, AuthError::MalformedToken);
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_token_in_storage_is_not_authenticated() {
        let (manager, store) = manager();
        store.set_item(STORAGE_KEY_ID_TOKEN, "only.two").unwrap();
        assert!(manager.get_session().is_some());
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_logout_clears_every_key_and_is_idempotent() {
        let (manager, store) = manager();
        manager
            .set_session(
                Tokens { id_token: Some(ID.into()), access_token: Some(ACCESS.into()) },
                Provenance::HostedIdp,
            )
            .unwrap();
        store.set_item(STORAGE_KEY_LEGACY_DEMO_TOKEN, "fake-jwt-demo").unwrap();

        manager.clear_session();
        assert!(store.is_empty());
        assert!(!manager.is_authenticated());

        manager.clear_session();
        assert!(store.is_empty());
        assert!(manager.get_session().is_none());
    }

    /// Store que rechaza escrituras de una clave concreta
    #[derive(Clone, Default)]
    struct QuotaLimitedStore {
        inner: MemoryStorage,
        rejected: &'static str,
    }

    impl KeyValueStore for QuotaLimitedStore {
        fn get_item(&self, key: &str) -> Option<String> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
            if key == self.rejected {
                return Err("QuotaExceededError".to_string());
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), String> {
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn test_failed_write_leaves_no_partial_session() {
        let store = QuotaLimitedStore { inner: MemoryStorage::new(), rejected: STORAGE_KEY_ACCESS_TOKEN };
        let manager = SessionManager::new(store.clone());

        let err = manager
            .set_session(
                Tokens { id_token: Some(ID.into()), access_token: Some(ACCESS.into()) },
                Provenance::HostedIdp,
            )
            .unwrap_err();

        assert!(matches!(err, AuthError::Storage(_)));
        assert!(!manager.is_authenticated());
        assert!(store.inner.is_empty());
    }

    #[test]
    fn test_failed_write_keeps_previous_session() {
        let store = QuotaLimitedStore { inner: MemoryStorage::new(), rejected: STORAGE_KEY_PROVENANCE };
        store.inner.set_item(STORAGE_KEY_ID_TOKEN, ID).unwrap();
        let manager = SessionManager::new(store.clone());
        let hits = Rc::new(Cell::new(0));
        {
            let hits = hits.clone();
            manager.subscribe(move || hits.set(hits.get() + 1));
        }

        let result = manager.set_session(
            Tokens { id_token: Some(ACCESS.into()), access_token: Some(ACCESS.into()) },
            Provenance::HostedIdp,
        );

        assert!(result.is_err());
        assert_eq!(store.inner.get_item(STORAGE_KEY_ID_TOKEN).as_deref(), Some(ID));
        assert!(!store.inner.contains_key(STORAGE_KEY_ACCESS_TOKEN));
        assert_eq!(manager.bearer_token().as_deref(), Some(ID));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_subscribers_run_on_set_and_clear() {
        let (manager, _) = manager();
        let hits = Rc::new(Cell::new(0));
        {
            let hits = hits.clone();
            manager.subscribe(move || hits.set(hits.get() + 1));
        }
        manager.set_session(Tokens::from_id_token(ID), Provenance::LocalDemo).unwrap();
        manager.clone().clear_session();
        assert_eq!(hits.get(), 2);
    }
}
