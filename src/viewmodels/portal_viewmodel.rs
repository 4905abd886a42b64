// ============================================================================
// PORTAL VIEWMODEL - Acciones del área autenticada
// ============================================================================

use crate::error::ApiError;
use crate::services::{poll_once, ApiClient, EncryptionPolicy, EventFeed, HttpClient, Navigator};
use crate::state::ReactiveState;
use crate::utils::{KeyValueStore, ROUTE_LOGIN};

use super::login_viewmodel::StatusMessage;

#[derive(Clone)]
pub struct PortalViewModel<S: KeyValueStore, H: HttpClient> {
    api: ApiClient<S, H>,
    pub feed: ReactiveState<EventFeed>,
    pub message: ReactiveState<Option<StatusMessage>>,
}

impl<S: KeyValueStore, H: HttpClient> PortalViewModel<S, H> {
    pub fn new(
        api: ApiClient<S, H>,
        feed: ReactiveState<EventFeed>,
        message: ReactiveState<Option<StatusMessage>>,
    ) -> Self {
        Self { api, feed, message }
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }

    /// Logout: borra tokens y feed, vuelve al login
    pub fn logout<N: Navigator>(&self, navigator: &N) {
        self.api.session().clear_session();
        self.feed.update(|f| f.clear());
        self.message.set(None);
        navigator.navigate(ROUTE_LOGIN);
    }

    pub async fn refresh_feed(&self) -> Result<usize, ApiError> {
        poll_once(&self.api, &self.feed).await
    }

    pub async fn set_encryption(&self, policy: EncryptionPolicy) {
        self.message.set(Some(StatusMessage::Pending(format!("Setting encryption policy: {}…", policy.as_str()))));
        let result = self.api.set_encryption_policy(policy).await;
        self.report(result.map(|_| format!("Encryption policy set: {}", policy.as_str())));
    }

    pub async fn add_to_group(&self, group: &str) {
        self.message.set(Some(StatusMessage::Pending(format!("Adding to {} group…", group))));
        let result = self.api.add_to_group(group).await;
        self.report(result.map(|_| format!("Added to {} group", group)));
    }

    fn report(&self, result: Result<String, ApiError>) {
        let message = match result {
            Ok(text) => StatusMessage::Success(text),
            Err(e) => StatusMessage::Failure(format!("❌ {}", e)),
        };
        self.message.set(Some(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Provenance, Tokens};
    use crate::services::http::testing::ScriptedHttpClient;
    use crate::services::navigation::testing::RecordingNavigator;
    use crate::services::SessionManager;
    use crate::utils::MemoryStorage;
    use futures::executor::block_on;

    fn viewmodel() -> (PortalViewModel<MemoryStorage, ScriptedHttpClient>, ScriptedHttpClient, SessionManager<MemoryStorage>) {
        let http = ScriptedHttpClient::new();
        let session = SessionManager::new(MemoryStorage::new());
        session.set_session(Tokens::from_id_token("h.p.s"), Provenance::LocalDemo).unwrap();
        let api = ApiClient::new("http://api.test", session.clone(), http.clone());
        let vm = PortalViewModel::new(api, ReactiveState::default(), ReactiveState::new(None));
        (vm, http, session)
    }

    #[test]
    fn test_rejected_action_logs_out_reactively() {
        let (vm, http, session) = viewmodel();
        http.respond_json(401, r#"{"error":"unauthorized"}"#);

        block_on(vm.set_encryption(EncryptionPolicy::SseKms));

        assert!(!vm.is_authenticated());
        assert!(session.get_session().is_none());
        assert_eq!(vm.message.snapshot(), Some(StatusMessage::Failure("❌ unauthorized".into())));
    }

    #[test]
    fn test_group_action_reports_success() {
        let (vm, http, _) = viewmodel();
        http.respond_json(200, r#"{"ok":true,"role":"teacher"}"#);
        block_on(vm.add_to_group("teacher"));
        assert_eq!(vm.message.snapshot(), Some(StatusMessage::Success("Added to teacher group".into())));
        let body = http.requests()[0].body.clone().unwrap();
        assert_eq!(body, r#"{"group":"teacher"}"#);
    }

    #[test]
    fn test_logout_clears_feed_and_session() {
        let (vm, http, _) = viewmodel();
        http.respond_json(200, r#"[{"ts":3}]"#);
        assert_eq!(block_on(vm.refresh_feed()), Ok(1));

        let nav = RecordingNavigator::default();
        vm.logout(&nav);
        assert!(!vm.is_authenticated());
        assert!(vm.feed.snapshot().events().is_empty());
        assert_eq!(nav.last_route().as_deref(), Some(ROUTE_LOGIN));
    }
}
