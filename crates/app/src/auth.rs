//! Login session
//!
//! Keeps the logged-in user in session storage, stamps the API client with
//! the user id and pins non-admin accounts to their location.

use std::sync::{Arc, PoisonError, RwLock};

use sede_core::{CurrentUser, KeyValueStore};
use sede_net::{ApiClient, AuthClient};
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::notify::Notifier;
use crate::selection::HeadquarterSelection;

/// Session storage key for the user id
pub const USER_ID_KEY: &str = "userId";

/// Session storage key for the serialized user
pub const CURRENT_USER_KEY: &str = "currentUser";

const LOGIN_FAILED: &str = "Invalid e-mail or password.";

pub struct AuthService {
    api: ApiClient,
    client: AuthClient,
    session: Arc<dyn KeyValueStore>,
    local: Arc<dyn KeyValueStore>,
    selection: HeadquarterSelection,
    notifier: Notifier,
    current: RwLock<Option<CurrentUser>>,
}

impl AuthService {
    pub fn new(
        api: ApiClient,
        session: Arc<dyn KeyValueStore>,
        local: Arc<dyn KeyValueStore>,
        selection: HeadquarterSelection,
        notifier: Notifier,
    ) -> Self {
        Self {
            client: AuthClient::new(api.clone()),
            api,
            session,
            local,
            selection,
            notifier,
            current: RwLock::new(None),
        }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser> {
        let user = match self.client.login(email, password).await {
            Ok(user) => user,
            Err(e) => {
                self.notifier.backend_error(&e, LOGIN_FAILED);
                return Err(e.into());
            }
        };

        let user_id = user.id.to_string();
        self.session.set(USER_ID_KEY, &user_id)?;
        let serialized = serde_json::to_string(&user).map_err(sede_core::Error::from)?;
        self.session.set(CURRENT_USER_KEY, &serialized)?;
        self.api.set_user_id(Some(user_id));
        self.set_current(Some(user.clone()));

        self.notifier.success(format!("Welcome, {}!", user.name));

        // The session is established at this point; a storage failure only
        // means the pin does not survive a restart
        if let Some(id) = user.pinned_headquarter() {
            info!(headquarter_id = id, "Pinning user to assigned headquarter");
            if let Err(e) = self.selection.set_selected_headquarter(Some(id)) {
                warn!(headquarter_id = id, error = %e, "Failed to persist pinned headquarter");
            }
        }

        Ok(user)
    }

    /// Forget the user and every stored preference
    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        self.local.clear()?;
        self.api.set_user_id(None);
        self.set_current(None);
        self.selection.reset();
        info!("Logged out");
        Ok(())
    }

    /// Pick up a user left in session storage by a previous run.
    ///
    /// Unreadable entries are dropped.
    pub fn restore(&self) -> Option<CurrentUser> {
        let stored = match self.session.get(CURRENT_USER_KEY) {
            Ok(stored) => stored?,
            Err(e) => {
                warn!(error = %e, "Failed to read stored user");
                return None;
            }
        };

        match serde_json::from_str::<CurrentUser>(&stored) {
            Ok(user) => {
                self.api.set_user_id(Some(user.id.to_string()));
                self.set_current(Some(user.clone()));
                info!(user_id = user.id, "Restored session");
                Some(user)
            }
            Err(e) => {
                warn!(error = %e, "Discarding corrupted stored user");
                let _ = self.session.remove(CURRENT_USER_KEY);
                let _ = self.session.remove(USER_ID_KEY);
                None
            }
        }
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    fn set_current(&self, user: Option<CurrentUser>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = user;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;
    use crate::selection::tests::{two_locations, FakeDirectory, StallingStore};
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use crate::test_support::serve;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use sede_core::{Database, SELECTED_HEADQUARTER_KEY};
    use sede_net::{DEFAULT_TIMEOUT, USER_ID_HEADER};
    use serde_json::json;

    struct Fixture {
        auth: AuthService,
        api: ApiClient,
        db: Database,
        selection: HeadquarterSelection,
        notifier: Notifier,
    }

    async fn fixture(app: Router) -> Fixture {
        let api = ApiClient::new(&serve(app).await, DEFAULT_TIMEOUT).unwrap();
        let db = Database::open_in_memory().unwrap();
        let local: Arc<dyn KeyValueStore> = Arc::new(db.local());
        let session: Arc<dyn KeyValueStore> = Arc::new(db.session());
        let selection = HeadquarterSelection::new(FakeDirectory::new(two_locations()), local.clone());
        let notifier = Notifier::new();
        let auth = AuthService::new(
            api.clone(),
            session,
            local,
            selection.clone(),
            notifier.clone(),
        );
        Fixture {
            auth,
            api,
            db,
            selection,
            notifier,
        }
    }

    fn login_route(role: &'static str) -> Router {
        login_route_at(role, 2)
    }

    fn login_route_at(role: &'static str, headquarter_id: i64) -> Router {
        Router::new().route(
            "/api/auth/login",
            post(move || async move {
                Json(json!({
                    "user": { "id": "12", "name": "Rita", "role": role, "headquarterId": headquarter_id }
                }))
            }),
        )
    }

    #[tokio::test]
    async fn test_login_stores_user_and_pins_non_admin() {
        let f = fixture(login_route("Manager")).await;
        let mut notifications = f.notifier.subscribe();

        let user = f.auth.login("rita@example.com", "pw").await.unwrap();
        assert_eq!(user.id, 12);
        assert!(f.auth.is_authenticated());
        assert_eq!(f.api.user_id().as_deref(), Some("12"));
        assert_eq!(
            f.db.session().get(USER_ID_KEY).unwrap().as_deref(),
            Some("12")
        );
        assert_eq!(f.selection.selected_headquarter_id(), Some(2));
        assert_eq!(
            f.db.local().get(SELECTED_HEADQUARTER_KEY).unwrap().as_deref(),
            Some("2")
        );
        assert_eq!(
            notifications.recv().await.unwrap().kind,
            NotificationKind::Success
        );
    }

    #[tokio::test]
    async fn test_admin_is_not_pinned() {
        let f = fixture(login_route("Admin")).await;
        f.auth.login("rita@example.com", "pw").await.unwrap();
        assert_eq!(f.selection.selected_headquarter_id(), None);
        assert_eq!(f.db.local().get(SELECTED_HEADQUARTER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_pin_overrides_stored_selection_for_later_loads() {
        let f = fixture(login_route_at("Nurse", 2)).await;
        f.db.local().set(SELECTED_HEADQUARTER_KEY, "1").unwrap();

        f.auth.login("rita@example.com", "pw").await.unwrap();
        assert_eq!(f.selection.selected_headquarter_id(), Some(2));
        assert_eq!(
            f.db.local().get(SELECTED_HEADQUARTER_KEY).unwrap().as_deref(),
            Some("2")
        );

        f.selection.ensure_loaded().await.unwrap();
        assert_eq!(f.selection.selected_headquarter_id(), Some(2));
    }

    #[tokio::test]
    async fn test_pin_to_unknown_location_falls_back_to_first_on_load() {
        let f = fixture(login_route_at("Manager", 4)).await;

        f.auth.login("rita@example.com", "pw").await.unwrap();
        assert_eq!(f.selection.selected_headquarter_id(), Some(4));

        // The directory has no location 4, so the usual stale-id rule applies
        f.selection.ensure_loaded().await.unwrap();
        assert_eq!(f.selection.selected_headquarter_id(), Some(1));
        assert_eq!(
            f.db.local().get(SELECTED_HEADQUARTER_KEY).unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn test_login_survives_pin_storage_failure() {
        let api = ApiClient::new(&serve(login_route("Nurse")).await, DEFAULT_TIMEOUT).unwrap();
        let db = Database::open_in_memory().unwrap();
        let local = StallingStore::new(Arc::new(db.local()), None, Duration::ZERO);
        local.read_only.store(true, Ordering::SeqCst);
        let selection = HeadquarterSelection::new(FakeDirectory::new(two_locations()), local.clone());
        let auth = AuthService::new(
            api,
            Arc::new(db.session()),
            local,
            selection.clone(),
            Notifier::new(),
        );

        let user = auth.login("rita@example.com", "pw").await.unwrap();
        assert_eq!(user.id, 12);
        assert!(auth.is_authenticated());
        assert_eq!(selection.selected_headquarter_id(), Some(2));
        assert_eq!(db.local().get(SELECTED_HEADQUARTER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_login_notifies_backend_message() {
        let app = Router::new().route(
            "/api/auth/login",
            post(|| async { (StatusCode::UNAUTHORIZED, r#"{"error":"Senha incorreta"}"#) }),
        );
        let f = fixture(app).await;
        let mut notifications = f.notifier.subscribe();

        assert!(f.auth.login("x@example.com", "bad").await.is_err());
        assert!(!f.auth.is_authenticated());

        let notification = notifications.recv().await.unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "Senha incorreta");
    }

    #[tokio::test]
    async fn test_user_id_header_follows_login() {
        let app = login_route("Nurse").route(
            "/whoami",
            get(|headers: HeaderMap| async move {
                headers
                    .get(USER_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-")
                    .to_string()
            }),
        );
        let f = fixture(app).await;
        let url = format!("{}/whoami", f.api.urls().base());

        f.auth.login("rita@example.com", "pw").await.unwrap();
        assert_eq!(f.api.get_json(&url, None).await.unwrap(), json!(12));

        f.auth.logout().unwrap();
        assert!(f.api.user_id().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_storage_and_resets_selection() {
        let f = fixture(login_route("Admin")).await;
        f.auth.login("rita@example.com", "pw").await.unwrap();
        f.selection.ensure_loaded().await.unwrap();
        assert!(f.selection.is_loaded());

        f.auth.logout().unwrap();
        assert!(!f.auth.is_authenticated());
        assert!(!f.selection.is_loaded());
        assert_eq!(f.selection.selected_headquarter_id(), None);
        assert_eq!(f.db.session().get(CURRENT_USER_KEY).unwrap(), None);
        assert_eq!(f.db.local().get(SELECTED_HEADQUARTER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_reads_session_and_discards_garbage() {
        let f = fixture(login_route("Nurse")).await;
        f.auth.login("rita@example.com", "pw").await.unwrap();

        let restored = AuthService::new(
            f.api.clone(),
            Arc::new(f.db.session()),
            Arc::new(f.db.local()),
            f.selection.clone(),
            Notifier::new(),
        );
        assert_eq!(restored.restore().map(|u| u.id), Some(12));
        assert!(restored.is_authenticated());

        f.db.session().set(CURRENT_USER_KEY, "{not json").unwrap();
        let broken = AuthService::new(
            f.api.clone(),
            Arc::new(f.db.session()),
            Arc::new(f.db.local()),
            f.selection.clone(),
            Notifier::new(),
        );
        assert!(broken.restore().is_none());
        assert_eq!(f.db.session().get(USER_ID_KEY).unwrap(), None);
    }
}
