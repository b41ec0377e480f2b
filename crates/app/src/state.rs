//! Application state management

use std::sync::Arc;

use sede_core::{Database, KeyValueStore};
use sede_net::{
    ApiClient, CalendarClient, FinanceClient, HeadquarterClient, HeadquarterDirectory,
    RosterClient,
};
use tracing::info;

use crate::auth::AuthService;
use crate::config::Config;
use crate::error::Result;
use crate::notify::Notifier;
use crate::selection::HeadquarterSelection;

/// Everything a screen needs, shared behind `Arc`
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub api: ApiClient,
    pub notifier: Notifier,
    pub directory: Arc<dyn HeadquarterDirectory>,
    pub selection: HeadquarterSelection,
    pub auth: AuthService,
    pub calendar: CalendarClient,
    pub finance: FinanceClient,
    pub roster: RosterClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = config.data_dir()?.join("sede.db");

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(sede_core::Error::from)?;
        }

        let db = Database::open(&db_path)?;
        let api = ApiClient::new(&config.api_url, config.timeout())?;
        Ok(Self::assemble(config, db, api))
    }

    /// Wire the services over an open store and client
    pub fn assemble(config: Config, db: Database, api: ApiClient) -> Self {
        let local: Arc<dyn KeyValueStore> = Arc::new(db.local());
        let session: Arc<dyn KeyValueStore> = Arc::new(db.session());
        let notifier = Notifier::new();
        let directory: Arc<dyn HeadquarterDirectory> = Arc::new(HeadquarterClient::new(api.clone()));
        let selection = HeadquarterSelection::new(directory.clone(), local.clone());
        let auth = AuthService::new(
            api.clone(),
            session,
            local,
            selection.clone(),
            notifier.clone(),
        );

        if let Some(user) = auth.restore() {
            info!(user_id = user.id, "Session restored");
        }

        Self {
            calendar: CalendarClient::new(api.clone()),
            finance: FinanceClient::new(api.clone()),
            roster: RosterClient::new(api.clone()),
            config,
            db,
            api,
            notifier,
            directory,
            selection,
            auth,
        }
    }
}
