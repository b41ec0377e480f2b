//! Screen view models
//!
//! Every data screen follows the same shape: make sure the headquarters
//! directory is loaded, fetch its own data scoped to the current selection,
//! and fetch again whenever the selection changes.

mod calendar;
mod finance;
mod headquarters;
mod roster;
mod topbar;

use std::sync::{Arc, PoisonError, RwLock};

use futures::future::BoxFuture;
use sede_core::QueryParams;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::notify::Notifier;
use crate::selection::HeadquarterSelection;

pub use calendar::{availability_screen, calendar_screen};
pub use finance::{market_screen, overview_screen, rent_screen, MarketTotals, Overview};
pub use headquarters::HeadquartersScreen;
pub use roster::{contracts_screen, employees_screen, patients_screen};
pub use topbar::HeadquarterPicker;

/// Shown when the directory cannot be fetched
pub const LOAD_LOCATIONS_FAILED: &str = "Could not load locations.";

/// Fetches a screen's data for the given scope
pub type Loader<T> =
    Box<dyn Fn(Option<QueryParams>) -> BoxFuture<'static, sede_net::Result<T>> + Send + Sync>;

/// Data screen scoped by the selected headquarter
pub struct ScopedScreen<T> {
    name: &'static str,
    failure_message: &'static str,
    selection: HeadquarterSelection,
    notifier: Notifier,
    loader: Loader<T>,
    data: RwLock<Option<T>>,
    /// Bumped after every successful fetch
    revision: watch::Sender<u64>,
}

impl<T> ScopedScreen<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(
        name: &'static str,
        failure_message: &'static str,
        selection: HeadquarterSelection,
        notifier: Notifier,
        loader: F,
    ) -> Self
    where
        F: Fn(Option<QueryParams>) -> BoxFuture<'static, sede_net::Result<T>> + Send + Sync + 'static,
    {
        Self {
            name,
            failure_message,
            selection,
            notifier,
            loader: Box::new(loader),
            data: RwLock::new(None),
            revision: watch::channel(0).0,
        }
    }

    /// Load the directory, then the screen's own data.
    ///
    /// A directory failure is reported and the screen still fetches, unscoped
    /// or with whatever selection is already set.
    pub async fn init(&self) -> Option<T> {
        if let Err(e) = self.selection.ensure_loaded().await {
            warn!(screen = self.name, error = %e, "Headquarters unavailable");
            self.notifier.error(LOAD_LOCATIONS_FAILED);
        }
        self.refresh().await
    }

    /// Fetch for the current selection. On failure the previous data stays.
    pub async fn refresh(&self) -> Option<T> {
        let params = self.selection.build_query_parameters(&[]);
        debug!(screen = self.name, scoped = params.is_some(), "Refreshing");

        match (self.loader)(params).await {
            Ok(data) => {
                *self.data.write().unwrap_or_else(PoisonError::into_inner) = Some(data.clone());
                self.revision.send_modify(|revision| *revision += 1);
                Some(data)
            }
            Err(e) => {
                warn!(screen = self.name, error = %e, "Screen fetch failed");
                self.notifier.backend_error(&e, self.failure_message);
                self.data()
            }
        }
    }

    /// Last successfully fetched data
    pub fn data(&self) -> Option<T> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Receiver that changes whenever new data lands
    pub fn revisions(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Refresh on every selection change until the handle is aborted
    pub fn spawn_watcher(self: &Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.selection.subscribe();
        let screen = self.clone();
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let selected = *changes.borrow_and_update();
                debug!(screen = screen.name, headquarter_id = ?selected, "Selection changed");
                screen.refresh().await;
            }
        })
    }
}
