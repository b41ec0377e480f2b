//! Headquarter selection holder
//!
//! Owns the headquarters directory and the selected location for the
//! session. Screens read through a [`HeadquarterSelection`] handle and
//! subscribe to changes; only the holder mutates the state.
//!
//! Loads are de-duplicated through a single pending slot: the first caller
//! spawns the fetch and parks a shared future in the slot, later callers
//! (from `ensure_loaded` or `reload`) await the same future, and the slot is
//! cleared when the fetch settles. The fetch runs as its own task so it
//! completes even if every caller goes away.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use sede_core::{
    build_query_params, encode_selection, resolve_selection, Headquarter, KeyValueStore,
    ParamValue, Preference, QueryParams, SELECTED_HEADQUARTER_KEY,
};
use sede_net::HeadquarterDirectory;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Directory shared with every caller of a load
pub type Directory = Arc<Vec<Headquarter>>;

pub type LoadResult = std::result::Result<Directory, LoadError>;

type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Failure of a directory load, cloneable so every waiting caller gets it
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("could not load headquarters: {0}")]
    Fetch(Arc<sede_net::Error>),

    #[error("headquarters load was interrupted")]
    Interrupted,
}

/// Lifecycle of the holder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Uninitialized,
    Loading,
    Loaded,
}

/// Where the preferred selection comes from when a load settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreferenceSource {
    Stored,
    Current,
}

struct Inner {
    directory: Directory,
    selected: Option<i64>,
    loaded: bool,
    pending: Option<PendingLoad>,
    /// Load detached by the last reset; the next load waits for it first
    retired: Option<PendingLoad>,
    /// Bumped on reset; loads started in an older epoch are not applied
    epoch: u64,
}

struct Core {
    source: Arc<dyn HeadquarterDirectory>,
    storage: Arc<dyn KeyValueStore>,
    state: Mutex<Inner>,
    changes: watch::Sender<Option<i64>>,
}

/// Handle to the session's headquarter selection
#[derive(Clone)]
pub struct HeadquarterSelection {
    core: Arc<Core>,
}

impl HeadquarterSelection {
    pub fn new(source: Arc<dyn HeadquarterDirectory>, storage: Arc<dyn KeyValueStore>) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            core: Arc::new(Core {
                source,
                storage,
                state: Mutex::new(Inner {
                    directory: Arc::new(Vec::new()),
                    selected: None,
                    loaded: false,
                    pending: None,
                    retired: None,
                    epoch: 0,
                }),
                changes,
            }),
        }
    }

    /// Return the directory, fetching it once per session.
    ///
    /// Concurrent callers share a single in-flight fetch.
    pub async fn ensure_loaded(&self) -> LoadResult {
        let pending = {
            let mut state = self.core.lock();
            if state.loaded {
                return Ok(state.directory.clone());
            }
            self.pending_or_start(&mut state, PreferenceSource::Stored)
        };
        pending.await
    }

    /// Fetch the directory again, keeping the current selection when it
    /// still exists. Joins a fetch already in flight.
    pub async fn reload(&self) -> LoadResult {
        let pending = {
            let mut state = self.core.lock();
            self.pending_or_start(&mut state, PreferenceSource::Current)
        };
        pending.await
    }

    /// Select a location, or all locations with `None`, and persist it.
    ///
    /// The in-memory selection changes even if persisting fails.
    pub fn set_selected_headquarter(&self, id: Option<i64>) -> sede_core::Result<()> {
        let mut state = self.core.lock();
        state.selected = id;
        self.core.notify(id);
        info!(headquarter_id = ?id, "Headquarter selection changed");

        // Written under the state lock so a concurrent load cannot leave
        // storage holding a different value than memory
        self.core.persist(id)
    }

    /// Drop directory and selection (logout).
    ///
    /// A fetch still in flight completes for its callers but is not applied.
    /// The next load waits for it before fetching, so there is never more
    /// than one directory request outstanding.
    pub fn reset(&self) {
        let mut state = self.core.lock();
        state.epoch += 1;
        if let Some(pending) = state.pending.take() {
            state.retired = Some(pending);
        }
        state.directory = Arc::new(Vec::new());
        state.selected = None;
        state.loaded = false;
        self.core.notify(None);
        debug!(epoch = state.epoch, "Headquarter selection reset");
    }

    pub fn headquarters(&self) -> Directory {
        self.core.lock().directory.clone()
    }

    pub fn selected_headquarter_id(&self) -> Option<i64> {
        self.core.lock().selected
    }

    /// Directory entry for the selected id; `None` for "all" or an id
    /// missing from the directory
    pub fn selected_headquarter(&self) -> Option<Headquarter> {
        let state = self.core.lock();
        let id = state.selected?;
        state.directory.iter().find(|hq| hq.id == id).cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.core.lock().loaded
    }

    pub fn load_state(&self) -> LoadState {
        let state = self.core.lock();
        if state.pending.is_some() {
            LoadState::Loading
        } else if state.loaded {
            LoadState::Loaded
        } else {
            LoadState::Uninitialized
        }
    }

    /// Query parameters scoped to the current selection plus `extra`
    pub fn build_query_parameters(
        &self,
        extra: &[(&str, Option<ParamValue>)],
    ) -> Option<QueryParams> {
        build_query_params(self.selected_headquarter_id(), extra)
    }

    /// Receiver notified whenever the selected id changes
    pub fn subscribe(&self) -> watch::Receiver<Option<i64>> {
        self.core.changes.subscribe()
    }

    fn pending_or_start(&self, state: &mut Inner, source: PreferenceSource) -> PendingLoad {
        if let Some(pending) = &state.pending {
            debug!("Joining headquarters load in flight");
            return pending.clone();
        }

        let core = self.core.clone();
        let epoch = state.epoch;
        let previous = state.retired.take();
        let task = tokio::spawn(async move {
            if let Some(previous) = previous {
                debug!("Waiting for load detached by reset");
                let _ = previous.await;
            }
            core.fetch_and_apply(source, epoch).await
        });
        let pending = async move { task.await.unwrap_or(Err(LoadError::Interrupted)) }
            .boxed()
            .shared();

        state.pending = Some(pending.clone());
        pending
    }
}

impl Core {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn fetch_and_apply(&self, source: PreferenceSource, epoch: u64) -> LoadResult {
        let fetched = self.source.fetch_all().await;

        let mut state = self.lock();
        let current_epoch = state.epoch == epoch;
        if current_epoch {
            state.pending = None;
        }

        let directory = match fetched {
            Ok(directory) => Arc::new(directory),
            Err(e) => {
                warn!(error = %e, "Failed to load headquarters");
                return Err(LoadError::Fetch(Arc::new(e)));
            }
        };

        if !current_epoch {
            debug!("Discarding headquarters loaded before reset");
            return Ok(directory);
        }

        let preference = match source {
            PreferenceSource::Current if state.loaded => Preference::from_selection(state.selected),
            _ => self.stored_preference(),
        };
        let selected = resolve_selection(preference, &directory);

        state.directory = directory.clone();
        state.selected = selected;
        state.loaded = true;
        self.notify(selected);
        if let Err(e) = self.persist(selected) {
            warn!(error = %e, "Failed to persist headquarter selection");
        }
        drop(state);

        info!(
            count = directory.len(),
            headquarter_id = ?selected,
            "Headquarters loaded"
        );
        Ok(directory)
    }

    fn stored_preference(&self) -> Preference {
        match self.storage.get(SELECTED_HEADQUARTER_KEY) {
            Ok(stored) => Preference::parse(stored.as_deref()),
            Err(e) => {
                warn!(error = %e, "Failed to read stored headquarter selection");
                Preference::Unset
            }
        }
    }

    fn persist(&self, selected: Option<i64>) -> sede_core::Result<()> {
        self.storage
            .set(SELECTED_HEADQUARTER_KEY, &encode_selection(selected))
    }

    fn notify(&self, selected: Option<i64>) {
        self.changes.send_if_modified(|current| {
            if *current == selected {
                false
            } else {
                *current = selected;
                true
            }
        });
    }
}
