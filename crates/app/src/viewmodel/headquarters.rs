//! Headquarters management screen

use std::sync::Arc;

use sede_core::{Headquarter, HeadquarterCreate};
use sede_net::HeadquarterDirectory;
use tracing::{info, warn};

use super::LOAD_LOCATIONS_FAILED;
use crate::error::Result;
use crate::notify::Notifier;
use crate::selection::{Directory, HeadquarterSelection};
use crate::state::AppState;

const CREATE_FAILED: &str = "Could not create the location.";

pub struct HeadquartersScreen {
    directory: Arc<dyn HeadquarterDirectory>,
    selection: HeadquarterSelection,
    notifier: Notifier,
}

impl HeadquartersScreen {
    pub fn new(state: &AppState) -> Self {
        Self::with_parts(
            state.directory.clone(),
            state.selection.clone(),
            state.notifier.clone(),
        )
    }

    pub fn with_parts(
        directory: Arc<dyn HeadquarterDirectory>,
        selection: HeadquarterSelection,
        notifier: Notifier,
    ) -> Self {
        Self {
            directory,
            selection,
            notifier,
        }
    }

    /// Directory for the list view; whatever is cached when the load fails
    pub async fn list(&self) -> Directory {
        match self.selection.ensure_loaded().await {
            Ok(directory) => directory,
            Err(e) => {
                warn!(error = %e, "Headquarters list unavailable");
                self.notifier.error(LOAD_LOCATIONS_FAILED);
                self.selection.headquarters()
            }
        }
    }

    /// Create a location, then reload the shared directory so every screen
    /// sees it
    pub async fn create(&self, payload: HeadquarterCreate) -> Result<Headquarter> {
        if let Err(e) = payload.validate() {
            self.notifier.warning(e.to_string());
            return Err(e.into());
        }

        let created = match self.directory.create(&payload).await {
            Ok(created) => created,
            Err(e) => {
                self.notifier.backend_error(&e, CREATE_FAILED);
                return Err(e.into());
            }
        };
        info!(id = created.id, name = %created.name, "Location created");
        self.notifier.success("Location created.");

        if let Err(e) = self.selection.reload().await {
            warn!(error = %e, "Reload after create failed");
            self.notifier.error(LOAD_LOCATIONS_FAILED);
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;
    use crate::selection::tests::{two_locations, FakeDirectory};
    use crate::viewmodel::tests::selection_with;

    #[tokio::test]
    async fn test_create_reloads_directory_and_keeps_selection() {
        let fake = FakeDirectory::new(two_locations());
        let (selection, _) = selection_with(fake.clone());
        let notifier = Notifier::new();
        let screen = HeadquartersScreen::with_parts(fake.clone(), selection.clone(), notifier.clone());

        assert_eq!(screen.list().await.len(), 2);
        selection.set_selected_headquarter(Some(2)).unwrap();

        let mut notifications = notifier.subscribe();
        let created = screen.create(HeadquarterCreate::new("C3")).await.unwrap();
        assert_eq!(created.id, 3);
        assert_eq!(selection.headquarters().len(), 3);
        assert_eq!(selection.selected_headquarter_id(), Some(2));
        assert_eq!(fake.calls(), 2);
        assert_eq!(
            notifications.recv().await.unwrap().kind,
            NotificationKind::Success
        );
    }

    #[tokio::test]
    async fn test_invalid_payload_warns_without_request() {
        let fake = FakeDirectory::new(two_locations());
        let (selection, _) = selection_with(fake.clone());
        let notifier = Notifier::new();
        let mut notifications = notifier.subscribe();
        let screen = HeadquartersScreen::with_parts(fake.clone(), selection, notifier);

        assert!(screen.create(HeadquarterCreate::new("  ")).await.is_err());
        assert_eq!(
            notifications.recv().await.unwrap().kind,
            NotificationKind::Warning
        );
        assert_eq!(fake.directory.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_failure_returns_cached() {
        let fake = FakeDirectory::new(two_locations());
        fake.failures
            .store(1, std::sync::atomic::Ordering::SeqCst);
        let (selection, _) = selection_with(fake.clone());
        let notifier = Notifier::new();
        let mut notifications = notifier.subscribe();
        let screen = HeadquartersScreen::with_parts(fake, selection, notifier);

        assert!(screen.list().await.is_empty());
        assert_eq!(
            notifications.recv().await.unwrap().message,
            LOAD_LOCATIONS_FAILED
        );
        assert_eq!(screen.list().await.len(), 2);
    }
}
