//! Calendar screens: scheduled visits and free slots

use futures::FutureExt;
use sede_core::{AvailabilitySlot, CalendarEntry};

use super::ScopedScreen;
use crate::state::AppState;

pub fn calendar_screen(state: &AppState) -> ScopedScreen<Vec<CalendarEntry>> {
    let client = state.calendar.clone();
    ScopedScreen::new(
        "calendar",
        "Could not load the calendar.",
        state.selection.clone(),
        state.notifier.clone(),
        move |params| {
            let client = client.clone();
            async move { client.entries(params.as_ref()).await }.boxed()
        },
    )
}

pub fn availability_screen(state: &AppState) -> ScopedScreen<Vec<AvailabilitySlot>> {
    let client = state.calendar.clone();
    ScopedScreen::new(
        "availability",
        "Could not load available times.",
        state.selection.clone(),
        state.notifier.clone(),
        move |params| {
            let client = client.clone();
            async move { client.availability(params.as_ref()).await }.boxed()
        },
    )
}
