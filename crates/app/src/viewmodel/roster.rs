//! Patient, contract and employee lists

use futures::FutureExt;
use sede_core::{Contract, Employee, Patient};

use super::ScopedScreen;
use crate::state::AppState;

pub fn patients_screen(state: &AppState) -> ScopedScreen<Vec<Patient>> {
    let client = state.roster.clone();
    ScopedScreen::new(
        "patients",
        "Could not load patients.",
        state.selection.clone(),
        state.notifier.clone(),
        move |params| {
            let client = client.clone();
            async move { client.patients(params.as_ref()).await }.boxed()
        },
    )
}

pub fn contracts_screen(state: &AppState) -> ScopedScreen<Vec<Contract>> {
    let client = state.roster.clone();
    ScopedScreen::new(
        "contracts",
        "Could not load contracts.",
        state.selection.clone(),
        state.notifier.clone(),
        move |params| {
            let client = client.clone();
            async move { client.contracts(params.as_ref()).await }.boxed()
        },
    )
}

pub fn employees_screen(state: &AppState) -> ScopedScreen<Vec<Employee>> {
    let client = state.roster.clone();
    ScopedScreen::new(
        "employees",
        "Could not load employees.",
        state.selection.clone(),
        state.notifier.clone(),
        move |params| {
            let client = client.clone();
            async move { client.employees(params.as_ref()).await }.boxed()
        },
    )
}
