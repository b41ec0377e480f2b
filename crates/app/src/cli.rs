//! Command-line front end

use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sede_core::{
    AvailabilitySlot, CalendarEntry, Contract, Employee, Headquarter, HeadquarterCreate,
    MarketCategory, Patient, Rent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::notify::{Notification, NotificationKind};
use crate::state::AppState;
use crate::viewmodel::{
    availability_screen, calendar_screen, contracts_screen, employees_screen, market_screen,
    overview_screen, patients_screen, rent_screen, HeadquarterPicker, HeadquartersScreen,
    MarketTotals, Overview, ScopedScreen,
};

#[derive(Debug, Parser)]
#[command(name = "sede", version, about = "Headquarters-scoped client for the clinic admin backend")]
pub struct Cli {
    /// Backend base URL (overrides config and SEDE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List or create locations
    #[command(subcommand)]
    Headquarters(HeadquartersCommand),
    /// Select a location by id, or "all"
    Select { value: String },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the logged-in user and the selected location
    Whoami,
    /// Scheduled visits and closed slots
    Calendar,
    /// Free scheduling slots
    Availability,
    Rent,
    /// Financial overview figures
    Overview,
    /// Monthly market spending
    Market,
    Patients,
    Contracts,
    /// Staff list (admins and managers)
    Employees,
    /// Keep a screen open; type a location id or "all" to switch
    Watch {
        #[arg(value_enum)]
        screen: ScreenName,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScreenName {
    Calendar,
    Availability,
    Rent,
    Overview,
    Market,
    Patients,
    Contracts,
    Employees,
}

#[derive(Debug, Subcommand)]
pub enum HeadquartersCommand {
    List,
    Create(CreateArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub rent: Option<f64>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub observation: Option<String>,
}

impl CreateArgs {
    fn into_payload(self) -> HeadquarterCreate {
        let mut payload = HeadquarterCreate::new(self.name);
        if let Some(rent) = self.rent {
            payload = payload.with_rent(rent);
        }
        if let Some(address) = self.address {
            payload = payload.with_address(address);
        }
        if let Some(phone) = self.phone {
            payload = payload.with_phone(phone);
        }
        if let Some(observation) = self.observation {
            payload = payload.with_observation(observation);
        }
        payload
    }
}

pub async fn run(
    state: &AppState,
    command: Command,
    notifications: &mut Receiver<Notification>,
) -> Result<()> {
    match command {
        Command::Headquarters(HeadquartersCommand::List) => {
            let screen = HeadquartersScreen::new(state);
            let selected = state.selection.selected_headquarter_id();
            for hq in screen.list().await.iter() {
                let marker = if Some(hq.id) == selected {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {}", describe(hq));
            }
            if selected.is_none() {
                println!("* all locations");
            }
        }
        Command::Headquarters(HeadquartersCommand::Create(args)) => {
            let created = HeadquartersScreen::new(state)
                .create(args.into_payload())
                .await?;
            println!("{}", describe(&created));
        }
        Command::Select { value } => {
            state.selection.ensure_loaded().await?;
            let picker = HeadquarterPicker::new(state.selection.clone());
            picker.on_headquarter_change(&value)?;
            match state.selection.selected_headquarter() {
                Some(hq) => println!("Selected {}", describe(&hq)),
                None if state.selection.selected_headquarter_id().is_none() => {
                    println!("Selected all locations")
                }
                None => println!("Selected {} (not in directory)", picker.current_value()),
            }
        }
        Command::Login { email, password } => {
            let user = state.auth.login(&email, &password).await?;
            println!("{}", user.display_name());
        }
        Command::Logout => state.auth.logout()?,
        Command::Whoami => {
            let user = state
                .auth
                .current_user()
                .ok_or_else(|| Error::Input("not logged in".to_string()))?;
            debug!(header = ?state.api.user_id(), "Identified requests");
            println!("{} <{}>", user.display_name(), user.email);
            println!("Backend: {}", state.config.api_url);
            state.selection.ensure_loaded().await?;
            match state.selection.selected_headquarter() {
                Some(hq) => println!("Location: {}", hq.name),
                None => println!("Location: all"),
            }
        }
        Command::Calendar => show_calendar(&calendar_screen(state).init().await.unwrap_or_default()),
        Command::Availability => {
            show_availability(&availability_screen(state).init().await.unwrap_or_default())
        }
        Command::Rent => show_rent(rent_screen(state).init().await.flatten().as_ref()),
        Command::Overview => {
            if let Some(overview) = overview_screen(state).init().await {
                show_overview(&overview);
            }
        }
        Command::Market => {
            if let Some(totals) = market_screen(state).init().await {
                show_market(&totals);
            }
        }
        Command::Patients => show_patients(&patients_screen(state).init().await.unwrap_or_default()),
        Command::Contracts => {
            show_contracts(&contracts_screen(state).init().await.unwrap_or_default())
        }
        Command::Employees => {
            require_employee_access(state)?;
            show_employees(&employees_screen(state).init().await.unwrap_or_default());
        }
        Command::Watch { screen } => {
            let out = notifications;
            match screen {
                ScreenName::Calendar => {
                    let show = |e: &Vec<CalendarEntry>| show_calendar(e);
                    watch(state, calendar_screen(state), out, show).await?
                }
                ScreenName::Availability => {
                    let show = |s: &Vec<AvailabilitySlot>| show_availability(s);
                    watch(state, availability_screen(state), out, show).await?
                }
                ScreenName::Rent => {
                    let show = |r: &Option<Rent>| show_rent(r.as_ref());
                    watch(state, rent_screen(state), out, show).await?
                }
                ScreenName::Overview => {
                    watch(state, overview_screen(state), out, show_overview).await?
                }
                ScreenName::Market => watch(state, market_screen(state), out, show_market).await?,
                ScreenName::Patients => {
                    let show = |p: &Vec<Patient>| show_patients(p);
                    watch(state, patients_screen(state), out, show).await?
                }
                ScreenName::Contracts => {
                    let show = |c: &Vec<Contract>| show_contracts(c);
                    watch(state, contracts_screen(state), out, show).await?
                }
                ScreenName::Employees => {
                    require_employee_access(state)?;
                    let show = |e: &Vec<Employee>| show_employees(e);
                    watch(state, employees_screen(state), out, show).await?
                }
            }
        }
    }
    info!("Command finished");
    Ok(())
}

/// Print a notification to stderr
pub fn report(notification: &Notification) {
    let tag = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
        NotificationKind::Warning => "warning",
    };
    eprintln!("[{tag}] {}", notification.message);
}

/// Show a screen, then keep it in sync with the location typed on stdin
/// until stdin closes or the process is interrupted
async fn watch<T, F>(
    state: &AppState,
    screen: ScopedScreen<T>,
    notifications: &mut Receiver<Notification>,
    show: F,
) -> Result<()>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T),
{
    let screen = Arc::new(screen);
    let mut revisions = screen.revisions();
    if let Some(data) = screen.init().await {
        show(&data);
    }
    revisions.borrow_and_update();

    let picker = HeadquarterPicker::new(state.selection.clone());
    let current = picker.current_value();
    println!("Locations:");
    for option in picker.options() {
        let marker = if option.value == current { "*" } else { " " };
        println!("{marker} {:>4}  {}", option.value, option.label);
    }

    let watcher = screen.spawn_watcher();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let outcome = loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(Error::from(sede_core::Error::from(e))),
                };
                let value = line.trim();
                if value.is_empty() {
                    continue;
                }
                if let Err(e) = picker.on_headquarter_change(value) {
                    eprintln!("error: {e}");
                }
            }
            changed = revisions.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                revisions.borrow_and_update();
                if let Some(data) = screen.data() {
                    println!();
                    show(&data);
                }
            }
            notification = notifications.recv() => match notification {
                Ok(notification) => report(&notification),
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Notifications dropped"),
                Err(RecvError::Closed) => break Ok(()),
            },
            _ = tokio::signal::ctrl_c() => break Ok(()),
        }
    };
    watcher.abort();
    outcome
}

fn require_employee_access(state: &AppState) -> Result<()> {
    match state.auth.current_user() {
        Some(user) if user.can_view_employees() => Ok(()),
        Some(_) => Err(Error::Input(
            "the staff list is limited to admins and managers".to_string(),
        )),
        None => Err(Error::Input("not logged in".to_string())),
    }
}

fn show_calendar(entries: &[CalendarEntry]) {
    for entry in entries {
        let when = entry.time.as_deref().unwrap_or("all day");
        println!(
            "{} {:<8} {:<12} {}",
            entry.date,
            when,
            entry.kind.label(),
            entry.name.as_deref().unwrap_or("-")
        );
    }
}

fn show_availability(slots: &[AvailabilitySlot]) {
    for slot in slots {
        println!("{} {}", slot.date, slot.time);
    }
}

fn show_rent(rent: Option<&Rent>) {
    match rent {
        Some(rent) => println!("Rent: {:.2}", rent.value),
        None => println!("No rent configured"),
    }
}

fn show_overview(overview: &Overview) {
    for (metric, value) in &overview.figures {
        println!("{:<18} {:.2}", metric.label(), value);
    }
}

fn show_market(totals: &MarketTotals) {
    for (category, value) in [
        (MarketCategory::Food, totals.food),
        (MarketCategory::Cleaning, totals.cleaning),
    ] {
        println!("{:<10}{:.2}", category.label(), value);
    }
    println!("{:<10}{:.2}", "Total", totals.total());
}

fn show_patients(patients: &[Patient]) {
    for patient in patients {
        println!(
            "{:>4}  {:<28} {}",
            patient.id,
            patient.name,
            patient.plan_name.as_deref().unwrap_or("-")
        );
    }
}

fn show_contracts(contracts: &[Contract]) {
    for contract in contracts {
        println!(
            "{} {:<28} {}",
            contract.contract_date,
            contract.patient_name,
            contract.file_url.as_deref().unwrap_or("-")
        );
    }
}

fn show_employees(employees: &[Employee]) {
    for employee in employees {
        let name = if employee.full_name.is_empty() {
            &employee.name
        } else {
            &employee.full_name
        };
        println!(
            "{:<28} {:<10} {:>6} {:>10.2}",
            name, employee.kind, employee.weekly_hours, employee.salary
        );
    }
}

fn describe(hq: &Headquarter) -> String {
    match &hq.address {
        Some(address) => format!("{:>4}  {} ({address})", hq.id, hq.name),
        None => format!("{:>4}  {}", hq.id, hq.name),
    }
}
