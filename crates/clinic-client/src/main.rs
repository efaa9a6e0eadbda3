use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use clinic_client::router::{ChannelNavigator, GuardDecision, Navigation};
use clinic_client::{AppState, ClientConfig};
use clinic_shared::followup::{FollowUpResponse, Outcome};
use clinic_shared::user::LoginCredentials;
use clinic_store::{Database, SqliteStorage};

#[derive(Parser)]
#[command(name = "clinic-portal")]
#[command(about = "School clinic portal client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in; the password is read from CLINIC_PASSWORD
    Login { school_id: String },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check whether the current session may open a page
    Navigate { path: String },
    /// List the symptoms the checker accepts
    Symptoms,
    /// Show medications and today's doses
    Medications,
    /// Show pending follow-ups
    Followups,
    /// Answer a pending follow-up
    Respond {
        id: Uuid,
        /// improved, same, worse or resolved
        outcome: Outcome,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        still_sick: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    clinic_client::init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::from_env();
    let db = match &config.data_dir {
        Some(dir) => Database::open_in(dir),
        None => Database::new(),
    }
    .context("failed to open local storage")?;

    let (navigator, mut navigations) = ChannelNavigator::new();
    let state = AppState::new(config, Arc::new(SqliteStorage::new(db)), Arc::new(navigator))?;
    state.bootstrap().await;

    let outcome = run(&state, cli.command).await;
    report_navigations(&mut navigations);
    outcome
}

async fn run(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Login { school_id } => {
            let password = std::env::var("CLINIC_PASSWORD")
                .context("CLINIC_PASSWORD must be set to log in")?;
            let credentials = LoginCredentials { school_id, password };

            match state.auth.login(&credentials).await {
                Ok(user) => println!("Signed in as {} ({})", user.name, user.role),
                Err(_) => bail!(state.auth.error().unwrap_or_else(|| "Login failed".into())),
            }
        }

        Commands::Logout => {
            state.auth.logout().await;
            println!("Signed out");
        }

        Commands::Whoami => match state.auth.user() {
            Some(user) => println!("{} <{}> {}", user.name, user.school_id, user.role),
            None => println!("Not signed in"),
        },

        Commands::Navigate { path } => match state.navigate(&path) {
            GuardDecision::Allow => println!("allow {path}"),
            GuardDecision::Redirect(to) => println!("redirect {}", to.location()),
        },

        Commands::Symptoms => {
            state.symptoms.fetch_available_symptoms().await;
            fail_on(state.symptoms.error())?;
            for symptom in state.symptoms.available_symptoms() {
                println!("{:<32} {}", symptom.name, symptom.label());
            }
        }

        Commands::Medications => {
            state.medications.fetch_medications(None).await;
            fail_on(state.medications.error())?;
            state.medications.fetch_todays_logs().await;
            fail_on(state.medications.error())?;

            for med in state.medications.active_medications() {
                println!("{} {} ({})", med.name, med.dosage, med.frequency);
            }
            println!("Today's adherence: {}%", state.medications.todays_adherence());
            for log in state.medications.overdue_logs() {
                let name = log.medication_name.as_deref().unwrap_or("medication");
                println!("overdue: {name} at {}", log.scheduled_time);
            }
        }

        Commands::Followups => {
            state.followups.fetch_pending_follow_ups().await;
            fail_on(state.followups.error())?;

            for followup in state.followups.pending() {
                let marker = if followup.is_overdue { "overdue" } else { "due" };
                println!("{} {} {}", followup.id, marker, followup.scheduled_date);
            }
        }

        Commands::Respond {
            id,
            outcome,
            notes,
            still_sick,
        } => {
            let response = FollowUpResponse {
                outcome,
                notes,
                still_experiencing_symptoms: still_sick,
                new_symptoms: Vec::new(),
            };
            state
                .followups
                .respond_to_follow_up(id, &response)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Failed to submit response")))?;
            println!("Follow-up {id} answered");
        }
    }

    Ok(())
}

fn fail_on(error: Option<String>) -> Result<()> {
    match error {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

fn report_navigations(rx: &mut UnboundedReceiver<Navigation>) {
    while let Ok(navigation) = rx.try_recv() {
        println!("-> {}", navigation.location());
    }
}
