use anyhow::Result;
use clap::{Parser, Subcommand};
use gdesk_core::{AppError, Config};
use gdesk_session::{Session, SessionError, SessionStatus};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Restore any existing Google session and print session and theme state
    Status,
    /// Sign in with Google in the browser
    Login,
    /// Forget the stored Google session
    Logout,
    /// Upcoming meetings on the primary calendar
    Meetings,
    /// Upcoming events followed by upcoming holidays
    Events,
    /// Users in the organization directory
    Users,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    gdesk_core::init()?;

    let (config, _validation) = Config::load_validated().map_err(AppError::from)?;
    let session =
        Session::from_config(&config).map_err(|e| AppError::Service(e.user_message()))?;

    tracing::info!("gdesk started");

    let result = run(cli.command, &session).await;
    session.shutdown();

    if let Err(e) = result {
        tracing::error!("{}", e);
        return Err(AppError::Service(e.user_message()).into());
    }
    Ok(())
}

async fn run(command: Commands, session: &Session) -> Result<(), SessionError> {
    let status = session.bootstrap().await?;

    match command {
        Commands::Status => {
            session.wait_for_prefetch().await;
            print_json(&serde_json::json!({
                "session": session.state(),
                "ui": session.ui(),
            }));
        }
        Commands::Login => {
            if status == SessionStatus::SignedOut {
                session.sign_in().await?;
            }
            session.wait_for_prefetch().await;
            println!("Signed in as {}", session.state().current_user);
        }
        Commands::Logout => {
            session.sign_out().await?;
            println!("Signed out");
        }
        Commands::Meetings => print_json(&session.get_meetings().await?),
        Commands::Events => print_json(&session.get_calendar_events().await?),
        Commands::Users => print_json(&session.get_users().await?),
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to serialize output: {}", e),
    }
}
