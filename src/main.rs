//! BioBlood CLI
//!
//! Command-line client for the prediction demo:
//! - Sign up, log in and out (session kept in `session.json`)
//! - Run a prediction cycle on a fingerprint image
//! - Show history and profile
//! - Send feedback on past predictions

use anyhow::{bail, Context};
use bioblood::config::{generate_default_config, Config, LoggingConfig};
use bioblood::gateway::{ApiGateway, GatewayMode};
use bioblood::model::{BloodGroup, Feedback, SelectedFile, UserId};
use bioblood::prediction::{Completion, PredictionFlow};
use bioblood::session::{FileStorage, Session, SessionStore};
use bioblood::view::notice::{MSG_LOGIN_OK, MSG_LOGOUT_OK, MSG_SIGNUP_OK};
use bioblood::view::{
    format_confidence, history_rows, profile_rows, render, DashboardView, NavState, Notice,
    Screen, Section, Tab,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bioblood")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Blood group detection from fingerprint images")]
#[command(long_about = "BioBlood predicts blood groups from fingerprint images with an ensemble of models.\nLog in, upload a print and tell the models whether they got it right.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend mode override (demo, live, offline)
    #[arg(long, global = true)]
    pub mode: Option<GatewayMode>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and log in
    Signup {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Log in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Log out
    Logout,

    /// Show who is logged in
    Whoami,

    /// Predict the blood group of a fingerprint image
    Predict {
        /// Image file
        file: PathBuf,
        /// Confirm the prediction was correct
        #[arg(long, conflicts_with = "actual")]
        correct: bool,
        /// Report the actual blood group (e.g. "O+")
        #[arg(long)]
        actual: Option<BloodGroup>,
    },

    /// List recent predictions
    History,

    /// Show account details
    Profile,

    /// Report the actual blood group for a past prediction
    Feedback {
        /// Actual blood group
        actual: BloodGroup,
        /// Prediction to correct (default: the most recent one)
        #[arg(short, long)]
        prediction_id: Option<i64>,
    },

    /// Generate default configuration file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(mode) = cli.mode {
        config.api.mode = mode;
    }

    init_tracing(&config.logging);

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let mut store = SessionStore::open(Arc::new(FileStorage::in_dir(&config.session.state_dir)));
    let gateway = ApiGateway::for_mode(
        config.api.routes(),
        config.api.mode,
        config.api.stub_delay(),
        config.api.request_timeout(),
    )?;
    tracing::debug!(mode = %config.api.mode, "Gateway ready");

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let user = gateway.signup(&name, &email, &password).await?;
            store.save(user)?;
            print_notice(&Notice::success(MSG_SIGNUP_OK));
            print_nav(&store);
        }

        Commands::Login { email, password } => {
            let user = gateway.login(&email, &password).await?;
            store.save(user)?;
            print_notice(&Notice::success(MSG_LOGIN_OK));
            print_nav(&store);
        }

        Commands::Logout => {
            store.clear()?;
            print_notice(&Notice::success(MSG_LOGOUT_OK));
        }

        Commands::Whoami => match store.user() {
            Some(user) => {
                print_nav(&store);
                println!("  id:    {}", user.id);
                println!("  email: {}", user.email);
            }
            None => println!("Not logged in (predictions are filed under the guest account)"),
        },

        Commands::Predict {
            file,
            correct,
            actual,
        } => {
            let selected = SelectedFile::from_path(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let mut flow = PredictionFlow::new();
            if let Err(notice) = flow.select_file(selected) {
                bail!(notice.message);
            }

            match flow.submit(&gateway, store.session()).await? {
                Completion::Shown => {}
                Completion::Failed(notice) => bail!(notice.message),
                Completion::Stale => bail!("Prediction was superseded"),
            }

            if let Some(result) = flow.result() {
                let prediction = &result.prediction;
                println!("Blood group: {}", prediction.blood_group);
                println!("Confidence:  {}", format_confidence(prediction.confidence));
                for (model, group) in &prediction.model_predictions {
                    println!("  {:<16} {}", model, group);
                }
            }

            let feedback = if correct {
                flow.answer(true)?
            } else if let Some(actual) = actual {
                flow.answer(false)?;
                Some(flow.correct_to(actual)?)
            } else {
                println!();
                println!("Was this correct? Re-run with --correct or --actual <GROUP>, or use `bioblood feedback`.");
                None
            };

            if let Some(feedback) = feedback {
                let notice = flow.send_feedback(&gateway, &feedback).await;
                print_notice(&notice);
            }
        }

        Commands::History => {
            let user_id = dashboard_user(Tab::History, store.session())?;

            let entries = gateway.history(user_id).await?;
            let rows = history_rows(&entries);
            if rows.is_empty() {
                println!("No predictions yet");
            } else {
                println!("{:<12} {:<8} {:>10}", "Date", "Result", "Confidence");
                println!("{}", "-".repeat(32));
                for row in rows {
                    println!("{:<12} {:<8} {:>10}", row.date, row.result, row.confidence);
                }
            }
        }

        Commands::Profile => {
            let user_id = dashboard_user(Tab::Profile, store.session())?;

            let profile = gateway.profile(user_id).await?;
            for (label, value) in profile_rows(&profile) {
                println!("{:<14} {}", format!("{}:", label), value);
            }
        }

        Commands::Feedback {
            actual,
            prediction_id,
        } => {
            let prediction_id = match prediction_id {
                Some(id) => Some(id),
                None => gateway
                    .history(store.session().user_id())
                    .await?
                    .first()
                    .and_then(|entry| entry.id),
            };

            let feedback = Feedback {
                prediction_id,
                actual_blood_group: actual,
            };
            let message = gateway.feedback(&feedback).await?;
            println!("{}", message);
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bioblood={}", logging.level).into());

    // Logs go to stderr so command output stays clean
    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}

fn print_notice(notice: &Notice) {
    if notice.is_error() {
        eprintln!("{}", notice);
    } else {
        println!("{}", notice);
    }
}

/// Owner of a dashboard tab, or the reason the dashboard is closed
fn dashboard_user(tab: Tab, session: &Session) -> anyhow::Result<UserId> {
    match render(Section::Dashboard, tab, session) {
        Screen::Dashboard { view, .. } => match (tab, view) {
            (Tab::History, DashboardView::History { user_id })
            | (Tab::Profile, DashboardView::Profile { user_id }) => Ok(user_id),
            (tab, view) => bail!("{:?} tab rendered {:?}", tab, view),
        },
        Screen::Denied(notice) => bail!(notice.message),
        other => bail!("Dashboard rendered {:?}", other),
    }
}

fn print_nav(store: &SessionStore) {
    if let NavState::LoggedIn { greeting } = NavState::for_session(store.session()) {
        println!("{}", greeting);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioblood::model::User;

    #[test]
    fn test_dashboard_user() {
        let session = Session::logged_in(User::new(9, "Ada", "ada@example.com"));
        assert_eq!(dashboard_user(Tab::History, &session).unwrap(), 9);
        assert_eq!(dashboard_user(Tab::Profile, &session).unwrap(), 9);

        let err = dashboard_user(Tab::History, &Session::logged_out()).unwrap_err();
        assert_eq!(err.to_string(), "Please login to access dashboard");
    }
}
