mod cli;
mod config;
mod services;
mod state;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use std::path::Path;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{
    Cli, Commands, ConnectionCommand, ConnectionSetArgs, FormCommand, PasswordArgs, ProfileCommand,
};
use crate::config::AppConfig;
use crate::services::{
    AppStore, ConnectionDefaults, DatabaseManager, FIELDS, FieldGroup, ProfileStore,
};
use crate::state::{AppState, SubmitError};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.data_dir.clone())?;

    smol::block_on(dispatch(cli.command, &config))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Load the window state, run one command against it, and persist it again
/// whatever the outcome.
async fn dispatch(command: Commands, config: &AppConfig) -> Result<()> {
    let store = AppStore::open(&config.settings_path()).await?;
    let profiles = store.profiles(config.defaults.clone());

    let draft_path = config.draft_path();
    let mut state = open_window(&draft_path, &config.defaults, &profiles).await?;

    let result = run_command(command, &mut state, &profiles).await;

    state::save_draft(&draft_path, &state).await?;
    store.close().await;
    result
}

async fn open_window(
    draft_path: &Path,
    defaults: &ConnectionDefaults,
    profiles: &ProfileStore,
) -> Result<AppState> {
    let fresh = !draft_path.exists();
    let mut state = state::load_draft(draft_path, defaults, now()).await?;
    if fresh {
        // A new window starts out with the default user's saved profile
        let user = state.connection.user.clone();
        state::switch_user(&mut state, profiles, &user).await?;
    }
    state::restore_password(&mut state, profiles).await?;
    Ok(state)
}

async fn run_command(command: Commands, state: &mut AppState, profiles: &ProfileStore) -> Result<()> {
    match command {
        Commands::Form(cmd) => run_form(cmd, state),
        Commands::Connection(cmd) => run_connection(cmd, state, profiles).await,
        Commands::Profile(ProfileCommand::Show { user }) => show_profile(profiles, &user).await,
        Commands::Submit(args) => {
            apply_password(state, args);
            let result =
                state::submit(state, &DatabaseManager::new(), profiles, now()).await;
            print_status(state);
            let rows = result.map_err(notify)?;
            println!("{rows} row(s) inserted into monkeyLog");
            Ok(())
        }
        Commands::Status => {
            print_status(state);
            Ok(())
        }
    }
}

fn run_form(cmd: FormCommand, state: &mut AppState) -> Result<()> {
    match cmd {
        FormCommand::Fields => {
            for group in FieldGroup::all() {
                println!("{}", group.title());
                for spec in FIELDS.iter().filter(|f| f.group == group) {
                    println!("  {:<18} {:<20} {}", spec.key, spec.label, spec.kind.describe());
                }
            }
        }
        FormCommand::Show => {
            for group in FieldGroup::all() {
                println!("{}", group.title());
                for spec in FIELDS.iter().filter(|f| f.group == group) {
                    println!("  {:>20}: {}", spec.label, state.form.display(spec));
                }
            }
            print_status(state);
        }
        FormCommand::Set { assignments } => {
            let mut form = state.form.clone();
            for assignment in &assignments {
                form.assign(assignment)?;
            }
            state.form = form;
        }
        FormCommand::Unset { keys } => {
            let mut form = state.form.clone();
            for key in &keys {
                form.unset(key)?;
            }
            state.form = form;
        }
        FormCommand::Clear => {
            state::clear_form(state, now());
            print_status(state);
        }
    }
    Ok(())
}

async fn run_connection(
    cmd: ConnectionCommand,
    state: &mut AppState,
    profiles: &ProfileStore,
) -> Result<()> {
    match cmd {
        ConnectionCommand::Show => {
            let conn = &state.connection;
            println!("      Host: {}", conn.host);
            println!("      Port: {}", conn.port);
            println!("  Database: {}", conn.database);
            println!("      User: {}", conn.user);
            println!("  Password: {}", conn.masked_password());
            println!("  Remember: {}", conn.remember_password);
        }
        ConnectionCommand::Set(args) => set_connection(args, state, profiles).await?,
        ConnectionCommand::Test(args) => {
            apply_password(state, args);
            let result = state::test_connection(state, &DatabaseManager::new(), profiles).await;
            print_status(state);
            result.map_err(notify)?;
            println!("Connected to database successfully.");
        }
    }
    Ok(())
}

async fn set_connection(
    args: ConnectionSetArgs,
    state: &mut AppState,
    profiles: &ProfileStore,
) -> Result<()> {
    if let Some(user) = args.user {
        state::switch_user(state, profiles, &user).await?;
    }
    if let Some(host) = args.host {
        state.connection.host = host.trim().to_string();
    }
    if let Some(port) = args.port {
        state.connection.port = port;
    }
    if let Some(database) = args.database {
        state.connection.database = database.trim().to_string();
    }
    if args.remember {
        state.connection.remember_password = true;
    } else if args.forget {
        state.connection.remember_password = false;
    }
    Ok(())
}

async fn show_profile(profiles: &ProfileStore, user: &str) -> Result<()> {
    let profile = profiles.load(user.trim()).await?;
    println!("      Host: {}", profile.host);
    println!("      Port: {}", profile.port);
    println!("  Database: {}", profile.database);
    println!("  Remember: {}", profile.remember_password);
    println!(
        "  Password: {}",
        if profile.password.is_empty() { "(none)" } else { "(saved)" }
    );
    Ok(())
}

fn apply_password(state: &mut AppState, args: PasswordArgs) {
    if let Some(password) = args.password {
        state.connection.password = password;
    }
}

fn print_status(state: &AppState) {
    println!("Status: {}", state.status.as_deref().unwrap_or("Ready"));
}

/// Wrap a submit/test error with the title of its notification
fn notify(err: SubmitError) -> anyhow::Error {
    let title = err.title();
    anyhow::Error::new(err).context(title)
}
