use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "monkeylog",
    version,
    about = "Record animal session observations into the monkeyLog table"
)]
pub struct Cli {
    /// Directory holding settings, draft and config files
    #[arg(long, global = true, env = "MONKEYLOG_HOME")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit and inspect the session form
    #[command(subcommand)]
    Form(FormCommand),
    /// Edit and test the database connection
    #[command(subcommand)]
    Connection(ConnectionCommand),
    /// Inspect saved connection profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Validate the form and insert it as one row
    Submit(PasswordArgs),
    /// Print the outcome of the last operation
    Status,
}

#[derive(Subcommand, Debug)]
pub enum FormCommand {
    /// List every field with its key, label and kind
    Fields,
    /// Show the current form
    Show,
    /// Set fields, e.g. `subject=Hercules weight=7.25`
    Set {
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },
    /// Make fields absent
    Unset {
        #[arg(required = true, value_name = "KEY")]
        keys: Vec<String>,
    },
    /// Reset the form; date and times become now
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ConnectionCommand {
    /// Show the connection fields
    Show,
    /// Change connection fields
    Set(ConnectionSetArgs),
    /// Open and close a connection, saving the profile on success
    Test(PasswordArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionSetArgs {
    /// Switch user; that user's saved profile is loaded before other flags apply
    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    #[arg(long)]
    pub database: Option<String>,

    /// Remember the password for this user
    #[arg(long, conflicts_with = "forget")]
    pub remember: bool,

    /// Stop remembering the password for this user
    #[arg(long)]
    pub forget: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PasswordArgs {
    /// Database password; defaults to the remembered one
    #[arg(long, env = "MONKEYLOG_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Print the saved profile for a username
    Show { user: String },
}
