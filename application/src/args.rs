//! [`Args`] definitions.

use clap::{Parser, Subcommand, ValueEnum};

/// Command line client of the school directory.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Signs in and stores the issued token.
    Login {
        /// Email address of the account.
        #[arg(long)]
        email: String,

        /// Password of the account.
        #[arg(long, env = "SCHOOL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Signs out and forgets the stored token.
    Logout,

    /// Shows the profile of the signed-in user.
    Profile,

    /// Registers a new student account.
    Register(Box<Registration>),

    /// Updates the profile of the signed-in user.
    ///
    /// Omitted fields keep their current values.
    UpdateProfile(Box<ProfileChanges>),

    /// Lists students.
    Students(Students),

    /// Shows a single student.
    Student {
        /// ID of the student.
        id: u64,
    },

    /// Lists the values students can be filtered by.
    Filters,
}

/// Arguments of the [`Command::Students`].
#[derive(Debug, clap::Args)]
pub struct Students {
    /// Load every page instead of the first one only.
    #[arg(long)]
    pub all: bool,

    /// Show only students whose name or email contains this text.
    #[arg(long)]
    pub search: Option<String>,

    /// Show only students of this class.
    #[arg(long)]
    pub class: Option<String>,

    /// Show only students of this field of study.
    #[arg(long)]
    pub field: Option<String>,

    /// Sort students by name.
    #[arg(long, value_enum)]
    pub sort: Option<Sort>,

    /// Ask the backend for all students of this field of study.
    #[arg(long, conflicts_with_all = ["all", "search", "class", "field", "sort"])]
    pub remote_field: Option<String>,
}

/// Sorting direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Sort {
    /// Alphabetical order.
    Asc,

    /// Reverse alphabetical order.
    Desc,
}

/// Arguments of the [`Command::Register`].
#[derive(Debug, clap::Args)]
pub struct Registration {
    /// First name.
    #[arg(long)]
    pub first_name: String,

    /// Last name.
    #[arg(long)]
    pub last_name: String,

    /// Email address to sign in with.
    #[arg(long)]
    pub email: String,

    /// Password to sign in with.
    #[arg(long, env = "SCHOOL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Phone number.
    #[arg(long)]
    pub phone: Option<String>,

    /// Date of birth, as `YYYY-MM-DD`.
    #[arg(long)]
    pub birth_date: String,

    /// Gender, either `Male` or `Female`.
    #[arg(long)]
    pub gender: String,

    /// Place of birth.
    #[arg(long)]
    pub birth_place: Option<String>,

    /// Postal address.
    #[arg(long)]
    pub address: Option<String>,

    /// Class to attend.
    #[arg(long)]
    pub class: String,

    /// Field of study.
    #[arg(long)]
    pub field: String,

    /// Date of enrollment, as `YYYY-MM-DD`.
    #[arg(long)]
    pub enrollment_date: String,

    /// Free-form description.
    #[arg(long)]
    pub description: Option<String>,
}

/// Arguments of the [`Command::UpdateProfile`].
#[derive(Debug, Default, clap::Args)]
pub struct ProfileChanges {
    /// New first name.
    #[arg(long)]
    pub first_name: Option<String>,

    /// New last name.
    #[arg(long)]
    pub last_name: Option<String>,

    /// New email address.
    #[arg(long)]
    pub email: Option<String>,

    /// New password.
    #[arg(long)]
    pub password: Option<String>,

    /// New phone number, empty to remove it.
    #[arg(long)]
    pub phone: Option<String>,

    /// New date of birth, as `YYYY-MM-DD`.
    #[arg(long)]
    pub birth_date: Option<String>,

    /// New place of birth, empty to remove it.
    #[arg(long)]
    pub birth_place: Option<String>,

    /// New postal address, empty to remove it.
    #[arg(long)]
    pub address: Option<String>,

    /// New description, empty to remove it.
    #[arg(long)]
    pub description: Option<String>,
}
