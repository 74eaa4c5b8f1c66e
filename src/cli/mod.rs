//! Ahana CLI
//!
//! Command-line access to the same backend the portal uses:
//! - Sign in, out, and through the password-reset wizard
//! - Browse and edit students, assessments, infirmary visits and inventory
//! - Export infirmary reports as CSV

mod commands;
mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use output::OutputFormat;

pub use context::Context;

#[derive(Parser)]
#[command(name = "ahana")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "School nurse portal: students, assessments, infirmary and inventory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and AHANA_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: standard locations)
    #[arg(long = "config-file", global = true)]
    pub config_file: Option<PathBuf>,

    /// Output format (table, json, csv)
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        /// Password (default: AHANA_PASSWORD or prompt)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show the signed-in nurse
    Whoami,

    /// Password reset
    Password {
        #[command(subcommand)]
        command: PasswordCommand,
    },

    /// Dashboard counts
    Stats,

    /// Student roster
    Students {
        #[command(subcommand)]
        command: StudentCommand,
    },

    /// Health assessments
    Assessments {
        #[command(subcommand)]
        command: AssessmentCommand,
    },

    /// Infirmary visits
    Infirmary {
        #[command(subcommand)]
        command: InfirmaryCommand,
    },

    /// Medicine inventory
    Inventory {
        #[command(subcommand)]
        command: InventoryCommand,
    },

    /// Nurse profiles
    Nurses {
        #[command(subcommand)]
        command: NurseCommand,
    },

    /// Infirmary report
    Reports(ReportArgs),

    /// Upload an image and print its URL
    Upload {
        path: PathBuf,
    },

    /// Look up a 6-digit PIN code
    Pincode {
        pin: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum PasswordCommand {
    /// Step 1: email a temporary password
    Forgot {
        #[arg(short, long)]
        email: String,
    },
    /// Step 2: verify the temporary password
    Verify {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        temp_password: String,
    },
    /// Step 3: set the new password
    Set {
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        confirm: String,
        /// Token to use instead of the one kept by `verify` or `login`
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = crate::listing::DEFAULT_PAGE_SIZE)]
    pub limit: u32,
    /// Keep fetching pages until a short one comes back
    #[arg(long)]
    pub all: bool,
}

#[derive(Subcommand)]
pub enum StudentCommand {
    List {
        /// Server-side search
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        section: Option<String>,
        /// Only show rows whose name, id or mobile contains this text
        #[arg(long = "match")]
        matching: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Show {
        id: String,
    },
    Add(StudentArgs),
    Update {
        id: String,
        #[command(flatten)]
        fields: StudentArgs,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct StudentArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub dob: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub mobile: Option<String>,
    #[arg(long)]
    pub alternate_mobile: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub class: Option<String>,
    #[arg(long)]
    pub section: Option<String>,
    #[arg(long)]
    pub blood_group: Option<String>,
    #[arg(long)]
    pub guardian_name: Option<String>,
    #[arg(long)]
    pub guardian_mobile: Option<String>,
    #[arg(long)]
    pub guardian_relation: Option<String>,
    #[arg(long)]
    pub height_ft: Option<String>,
    #[arg(long)]
    pub weight_kg: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Fills region and state from the PIN lookup
    #[arg(long)]
    pub pin_code: Option<String>,
    #[arg(long)]
    pub landmark: Option<String>,
    #[arg(long)]
    pub profile_pic: Option<String>,
}

#[derive(Subcommand)]
pub enum AssessmentCommand {
    List {
        #[arg(long)]
        student: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        section: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Show {
        id: String,
    },
    Add(AssessmentArgs),
    Delete {
        id: String,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct AssessmentArgs {
    /// Student record id
    #[arg(long)]
    pub student: String,
    /// YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub parent_name: Option<String>,
    /// Centimetres
    #[arg(long)]
    pub height: String,
    /// Kilograms
    #[arg(long)]
    pub weight: String,
    /// Derived from height and weight when omitted
    #[arg(long)]
    pub bmi: Option<String>,
    /// Fahrenheit
    #[arg(long)]
    pub temperature: String,
    #[arg(long)]
    pub pulse_rate: String,
    #[arg(long)]
    pub spo2: String,
    /// e.g. 110/70
    #[arg(long)]
    pub bp: Option<String>,
    #[arg(long)]
    pub oral_health: Option<String>,
    #[arg(long)]
    pub dental_issues: Option<String>,
    #[arg(long)]
    pub left_eye: Option<String>,
    #[arg(long)]
    pub right_eye: Option<String>,
    #[arg(long)]
    pub hearing: Option<String>,
    #[arg(long)]
    pub comments: Option<String>,
}

#[derive(Subcommand)]
pub enum InfirmaryCommand {
    List {
        #[arg(long)]
        student: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Show {
        id: String,
    },
    Add(InfirmaryArgs),
    Delete {
        id: String,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct InfirmaryArgs {
    /// Student record id
    #[arg(long)]
    pub student: String,
    /// Parent, Guardian, Teacher or School Authority
    #[arg(long)]
    pub consent: String,
    /// Fever, Headache, Stomach Pain, Nausea or Others
    #[arg(long)]
    pub complaint: String,
    /// Complaint text when --complaint is Others
    #[arg(long)]
    pub other: Option<String>,
    #[arg(long)]
    pub details: Option<String>,
    #[arg(long)]
    pub treatment: Option<String>,
    /// Inventory item id of the medicine given
    #[arg(long)]
    pub tablet: Option<String>,
    #[arg(long)]
    pub quantity: Option<String>,
    /// YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// HH:MM (default: now)
    #[arg(long)]
    pub time: Option<String>,
}

#[derive(Subcommand)]
pub enum InventoryCommand {
    List {
        #[arg(short, long)]
        search: Option<String>,
        /// in_stock, low_stock or out_of_stock
        #[arg(long)]
        status: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        expiring_before: Option<String>,
    },
    Show {
        id: String,
    },
    Add(InventoryArgs),
    Update {
        id: String,
        #[command(flatten)]
        fields: InventoryArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct InventoryArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub stock: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub expiry: Option<String>,
    /// Default: tablets
    #[arg(long)]
    pub unit: Option<String>,
}

#[derive(Subcommand)]
pub enum NurseCommand {
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Show {
        id: String,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ReportArgs {
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub class: Option<String>,
    #[arg(long)]
    pub section: Option<String>,
    /// Member id shown on the student card
    #[arg(long)]
    pub student_id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,
    /// Write CSV here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Entry point for the `ahana` binary
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_from(cli.config_file.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    crate::logging::init(&config.logging)?;

    // One request at a time; a current-thread runtime is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(commands::dispatch(cli, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nested_commands() {
        let cli = Cli::parse_from([
            "ahana", "--format", "json", "students", "list", "--class", "5", "--all",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Students {
                command: StudentCommand::List { class, paging, .. },
            } => {
                assert_eq!(class.as_deref(), Some("5"));
                assert!(paging.all);
                assert_eq!(paging.limit, 10);
            }
            _ => panic!("wrong command"),
        }

        let cli = Cli::parse_from(["ahana", "inventory", "delete", "i1", "--yes"]);
        assert!(cli.yes);
    }
}
