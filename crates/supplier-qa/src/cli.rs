use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{
    self, evaluate::EvaluateArgs, lint::LintArgs, parse::ParseArgs, schema::SchemaArgs,
    zcode::ZcodeCommand,
};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "SUPPLIER_QA_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "supplier-qa",
    about = "Tooling for supplier qualification questionnaires",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Log engine decisions at debug level
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse an encoded response spec and print its structure
    Parse(ParseArgs),
    /// Encode or decode supplier classification z-codes
    #[command(subcommand)]
    Zcode(ZcodeCommand),
    /// Report authoring issues in a questionnaire file
    Lint(LintArgs),
    /// Evaluate answers against a questionnaire
    Evaluate(EvaluateArgs),
    /// Print the JSON schema of the questionnaire file format
    Schema(SchemaArgs),
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());
    match cli.command {
        Commands::Parse(args) => cmd::parse::run(args),
        Commands::Zcode(command) => cmd::zcode::run(command),
        Commands::Lint(args) => cmd::lint::run(args),
        Commands::Evaluate(args) => cmd::evaluate::run(args),
        Commands::Schema(args) => cmd::schema::run(args),
    }
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded in another binary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
