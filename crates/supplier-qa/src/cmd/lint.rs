use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use supplier_qa_spec::lint;

use super::{OutputFormat, load_questionnaire, print_json};

#[derive(Args, Debug, Clone)]
pub struct LintArgs {
    /// Questionnaire file (.json or .toml)
    #[arg(long, short = 'Q', value_name = "PATH")]
    pub questionnaire: PathBuf,
    /// Exit with an error when any issue is found
    #[arg(long)]
    pub strict: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: LintArgs) -> Result<()> {
    let questionnaire = load_questionnaire(&args.questionnaire)?;
    let issues = lint(&questionnaire);

    match args.format {
        OutputFormat::Json => print_json(&issues)?,
        OutputFormat::Text if issues.is_empty() => {
            println!("{}: no issues", args.questionnaire.display());
        }
        OutputFormat::Text => {
            for issue in &issues {
                println!("{issue}");
            }
        }
    }

    if args.strict && !issues.is_empty() {
        bail!(
            "lint: {} issue(s) treated as errors (--strict)",
            issues.len()
        );
    }
    Ok(())
}
