use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use serde::Serialize;
use supplier_qa_spec::ZCode;
use supplier_qa_spec::zcode::{self, MAX_VALUE};

use super::{OutputFormat, print_json};

#[derive(Subcommand, Debug, Clone)]
pub enum ZcodeCommand {
    /// Combine classification codes (L, S, SDB, WOSB, VOSB, SDVOSB) into one value
    Encode(EncodeArgs),
    /// List the classification codes set in a stored value
    Decode(DecodeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    #[arg(required = true, value_name = "CODE")]
    pub codes: Vec<String>,
    /// Fail on unrecognized codes instead of skipping them
    #[arg(long)]
    pub strict: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    #[arg(allow_negative_numbers = true)]
    pub value: i64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ZcodeReport {
    value: i64,
    binary: String,
    codes: Vec<ZCode>,
}

impl ZcodeReport {
    fn new(value: i64) -> Result<Self> {
        let Some(binary) = zcode::format_binary(value) else {
            bail!("z-code value {value} is outside the range 0..={MAX_VALUE}");
        };
        Ok(Self {
            value,
            binary,
            codes: zcode::decode(value),
        })
    }

    fn render(&self) -> String {
        let codes = self
            .codes
            .iter()
            .map(|code| code.code())
            .collect::<Vec<_>>();
        format!("{} ({}) {}\n", self.value, self.binary, codes.join(","))
    }
}

pub fn run(command: ZcodeCommand) -> Result<()> {
    let (report, format) = match command {
        ZcodeCommand::Encode(args) => {
            if args.strict {
                for raw in &args.codes {
                    raw.parse::<ZCode>()?;
                }
            }
            let value = i64::from(zcode::encode(&args.codes));
            (ZcodeReport::new(value)?, args.format)
        }
        ZcodeCommand::Decode(args) => (ZcodeReport::new(args.value)?, args.format),
    };

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print!("{}", report.render());
            Ok(())
        }
    }
}
