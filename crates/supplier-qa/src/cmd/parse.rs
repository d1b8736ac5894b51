use anyhow::{Context, Result};
use clap::Args;
use supplier_qa_spec::{ResponseKind, ResponseSpec};

use super::{OutputFormat, print_json};

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Encoded response string, e.g. `Y/N` or `DROPDOWN:Level 1(AA);Level 2(AB)`
    pub encoded: String,
    /// Fail instead of falling back to a free-text response
    #[arg(long)]
    pub strict: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: ParseArgs) -> Result<()> {
    let spec = if args.strict {
        ResponseSpec::try_parse(&args.encoded)
            .with_context(|| format!("failed to parse response spec '{}'", args.encoded))?
    } else {
        ResponseSpec::parse(&args.encoded)
    };

    match args.format {
        OutputFormat::Json => print_json(&spec),
        OutputFormat::Text => {
            print!("{}", render(&spec));
            Ok(())
        }
    }
}

fn render(spec: &ResponseSpec) -> String {
    let mut out = format!("kind: {:?}\ncanonical: {spec}\n", spec.kind);
    if let Some(length) = spec.length {
        out.push_str(&format!("length: {length}\n"));
    }
    for option in &spec.options {
        match (spec.kind, option.weight()) {
            (ResponseKind::MultiSelectBitmask, Some(weight)) => out.push_str(&format!(
                "option: {} [{}] weight={weight}\n",
                option.label,
                option.description.as_deref().unwrap_or_default()
            )),
            _ => out.push_str(&format!("option: {} ({})\n", option.label, option.code)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_dropdown_options() {
        let spec = ResponseSpec::parse("DROPDOWN:Level 1(AA);Level 2(AB)");
        let text = render(&spec);
        assert!(text.contains("kind: Dropdown"));
        assert!(text.contains("option: Level 2 (AB)"));
    }

    #[test]
    fn renders_bit_weights() {
        let spec = ResponseSpec::parse("List2List:ISO 9001|Quality|0;AS9100|Aerospace|2");
        let text = render(&spec);
        assert!(text.contains("option: AS9100 [Aerospace] weight=4"));
    }
}
