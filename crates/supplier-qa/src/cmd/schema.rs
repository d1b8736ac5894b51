use anyhow::Result;
use clap::Args;
use supplier_qa_spec::questionnaire_schema;

use super::print_json;

#[derive(Args, Debug, Clone, Default)]
pub struct SchemaArgs {}

pub fn run(_args: SchemaArgs) -> Result<()> {
    print_json(&questionnaire_schema())
}
