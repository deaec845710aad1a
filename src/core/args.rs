use clap::Parser;
use log::kv::{ToValue, Value};

use crate::conf::FailurePolicy;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    #[arg(short, long)]
    pub config: Option<String>,
    /// Overrides `run.on_table_error` from the config.
    #[arg(long, value_enum)]
    pub on_table_error: Option<FailurePolicy>,
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
