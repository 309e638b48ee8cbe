pub mod cli;
pub mod convert;
pub mod error;
pub mod insert;
pub mod io_utils;
pub mod record;
pub mod schema;
pub mod value;

use std::sync::OnceLock;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

pub use crate::{
    convert::{ConvertOptions, convert_file, render_outcome},
    error::ConvertError,
    insert::{ConflictPolicy, assemble},
    record::{Record, RecordBatch},
    schema::{ColumnSpec, SqlType},
    value::format_value,
};

static LOGGER: OnceLock<()> = OnceLock::new();

/// Logs go to stderr; `RUST_LOG` overrides the crate-level `info` default.
fn init_logging() {
    LOGGER.get_or_init(|| {
        let env = env_logger::Env::default()
            .default_filter_or(concat!(env!("CARGO_CRATE_NAME"), "=info"));
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp_millis()
            .format_target(false)
            .try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    convert::execute(&cli)
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    char::from(delimiter).escape_default().to_string()
}
