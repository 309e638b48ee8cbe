use std::path::PathBuf;

use clap::Parser;

const AFTER_HELP: &str = "\
Examples:
  # Basic conversion
  csv-to-sql customers.csv customers \"client_name,branch,sku\"

  # With output file
  csv-to-sql customers.csv customers \"client_name,branch,sku\" -o customers_import.sql

  # With column types
  csv-to-sql transactions.csv sales_transactions \"amount,quantity,transaction_date\" \\
      --types \"amount:decimal,quantity:integer,transaction_date:date\"";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Convert CSV files to SQL INSERT statements",
    long_about = None,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Input CSV file ('-' reads stdin)
    pub input: PathBuf,
    /// Target database table name
    pub table: String,
    /// Comma-separated list of output column names, in output order
    pub columns: String,
    /// Output SQL file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Column types as `col1:type1,col2:type2` (text, integer, decimal, date, boolean)
    #[arg(long = "types")]
    pub types: Option<String>,
    /// YAML file declaring column types; --types entries take precedence
    #[arg(short = 's', long = "schema")]
    pub schema: Option<PathBuf>,
    /// Do not add an ON CONFLICT clause
    #[arg(long = "no-conflict")]
    pub no_conflict: bool,
    /// Columns for the ON CONFLICT target (comma-separated); enables DO UPDATE
    #[arg(long = "conflict-cols")]
    pub conflict_cols: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

const DELIMITER_ALIASES: &[(&str, u8)] = &[
    ("tab", b'\t'),
    ("comma", b','),
    ("pipe", b'|'),
    ("semicolon", b';'),
];

/// Accepts a named alias or any single ASCII character.
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    if let Some((_, byte)) = DELIMITER_ALIASES
        .iter()
        .find(|(alias, _)| value.eq_ignore_ascii_case(alias))
    {
        return Ok(*byte);
    }
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        [] => Err("Delimiter cannot be empty".to_string()),
        _ if value.chars().count() == 1 => Err(format!("Delimiter '{value}' is not ASCII")),
        _ => Err(format!(
            "Delimiter '{value}' must be a single character or one of: tab, comma, pipe, semicolon"
        )),
    }
}
