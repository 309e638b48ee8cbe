//! End-to-end conversion: read the input, assemble SQL, deliver the text.
//!
//! A conversion either yields the full statement or an error; there is no
//! partial output. At the command-line boundary the error is rendered as
//! `Error: <message>` and delivered in place of the SQL, which means a
//! requested output file receives the error text. That behaviour is kept
//! for compatibility and announced with a warning.

use std::path::Path;

use anyhow::Result;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info, warn};

use crate::{
    cli::Cli,
    error::ConvertError,
    insert::{self, ConflictPolicy},
    io_utils,
    record::RecordBatch,
    schema::{self, ColumnSpec, SchemaFile, TypeMap},
};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub table: String,
    pub columns: Vec<ColumnSpec>,
    pub conflict: ConflictPolicy,
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl ConvertOptions {
    pub fn new(
        table: impl Into<String>,
        columns: Vec<ColumnSpec>,
        conflict: ConflictPolicy,
    ) -> Self {
        Self {
            table: table.into(),
            columns,
            conflict,
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }

    pub fn from_cli(args: &Cli) -> Result<Self> {
        let mut types = match &args.schema {
            Some(path) => SchemaFile::load(path)?.type_map(),
            None => TypeMap::new(),
        };
        if let Some(spec) = &args.types {
            types.extend_from_spec(spec)?;
        }
        let columns = schema::column_specs(&args.columns, &types)?;
        if args.no_conflict && args.conflict_cols.is_some() {
            debug!("--no-conflict set; ignoring --conflict-cols");
        }
        let conflict =
            ConflictPolicy::from_options(args.no_conflict, args.conflict_cols.as_deref());
        Ok(Self {
            table: args.table.trim().to_string(),
            columns,
            conflict,
            delimiter: io_utils::resolve_input_delimiter(&args.input, args.delimiter),
            encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        })
    }
}

/// Reads every record of the input into memory.
pub fn read_batch(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<RecordBatch, ConvertError> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let mut batch = RecordBatch::new(headers);
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        batch.push(io_utils::decode_record(&record, encoding)?);
    }
    Ok(batch)
}

pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<String, ConvertError> {
    let batch = read_batch(path, options.delimiter, options.encoding)?;
    debug!(
        "Read {} row(s) with headers {:?} from {:?}",
        batch.len(),
        batch.headers(),
        path
    );
    Ok(insert::assemble(
        &batch,
        &path.display().to_string(),
        &options.table,
        &options.columns,
        &options.conflict,
    ))
}

/// Collapses a conversion outcome into the text delivered to the caller.
pub fn render_outcome(outcome: &Result<String, ConvertError>) -> String {
    match outcome {
        Ok(sql) => sql.clone(),
        Err(err) => format!("Error: {err}"),
    }
}

pub fn execute(args: &Cli) -> Result<()> {
    let options = ConvertOptions::from_cli(args)?;
    info!(
        "Converting '{}' into INSERT statements for table '{}' (delimiter '{}')",
        args.input.display(),
        options.table,
        crate::printable_delimiter(options.delimiter)
    );
    debug!("Output columns: {:?}", options.columns);
    debug!("Conflict policy: {}", options.conflict.describe());

    let outcome = convert_file(&args.input, &options);
    let text = render_outcome(&outcome);

    match args.output.as_deref().filter(|path| !io_utils::is_dash(path)) {
        Some(path) => {
            io_utils::write_text_file(path, &text)?;
            match &outcome {
                Ok(_) => {
                    io_utils::write_stdout_line(&format!("SQL written to {}", path.display()))?;
                    info!("Wrote INSERT statement to {path:?}");
                }
                Err(_) => warn!(
                    "Conversion failed; error text was written to {path:?} in place of SQL"
                ),
            }
        }
        None => io_utils::write_stdout_line(&text)?,
    }

    outcome.map(|_| ()).map_err(anyhow::Error::from)
}
