use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

use crate::core::ExtractError;

/// Writes the header record followed by every row. Fields are quoted only
/// when they contain a delimiter, quote or line break. A blank header with
/// no rows produces zero bytes.
pub fn encode_csv(header: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>, ExtractError> {
    if header.is_empty() && rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = WriterBuilder::new()
        .flexible(true)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if !header.is_empty() {
        writer.write_record(header)?;
    }
    for row in rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExtractError::CsvError(format!("flushing csv buffer: {}", e.error())))
}

/// Reads every record, the header included, as rows of text fields.
pub fn decode_csv(data: &[u8]) -> Result<Vec<Vec<String>>, ExtractError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(records)
}
