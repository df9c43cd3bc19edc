use crate::error::{JsonStatError, Result};
use crate::table::Table;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::io::Write;
use std::str::FromStr;

/// Output encodings for tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = JsonStatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "jsonl" | "ndjson" | "json-lines" => Ok(OutputFormat::JsonLines),
            other => Err(JsonStatError::UnknownFormat(other.to_string())),
        }
    }
}

/// Write `table` to `writer` in the given format; returns the number of
/// data rows written
pub fn write_table<W: Write>(
    table: &Table,
    writer: W,
    format: OutputFormat,
    header: bool,
) -> Result<usize> {
    match format {
        OutputFormat::Csv => {
            let mut csv = TableWriter::new(writer, header);
            let count = csv.write_table(table)?;
            csv.flush()?;
            Ok(count)
        }
        OutputFormat::JsonLines => {
            let mut jsonl = JsonLinesWriter::new(writer);
            let count = jsonl.write_table(table)?;
            jsonl.flush()?;
            Ok(count)
        }
    }
}

/// Writes tables as comma separated values
pub struct TableWriter<W: Write> {
    writer: csv::Writer<W>,
    header: bool,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W, header: bool) -> Self {
        TableWriter {
            writer: csv::WriterBuilder::new().from_writer(writer),
            header,
        }
    }

    /// Write the header (if enabled) and every row of `table`
    pub fn write_table(&mut self, table: &Table) -> Result<usize> {
        if self.header {
            self.writer.write_record(&table.header)?;
        }
        for row in &table.rows {
            self.writer.write_record(row.record(table.with_status))?;
        }
        Ok(table.rows.len())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes one JSON object per table row, keyed by the header
pub struct JsonLinesWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesWriter { writer }
    }

    /// Fails with `DuplicateColumn` when two header fields are equal
    pub fn write_table(&mut self, table: &Table) -> Result<usize> {
        let mut seen = HashSet::with_capacity(table.header.len());
        if let Some(name) = table.header.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(JsonStatError::DuplicateColumn(name.to_string()));
        }

        let dimension_columns = table.header.len() - 1 - usize::from(table.with_status);
        for row in &table.rows {
            let mut object = Map::new();
            for (name, field) in table.header[..dimension_columns].iter().zip(&row.fields) {
                object.insert(name.clone(), Value::String(field.clone()));
            }
            object.insert(
                table.header[dimension_columns].clone(),
                row.value.map_or(Value::Null, Value::from),
            );
            if table.with_status {
                object.insert(
                    table.header[dimension_columns + 1].clone(),
                    row.status.clone().map_or(Value::Null, Value::String),
                );
            }

            serde_json::to_writer(&mut self.writer, &object)?;
            writeln!(self.writer)?;
        }
        Ok(table.rows.len())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
