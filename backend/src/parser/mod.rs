//! Delimited row source.
//!
//! Turns a header-first, delimiter-separated file into a lazy sequence of
//! [`RawRow`]s. No pricat-specific logic here.
//!
//! The reader owns the underlying handle: it is released when the iterator is
//! exhausted or dropped, including after an error.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{CsvError, CsvResult};
use crate::models::{Columns, RawRow};

/// Default field delimiter for pricat and mapping files.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Lazy, single-pass reader over the data rows of a delimited source.
pub struct RowReader<R: Read> {
    headers: Vec<String>,
    columns: Arc<Columns>,
    /// Record index feeding each column. A repeated header keeps its first
    /// position and takes its value from the last occurrence.
    sources: Vec<usize>,
    records: csv::StringRecordsIntoIter<R>,
}

impl RowReader<File> {
    /// Open a file and read its header line.
    ///
    /// # Example
    /// ```ignore
    /// use pricat::parser::RowReader;
    ///
    /// for row in RowReader::from_path("pricat.csv", b';')? {
    ///     let row = row?;
    ///     println!("{}", row.value("article_number"));
    /// }
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> CsvResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CsvError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CsvError::Io(e)
            }
        })?;
        Self::from_reader(file, delimiter, path.display().to_string())
    }
}

impl<R: Read> RowReader<R> {
    /// Wrap any reader. `source_name` is only used in error messages.
    pub fn from_reader(reader: R, delimiter: u8, source_name: impl Into<String>) -> CsvResult<Self> {
        let source_name = source_name.into();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(from_csv_error)?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(CsvError::NoHeaders { source_name });
        }

        let mut columns = Columns::new();
        let mut sources = Vec::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            let position = columns.push(header.as_str());
            if position == sources.len() {
                sources.push(i);
            } else {
                sources[position] = i;
            }
        }

        debug!(source = %source_name, columns = columns.len(), "read header line");

        Ok(Self {
            headers,
            columns: Arc::new(columns),
            sources,
            records: rdr.into_records(),
        })
    }

    /// Column names from the header line.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = CsvResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(from_csv_error(e))),
        };

        // Short lines yield empty strings; values past the last header are dropped.
        let values = self
            .sources
            .iter()
            .map(|&i| record.get(i).unwrap_or("").to_string())
            .collect();
        Some(Ok(RawRow::from_parts(Arc::clone(&self.columns), values)))
    }
}

fn from_csv_error(e: csv::Error) -> CsvError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    let message = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(io) => CsvError::Io(io),
        _ => CsvError::Parse { line, message },
    }
}

/// Read every row of an in-memory string. Convenience for tests and small inputs.
pub fn parse_str(content: &str, delimiter: u8) -> CsvResult<Vec<RawRow>> {
    RowReader::from_reader(content.as_bytes(), delimiter, "<memory>")?.collect()
}
