use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{IngestError, RowIssue};
use crate::sample::Sample;
use crate::units::TimeUnit;

/// A row dropped during ingestion, with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRow {
    pub line: u64,
    pub issue: RowIssue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingested {
    /// Parsed samples in file order.
    pub samples: Vec<Sample>,
    pub skipped: Vec<MalformedRow>,
}

/// Parses a CSV file using mmap.
pub fn read_file(path: &Path, unit: TimeUnit) -> Result<Ingested, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    // Zero-length files cannot be mapped on every platform
    let len = file
        .metadata()
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if len == 0 {
        return Ok(Ingested::default());
    }

    // SAFETY: the map is read-only and dropped before returning; concurrent
    // truncation of the input by another process is not supported.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| IngestError::Map {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = mmap.len(), "mapped input file");
    read_reader(&mmap[..], unit)
}

/// Parses CSV rows from any reader (stdin, in-memory bytes).
///
/// The first row is a header. Time is the first column and the observed value
/// the last. Rows that cannot be parsed are skipped and reported, not fatal.
pub fn read_reader<R: Read>(reader: R, unit: TimeUnit) -> Result<Ingested, IngestError> {
    let scale = unit.scale();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut ingested = Ingested::default();
    let mut record = csv::StringRecord::new();

    loop {
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                match parse_record(&record, scale) {
                    Ok(sample) => ingested.samples.push(sample),
                    Err(issue) => skip(&mut ingested, line, issue),
                }
            }
            Err(e) => {
                if let csv::ErrorKind::Io(_) = e.kind() {
                    return Err(IngestError::Read(e.into()));
                }
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                let issue = RowIssue::Unreadable {
                    reason: e.to_string(),
                };
                skip(&mut ingested, line, issue);
            }
        }
    }

    debug!(
        samples = ingested.samples.len(),
        skipped = ingested.skipped.len(),
        "finished reading rows"
    );
    Ok(ingested)
}

fn skip(ingested: &mut Ingested, line: u64, issue: RowIssue) {
    warn!(line, %issue, "skipping row");
    ingested.skipped.push(MalformedRow { line, issue });
}

fn parse_record(record: &csv::StringRecord, scale: f64) -> Result<Sample, RowIssue> {
    let found = record.len();
    if found < 2 {
        return Err(RowIssue::TooFewColumns { found });
    }

    let t = parse_field(&record[0])?;
    let v = parse_field(&record[found - 1])?;
    Ok(Sample::new(t * scale, v))
}

fn parse_field(field: &str) -> Result<f64, RowIssue> {
    let value: f64 = field.parse().map_err(|_| RowIssue::NotNumeric {
        field: field.to_string(),
    })?;
    if !value.is_finite() {
        return Err(RowIssue::NonFinite {
            field: field.to_string(),
        });
    }
    Ok(value)
}
