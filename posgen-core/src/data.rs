//! Price files — the day-major matrices produced by the evaluation harness.
//!
//! Two layouts are accepted:
//! - whitespace-separated text, one trading day per line, one column per instrument;
//! - comma-separated (`.csv`), same orientation, with an optional header row.
//!
//! Blank lines are skipped. The table is validated into a `PriceHistory`.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::domain::{HistoryError, PriceHistory};

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse CSV {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("{path} line {line}: cannot parse '{token}' as a price")]
    Parse {
        path: String,
        line: usize,
        token: String,
    },
    #[error("{path} contains no prices")]
    Empty { path: String },
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Load a price file, picking the parser from the extension.
pub fn load_price_file(path: &Path) -> Result<PriceHistory, DataError> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let days = if is_csv {
        read_csv_days(path)?
    } else {
        let label = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: label.clone(),
            source,
        })?;
        parse_whitespace_days(&content, &label)?
    };
    Ok(PriceHistory::from_days(&days)?)
}

/// Parse whitespace-separated day rows. `label` names the source in errors.
pub fn parse_whitespace_days(content: &str, label: &str) -> Result<Vec<Vec<f64>>, DataError> {
    let mut days = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let prices = trimmed
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| DataError::Parse {
                    path: label.to_string(),
                    line: idx + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, DataError>>()?;
        days.push(prices);
    }

    if days.is_empty() {
        return Err(DataError::Empty {
            path: label.to_string(),
        });
    }
    Ok(days)
}

fn read_csv_days(path: &Path) -> Result<Vec<Vec<f64>>, DataError> {
    let label = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DataError::Csv {
            path: label.clone(),
            source,
        })?;

    let mut days = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| DataError::Csv {
            path: label.clone(),
            source,
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let parsed: Result<Vec<f64>, &str> = record
            .iter()
            .map(|field| field.parse::<f64>().map_err(|_| field))
            .collect();
        match parsed {
            Ok(prices) => days.push(prices),
            // A non-numeric first row is a header.
            Err(_) if idx == 0 => continue,
            Err(token) => {
                return Err(DataError::Parse {
                    path: label,
                    line: idx + 1,
                    token: token.to_string(),
                })
            }
        }
    }

    if days.is_empty() {
        return Err(DataError::Empty { path: label });
    }
    Ok(days)
}

/// Write a history as a whitespace-separated, day-major price file.
pub fn write_price_file(path: &Path, history: &PriceHistory) -> Result<(), DataError> {
    let io_err = |source| DataError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut file = std::io::BufWriter::new(fs::File::create(path).map_err(io_err)?);
    for day in 0..history.num_days() {
        let line: Vec<String> = (0..history.num_instruments())
            .map(|i| format!("{:.2}", history.series(i)[day]))
            .collect();
        writeln!(file, "{}", line.join(" ")).map_err(io_err)?;
    }
    file.flush().map_err(io_err)
}
