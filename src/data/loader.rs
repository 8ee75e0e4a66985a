//! Spreadsheet Data Loader Module
//! Reads the registrant spreadsheet into a Polars DataFrame, once per path.

use super::REQUIRED_COLUMNS;
use crate::config::DEFAULT_SOURCE_PATH;
use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Unsupported file format: {0:?}. Supported formats: xlsx, xlsm, xls, ods, csv")]
    UnsupportedFormat(String),
    #[error("Spreadsheet has no worksheets")]
    NoSheets,
    #[error("Spreadsheet has no header row")]
    Empty,
    #[error("Required column {0:?} not found")]
    MissingColumn(String),
}

/// Loaded tables, keyed by source path. Entries live for the whole process.
static TABLE_CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<DataFrame>>>> = OnceLock::new();

fn table_cache() -> &'static Mutex<HashMap<PathBuf, Arc<DataFrame>>> {
    TABLE_CACHE.get_or_init(Default::default)
}

/// Handles spreadsheet loading with a process-wide memo.
pub struct DataLoader;

impl DataLoader {
    /// Load the dashboard's fixed source file.
    ///
    /// Shorthand for `load_from(DEFAULT_SOURCE_PATH)`. The GUI goes through
    /// `load_from` with `DashboardConfig::source_path`, which defaults to the
    /// same path, so both share one cache entry.
    pub fn load() -> Result<Arc<DataFrame>, DataSourceError> {
        Self::load_from(DEFAULT_SOURCE_PATH)
    }

    /// Load a source file, reading it only on the first successful call.
    ///
    /// Later calls with the same path return the same `Arc`, so callers can
    /// rely on pointer identity. Failed reads are not remembered.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Arc<DataFrame>, DataSourceError> {
        let path = path.as_ref();
        // The lock is held across the read so a path is never read twice.
        let mut cache = table_cache()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(df) = cache.get(path) {
            debug!("Using cached table for {}", path.display());
            return Ok(Arc::clone(df));
        }

        let df = Arc::new(Self::read_source(path)?);
        info!(
            "Loaded {}: {} rows, {} columns",
            path.display(),
            df.height(),
            df.width()
        );
        cache.insert(path.to_path_buf(), Arc::clone(&df));
        Ok(df)
    }

    /// Whether `path` has already been loaded in this process.
    pub fn is_cached(path: impl AsRef<Path>) -> bool {
        table_cache()
            .lock()
            .map(|cache| cache.contains_key(path.as_ref()))
            .unwrap_or(false)
    }

    /// Read a source file without touching the cache.
    pub fn read_source(path: &Path) -> Result<DataFrame, DataSourceError> {
        match std::fs::metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataSourceError::NotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(DataSourceError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let df = match extension.as_str() {
            "xlsx" | "xlsm" | "xls" | "ods" => Self::read_spreadsheet(path)?,
            "csv" => Self::read_csv(path)?,
            _ => return Err(DataSourceError::UnsupportedFormat(extension)),
        };

        Self::validate_columns(&df)?;
        Ok(df)
    }

    /// Read the first worksheet; the first row is the header.
    fn read_spreadsheet(path: &Path) -> Result<DataFrame, DataSourceError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(DataSourceError::NoSheets)??;

        let mut rows = range.rows();
        let header = rows.next().ok_or(DataSourceError::Empty)?;
        let names = Self::header_names(header);

        let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for row in rows {
            for (idx, column) in values.iter_mut().enumerate() {
                column.push(row.get(idx).and_then(Self::cell_to_string));
            }
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(values)
            .map(|(name, column)| Column::new(name.into(), column))
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    /// Read a CSV file with every column kept as text.
    fn read_csv(path: &Path) -> Result<DataFrame, DataSourceError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Header cells as unique, non-empty column names.
    fn header_names(header: &[Data]) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        header
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let base = match Self::cell_to_string(cell) {
                    Some(name) => name.trim().to_string(),
                    None => format!("column_{}", idx + 1),
                };
                let mut name = base.clone();
                let mut suffix = 1;
                while !seen.insert(name.clone()) {
                    name = format!("{}_{}", base, suffix);
                    suffix += 1;
                }
                name
            })
            .collect()
    }

    /// Convert a spreadsheet cell to text; blanks and error cells are missing.
    fn cell_to_string(cell: &Data) -> Option<String> {
        match cell {
            Data::Empty | Data::Error(_) => None,
            Data::String(s) if s.is_empty() => None,
            Data::String(s) => Some(s.clone()),
            Data::Int(i) => Some(i.to_string()),
            Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
            Data::Float(f) => Some(f.to_string()),
            Data::Bool(b) => Some(b.to_string()),
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        }
    }

    fn validate_columns(df: &DataFrame) -> Result<(), DataSourceError> {
        for name in REQUIRED_COLUMNS {
            if df.get_column_index(name).is_none() {
                return Err(DataSourceError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = DataLoader::load_from("/definitely/not/here.xlsx").unwrap_err();
        assert!(matches!(err, DataSourceError::NotFound(_)));
    }

    #[test]
    fn test_load_reads_default_source_path() {
        // The source workbook is not shipped with the crate.
        match DataLoader::load() {
            Err(DataSourceError::NotFound(path)) => {
                assert_eq!(path, PathBuf::from(DEFAULT_SOURCE_PATH))
            }
            other => panic!("Expected NotFound, got {:?}", other.map(|df| df.shape())),
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "data.txt", &["a,b"]);
        let err = DataLoader::read_source(&path).unwrap_err();
        assert!(matches!(err, DataSourceError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn test_csv_columns_are_text() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "data.csv",
            &[
                "Timestamp,Jenjang pendidikan asal,Jenis kelamin,Asal Instansi,Umur",
                "2025-01-15 10:30:00,S1,Perempuan,UI,21",
                "2025-01-16 08:00:00,S2,Laki-laki,ITB,25",
            ],
        );

        let df = DataLoader::read_source(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Umur").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_missing_required_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "data.csv",
            &["Timestamp,Jenis kelamin,Asal Instansi", "2025-01-15,Perempuan,UI"],
        );

        let err = DataLoader::read_source(&path).unwrap_err();
        assert!(
            matches!(err, DataSourceError::MissingColumn(ref col) if col == "Jenjang pendidikan asal")
        );
    }

    #[test]
    fn test_header_names_are_unique() {
        let header = vec![
            Data::String("Nama".to_string()),
            Data::Empty,
            Data::String("Nama".to_string()),
        ];
        assert_eq!(
            DataLoader::header_names(&header),
            vec!["Nama", "column_2", "Nama_1"]
        );
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(DataLoader::cell_to_string(&Data::Empty), None);
        assert_eq!(DataLoader::cell_to_string(&Data::String(String::new())), None);
        assert_eq!(DataLoader::cell_to_string(&Data::Float(3.0)), Some("3".to_string()));
        assert_eq!(DataLoader::cell_to_string(&Data::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(DataLoader::cell_to_string(&Data::Int(7)), Some("7".to_string()));
        assert_eq!(
            DataLoader::cell_to_string(&Data::Bool(true)),
            Some("true".to_string())
        );
    }
}
