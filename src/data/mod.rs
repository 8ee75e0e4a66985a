//! Data module - spreadsheet loading, preprocessing and filtering

mod filter;
mod loader;
mod processor;

pub use filter::{distinct_values, filter_by_membership, filter_rows, FilterOptions, FilterSelection};
pub use loader::{DataLoader, DataSourceError};
pub use processor::{DataProcessor, ProcessorError};

/// Raw registration time as submitted through the form.
pub const COL_TIMESTAMP: &str = "Timestamp";
/// Registration date derived from [`COL_TIMESTAMP`].
pub const COL_REGISTRATION_DATE: &str = "Tanggal Pendaftaran";
/// Education level of the registrant.
pub const COL_EDUCATION: &str = "Jenjang pendidikan asal";
pub const COL_GENDER: &str = "Jenis kelamin";
/// Institution / university of origin.
pub const COL_INSTITUTION: &str = "Asal Instansi";

/// Columns every source file must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_TIMESTAMP, COL_EDUCATION, COL_GENDER, COL_INSTITUTION];
