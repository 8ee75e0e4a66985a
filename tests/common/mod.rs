//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: [&str; 5] = [
    "Timestamp",
    "Nama Lengkap",
    "Jenjang pendidikan asal",
    "Jenis kelamin",
    "Asal Instansi",
];

/// Eight registrants over three days, plus one row with a broken timestamp.
///
/// - `Jenjang pendidikan asal`: S1 x5, D3 x2, SMA x2
/// - `Jenis kelamin`: Perempuan x5, Laki-laki x4
/// - `Asal Instansi`: UGM x4, UI x3, ITB x2
pub fn registrant_rows() -> Vec<[&'static str; 5]> {
    vec![
        ["2025-01-05 08:10:00", "Ayu", "S1", "Perempuan", "UGM"],
        ["2025-01-05 09:30:00", "Budi", "S1", "Laki-laki", "UI"],
        ["1/5/2025 13:45:12", "Citra", "D3", "Perempuan", "UGM"],
        ["2025-01-06 10:00:00", "Dimas", "SMA", "Laki-laki", "ITB"],
        ["2025-01-06 11:00:00", "Eka", "S1", "Perempuan", "UGM"],
        ["2025-01-07 07:15:00", "Fajar", "D3", "Laki-laki", "UI"],
        ["2025-01-07 08:20:00", "Gita", "S1", "Perempuan", "UI"],
        ["2025-01-07 09:05:00", "Hadi", "S1", "Laki-laki", "ITB"],
        ["belum diisi", "Indah", "SMA", "Perempuan", "UGM"],
    ]
}

/// The fixture rows as a raw, all-text DataFrame.
pub fn create_registrant_dataframe() -> DataFrame {
    let rows = registrant_rows();
    let columns: Vec<Column> = HEADER
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<&str> = rows.iter().map(|row| row[idx]).collect();
            Column::new((*name).into(), values)
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

pub fn write_registrant_csv(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{}", HEADER.join(",")).unwrap();
    for row in registrant_rows() {
        writeln!(file, "{}", row.join(",")).unwrap();
    }
    path
}

pub fn write_registrant_xlsx(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }
    for (row_idx, row) in registrant_rows().iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet
                .write_string(row_idx as u32 + 1, col as u16, *value)
                .unwrap();
        }
    }
    workbook.save(&path).unwrap();
    path
}

/// Same rows as [`write_registrant_xlsx`], but ISO timestamps are stored as
/// native datetime cells the way form exports save them. Unparseable text
/// stays a string cell.
pub fn write_registrant_xlsx_native_dates(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }
    for (row_idx, row) in registrant_rows().iter().enumerate() {
        let row_num = row_idx as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            if col == 0 && value.starts_with("2025-") {
                let datetime = ExcelDateTime::parse_from_str(value).unwrap();
                sheet
                    .write_datetime_with_format(row_num, 0, &datetime, &datetime_format)
                    .unwrap();
            } else {
                sheet.write_string(row_num, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save(&path).unwrap();
    path
}
