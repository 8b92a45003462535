// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Trajectory serialization.
//!
//! This module writes the recorded series as a CSV table and as a NumPy
//! `.npy` array holding the same rows x 9 matrix.

use crate::error::Result;
use crate::models::sample::{Sample, COLUMNS};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default name of the position table.
pub const DEFAULT_TABLE_NAME: &str = "positions.csv";

/// Result of a save request.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The series was empty; no file was touched.
    NothingToSave,
    Saved {
        table: PathBuf,
        array: PathBuf,
        rows: usize,
    },
}

/// Path of the raw array written next to `table`.
pub fn array_path(table: &Path) -> PathBuf {
    table.with_extension("npy")
}

/// Write `series` to `table` and to its `.npy` sibling.
///
/// The table is written first. If the array write then fails, the table
/// stays on disk.
pub fn write(series: &[Sample], table: &Path) -> Result<SaveOutcome> {
    if series.is_empty() {
        log::info!("Nothing to save");
        return Ok(SaveOutcome::NothingToSave);
    }

    export_csv(series, table)?;
    log::info!("Positions saved to {}", table.display());
    log::info!("Shape: ({}, {})", series.len(), COLUMNS);
    log::info!("Format: [time(s), center_x, center_y, t1(rad), m1_x, m1_y, t2(rad), m2_x, m2_y]");

    let array = array_path(table);
    export_npy(series, &array)?;
    log::info!("Also saved to {}", array.display());

    Ok(SaveOutcome::Saved {
        table: table.to_path_buf(),
        array,
        rows: series.len(),
    })
}

/// Export the series as a CSV table with a header row.
pub fn export_csv(series: &[Sample], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for sample in series {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(())
}

/// Export the series as a little-endian float64 `.npy` array (format 1.0).
pub fn export_npy(series: &[Sample], path: &Path) -> Result<()> {
    let mut bytes = npy_header(series.len());
    bytes.reserve(series.len() * COLUMNS * 8);
    for sample in series {
        for value in sample.to_row() {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }

    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    file.flush()?;
    Ok(())
}

fn npy_header(rows: usize) -> Vec<u8> {
    const MAGIC: &[u8] = b"\x93NUMPY\x01\x00";
    // magic + version + u16 header length
    const PREAMBLE: usize = MAGIC.len() + 2;

    let mut dict = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({}, {}), }}",
        rows, COLUMNS
    );
    // data must start on a 64-byte boundary, header ends with a newline
    let padding = (64 - (PREAMBLE + dict.len() + 1) % 64) % 64;
    dict.push_str(&" ".repeat(padding));
    dict.push('\n');

    let mut header = Vec::with_capacity(PREAMBLE + dict.len());
    header.extend_from_slice(MAGIC);
    header.extend_from_slice(&(dict.len() as u16).to_le_bytes());
    header.extend_from_slice(dict.as_bytes());
    header
}
