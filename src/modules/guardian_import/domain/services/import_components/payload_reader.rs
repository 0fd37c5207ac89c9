use csv::ReaderBuilder;

use crate::log_debug;
use crate::modules::guardian_import::domain::entities::{FieldCell, GuardianColumn, ImportRow};
use crate::shared::config::ImportSettings;
use crate::shared::errors::{AppError, AppResult};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub const ERR_EMPTY_FILE: &str = "emptyFile";
pub const ERR_INVALID_MAX_SIZE_FILE: &str = "invalidMaxSizeFile";
pub const ERR_INVALID_NUMBER_ROW: &str = "invalidNumberRow";

/// Decodes an uploaded CSV payload into rows keyed by template column
#[derive(Debug, Clone)]
pub struct PayloadReader {
    max_payload_bytes: usize,
    max_rows: usize,
}

impl PayloadReader {
    pub fn new(settings: &ImportSettings) -> Self {
        Self {
            max_payload_bytes: settings.max_payload_bytes,
            max_rows: settings.max_rows,
        }
    }

    /// Reject oversized or empty payloads, then decode every data row.
    ///
    /// The `username` column belongs to the username-login template variant
    /// and is ignored unless `username_login_enabled` is set.
    pub fn read(&self, payload: &[u8], username_login_enabled: bool) -> AppResult<Vec<ImportRow>> {
        if payload.len() > self.max_payload_bytes {
            return Err(AppError::InvalidInput(ERR_INVALID_MAX_SIZE_FILE.to_string()));
        }

        let data = strip_utf8_bom(payload);
        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::InvalidInput(ERR_EMPTY_FILE.to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let columns: Vec<Option<GuardianColumn>> = reader
            .headers()?
            .iter()
            .map(|header| {
                GuardianColumn::from_header(header).filter(|column| {
                    username_login_enabled || *column != GuardianColumn::Username
                })
            })
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if rows.len() == self.max_rows {
                return Err(AppError::InvalidInput(ERR_INVALID_NUMBER_ROW.to_string()));
            }

            let mut row = ImportRow::new(index);
            for (position, column) in columns.iter().enumerate() {
                if let Some(column) = column {
                    // A short record still supplied the column in its header
                    let cell = FieldCell::from_raw(Some(record.get(position).unwrap_or("")));
                    row.set(*column, cell);
                }
            }
            rows.push(row);
        }

        log_debug!(
            "Decoded {} rows across {} recognised columns",
            rows.len(),
            columns.iter().flatten().count()
        );

        Ok(rows)
    }
}

fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}
