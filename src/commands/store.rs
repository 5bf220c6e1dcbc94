use super::{output_err, OutputFormat};
use crate::error::AppError;
use crate::infra::{ensure_schema, Store};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatusDto {
    pub path: String,
    pub file_created: bool,
    pub table_created: bool,
}

/// Open the store at `path` and make sure the `people` table is usable.
pub fn open_ready_store(path: &Path) -> Result<(Store, StoreStatusDto), AppError> {
    let file_created = !path.exists();
    let store = Store::open(path)?;
    let table_created = ensure_schema(&store)?;
    if file_created {
        log::info!("A new store has been created at {:?}", path);
    }
    let status = StoreStatusDto {
        path: path.display().to_string(),
        file_created,
        table_created,
    };
    Ok((store, status))
}

pub fn cmd_store_init<W: Write>(
    status: &StoreStatusDto,
    out: &mut W,
    format: OutputFormat,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Text => {
            let file_line = if status.file_created {
                format!("A new store has been created at {}.", status.path)
            } else {
                format!("Using existing store at {}.", status.path)
            };
            let table_line = if status.table_created {
                "Table people created."
            } else {
                "Table people already exists."
            };
            writeln!(out, "{}\n{}", file_line, table_line).map_err(output_err)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, status).map_err(output_err)?;
            writeln!(out).map_err(output_err)?;
        }
    }
    Ok(())
}
