//! JSON import and export of grid snapshots.

use crate::error::{GridError, GridResult};
use crate::model::{GridModel, GridSnapshot};
use chrono::{DateTime, SecondsFormat, Utc};

/// Serialize `model` with the current time as its timestamp.
pub fn export_json(model: &GridModel) -> GridResult<Vec<u8>> {
    export_json_at(model, Utc::now())
}

/// Serialize `model` stamped with `timestamp`.
pub fn export_json_at(model: &GridModel, timestamp: DateTime<Utc>) -> GridResult<Vec<u8>> {
    let mut snapshot = model.to_snapshot();
    snapshot.timestamp = Some(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true));
    let bytes = serde_json::to_vec_pretty(&snapshot)
        .map_err(|e| GridError::Serialization(e.to_string()))?;
    log::info!(
        "Exported {}x{} grid ({} bytes)",
        model.columns(),
        model.rows(),
        bytes.len()
    );
    Ok(bytes)
}

/// Parse a snapshot document. Every field is optional.
pub fn parse_snapshot(bytes: &[u8]) -> GridResult<GridSnapshot> {
    serde_json::from_slice(bytes).map_err(|e| GridError::Parse(e.to_string()))
}

/// Parse a document into a fresh model. Grids larger than
/// [`MAX_CELLS`](crate::model::MAX_CELLS) are rejected.
pub fn import_json(bytes: &[u8]) -> GridResult<GridModel> {
    let snapshot = parse_snapshot(bytes)?;
    if let Some(timestamp) = &snapshot.timestamp {
        log::debug!("Importing grid exported at {}", timestamp);
    }
    let model = GridModel::from_snapshot(snapshot)?;
    log::info!("Imported {}x{} grid", model.columns(), model.rows());
    Ok(model)
}

/// Replace `model` with the parsed document. On error `model` is untouched.
pub fn import_into(model: &mut GridModel, bytes: &[u8]) -> GridResult<()> {
    let snapshot = parse_snapshot(bytes)?;
    model.replace_all(snapshot)
}
