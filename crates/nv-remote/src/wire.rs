//! Decoding of the catalog index payload.
//!
//! `/data.json` serves an array of positional tuples rather than objects:
//! `[id, name, datasetRef, isPublic]`, with newer backends appending a
//! thumbnail URL as a fifth element. Rows are decoded leniently enough to
//! accept both shapes and strictly enough to reject anything else.

use serde_json::Value;

use nv_core::{DatasetRef, IndexRow};

use crate::{RemoteError, Result};

/// Decode the full index payload.
pub fn decode_index(raw: &[Vec<Value>]) -> Result<Vec<IndexRow>> {
    raw.iter()
        .enumerate()
        .map(|(index, row)| decode_row(index, row))
        .collect()
}

fn decode_row(index: usize, row: &[Value]) -> Result<IndexRow> {
    if row.len() < 4 {
        return Err(malformed(index, format!("{} elements", row.len())));
    }
    let id = row[0]
        .as_u64()
        .ok_or_else(|| malformed(index, "id is not an integer"))?;
    let name = row[1]
        .as_str()
        .ok_or_else(|| malformed(index, "name is not a string"))?;
    let dataset = row[2]
        .as_str()
        .ok_or_else(|| malformed(index, "dataset ref is not a string"))?;
    let is_public = row[3]
        .as_bool()
        .ok_or_else(|| malformed(index, "visibility is not a bool"))?;
    let thumb = row.get(4).and_then(Value::as_str).map(str::to_owned);

    Ok(IndexRow {
        id,
        name: name.to_owned(),
        dataset: DatasetRef::new(dataset),
        is_public,
        thumb,
    })
}

fn malformed(index: usize, reason: impl Into<String>) -> RemoteError {
    RemoteError::MalformedRow {
        index,
        reason: reason.into(),
    }
}
