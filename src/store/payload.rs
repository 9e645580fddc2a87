use crate::errors::{AppError, AppResult};
use crate::models::MeasurementRecord;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCHEMA_VERSION: u64 = 1;

pub const LEGACY_SCHEMA_VERSION: u64 = 0;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedMeasurements<'a> {
    schema_version: u64,
    measurements: &'a [MeasurementRecord],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMeasurements {
    measurements: Vec<MeasurementRecord>,
}

#[derive(Debug)]
pub struct DecodedPayload {
    pub schema_version: u64,
    pub records: Vec<MeasurementRecord>,
}

pub fn encode(records: &[MeasurementRecord]) -> AppResult<String> {
    Ok(serde_json::to_string(&PersistedMeasurements {
        schema_version: SCHEMA_VERSION,
        measurements: records,
    })?)
}

pub fn decode(raw: &str) -> AppResult<DecodedPayload> {
    decode_value(raw).map_err(|error| AppError::CorruptState(format!("{:#}", error)))
}

fn decode_value(raw: &str) -> anyhow::Result<DecodedPayload> {
    let value: Value = serde_json::from_str(raw).context("persisted measurements are not valid JSON")?;

    if value.is_array() {
        let records: Vec<MeasurementRecord> =
            serde_json::from_value(value).context("legacy measurement array is malformed")?;
        return Ok(DecodedPayload {
            schema_version: LEGACY_SCHEMA_VERSION,
            records,
        });
    }

    let version = value
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .context("persisted measurements are neither an array nor a versioned object")?;
    if version > SCHEMA_VERSION {
        bail!(
            "schema version {} is newer than the supported version {}",
            version,
            SCHEMA_VERSION
        );
    }

    let stored: StoredMeasurements = serde_json::from_value(value)
        .with_context(|| format!("schema version {} payload is malformed", version))?;
    Ok(DecodedPayload {
        schema_version: version,
        records: stored.measurements,
    })
}
