use crate::errors::{AppError, AppResult};
use crate::models::{MeasurementRecord, MetricKind};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

static IMPORT_SCHEMA: Lazy<JSONSchema> =
    Lazy::new(|| JSONSchema::compile(&import_schema()).expect("valid import schema"));

fn import_schema() -> Value {
    let mut properties = Map::new();
    properties.insert(
        "date".to_string(),
        json!({ "type": "string", "pattern": r"^\d{4}-\d{2}-\d{2}$" }),
    );
    properties.insert("notes".to_string(), json!({ "type": ["string", "null"] }));
    for kind in MetricKind::ALL {
        properties.insert(kind.as_str().to_string(), json!({ "type": ["number", "null"] }));
    }

    json!({
        "type": "array",
        "items": {
            "type": "object",
            "required": ["date"],
            "properties": properties
        }
    })
}

pub fn export_json(records: &[MeasurementRecord], pretty: bool) -> AppResult<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    Ok(rendered)
}

pub fn parse_import(raw: &str) -> AppResult<Vec<MeasurementRecord>> {
    let value: Value = serde_json::from_str(raw.trim_start_matches('\u{feff}'))
        .map_err(|error| AppError::InvalidImport(format!("Error importing data: {}", error)))?;
    if !value.is_array() {
        return Err(AppError::InvalidImport("Invalid file format".to_string()));
    }

    let errors: Vec<String> = IMPORT_SCHEMA
        .validate(&value)
        .err()
        .map(|errors| {
            errors
                .take(5)
                .map(|error| {
                    let path = error.instance_path.to_string();
                    if path.is_empty() {
                        error.to_string()
                    } else {
                        format!("{}: {}", path, error)
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    if !errors.is_empty() {
        return Err(AppError::InvalidImport(errors.join("; ")));
    }

    let records: Vec<MeasurementRecord> = serde_json::from_value(value)
        .map_err(|error| AppError::InvalidImport(error.to_string()))?;
    records
        .into_iter()
        .map(|record| record.normalize().map_err(|error| AppError::InvalidImport(error.to_string())))
        .collect()
}
