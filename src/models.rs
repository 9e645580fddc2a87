use crate::catalog::Metric;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Weight,
    FatPercentage,
    FatMass,
    Ffm,
    MuscleMass,
    TbwKg,
    TbwPercentage,
    BoneMass,
    BmrKj,
    BmrKcal,
    MetabolicAge,
    VisceralFatRating,
    Bmi,
}

impl MetricKind {
    pub const ALL: [MetricKind; 13] = [
        Self::Weight,
        Self::FatPercentage,
        Self::FatMass,
        Self::Ffm,
        Self::MuscleMass,
        Self::TbwKg,
        Self::TbwPercentage,
        Self::BoneMass,
        Self::BmrKj,
        Self::BmrKcal,
        Self::MetabolicAge,
        Self::VisceralFatRating,
        Self::Bmi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::FatPercentage => "fat_percentage",
            Self::FatMass => "fat_mass",
            Self::Ffm => "ffm",
            Self::MuscleMass => "muscle_mass",
            Self::TbwKg => "tbw_kg",
            Self::TbwPercentage => "tbw_percentage",
            Self::BoneMass => "bone_mass",
            Self::BmrKj => "bmr_kj",
            Self::BmrKcal => "bmr_kcal",
            Self::MetabolicAge => "metabolic_age",
            Self::VisceralFatRating => "visceral_fat_rating",
            Self::Bmi => "bmi",
        }
    }
}

impl FromStr for MetricKind {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| AppError::Validation(format!("Unknown metric {:?}", raw)))
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeasurementDate(NaiveDate);

impl MeasurementDate {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if !DATE_SHAPE.is_match(trimmed) {
            return Err(AppError::Validation(format!(
                "Date {:?} must use the YYYY-MM-DD format",
                raw
            )));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| AppError::Validation(format!("Date {} is not a valid calendar date", trimmed)))
    }

    pub fn parse_optional(raw: Option<&str>) -> AppResult<Option<Self>> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::parse(value).map(Some),
        }
    }
}

impl FromStr for MeasurementDate {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl fmt::Display for MeasurementDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for MeasurementDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MeasurementDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub date: MeasurementDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tbw_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tbw_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bone_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmr_kj: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmr_kcal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metabolic_age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visceral_fat_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MeasurementRecord {
    pub fn new(date: MeasurementDate) -> Self {
        Self {
            date,
            weight: None,
            fat_percentage: None,
            fat_mass: None,
            ffm: None,
            muscle_mass: None,
            tbw_kg: None,
            tbw_percentage: None,
            bone_mass: None,
            bmr_kj: None,
            bmr_kcal: None,
            metabolic_age: None,
            visceral_fat_rating: None,
            bmi: None,
            notes: None,
        }
    }

    pub fn with_value(mut self, kind: MetricKind, value: f64) -> Self {
        *self.slot_mut(kind) = Some(value);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn value(&self, kind: MetricKind) -> Option<f64> {
        *self.slot(kind)
    }

    pub fn set_value(&mut self, kind: MetricKind, value: Option<f64>) {
        *self.slot_mut(kind) = value;
    }

    pub fn readings(&self) -> impl Iterator<Item = (MetricKind, f64)> + '_ {
        MetricKind::ALL
            .into_iter()
            .filter_map(move |kind| self.value(kind).map(|value| (kind, value)))
    }

    pub fn normalize(mut self) -> AppResult<Self> {
        if let Some((kind, value)) = self.readings().find(|(_, value)| !value.is_finite()) {
            return Err(AppError::Validation(format!(
                "{} on {} must be a finite number, got {}",
                kind, self.date, value
            )));
        }
        self.notes = self
            .notes
            .take()
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());
        Ok(self)
    }

    pub fn merge_from(&mut self, update: MeasurementRecord) {
        for kind in MetricKind::ALL {
            if let Some(value) = update.value(kind) {
                self.set_value(kind, Some(value));
            }
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
    }

    fn slot(&self, kind: MetricKind) -> &Option<f64> {
        match kind {
            MetricKind::Weight => &self.weight,
            MetricKind::FatPercentage => &self.fat_percentage,
            MetricKind::FatMass => &self.fat_mass,
            MetricKind::Ffm => &self.ffm,
            MetricKind::MuscleMass => &self.muscle_mass,
            MetricKind::TbwKg => &self.tbw_kg,
            MetricKind::TbwPercentage => &self.tbw_percentage,
            MetricKind::BoneMass => &self.bone_mass,
            MetricKind::BmrKj => &self.bmr_kj,
            MetricKind::BmrKcal => &self.bmr_kcal,
            MetricKind::MetabolicAge => &self.metabolic_age,
            MetricKind::VisceralFatRating => &self.visceral_fat_rating,
            MetricKind::Bmi => &self.bmi,
        }
    }

    fn slot_mut(&mut self, kind: MetricKind) -> &mut Option<f64> {
        match kind {
            MetricKind::Weight => &mut self.weight,
            MetricKind::FatPercentage => &mut self.fat_percentage,
            MetricKind::FatMass => &mut self.fat_mass,
            MetricKind::Ffm => &mut self.ffm,
            MetricKind::MuscleMass => &mut self.muscle_mass,
            MetricKind::TbwKg => &mut self.tbw_kg,
            MetricKind::TbwPercentage => &mut self.tbw_percentage,
            MetricKind::BoneMass => &mut self.bone_mass,
            MetricKind::BmrKj => &mut self.bmr_kj,
            MetricKind::BmrKcal => &mut self.bmr_kcal,
            MetricKind::MetabolicAge => &mut self.metabolic_age,
            MetricKind::VisceralFatRating => &mut self.visceral_fat_rating,
            MetricKind::Bmi => &mut self.bmi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub date: MeasurementDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub latest: f64,
    pub average: f64,
    pub change: f64,
    pub change_percent: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeriesRequest {
    pub metric: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeriesResponse {
    pub metric: Metric,
    pub points: Vec<SeriesPoint>,
    pub summary: Option<SeriesSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub path: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub recent_limit: usize,
    pub export_prefix: String,
    pub pretty_export: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            recent_limit: 10,
            export_prefix: "body-tracker-export".to_string(),
            pretty_export: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MeasurementDate, MeasurementRecord, MetricKind};

    fn date(raw: &str) -> MeasurementDate {
        MeasurementDate::parse(raw).expect("date")
    }

    #[test]
    fn dates_require_fixed_width_calendar_form() {
        assert_eq!(date("2024-01-05").to_string(), "2024-01-05");
        assert!(MeasurementDate::parse("2024-1-5").is_err());
        assert!(MeasurementDate::parse("2024-02-30").is_err());
        assert!(MeasurementDate::parse("05/01/2024").is_err());
        assert!(date("2023-12-31") < date("2024-01-01"));
    }

    #[test]
    fn blank_optional_dates_are_unbounded() {
        assert_eq!(MeasurementDate::parse_optional(None).expect("none"), None);
        assert_eq!(MeasurementDate::parse_optional(Some("  ")).expect("blank"), None);
        assert_eq!(
            MeasurementDate::parse_optional(Some("2024-03-01")).expect("some"),
            Some(date("2024-03-01"))
        );
    }

    #[test]
    fn metric_names_round_trip_through_from_str() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.as_str().parse::<MetricKind>().expect("parse"), kind);
        }
        assert!("waist".parse::<MetricKind>().is_err());
    }

    #[test]
    fn record_json_skips_absent_fields_and_accepts_nulls() {
        let record = MeasurementRecord::new(date("2024-01-01")).with_value(MetricKind::Weight, 70.0);
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json, serde_json::json!({ "date": "2024-01-01", "weight": 70.0 }));

        let parsed: MeasurementRecord = serde_json::from_value(serde_json::json!({
            "date": "2024-01-01",
            "weight": 70.5,
            "fat_percentage": null,
            "notes": null,
            "unrelated": "ignored"
        }))
        .expect("deserialize");
        assert_eq!(parsed.weight, Some(70.5));
        assert_eq!(parsed.fat_percentage, None);
    }

    #[test]
    fn merge_keeps_fields_missing_from_update() {
        let mut stored = MeasurementRecord::new(date("2024-01-01"))
            .with_value(MetricKind::Weight, 70.0)
            .with_notes("morning");
        stored.merge_from(MeasurementRecord::new(date("2024-01-01")).with_value(MetricKind::FatPercentage, 20.0));

        assert_eq!(stored.weight, Some(70.0));
        assert_eq!(stored.fat_percentage, Some(20.0));
        assert_eq!(stored.notes.as_deref(), Some("morning"));
    }

    #[test]
    fn normalize_rejects_non_finite_and_clears_blank_notes() {
        let bad = MeasurementRecord::new(date("2024-01-01")).with_value(MetricKind::Bmi, f64::NAN);
        assert!(bad.normalize().is_err());

        let blank = MeasurementRecord::new(date("2024-01-01")).with_notes("   ");
        assert_eq!(blank.normalize().expect("normalize").notes, None);
    }
}
