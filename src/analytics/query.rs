use crate::errors::AppResult;
use crate::models::{MeasurementDate, MeasurementRecord, MetricKind, SeriesPoint};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<MeasurementDate>,
    pub end: Option<MeasurementDate>,
}

impl DateRange {
    pub fn new(start: Option<MeasurementDate>, end: Option<MeasurementDate>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn parse(start: Option<&str>, end: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            start: MeasurementDate::parse_optional(start)?,
            end: MeasurementDate::parse_optional(end)?,
        })
    }

    pub fn contains(&self, date: MeasurementDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

pub fn query(records: &[MeasurementRecord], metric: MetricKind, range: &DateRange) -> Vec<SeriesPoint> {
    records
        .iter()
        .filter(|record| range.contains(record.date))
        .filter_map(|record| {
            record.value(metric).map(|value| SeriesPoint {
                date: record.date,
                value,
            })
        })
        .collect()
}

pub fn values(points: &[SeriesPoint]) -> Vec<f64> {
    points.iter().map(|point| point.value).collect()
}
