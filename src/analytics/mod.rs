pub mod query;
pub mod stats;

pub use query::{query, DateRange};
pub use stats::summarize;

use crate::catalog;
use crate::errors::AppResult;
use crate::models::{MeasurementRecord, MetricKind, MetricSeriesResponse};

pub fn metric_series(
    records: &[MeasurementRecord],
    metric: MetricKind,
    range: &DateRange,
) -> AppResult<MetricSeriesResponse> {
    let points = query(records, metric, range);
    let summary = if points.is_empty() {
        None
    } else {
        Some(summarize(&query::values(&points))?)
    };

    Ok(MetricSeriesResponse {
        metric: *catalog::metric(metric),
        points,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::{metric_series, DateRange};
    use crate::models::{MeasurementDate, MeasurementRecord, MetricKind};

    #[test]
    fn empty_series_has_no_summary() {
        let records = vec![MeasurementRecord::new(MeasurementDate::parse("2024-01-01").expect("date"))
            .with_value(MetricKind::Weight, 70.0)];

        let weight = metric_series(&records, MetricKind::Weight, &DateRange::unbounded()).expect("weight");
        assert_eq!(weight.points.len(), 1);
        assert_eq!(weight.summary.map(|summary| summary.latest), Some(70.0));

        let bmi = metric_series(&records, MetricKind::Bmi, &DateRange::unbounded()).expect("bmi");
        assert!(bmi.points.is_empty());
        assert!(bmi.summary.is_none());
        assert_eq!(bmi.metric.label, "BMI");
    }
}
