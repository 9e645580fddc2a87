use crate::errors::{AppError, AppResult};
use crate::models::SeriesSummary;

/// Summary scalars for a date-ordered series.
///
/// An empty series is `NoData`. A series that starts at zero, or whose percent
/// change overflows, has `change_percent` of `None`. Values whose spread exceeds
/// the `f64` range are rejected rather than summarized as infinity.
pub fn summarize(values: &[f64]) -> AppResult<SeriesSummary> {
    let (Some(&first), Some(&latest)) = (values.first(), values.last()) else {
        return Err(AppError::NoData("cannot summarize an empty series".to_string()));
    };

    let count = values.len();
    let average = values.iter().map(|value| value / count as f64).sum::<f64>();
    let (change, change_percent) = if count > 1 {
        let change = latest - first;
        let percent = (first != 0.0)
            .then(|| change / first * 100.0)
            .filter(|percent| percent.is_finite());
        (change, percent)
    } else {
        (0.0, Some(0.0))
    };

    if !average.is_finite() || !change.is_finite() {
        return Err(AppError::Validation("series values are too large to summarize".to_string()));
    }

    Ok(SeriesSummary {
        latest,
        average,
        change,
        change_percent,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::summarize;
    use crate::errors::AppError;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn summarizes_ordered_series() {
        let summary = summarize(&[70.0, 72.0, 71.0]).expect("summary");
        assert_eq!(summary.count, 3);
        assert_eq!(summary.latest, 71.0);
        assert!(close(summary.average, 71.0));
        assert!(close(summary.change, 1.0));
        let percent = summary.change_percent.expect("percent");
        assert!((percent - 1.428_571).abs() < 1e-3);
    }

    #[test]
    fn single_value_has_no_change() {
        let summary = summarize(&[64.2]).expect("summary");
        assert_eq!(summary.latest, 64.2);
        assert_eq!(summary.change, 0.0);
        assert_eq!(summary.change_percent, Some(0.0));
    }

    #[test]
    fn zero_baseline_leaves_percent_undefined() {
        let summary = summarize(&[0.0, 2.0, 4.0]).expect("summary");
        assert_eq!(summary.change, 4.0);
        assert_eq!(summary.change_percent, None);
        assert!(close(summary.average, 2.0));
    }

    #[test]
    fn negative_change_is_reported_as_is() {
        let summary = summarize(&[80.0, 76.0]).expect("summary");
        assert_eq!(summary.change, -4.0);
        assert_eq!(summary.change_percent, Some(-5.0));
    }

    #[test]
    fn tiny_baseline_drops_overflowing_percent() {
        let summary = summarize(&[5e-324, 1.0]).expect("summary");
        assert_eq!(summary.change_percent, None);
        assert!(close(summary.change, 1.0));
        assert!(close(summary.average, 0.5));
    }

    #[test]
    fn extreme_values_stay_finite_or_are_rejected() {
        let summary = summarize(&[f64::MAX, f64::MAX]).expect("summary");
        assert_eq!(summary.average, f64::MAX);
        assert_eq!(summary.change_percent, Some(0.0));

        let error = summarize(&[-f64::MAX, f64::MAX]).expect_err("overflowing change");
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[test]
    fn empty_series_is_no_data() {
        let error = summarize(&[]).expect_err("empty");
        assert!(matches!(error, AppError::NoData(_)));
    }
}
