use body_tracker_lib::db::Database;
use body_tracker_lib::models::{MeasurementDate, MeasurementRecord, MetricKind, MetricSeriesRequest};
use body_tracker_lib::{AppError, StorageBackend, TrackerCore};

fn record(date: &str) -> MeasurementRecord {
    MeasurementRecord::new(MeasurementDate::parse(date).expect("date"))
}

#[test]
fn measurements_survive_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let tracker = TrackerCore::new(dir.path().to_path_buf()).expect("tracker");
        tracker
            .save_measurement(record("2024-01-01").with_value(MetricKind::Weight, 70.0))
            .expect("save");
        tracker
            .save_measurement(record("2024-01-01").with_value(MetricKind::FatPercentage, 20.0))
            .expect("merge");
    }

    let reopened = TrackerCore::new(dir.path().to_path_buf()).expect("reopen");
    let stored = reopened
        .get_measurement("2024-01-01")
        .expect("get")
        .expect("record exists");
    assert_eq!(stored.weight, Some(70.0));
    assert_eq!(stored.fat_percentage, Some(20.0));
}

#[test]
fn export_file_imports_into_an_empty_tracker() {
    let source_dir = tempfile::tempdir().expect("tempdir");
    let source = TrackerCore::new(source_dir.path().to_path_buf()).expect("source");
    source
        .save_measurement(record("2024-01-10").with_value(MetricKind::Weight, 72.0))
        .expect("save");
    source
        .save_measurement(
            record("2024-01-01")
                .with_value(MetricKind::Weight, 70.0)
                .with_value(MetricKind::BmrKcal, 1650.0)
                .with_notes("first weigh-in"),
        )
        .expect("save");

    let export = source.export_measurements().expect("export");
    assert_eq!(export.count, 2);
    assert!(export.path.ends_with(".json"));
    assert!(std::path::Path::new(&export.path).starts_with(source.app_data_dir().join("exports")));
    let contents = std::fs::read_to_string(&export.path).expect("read export");

    let target_dir = tempfile::tempdir().expect("tempdir");
    let target = TrackerCore::new(target_dir.path().to_path_buf()).expect("target");
    let imported = target.import_measurements(&contents).expect("import");
    assert_eq!(imported.imported, 2);
    assert_eq!(imported.total, 2);
    assert_eq!(
        target.list_measurements().expect("target list"),
        source.list_measurements().expect("source list")
    );
}

#[test]
fn import_merges_into_existing_dates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let tracker = TrackerCore::new(dir.path().to_path_buf()).expect("tracker");
    tracker
        .save_measurement(record("2024-01-05").with_value(MetricKind::Weight, 71.0))
        .expect("save");

    let result = tracker
        .import_measurements(
            r#"[
                {"date": "2024-01-05", "weight": null, "muscle_mass": 33.1},
                {"date": "2024-01-02", "weight": 71.4}
            ]"#,
        )
        .expect("import");
    assert_eq!(result.total, 2);

    let merged = tracker
        .get_measurement("2024-01-05")
        .expect("get")
        .expect("exists");
    assert_eq!(merged.weight, Some(71.0));
    assert_eq!(merged.muscle_mass, Some(33.1));

    let dates: Vec<String> = tracker
        .list_measurements()
        .expect("list")
        .iter()
        .map(|record| record.date.to_string())
        .collect();
    assert_eq!(dates, vec!["2024-01-02", "2024-01-05"]);
}

#[test]
fn chart_flow_filters_and_summarizes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let tracker = TrackerCore::new(dir.path().to_path_buf()).expect("tracker");
    tracker
        .save_measurement(record("2024-01-01").with_value(MetricKind::Weight, 70.0))
        .expect("save");
    tracker
        .save_measurement(record("2024-01-05").with_value(MetricKind::FatMass, 14.0))
        .expect("save");
    tracker
        .save_measurement(record("2024-01-10").with_value(MetricKind::Weight, 72.0))
        .expect("save");

    let series = tracker
        .metric_series(MetricSeriesRequest {
            metric: "weight".to_string(),
            start_date: Some(String::new()),
            end_date: None,
        })
        .expect("series");
    let values: Vec<f64> = series.points.iter().map(|point| point.value).collect();
    assert_eq!(values, vec![70.0, 72.0]);
    assert_eq!(series.metric.display_label(), "Weight (kg)");

    let summary = series.summary.expect("summary");
    assert_eq!(summary.change, 2.0);
    assert_eq!(summary.average, 71.0);

    tracker.clear_measurements().expect("clear");
    let cleared = tracker
        .metric_series(MetricSeriesRequest {
            metric: "weight".to_string(),
            ..MetricSeriesRequest::default()
        })
        .expect("series after clear");
    assert!(cleared.points.is_empty());
    assert!(cleared.summary.is_none());
}

#[test]
fn corrupt_persisted_data_stops_startup() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let db = Database::new(&dir.path().join("tracker.sqlite")).expect("db");
        db.write_slot("measurements", "{\"not\": \"measurements\"}")
            .expect("write slot");
    }

    let error = TrackerCore::new(dir.path().to_path_buf())
        .err()
        .expect("corrupt data must fail");
    assert!(matches!(error, AppError::CorruptState(_)));
}
