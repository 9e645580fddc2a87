use crate::catalog::Metric;
use crate::logging::init_tracing;
use crate::models::{
    AppSettings, BooleanResponse, ExportResponse, ImportResponse, MeasurementRecord, MetricSeriesRequest,
    MetricSeriesResponse,
};
use crate::tracker::TrackerCore;
use std::sync::Arc;
use tauri::Manager;

#[derive(Clone)]
struct AppState {
    tracker: Arc<TrackerCore>,
}

#[tauri::command]
fn save_measurement(
    state: tauri::State<'_, AppState>,
    payload: MeasurementRecord,
) -> Result<MeasurementRecord, String> {
    state.tracker.save_measurement(payload).map_err(to_client_error)
}

#[tauri::command]
fn delete_measurement(state: tauri::State<'_, AppState>, date: String) -> Result<BooleanResponse, String> {
    state.tracker.delete_measurement(&date).map_err(to_client_error)
}

#[tauri::command]
fn get_measurement(
    state: tauri::State<'_, AppState>,
    date: String,
) -> Result<Option<MeasurementRecord>, String> {
    state.tracker.get_measurement(&date).map_err(to_client_error)
}

#[tauri::command]
fn list_measurements(state: tauri::State<'_, AppState>) -> Result<Vec<MeasurementRecord>, String> {
    state.tracker.list_measurements().map_err(to_client_error)
}

#[tauri::command]
fn recent_measurements(
    state: tauri::State<'_, AppState>,
    limit: Option<usize>,
) -> Result<Vec<MeasurementRecord>, String> {
    state.tracker.recent_measurements(limit).map_err(to_client_error)
}

#[tauri::command]
fn clear_measurements(state: tauri::State<'_, AppState>) -> Result<BooleanResponse, String> {
    state.tracker.clear_measurements().map_err(to_client_error)
}

#[tauri::command]
fn list_metrics(state: tauri::State<'_, AppState>) -> Vec<Metric> {
    state.tracker.list_metrics()
}

#[tauri::command]
fn metric_series(
    state: tauri::State<'_, AppState>,
    request: MetricSeriesRequest,
) -> Result<MetricSeriesResponse, String> {
    state.tracker.metric_series(request).map_err(to_client_error)
}

#[tauri::command]
fn export_measurements(state: tauri::State<'_, AppState>) -> Result<ExportResponse, String> {
    state.tracker.export_measurements().map_err(to_client_error)
}

#[tauri::command]
fn import_measurements(state: tauri::State<'_, AppState>, contents: String) -> Result<ImportResponse, String> {
    state.tracker.import_measurements(&contents).map_err(to_client_error)
}

#[tauri::command]
fn get_settings(state: tauri::State<'_, AppState>) -> Result<AppSettings, String> {
    state.tracker.get_settings().map_err(to_client_error)
}

#[tauri::command]
fn update_settings(
    state: tauri::State<'_, AppState>,
    update: serde_json::Value,
) -> Result<AppSettings, String> {
    state.tracker.update_settings(update).map_err(to_client_error)
}

pub fn run() {
    tauri::Builder::default()
        .setup(|app| {
            let app_data_dir = app.path().app_data_dir().map_err(|error| error.to_string())?;
            std::fs::create_dir_all(&app_data_dir).map_err(|error| error.to_string())?;
            init_tracing(&app_data_dir).map_err(|error| error.to_string())?;

            let tracker = TrackerCore::new(app_data_dir).map_err(|error| error.to_string())?;
            app.manage(AppState { tracker });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            save_measurement,
            delete_measurement,
            get_measurement,
            list_measurements,
            recent_measurements,
            clear_measurements,
            list_metrics,
            metric_series,
            export_measurements,
            import_measurements,
            get_settings,
            update_settings
        ])
        .run(tauri::generate_context!())
        .expect("failed to run tauri app");
}

fn to_client_error(error: impl std::fmt::Display) -> String {
    error.to_string()
}
