use crate::analytics::{self, DateRange};
use crate::catalog::{self, Metric};
use crate::db::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{
    AppSettings, BooleanResponse, ExportResponse, ImportResponse, MeasurementDate, MeasurementRecord,
    MetricSeriesRequest, MetricSeriesResponse,
};
use crate::store::{MeasurementStore, StorageBackend};
use crate::transfer;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct TrackerCore {
    db: Arc<Database>,
    store: Mutex<MeasurementStore>,
    app_data_dir: PathBuf,
}

impl TrackerCore {
    pub fn new(app_data_dir: PathBuf) -> AppResult<Arc<Self>> {
        let db_path = app_data_dir.join("tracker.sqlite");
        let db = Arc::new(Database::new(&db_path)?);
        let backend: Arc<dyn StorageBackend> = db.clone();
        let store = MeasurementStore::load(backend)?;

        tracing::info!(path = %db_path.to_string_lossy(), count = store.len(), "tracker ready");

        Ok(Arc::new(Self {
            db,
            store: Mutex::new(store),
            app_data_dir,
        }))
    }

    pub fn app_data_dir(&self) -> &Path {
        &self.app_data_dir
    }

    pub fn save_measurement(&self, record: MeasurementRecord) -> AppResult<MeasurementRecord> {
        let mut store = self.store()?;
        store.upsert(record).cloned()
    }

    pub fn delete_measurement(&self, date: &str) -> AppResult<BooleanResponse> {
        let date = MeasurementDate::parse(date)?;
        let success = self.store()?.delete(date)?;
        Ok(BooleanResponse { success })
    }

    pub fn get_measurement(&self, date: &str) -> AppResult<Option<MeasurementRecord>> {
        let date = MeasurementDate::parse(date)?;
        Ok(self.store()?.get(date).cloned())
    }

    pub fn list_measurements(&self) -> AppResult<Vec<MeasurementRecord>> {
        Ok(self.store()?.all().to_vec())
    }

    pub fn recent_measurements(&self, limit: Option<usize>) -> AppResult<Vec<MeasurementRecord>> {
        let limit = match limit {
            Some(limit) => limit,
            None => self.db.get_settings()?.recent_limit,
        };
        Ok(self.store()?.recent(limit).into_iter().cloned().collect())
    }

    pub fn clear_measurements(&self) -> AppResult<BooleanResponse> {
        self.store()?.clear_all()?;
        Ok(BooleanResponse { success: true })
    }

    pub fn list_metrics(&self) -> Vec<Metric> {
        catalog::METRICS.to_vec()
    }

    pub fn metric_series(&self, request: MetricSeriesRequest) -> AppResult<MetricSeriesResponse> {
        let metric = catalog::lookup(&request.metric)?;
        let range = DateRange::parse(request.start_date.as_deref(), request.end_date.as_deref())?;
        let store = self.store()?;
        analytics::metric_series(store.all(), metric.name, &range)
    }

    pub fn export_measurements(&self) -> AppResult<ExportResponse> {
        let settings = self.db.get_settings()?;
        let (contents, count) = {
            let store = self.store()?;
            (transfer::export_json(store.all(), settings.pretty_export)?, store.len())
        };

        let export_dir = self.app_data_dir.join("exports");
        std::fs::create_dir_all(&export_dir).map_err(|error| AppError::Io(error.to_string()))?;

        let file_name = format!(
            "{}-{}.json",
            sanitize_filename_component(&settings.export_prefix),
            Utc::now().format("%Y-%m-%d")
        );
        let output_path = export_dir.join(file_name);
        if !output_path.starts_with(&export_dir) {
            return Err(AppError::Io("Resolved export path escaped export directory".to_string()));
        }

        std::fs::write(&output_path, contents).map_err(|error| AppError::Io(error.to_string()))?;
        tracing::info!(path = %output_path.to_string_lossy(), count, "exported measurements");
        Ok(ExportResponse {
            path: output_path.to_string_lossy().to_string(),
            count,
        })
    }

    pub fn import_measurements(&self, contents: &str) -> AppResult<ImportResponse> {
        let records = transfer::parse_import(contents)?;
        let mut store = self.store()?;
        let imported = store.upsert_many(records)?;
        let total = store.len();
        tracing::info!(imported, total, "imported measurements");
        Ok(ImportResponse { imported, total })
    }

    pub fn get_settings(&self) -> AppResult<AppSettings> {
        self.db.get_settings()
    }

    pub fn update_settings(&self, update: serde_json::Value) -> AppResult<AppSettings> {
        self.db.update_settings(update)
    }

    fn store(&self) -> AppResult<MutexGuard<'_, MeasurementStore>> {
        self.store
            .lock()
            .map_err(|_| AppError::Internal("measurement store mutex poisoned".to_string()))
    }
}

fn sanitize_filename_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "export".to_string()
    } else {
        cleaned
    }
}
