use metrics_exporter_prometheus::PrometheusHandle;
use skillgate::config::AppConfig;
use skillgate::scoring::{
    CatalogError, ChallengeCatalog, EvaluationId, EvaluationRecord, EvaluationRepository,
    ExplanationRequest, PublisherError, RepositoryError, ResultPublisher,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationRepository {
    records: Arc<Mutex<HashMap<EvaluationId, EvaluationRecord>>>,
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.evaluation_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.evaluation_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<EvaluationRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.evaluated_at.cmp(&a.evaluated_at));
        records.truncate(limit);
        Ok(records)
    }
}

/// Hands completed evaluations to the explanation stage. Until a dedicated
/// explanation worker exists the handoff is logged so operators can trace
/// which citations left the scoring boundary.
#[derive(Default, Clone)]
pub(crate) struct LoggingResultPublisher;

impl ResultPublisher for LoggingResultPublisher {
    fn publish(&self, request: ExplanationRequest) -> Result<(), PublisherError> {
        info!(
            evaluation = %request.evaluation_id.0,
            challenge = %request.challenge_id,
            final_score = request.final_score,
            recommendation = %request.recommendation,
            blocks = request.blocks.len(),
            "explanation handoff published"
        );
        Ok(())
    }
}

pub(crate) fn load_catalog(config: &AppConfig) -> Result<ChallengeCatalog, CatalogError> {
    let mut catalog = ChallengeCatalog::builtin();
    if let Some(dir) = &config.challenge_dir {
        let loaded = catalog.load_dir(dir)?;
        info!(dir = %dir.display(), loaded, "loaded challenge rubrics from disk");
    }
    Ok(catalog)
}
