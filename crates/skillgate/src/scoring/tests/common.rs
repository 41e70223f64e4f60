use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::scoring::catalog::ChallengeCatalog;
use crate::scoring::challenge::{
    ChallengeDefinition, Criterion, CriterionId, EvidencePredicate, EvidenceRequirement,
    PartialCredit,
};
use crate::scoring::evaluation::{EvaluationEngine, ScoringPolicy};
use crate::scoring::evidence::{
    EvidenceEntry, EvidenceKind, EvidenceSet, EvidenceValue, LineRange, SourceRef,
};
use crate::scoring::repository::{
    EvaluationId, EvaluationRecord, EvaluationRepository, ExplanationRequest, PublisherError,
    RepositoryError, ResultPublisher,
};
use crate::scoring::router::evaluation_router;
use crate::scoring::service::EvaluationService;

pub(super) fn source(path: &str) -> SourceRef {
    SourceRef::file(path)
}

pub(super) fn ranged(path: &str, start: u32, end: u32, snippet: &str) -> SourceRef {
    SourceRef {
        path: path.to_string(),
        lines: Some(LineRange { start, end }),
        snippet: Some(snippet.to_string()),
    }
}

pub(super) fn entry(
    kind: EvidenceKind,
    value: EvidenceValue,
    sources: Vec<SourceRef>,
) -> EvidenceEntry {
    EvidenceEntry::new(kind, value, sources)
}

pub(super) fn evidence_empty() -> EvidenceSet {
    EvidenceSet::from_entries(Vec::new()).expect("empty set is valid")
}

/// Evidence for a submission that clears every general-engineering bar and
/// all three bonus predicates.
pub(super) fn evidence_strong() -> EvidenceSet {
    EvidenceSet::from_entries(vec![
        entry(
            EvidenceKind::SourceLayout,
            EvidenceValue::Flag(true),
            vec![source("src/main.py"), source("src/pipeline/mod.py")],
        ),
        entry(
            EvidenceKind::ReadmeSections,
            EvidenceValue::Count(5),
            vec![ranged("README.md", 1, 120, "## Installation")],
        ),
        entry(
            EvidenceKind::SetupInstructions,
            EvidenceValue::Flag(true),
            vec![ranged("README.md", 14, 32, "pip install -r requirements.txt")],
        ),
        entry(
            EvidenceKind::TestDirectory,
            EvidenceValue::Flag(true),
            vec![source("tests/")],
        ),
        entry(
            EvidenceKind::TestFiles,
            EvidenceValue::Count(12),
            vec![source("tests/test_ingest.py"), source("tests/test_api.py")],
        ),
        entry(
            EvidenceKind::DependencyManifest,
            EvidenceValue::Count(8),
            vec![source("requirements.txt")],
        ),
        entry(
            EvidenceKind::Dockerfile,
            EvidenceValue::Flag(true),
            vec![source("Dockerfile")],
        ),
        entry(
            EvidenceKind::DockerBuildStages,
            EvidenceValue::Count(2),
            vec![ranged("Dockerfile", 1, 24, "FROM python:3.12 AS builder")],
        ),
        entry(
            EvidenceKind::CiPipeline,
            EvidenceValue::Flag(true),
            vec![source(".github/workflows/ci.yml")],
        ),
        entry(
            EvidenceKind::DemoFiles,
            EvidenceValue::Count(2),
            vec![source("demos/quickstart.py"), source("demos/batch.py")],
        ),
        entry(
            EvidenceKind::AdvancedTopics,
            EvidenceValue::Count(4),
            vec![ranged("README.md", 80, 96, "caching, monitoring, retries")],
        ),
    ])
    .expect("strong evidence is well-formed")
}

pub(super) fn testing_criterion() -> Criterion {
    Criterion {
        id: CriterionId::new("testing"),
        description: "Automated tests exist".to_string(),
        max_points: 15,
        floor: 3,
        requirements: vec![
            EvidenceRequirement::new(EvidenceKind::TestFiles, EvidencePredicate::MinCount(5)),
            EvidenceRequirement::new(EvidenceKind::TestDirectory, EvidencePredicate::Present),
        ],
        partial_credit: PartialCredit::Denied,
    }
}

/// A rubric holding only the testing criterion plus a filler criterion so
/// the maxima still sum to the declared base score.
pub(super) fn testing_definition() -> ChallengeDefinition {
    let filler = Criterion {
        id: CriterionId::new("layout"),
        description: "Source layout".to_string(),
        max_points: 85,
        floor: 2,
        requirements: vec![EvidenceRequirement::new(
            EvidenceKind::SourceLayout,
            EvidencePredicate::Present,
        )],
        partial_credit: PartialCredit::Denied,
    };
    ChallengeDefinition::try_new(
        "testing-focus",
        "Testing Focus",
        100,
        vec![testing_criterion(), filler],
    )
    .expect("testing rubric is well-formed")
}

pub(super) fn general_definition() -> ChallengeDefinition {
    ChallengeCatalog::builtin()
        .get("general-engineering")
        .expect("built-in rubric present")
        .clone()
}

pub(super) fn engine() -> EvaluationEngine {
    EvaluationEngine::new(general_definition(), ScoringPolicy::default())
}

pub(super) fn build_service() -> (
    EvaluationService<MemoryRepository, MemoryPublisher>,
    Arc<MemoryRepository>,
    Arc<MemoryPublisher>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let publisher = Arc::new(MemoryPublisher::default());
    let service = EvaluationService::new(
        ChallengeCatalog::builtin(),
        ScoringPolicy::default(),
        repository.clone(),
        publisher.clone(),
    );
    (service, repository, publisher)
}

pub(super) fn router_with_service(
    service: EvaluationService<MemoryRepository, MemoryPublisher>,
) -> axum::Router {
    evaluation_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<EvaluationId, EvaluationRecord>>>,
}

impl EvaluationRepository for MemoryRepository {
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
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.evaluated_at.cmp(&a.evaluated_at));
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPublisher {
    requests: Arc<Mutex<Vec<ExplanationRequest>>>,
}

impl MemoryPublisher {
    pub(super) fn requests(&self) -> Vec<ExplanationRequest> {
        self.requests.lock().expect("publisher mutex poisoned").clone()
    }
}

impl ResultPublisher for MemoryPublisher {
    fn publish(&self, request: ExplanationRequest) -> Result<(), PublisherError> {
        self.requests
            .lock()
            .expect("publisher mutex poisoned")
            .push(request);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl EvaluationRepository for ConflictRepository {
    fn insert(&self, _record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Ok(None)
    }

    fn recent(&self, _limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
