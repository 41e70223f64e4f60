use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::challenge::{
    ChallengeDefinition, ConfigurationError, CreditTier, Criterion, CriterionId,
    EvidencePredicate, EvidenceRequirement, PartialCredit,
};
use super::evidence::EvidenceKind;

/// Registry of challenge rubrics available to the evaluation service.
///
/// Ships with built-in reference definitions; additional rubrics load from
/// declarative JSON documents and are validated before registration.
#[derive(Debug, Clone)]
pub struct ChallengeCatalog {
    definitions: BTreeMap<String, ChallengeDefinition>,
}

impl ChallengeCatalog {
    pub fn empty() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for definition in [general_engineering(), data_pipeline()] {
            catalog
                .register(definition)
                .expect("built-in rubrics are well-formed");
        }
        catalog
    }

    pub fn register(&mut self, definition: ChallengeDefinition) -> Result<(), CatalogError> {
        let id = definition.id().to_string();
        if self.definitions.contains_key(&id) {
            return Err(CatalogError::Duplicate { id });
        }
        self.definitions.insert(id, definition);
        Ok(())
    }

    /// Load every `*.json` rubric in `dir`, returning how many registered.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, CatalogError> {
        let mut loaded = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let raw = fs::read_to_string(&path)?;
            let definition: ChallengeDefinition = serde_json::from_str(&raw)
                .map_err(|source| CatalogError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;
            self.register(definition)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn get(&self, id: &str) -> Option<&ChallengeDefinition> {
        self.definitions.get(id)
    }

    pub fn summaries(&self) -> Vec<ChallengeSummary> {
        self.definitions
            .values()
            .map(|definition| ChallengeSummary {
                id: definition.id().to_string(),
                name: definition.name().to_string(),
                base_score: definition.base_score(),
                criteria: definition.criteria().len(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Listing row exposed to API consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSummary {
    pub id: String,
    pub name: String,
    pub base_score: u32,
    pub criteria: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("challenge '{id}' already registered")]
    Duplicate { id: String },
    #[error("failed to read challenge directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse challenge document '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

fn criterion(
    id: &str,
    description: &str,
    max_points: u32,
    floor: u32,
    requirements: Vec<EvidenceRequirement>,
    partial_credit: PartialCredit,
) -> Criterion {
    Criterion {
        id: CriterionId::new(id),
        description: description.to_string(),
        max_points,
        floor,
        requirements,
        partial_credit,
    }
}

/// Reference rubric for general engineering submissions.
fn general_engineering() -> ChallengeDefinition {
    ChallengeDefinition::try_new(
        "general-engineering",
        "General Engineering Challenge",
        100,
        vec![
            criterion(
                "source-layout",
                "Project keeps an intentional source layout (src/ or app/ with submodules)",
                20,
                2,
                vec![EvidenceRequirement::new(
                    EvidenceKind::SourceLayout,
                    EvidencePredicate::Present,
                )],
                PartialCredit::Denied,
            ),
            criterion(
                "readme-depth",
                "README covers purpose, setup, and usage in distinct sections",
                15,
                2,
                vec![EvidenceRequirement::new(
                    EvidenceKind::ReadmeSections,
                    EvidencePredicate::MinCount(3),
                )],
                PartialCredit::Linear,
            ),
            criterion(
                "setup-docs",
                "Repeatable setup instructions are documented",
                10,
                2,
                vec![EvidenceRequirement::new(
                    EvidenceKind::SetupInstructions,
                    EvidencePredicate::Present,
                )],
                PartialCredit::Denied,
            ),
            criterion(
                "testing",
                "Automated tests exist and cover more than a smoke check",
                15,
                3,
                vec![
                    EvidenceRequirement::new(
                        EvidenceKind::TestFiles,
                        EvidencePredicate::MinCount(5),
                    ),
                    EvidenceRequirement::new(
                        EvidenceKind::TestDirectory,
                        EvidencePredicate::Present,
                    ),
                ],
                PartialCredit::Linear,
            ),
            criterion(
                "dependency-management",
                "Dependencies are declared through a manifest, not vendored ad hoc",
                20,
                2,
                vec![EvidenceRequirement::new(
                    EvidenceKind::DependencyManifest,
                    EvidencePredicate::MinCount(3),
                )],
                PartialCredit::Linear,
            ),
            criterion(
                "container-build",
                "Submission ships a working container build",
                10,
                2,
                vec![EvidenceRequirement::new(
                    EvidenceKind::Dockerfile,
                    EvidencePredicate::Present,
                )],
                PartialCredit::Denied,
            ),
            criterion(
                "ci-pipeline",
                "A CI pipeline runs on push",
                10,
                2,
                vec![EvidenceRequirement::new(
                    EvidenceKind::CiPipeline,
                    EvidencePredicate::Present,
                )],
                PartialCredit::Denied,
            ),
        ],
    )
    .expect("general-engineering rubric sums to its base score")
}

/// Reference rubric for data pipeline submissions.
fn data_pipeline() -> ChallengeDefinition {
    ChallengeDefinition::try_new(
        "data-pipeline",
        "Data Pipeline Challenge",
        100,
        vec![
            criterion(
                "pipeline-layout",
                "Ingestion, transformation, and load stages are separated in the tree",
                15,
                2,
                vec![EvidenceRequirement::new(
                    EvidenceKind::SourceLayout,
                    EvidencePredicate::Present,
                )],
                PartialCredit::Denied,
            ),
            criterion(
                "schema-docs",
                "Data contracts and schemas are documented",
                15,
                2,
                vec![EvidenceRequirement::new(
                    EvidenceKind::ApiDocs,
                    EvidencePredicate::Present,
                )],
                PartialCredit::Denied,
            ),
            criterion(
                "testing",
                "Pipeline stages carry automated tests",
                20,
                3,
                vec![EvidenceRequirement::new(
                    EvidenceKind::TestFiles,
                    EvidencePredicate::MinCount(8),
                )],
                PartialCredit::Tiered(vec![
                    CreditTier {
                        at_least: 3,
                        points: 8,
                    },
                    CreditTier {
                        at_least: 5,
                        points: 14,
                    },
                ]),
            ),
            criterion(
                "dependency-management",
                "Pipeline dependencies are pinned in a manifest",
                20,
                2,
                vec![EvidenceRequirement::new(
                    EvidenceKind::DependencyManifest,
                    EvidencePredicate::MinCount(5),
                )],
                PartialCredit::Linear,
            ),
            criterion(
                "deployment",
                "Pipeline is deployable: container build or CI-driven release",
                20,
                2,
                vec![
                    EvidenceRequirement::new(
                        EvidenceKind::Dockerfile,
                        EvidencePredicate::Present,
                    ),
                    EvidenceRequirement::new(
                        EvidenceKind::CiPipeline,
                        EvidencePredicate::Present,
                    ),
                ],
                PartialCredit::Denied,
            ),
            criterion(
                "demo-assets",
                "Sample data or runnable demos accompany the pipeline",
                10,
                2,
                vec![EvidenceRequirement::new(
                    EvidenceKind::DemoFiles,
                    EvidencePredicate::MinSources(2),
                )],
                PartialCredit::Denied,
            ),
        ],
    )
    .expect("data-pipeline rubric sums to its base score")
}
