use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Facts the repository analyzer can report about a submission.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    SourceLayout,
    ReadmeSections,
    SetupInstructions,
    UsageExamples,
    ApiDocs,
    TestDirectory,
    TestFiles,
    DependencyManifest,
    Dockerfile,
    DockerBuildStages,
    CiPipeline,
    DemoFiles,
    ErrorHandling,
    AdvancedTopics,
}

impl EvidenceKind {
    pub const fn label(self) -> &'static str {
        match self {
            EvidenceKind::SourceLayout => "source_layout",
            EvidenceKind::ReadmeSections => "readme_sections",
            EvidenceKind::SetupInstructions => "setup_instructions",
            EvidenceKind::UsageExamples => "usage_examples",
            EvidenceKind::ApiDocs => "api_docs",
            EvidenceKind::TestDirectory => "test_directory",
            EvidenceKind::TestFiles => "test_files",
            EvidenceKind::DependencyManifest => "dependency_manifest",
            EvidenceKind::Dockerfile => "dockerfile",
            EvidenceKind::DockerBuildStages => "docker_build_stages",
            EvidenceKind::CiPipeline => "ci_pipeline",
            EvidenceKind::DemoFiles => "demo_files",
            EvidenceKind::ErrorHandling => "error_handling",
            EvidenceKind::AdvancedTopics => "advanced_topics",
        }
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Concrete location in the analyzed repository backing an evidence entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<LineRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl SourceRef {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            lines: None,
            snippet: None,
        }
    }

    /// Compact `path:start-end` citation for downstream prose generation.
    pub fn citation(&self) -> String {
        match &self.lines {
            Some(range) => format!("{}:{}-{}", self.path, range.start, range.end),
            None => self.path.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

/// Shape of the value an analyzer attached to an evidence kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceValue {
    Flag(bool),
    Count(u64),
    Metadata(BTreeMap<String, String>),
}

/// One analyzer finding. Reference-list evidence is expressed as a
/// `Count` of its own source references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    pub kind: EvidenceKind,
    pub value: EvidenceValue,
    pub sources: Vec<SourceRef>,
}

impl EvidenceEntry {
    pub fn new(kind: EvidenceKind, value: EvidenceValue, sources: Vec<SourceRef>) -> Self {
        Self {
            kind,
            value,
            sources,
        }
    }
}

/// Validated, immutable collection of analyzer findings.
///
/// Construction is the only mutation point: entries without a traceable
/// source reference never make it into a set, which is what keeps every
/// awarded point citable downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<EvidenceEntry>", into = "Vec<EvidenceEntry>")]
pub struct EvidenceSet {
    entries: BTreeMap<EvidenceKind, EvidenceEntry>,
}

impl EvidenceSet {
    pub fn from_entries(entries: Vec<EvidenceEntry>) -> Result<Self, EvidenceError> {
        let mut validated = BTreeMap::new();
        for entry in entries {
            if entry.sources.is_empty() {
                return Err(EvidenceError::MissingSource { kind: entry.kind });
            }
            let kind = entry.kind;
            if validated.insert(kind, entry).is_some() {
                return Err(EvidenceError::DuplicateEntry { kind });
            }
        }
        Ok(Self { entries: validated })
    }

    pub fn get(&self, kind: EvidenceKind) -> Option<&EvidenceEntry> {
        self.entries.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EvidenceEntry> {
        self.entries.values()
    }
}

impl TryFrom<Vec<EvidenceEntry>> for EvidenceSet {
    type Error = EvidenceError;

    fn try_from(entries: Vec<EvidenceEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<EvidenceSet> for Vec<EvidenceEntry> {
    fn from(set: EvidenceSet) -> Self {
        set.entries.into_values().collect()
    }
}

/// Structural failures in supplied evidence. Always fatal to the evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    #[error("evidence entry '{kind}' carries no source reference")]
    MissingSource { kind: EvidenceKind },
    #[error("evidence entry '{kind}' supplied more than once")]
    DuplicateEntry { kind: EvidenceKind },
    #[error("score entry '{entry}' awards {points} points without a citable reference")]
    UnsupportedAward { entry: String, points: u32 },
}
