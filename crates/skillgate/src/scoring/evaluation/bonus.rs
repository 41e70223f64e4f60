use serde::{Deserialize, Serialize};

use super::policy::ScoringPolicy;
use super::{EntrySource, ScoreEntry};
use crate::scoring::evidence::{EvidenceKind, EvidenceSet, EvidenceValue, SourceRef};

/// Bonus categories in truncation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusCategory {
    TechnicalExcellence,
    AdvancedFeatures,
    Innovation,
}

impl BonusCategory {
    pub const fn label(self) -> &'static str {
        match self {
            BonusCategory::TechnicalExcellence => "Technical Excellence",
            BonusCategory::AdvancedFeatures => "Advanced Features",
            BonusCategory::Innovation => "Innovation",
        }
    }

    const fn in_priority_order() -> [BonusCategory; 3] {
        [
            BonusCategory::TechnicalExcellence,
            BonusCategory::AdvancedFeatures,
            BonusCategory::Innovation,
        ]
    }
}

/// Independent scan for exceeds-expectation signals.
///
/// Each category re-verifies its own stronger predicate against the raw
/// evidence; base-criterion verdicts are never recycled. The total is
/// clamped to the policy cap by truncating in declared priority order so
/// identical inputs always truncate identically.
pub(crate) fn compute_bonuses(evidence: &EvidenceSet, policy: &ScoringPolicy) -> Vec<ScoreEntry> {
    let mut entries = Vec::new();
    let mut remaining = policy.bonus_cap;

    for category in BonusCategory::in_priority_order() {
        let Some((references, rationale)) = qualify(category, evidence) else {
            continue;
        };
        if remaining == 0 {
            break;
        }
        let points = policy.bonus_category_max.min(remaining);
        remaining -= points;
        entries.push(ScoreEntry {
            source: EntrySource::Bonus(category),
            points,
            max_points: policy.bonus_category_max,
            references,
            rationale,
        });
    }

    entries
}

fn qualify(category: BonusCategory, evidence: &EvidenceSet) -> Option<(Vec<SourceRef>, String)> {
    match category {
        BonusCategory::TechnicalExcellence => technical_excellence(evidence),
        BonusCategory::AdvancedFeatures => advanced_features(evidence),
        BonusCategory::Innovation => innovation(evidence),
    }
}

/// Multi-stage container builds or an unusually deep test suite.
fn technical_excellence(evidence: &EvidenceSet) -> Option<(Vec<SourceRef>, String)> {
    if let Some(entry) = evidence.get(EvidenceKind::DockerBuildStages) {
        if count_of(&entry.value) >= 2 {
            return Some((
                entry.sources.clone(),
                "multi-stage container build".to_string(),
            ));
        }
    }
    if let Some(entry) = evidence.get(EvidenceKind::TestFiles) {
        let count = count_of(&entry.value);
        if count >= 10 {
            return Some((
                entry.sources.clone(),
                format!("comprehensive test suite ({count} test files)"),
            ));
        }
    }
    None
}

/// Three or more advanced engineering topics evidenced in the submission.
fn advanced_features(evidence: &EvidenceSet) -> Option<(Vec<SourceRef>, String)> {
    let entry = evidence.get(EvidenceKind::AdvancedTopics)?;
    let count = count_of(&entry.value).max(entry.sources.len() as u64);
    if count >= 3 {
        return Some((
            entry.sources.clone(),
            format!("{count} advanced topics evidenced beyond the brief"),
        ));
    }
    None
}

/// Working demos backed by continuous integration.
fn innovation(evidence: &EvidenceSet) -> Option<(Vec<SourceRef>, String)> {
    let demos = evidence.get(EvidenceKind::DemoFiles)?;
    if demos.sources.len() < 2 {
        return None;
    }
    let ci = evidence.get(EvidenceKind::CiPipeline)?;
    if !is_truthy(&ci.value) {
        return None;
    }

    let mut references = demos.sources.clone();
    references.extend(ci.sources.iter().cloned());
    Some((
        references,
        "runnable demos maintained under continuous integration".to_string(),
    ))
}

fn count_of(value: &EvidenceValue) -> u64 {
    match value {
        EvidenceValue::Count(count) => *count,
        EvidenceValue::Flag(true) => 1,
        EvidenceValue::Flag(false) => 0,
        EvidenceValue::Metadata(map) => map.len() as u64,
    }
}

fn is_truthy(value: &EvidenceValue) -> bool {
    count_of(value) > 0
}
