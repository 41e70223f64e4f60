use tracing::warn;

use super::{EntrySource, ScoreEntry};
use crate::scoring::challenge::{
    validate_criterion, ConfigurationError, Criterion, EvidencePredicate, PartialCredit,
};
use crate::scoring::evidence::{EvidenceEntry, EvidenceSet, EvidenceValue, SourceRef};

/// How strongly one evidence entry supports a requirement.
enum Signal {
    /// The evidence kind is absent from the set.
    Unsupported,
    /// The kind is present but its value outright fails the predicate.
    Failed,
    Partial {
        observed: u64,
        required: u64,
        sources: Vec<SourceRef>,
    },
    Full {
        sources: Vec<SourceRef>,
    },
}

/// Checkpoint evaluator: pure function of one criterion and the evidence set.
///
/// Zero-guessing policy: no evidence means the criterion floor, never
/// default credit, and conflicting signals always resolve downward.
pub(crate) fn score_criterion(
    criterion: &Criterion,
    evidence: &EvidenceSet,
) -> Result<ScoreEntry, ConfigurationError> {
    validate_criterion(criterion)?;

    let mut full: Option<Vec<SourceRef>> = None;
    let mut partial: Option<(u64, u64, Vec<SourceRef>)> = None;
    let mut failed = false;
    for requirement in &criterion.requirements {
        match inspect(evidence.get(requirement.kind), requirement.predicate, criterion) {
            Signal::Unsupported => {}
            Signal::Failed => failed = true,
            Signal::Partial {
                observed,
                required,
                sources,
            } => {
                // Widened cross-multiplication: analyzer counts are
                // unbounded u64 values.
                let stronger = match &partial {
                    Some((prev_observed, prev_required, _)) => {
                        u128::from(observed) * u128::from(*prev_required)
                            > u128::from(*prev_observed) * u128::from(required)
                    }
                    None => true,
                };
                if stronger {
                    partial = Some((observed, required, sources));
                }
            }
            Signal::Full { sources } => {
                // Exact match beats partial; first full match in declared order wins.
                if full.is_none() {
                    full = Some(sources);
                }
            }
        }
    }

    let supported = full.is_some() || partial.is_some();
    if failed && supported {
        warn!(
            criterion = %criterion.id.0,
            "conflicting evidence signals, scoring at the floor"
        );
        return Ok(floor_entry(
            criterion,
            "conflicting evidence signals, scored conservatively",
        ));
    }

    if let Some(sources) = full {
        return Ok(ScoreEntry {
            source: EntrySource::Criterion(criterion.id.clone()),
            points: criterion.max_points,
            max_points: criterion.max_points,
            references: sources,
            rationale: format!("requirement fully satisfied: {}", criterion.description),
        });
    }

    if let Some((observed, required, sources)) = partial {
        return Ok(partial_entry(criterion, observed, required, sources));
    }

    Ok(floor_entry(criterion, "no evidence found"))
}

fn inspect(
    entry: Option<&EvidenceEntry>,
    predicate: EvidencePredicate,
    criterion: &Criterion,
) -> Signal {
    let Some(entry) = entry else {
        return Signal::Unsupported;
    };

    match predicate {
        EvidencePredicate::Present => match &entry.value {
            EvidenceValue::Flag(true) => Signal::Full {
                sources: entry.sources.clone(),
            },
            EvidenceValue::Metadata(map) if !map.is_empty() => Signal::Full {
                sources: entry.sources.clone(),
            },
            EvidenceValue::Count(count) if *count > 0 => Signal::Full {
                sources: entry.sources.clone(),
            },
            // An empty metadata map is a weak signal, not presence.
            EvidenceValue::Flag(false)
            | EvidenceValue::Count(_)
            | EvidenceValue::Metadata(_) => Signal::Failed,
        },
        EvidencePredicate::MinCount(required) => match &entry.value {
            EvidenceValue::Count(count) if *count >= required => Signal::Full {
                sources: entry.sources.clone(),
            },
            EvidenceValue::Count(count) if *count > 0 => Signal::Partial {
                observed: *count,
                required,
                sources: entry.sources.clone(),
            },
            EvidenceValue::Count(_) => Signal::Failed,
            other => {
                warn!(
                    criterion = %criterion.id.0,
                    kind = %entry.kind,
                    value = ?other,
                    "evidence value shape does not match count predicate"
                );
                Signal::Failed
            }
        },
        EvidencePredicate::MinSources(required) => {
            let observed = entry.sources.len();
            if observed >= required {
                Signal::Full {
                    sources: entry.sources.clone(),
                }
            } else {
                Signal::Partial {
                    observed: observed as u64,
                    required: required as u64,
                    sources: entry.sources.clone(),
                }
            }
        }
    }
}

fn partial_entry(
    criterion: &Criterion,
    observed: u64,
    required: u64,
    sources: Vec<SourceRef>,
) -> ScoreEntry {
    let points = match &criterion.partial_credit {
        PartialCredit::Denied => criterion.floor,
        PartialCredit::Linear => {
            let span = u128::from(criterion.max_points - criterion.floor);
            // Integer division rounds down; observed < required keeps the
            // earned share below span, so the cast back to u32 is lossless.
            let earned = span * u128::from(observed) / u128::from(required);
            criterion.floor + earned as u32
        }
        PartialCredit::Tiered(tiers) => tiers
            .iter()
            .filter(|tier| tier.at_least <= observed)
            .map(|tier| tier.points)
            .max()
            .unwrap_or(criterion.floor)
            .clamp(criterion.floor, criterion.max_points),
    };

    if points <= criterion.floor {
        return floor_entry(criterion, "evidence below required threshold");
    }

    ScoreEntry {
        source: EntrySource::Criterion(criterion.id.clone()),
        points,
        max_points: criterion.max_points,
        references: sources,
        rationale: format!(
            "partial evidence: {observed} of {required} required for '{}'",
            criterion.id.0
        ),
    }
}

fn floor_entry(criterion: &Criterion, rationale: &str) -> ScoreEntry {
    ScoreEntry {
        source: EntrySource::Criterion(criterion.id.clone()),
        points: criterion.floor,
        max_points: criterion.max_points,
        references: Vec::new(),
        rationale: rationale.to_string(),
    }
}
