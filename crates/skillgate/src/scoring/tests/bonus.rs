use super::common::*;
use crate::scoring::evaluation::{
    BonusCategory, EntrySource, EvaluationEngine, ScoringPolicy,
};
use crate::scoring::evidence::{EvidenceKind, EvidenceSet, EvidenceValue};

fn bonus_categories(result: &crate::scoring::evaluation::EvaluationResult) -> Vec<BonusCategory> {
    result
        .bonus_entries()
        .map(|entry| match entry.source {
            EntrySource::Bonus(category) => category,
            EntrySource::Criterion(_) => panic!("criterion entry in bonus listing"),
        })
        .collect()
}

#[test]
fn strong_submission_earns_all_three_bonuses_in_priority_order() {
    let result = engine().evaluate(&evidence_strong()).expect("evaluates");

    let categories = bonus_categories(&result);
    assert_eq!(
        categories,
        vec![
            BonusCategory::TechnicalExcellence,
            BonusCategory::AdvancedFeatures,
            BonusCategory::Innovation,
        ]
    );
    assert_eq!(result.bonus_score, 15);
    assert!(result
        .bonus_entries()
        .all(|entry| entry.points == 5 && !entry.references.is_empty()));
}

#[test]
fn no_evidence_earns_no_bonus() {
    let result = engine().evaluate(&evidence_empty()).expect("evaluates");
    assert_eq!(result.bonus_entries().count(), 0);
    assert_eq!(result.bonus_score, 0);
}

#[test]
fn bonus_overflow_truncates_in_priority_order() {
    // Inflated per-category value: 6 + 6 + 6 would exceed the cap, so the
    // lowest-priority category is clamped to the remaining budget.
    let policy = ScoringPolicy {
        bonus_category_max: 6,
        ..ScoringPolicy::default()
    };
    let engine = EvaluationEngine::new(general_definition(), policy);
    let result = engine.evaluate(&evidence_strong()).expect("evaluates");

    let points: Vec<u32> = result.bonus_entries().map(|entry| entry.points).collect();
    assert_eq!(points, vec![6, 6, 3]);
    assert_eq!(result.bonus_score, 15);
}

#[test]
fn deep_test_suite_qualifies_technical_excellence_without_docker() {
    let evidence = EvidenceSet::from_entries(vec![entry(
        EvidenceKind::TestFiles,
        EvidenceValue::Count(11),
        vec![source("tests/test_core.py")],
    )])
    .expect("evidence is well-formed");

    let result = engine().evaluate(&evidence).expect("evaluates");
    let categories = bonus_categories(&result);
    assert_eq!(categories, vec![BonusCategory::TechnicalExcellence]);
    assert!(result
        .bonus_entries()
        .next()
        .expect("one bonus entry")
        .rationale
        .contains("11 test files"));
}

#[test]
fn innovation_requires_both_demos_and_ci() {
    let demos_only = EvidenceSet::from_entries(vec![entry(
        EvidenceKind::DemoFiles,
        EvidenceValue::Count(2),
        vec![source("demos/a.py"), source("demos/b.py")],
    )])
    .expect("evidence is well-formed");

    let result = engine().evaluate(&demos_only).expect("evaluates");
    assert!(bonus_categories(&result).is_empty());

    let demos_and_ci = EvidenceSet::from_entries(vec![
        entry(
            EvidenceKind::DemoFiles,
            EvidenceValue::Count(2),
            vec![source("demos/a.py"), source("demos/b.py")],
        ),
        entry(
            EvidenceKind::CiPipeline,
            EvidenceValue::Flag(true),
            vec![source(".github/workflows/ci.yml")],
        ),
    ])
    .expect("evidence is well-formed");

    let result = engine().evaluate(&demos_and_ci).expect("evaluates");
    assert_eq!(bonus_categories(&result), vec![BonusCategory::Innovation]);
    let innovation = result.bonus_entries().next().expect("one bonus entry");
    assert!(innovation
        .references
        .iter()
        .any(|reference| reference.path.contains("workflows")));
}
