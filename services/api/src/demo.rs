use crate::infra::{load_catalog, InMemoryEvaluationRepository, LoggingResultPublisher};
use clap::Args;
use skillgate::config::AppConfig;
use skillgate::error::AppError;
use skillgate::scoring::{
    EvaluationService, EvidenceEntry, EvidenceKind, EvidenceSet, EvidenceValue, LineRange,
    ScoringPolicy, SourceRef,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Challenge rubric to score against (defaults to general-engineering)
    #[arg(long)]
    pub(crate) challenge: Option<String>,
    /// Path to an evidence JSON document. Defaults to a bundled sample.
    #[arg(long)]
    pub(crate) evidence: Option<PathBuf>,
}

pub(crate) fn run_challenges() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(&config)?;

    println!("Available challenge rubrics");
    for summary in catalog.summaries() {
        println!(
            "- {} ({}) | base score {} | {} criteria",
            summary.id, summary.name, summary.base_score, summary.criteria
        );
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        challenge,
        evidence,
    } = args;

    let config = AppConfig::load()?;
    let catalog = load_catalog(&config)?;
    let challenge = challenge.unwrap_or_else(|| "general-engineering".to_string());
    let evidence = match evidence {
        Some(path) => load_evidence(&path)?,
        None => sample_evidence(),
    };

    let repository = Arc::new(InMemoryEvaluationRepository::default());
    let publisher = Arc::new(LoggingResultPublisher);
    let service = EvaluationService::new(
        catalog,
        ScoringPolicy::default(),
        repository,
        publisher,
    );

    let record = service.evaluate(&challenge, &evidence)?;
    let scorecard = record.result.scorecard();

    println!("Evaluation {} ({})", record.evaluation_id.0, challenge);
    println!("Evaluated at: {}", record.evaluated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "Raw {}/{} ({:.1}%) | bonus +{} | final {}",
        scorecard.raw_score,
        scorecard.base_score,
        scorecard.percentage,
        scorecard.bonus_score,
        scorecard.final_score
    );
    println!("Recommendation: {}", scorecard.recommendation_label);

    println!("\nScore breakdown");
    for line in &scorecard.lines {
        println!("- {}: {}/{}", line.label, line.points, line.max_points);
    }

    println!("\nEvidence citations");
    for block in record.result.citation_blocks() {
        println!("- {} ({} pts): {}", block.label, block.points, block.rationale);
        for citation in &block.citations {
            println!("    {citation}");
        }
    }

    Ok(())
}

fn load_evidence(path: &PathBuf) -> Result<EvidenceSet, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| {
        AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("failed to parse evidence document '{}': {err}", path.display()),
        ))
    })
}

/// A plausible strong submission used when no evidence file is given. The
/// missing container evidence leaves one criterion at its floor so the demo
/// output shows both full and conservative awards.
fn sample_evidence() -> EvidenceSet {
    let entries = vec![
        EvidenceEntry::new(
            EvidenceKind::SourceLayout,
            EvidenceValue::Flag(true),
            vec![SourceRef::file("src/pipeline/mod.rs")],
        ),
        EvidenceEntry::new(
            EvidenceKind::ReadmeSections,
            EvidenceValue::Count(5),
            vec![SourceRef {
                path: "README.md".to_string(),
                lines: Some(LineRange { start: 1, end: 120 }),
                snippet: Some("## Setup\n## Usage\n## Architecture".to_string()),
            }],
        ),
        EvidenceEntry::new(
            EvidenceKind::SetupInstructions,
            EvidenceValue::Flag(true),
            vec![SourceRef {
                path: "README.md".to_string(),
                lines: Some(LineRange { start: 12, end: 30 }),
                snippet: Some("cargo run --release".to_string()),
            }],
        ),
        EvidenceEntry::new(
            EvidenceKind::TestDirectory,
            EvidenceValue::Flag(true),
            vec![SourceRef::file("tests/")],
        ),
        EvidenceEntry::new(
            EvidenceKind::TestFiles,
            EvidenceValue::Count(7),
            vec![SourceRef::file("tests/integration.rs")],
        ),
        EvidenceEntry::new(
            EvidenceKind::DependencyManifest,
            EvidenceValue::Count(6),
            vec![SourceRef::file("Cargo.toml")],
        ),
        EvidenceEntry::new(
            EvidenceKind::CiPipeline,
            EvidenceValue::Flag(true),
            vec![SourceRef::file(".github/workflows/ci.yml")],
        ),
    ];

    EvidenceSet::from_entries(entries).expect("sample evidence is well-formed")
}
