//! DesignCheck CLI - CAD design compliance analysis from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use designcheck::{
    load_intent, load_snapshot, retrieve_recent_lessons, AnalysisPipeline, AnalysisResult,
    Decision, DesignIntent, FeedbackRecord, FeedbackRecorder, JsonlFeedbackLog, MaterialRegistry,
    RuleEngine,
};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "designcheck")]
#[command(about = "CAD design compliance analysis tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a snapshot file against a rule set
    Analyze {
        /// Path to a snapshot JSON file
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Design intent JSON file providing reviewer context
        #[arg(long)]
        intent: Option<PathBuf>,

        /// Rule set JSON file (defaults to the embedded rules)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Material library JSON file (defaults to the embedded library)
        #[arg(long)]
        materials: Option<PathBuf>,

        /// Feedback log consulted for past accepted decisions
        #[arg(long, default_value = "feedback_log.jsonl")]
        log: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code when the snapshot is non-compliant
        #[arg(long)]
        fail_on_violations: bool,
    },

    /// Record a reviewer decision about an analysis
    Feedback {
        /// Reviewer decision
        #[arg(long, value_enum)]
        decision: DecisionArg,

        /// Free-form reviewer comment
        #[arg(long)]
        comments: Option<String>,

        /// Analysis the decision refers to
        #[arg(long, default_value = "latest")]
        analysis_id: String,

        /// Feedback log to append to
        #[arg(long, default_value = "feedback_log.jsonl")]
        log: PathBuf,
    },

    /// Show recent accepted-decision lessons from the feedback log
    Lessons {
        /// Feedback log to read
        #[arg(long, default_value = "feedback_log.jsonl")]
        log: PathBuf,

        /// Number of lessons to show
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// List the rules a snapshot would be evaluated against
    Rules {
        /// Rule set JSON file (defaults to the embedded rules)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Show bounds and messages
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
}

#[derive(Clone, ValueEnum)]
enum DecisionArg {
    Accepted,
    Rejected,
    Modified,
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Accepted => Decision::Accepted,
            DecisionArg::Rejected => Decision::Rejected,
            DecisionArg::Modified => Decision::Modified,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Analyze {
            snapshot,
            intent,
            rules,
            materials,
            log,
            format,
            fail_on_violations,
        } => handle_analyze(
            &snapshot,
            intent.as_deref(),
            rules.as_deref(),
            materials.as_deref(),
            &log,
            format,
            fail_on_violations,
        ),
        Commands::Feedback {
            decision,
            comments,
            analysis_id,
            log,
        } => handle_feedback(decision, comments, analysis_id, &log),
        Commands::Lessons { log, limit } => handle_lessons(&log, limit),
        Commands::Rules { rules, verbose } => handle_rules(rules.as_deref(), verbose),
    };

    process::exit(exit_code);
}

fn handle_analyze(
    snapshot_path: &std::path::Path,
    intent_path: Option<&std::path::Path>,
    rules_path: Option<&std::path::Path>,
    materials_path: Option<&std::path::Path>,
    log_path: &std::path::Path,
    format: OutputFormat,
    fail_on_violations: bool,
) -> i32 {
    let snapshot = match load_snapshot(snapshot_path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let intent = match intent_path {
        Some(path) => match load_intent(path) {
            Ok(intent) => intent,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        None => DesignIntent::new("unspecified"),
    };

    let engine = match rules_path {
        Some(path) => match RuleEngine::load_rules_file(path) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        None => RuleEngine::with_default_rules(),
    };

    let registry = match materials_path {
        Some(path) => match MaterialRegistry::load_materials_file(path) {
            Ok(registry) => registry,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        None => MaterialRegistry::with_default_materials(),
    };

    let pipeline =
        AnalysisPipeline::new(engine, registry, Arc::new(JsonlFeedbackLog::new(log_path)));

    match pipeline.analyze(&intent, &snapshot) {
        Ok(result) => {
            match format {
                OutputFormat::Human => output_human(snapshot_path, &result),
                OutputFormat::Json => output_json(&result),
            }
            if fail_on_violations && !result.compliance {
                return 1;
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_human(snapshot_path: &std::path::Path, result: &AnalysisResult) {
    println!("Snapshot: {}", snapshot_path.display());
    println!("{}", "─".repeat(60));
    println!(
        "Compliance: {}",
        if result.compliance { "PASS" } else { "FAIL" }
    );
    println!("Risk score: {:.2}", result.risk_score);
    match result.estimated_cost {
        Some(cost) => println!("Estimated cost: ${:.2}", cost),
        None => println!("Estimated cost: unavailable"),
    }
    match result.carbon_footprint_kg {
        Some(carbon) => println!("Carbon footprint: {:.2} kg CO2e", carbon),
        None => println!("Carbon footprint: unavailable"),
    }

    if !result.violations.is_empty() {
        println!("\nViolations ({}):", result.violations.len());
        for violation in &result.violations {
            println!("  - [{}] {}", violation.rule_id, violation.message);
            println!(
                "      current: {}, required: {}",
                violation.current, violation.required
            );
        }
    }

    if !result.suggested_parameter_updates.is_empty() {
        println!("\nSuggested parameter updates:");
        for (parameter, value) in &result.suggested_parameter_updates {
            println!("  {} -> {}", parameter, value);
        }
    }

    println!("\nReasoning: {}", result.explanation);
}

fn output_json(result: &AnalysisResult) {
    println!("{}", serde_json::to_string_pretty(result).unwrap());
}

fn handle_feedback(
    decision: DecisionArg,
    comments: Option<String>,
    analysis_id: String,
    log_path: &std::path::Path,
) -> i32 {
    let recorder = FeedbackRecorder::new(Arc::new(JsonlFeedbackLog::new(log_path)));

    let mut record = FeedbackRecord::new(analysis_id, decision.into());
    if let Some(comments) = comments {
        record = record.with_comments(comments);
    }

    match recorder.record(record) {
        Ok(ack) => {
            println!("Feedback {} at position {}", ack.status, ack.position);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_lessons(log_path: &std::path::Path, limit: usize) -> i32 {
    let log = JsonlFeedbackLog::new(log_path);
    let lessons = retrieve_recent_lessons(&log, limit);

    println!("Recent lessons:");
    for lesson in &lessons {
        println!("{}", lesson);
    }
    0
}

fn handle_rules(rules_path: Option<&std::path::Path>, verbose: bool) -> i32 {
    let engine = match rules_path {
        Some(path) => match RuleEngine::load_rules_file(path) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        None => RuleEngine::with_default_rules(),
    };

    println!("Rules ({}):\n", engine.rules().len());
    for rule in engine.rules() {
        println!("  {}", rule.id);
        println!("    parameter: {}", rule.parameter);
        if verbose {
            if let Some(min) = rule.min_value {
                println!("    min: {}", min);
            }
            if let Some(max) = rule.max_value {
                println!("    max: {}", max);
            }
            if let Some(allowed) = &rule.allowed_values {
                let listing = allowed
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("    allowed: {}", listing);
            }
            println!("    message: {}", rule.message);
        }
        println!();
    }
    0
}
