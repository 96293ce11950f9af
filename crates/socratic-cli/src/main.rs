use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use socratic_engine::simulator::{self, SimulatorConfig};
use socratic_engine::{
    AdvanceOutcome, DialogueConfig, DialogueSession, Intent, PendingInsight, Renderer,
};
use socratic_model::Dialogue;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "socratic", version, about = "Socratic dialogue navigation engine")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, validate and normalize a dialogue file
    Check {
        /// Dialogue file (.json, .yaml, .yml)
        dialogue: PathBuf,
    },
    /// Replay a script of intents against a dialogue
    Run {
        /// Dialogue config (.toml, .yaml, .yml, .json)
        #[arg(long)]
        config: PathBuf,
        /// Intent script (.yaml, .yml, .json)
        #[arg(long)]
        script: PathBuf,
        /// Dialogue file
        dialogue: PathBuf,
        /// Print outcomes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the dialogue simulator
    Simulate {
        /// Random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Number of intents to simulate
        #[arg(long, default_value_t = 10_000)]
        steps: u64,
        /// Paragraphs in the generated dialogue
        #[arg(long, default_value_t = 5)]
        paragraphs: usize,
        /// Upper bound on questions per paragraph
        #[arg(long, default_value_t = 4)]
        max_questions: usize,
        /// Stop simulation on first violation
        #[arg(long)]
        stop_on_violation: bool,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Prints outcomes the way the page would present them
struct ConsoleRenderer {
    json: bool,
}

impl Renderer for ConsoleRenderer {
    fn render(&mut self, outcome: &AdvanceOutcome) {
        if self.json {
            match serde_json::to_string(outcome) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!(error = %e, "failed to encode outcome"),
            }
            return;
        }

        if outcome.accepted {
            let marker = if outcome.completed {
                " (dialogue complete)"
            } else if outcome.crossed_paragraph_boundary {
                " (new paragraph)"
            } else {
                ""
            };
            println!("{:<10} -> {}{}", outcome.action, outcome.focus(), marker);
        } else if let Some(message) = &outcome.message {
            println!("{:<10} !! {}", outcome.action, message);
        } else {
            println!("{:<10} -- {}", outcome.action, outcome.focus());
        }
    }

    fn selection_changed(&mut self, pending: &PendingInsight) {
        if self.json {
            return;
        }
        match (&pending.category, pending.value) {
            (Some(category), Some(value)) => println!("selected   {category} ({value})"),
            (Some(category), None) => println!("selected   {category}"),
            (None, Some(value)) => println!("spotted    {value}"),
            (None, None) => {}
        }
    }
}

fn load_script(path: &Path) -> Result<Vec<Intent>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let script = if is_json {
        serde_json::from_str(&source).context("invalid JSON script")?
    } else {
        serde_yaml::from_str(&source).context("invalid YAML script")?
    };
    Ok(script)
}

fn check(path: &Path) -> Result<()> {
    let dialogue = Dialogue::from_path(path)
        .with_context(|| format!("failed to load dialogue {}", path.display()))?;

    println!("Dialogue: {}", dialogue.title);
    println!("Paragraphs: {}", dialogue.len());
    println!("Questions: {}", dialogue.question_count());
    println!("Insights: {}", dialogue.insights().count());
    for paragraph in &dialogue.paragraphs {
        let marker = if paragraph.is_active { "*" } else { " " };
        println!(
            "  {marker} {} ({} questions){}",
            paragraph.id,
            paragraph.questions.len(),
            paragraph
                .insight
                .as_ref()
                .map(|i| format!(" [{}]", i.category))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn run(config: &Path, script: &Path, dialogue: &Path, json: bool) -> Result<()> {
    let config = DialogueConfig::from_path(config)
        .with_context(|| format!("failed to load config {}", config.display()))?;
    let dialogue = Dialogue::from_path(dialogue)
        .with_context(|| format!("failed to load dialogue {}", dialogue.display()))?;
    let script = load_script(script)?;

    let mut session = DialogueSession::open(config, dialogue).context("failed to open session")?;
    let mut renderer = ConsoleRenderer { json };

    if !json {
        println!("{}", session.config().header);
        println!("Start at {}", session.focus());
        println!();
    }

    for (step, intent) in script.iter().enumerate() {
        session
            .dispatch(intent, &mut renderer)
            .with_context(|| format!("script step {} failed", step + 1))?;
    }

    tracing::info!(
        requests = session.journal().len(),
        accepted = session.journal().accepted_count(),
        "script replayed"
    );

    if !json {
        println!();
    }
    println!("{}", session.export_json()?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Check { dialogue } => check(&dialogue),
        Commands::Run {
            config,
            script,
            dialogue,
            json,
        } => run(&config, &script, &dialogue, json),
        Commands::Simulate {
            seed,
            steps,
            paragraphs,
            max_questions,
            stop_on_violation,
        } => {
            println!("Running Dialogue Simulator...");
            println!("Steps: {steps}");
            println!("Seed: {seed}");
            println!();

            let report = simulator::run(SimulatorConfig {
                seed,
                steps,
                paragraphs,
                max_questions,
                stop_on_first_violation: stop_on_violation,
                ..Default::default()
            });

            println!("{}", report.generate_text());

            std::process::exit(if report.passed() { 0 } else { 1 });
        }
    }
}
