use clap::{Parser, Subcommand};

mod dataset;
mod diagnostics;
mod interpret;
mod listen;
mod render;
mod session;
mod spec;
mod vocab;

use anyhow::Context;
use dataset::Dataset;
use listen::{LineTranscriber, ListenError, Transcriber};
use render::{HtmlRenderer, LogRenderer, PlotCall, Renderer};
use session::{Outcome, Session};
use spec::GraphSpec;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vocab::Vocabulary;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "ggspeak")]
#[command(about = "Graph a dataset by voice", long_about = None)]
struct Cli {
    /// Debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a session: one transcript per line on stdin (or from --script).
    Run {
        /// Dataset description (dataset.json).
        #[arg(long)]
        dataset: String,

        /// Keyword vocabulary override; see `ggspeak vocab`.
        #[arg(long)]
        vocab: Option<String>,

        /// Replay transcripts from a file instead of stdin.
        #[arg(long)]
        script: Option<String>,

        /// Write each new plot to this HTML file.
        #[arg(short = 'o', long)]
        out: Option<String>,

        /// Directory for specs written by "save".
        #[arg(long, default_value = ".")]
        save_dir: String,
    },

    /// Print the built-in vocabulary as JSON.
    Vocab,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.cmd {
        Commands::Run {
            dataset: dataset_path,
            vocab,
            script,
            out,
            save_dir,
        } => {
            let vocab = match vocab {
                Some(path) => Vocabulary::load(&path)?,
                None => Vocabulary::default(),
            };

            introduction();

            // A missing dataset does not end the program; the session just
            // reports it on every update until the speaker quits.
            let mut session = match dataset::load_dataset_file(&dataset_path) {
                Ok(ds) => Session::new(Arc::new(ds), vocab)?,
                Err(err) => {
                    log::error!("{:#}", err);
                    println!("No dataset loaded. Say 'quit' to stop.");
                    Session::detached(vocab)?
                }
            };
            if let Some(ds) = session.base().dataset() {
                preview(ds);
            }

            let mut transcriber: Box<dyn Transcriber> = match script {
                Some(path) => {
                    let file = File::open(&path).with_context(|| {
                        diagnostics::error_message(format!("open script {}", path))
                    })?;
                    Box::new(LineTranscriber::new(BufReader::new(file)))
                }
                None => Box::new(LineTranscriber::new(io::stdin().lock()).with_prompt()),
            };
            let mut renderer: Box<dyn Renderer> = match out {
                Some(path) => Box::new(HtmlRenderer::new(path)),
                None => Box::new(LogRenderer),
            };

            run_session(
                &mut session,
                transcriber.as_mut(),
                renderer.as_mut(),
                Path::new(&save_dir),
            );
        }
        Commands::Vocab => {
            println!("{}", serde_json::to_string_pretty(&Vocabulary::default())?);
        }
    }

    Ok(())
}

fn introduction() {
    println!("\n\n----------- GGSPEAK: Graph by Voice ------------");
    println!("e.g. \"Give me a plot of _____ versus _____\"");
}

fn preview(dataset: &Dataset) {
    println!("\nYou are using the dataset {}", dataset.name());
    println!("Available variables:");
    for column in dataset.columns() {
        println!("  {} ({})", column.name, column.kind);
    }

    let names: Vec<&str> = dataset.column_names().collect();
    let rows = dataset.rows(&names);
    if rows.is_empty() {
        return;
    }
    println!("Data preview:");
    println!("  {}", names.join("\t"));
    for row in rows.iter().take(5) {
        let cells: Vec<String> = names
            .iter()
            .map(|n| match row.get(*n) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(v) => v.to_string(),
                None => String::new(),
            })
            .collect();
        println!("  {}", cells.join("\t"));
    }
}

/// Consecutive transcription I/O failures after which the source is treated
/// as gone.
const MAX_LISTEN_FAILURES: usize = 3;

/// Turn loop. Only a quit intent (or the transcript source going away) ends it.
fn run_session(
    session: &mut Session,
    transcriber: &mut dyn Transcriber,
    renderer: &mut dyn Renderer,
    save_dir: &Path,
) {
    let mut saved = 0usize;
    let mut failures = 0usize;
    loop {
        let text = match transcriber.listen() {
            Ok(text) => {
                failures = 0;
                text
            }
            Err(ListenError::Closed) => {
                log::info!("transcript source closed; ending session");
                break;
            }
            Err(ListenError::NotUnderstood) => {
                failures = 0;
                println!("Didn't catch that.");
                continue;
            }
            Err(err) => {
                log::error!("{}", err);
                failures += 1;
                if failures >= MAX_LISTEN_FAILURES {
                    log::error!(
                        "transcript source failed {} times in a row; ending session",
                        failures
                    );
                    break;
                }
                continue;
            }
        };

        let turn = session.turn(&text);
        if turn.tokens.is_empty() {
            continue;
        }
        log::debug!("intent: {:?}", turn.intent);
        println!("You said: {}", text);
        for d in &turn.diagnostics {
            println!("  {}", d);
        }

        match turn.outcome {
            Outcome::Silent | Outcome::Unchanged => {}
            Outcome::Quit => {
                println!("Goodbye");
                break;
            }
            Outcome::Save(spec) => {
                match save_spec(save_dir, saved + 1, &spec) {
                    Ok(path) => {
                        saved += 1;
                        println!("Saved {}", path.display());
                    }
                    Err(err) => log::error!("{:#}", err),
                }
            }
            Outcome::Reset => println!("Starting over from an empty graph."),
            Outcome::Summary(text) => println!("{}", text),
            Outcome::Updated(spec) => {
                println!("Relevant variables: [{}]", spec.primary_columns.join(", "));
                draw(&spec, renderer);
            }
            Outcome::RolledBack { rejected, reason } => {
                println!("That is not a valid graph ({}); starting over.", reason);
                println!("{}", rejected.summary());
            }
        }
    }
}

fn draw(spec: &GraphSpec, renderer: &mut dyn Renderer) {
    let (Some(call), Some(dataset)) = (PlotCall::build(spec), spec.dataset()) else {
        return;
    };
    if let Err(err) = renderer.render(&call, dataset) {
        log::error!("{:#}", err);
    }
}

/// Write `spec` as pretty JSON to `<dir>/ggspeak-<n>.json`.
fn save_spec(dir: &Path, n: usize, spec: &GraphSpec) -> Result<PathBuf> {
    let path = dir.join(format!("ggspeak-{}.json", n));
    let json = serde_json::to_string_pretty(spec)?;
    std::fs::write(&path, json).with_context(|| {
        diagnostics::error_message(format!("write saved spec {}", path.display()))
    })?;
    Ok(path)
}
