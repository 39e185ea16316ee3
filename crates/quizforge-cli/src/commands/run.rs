//! The `quizforge run` command.
//!
//! Drives one session from line-based input. The transcript (questions,
//! prompts, feedback) goes to stderr; the final report goes to stdout.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizforge_core::evaluator::parse_keys;
use quizforge_core::loader::load_bank;
use quizforge_core::model::format_keys;
use quizforge_core::selection::{format_ranges, parse_selection, resolve};
use quizforge_core::session::QuestionView;
use quizforge_core::{NavigationMode, QuestionBank, ScoreReport, Session, SessionStatus};

use crate::config::{load_config_from, QuizforgeConfig};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    bank_path: Option<PathBuf>,
    range: Option<String>,
    mode: Option<String>,
    shuffle: bool,
    no_shuffle: bool,
    seed: Option<u64>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json" | "markdown" | "md"),
        "unknown report format '{format}' (expected text, json, or markdown)"
    );

    let config = load_config_from(config_path.as_deref())?;

    let bank_path = bank_path
        .or_else(|| config.bank.clone())
        .context("no question bank given: pass --bank or set `bank` in quizforge.toml")?;
    let mode: NavigationMode = match mode {
        Some(m) => m.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?,
        None => config.default_mode,
    };

    let bank = load_bank(&bank_path)?;

    let mut sequence = match &range {
        Some(expr) => {
            let parsed = parse_selection(expr);
            if !parsed.skipped().is_empty() {
                eprintln!("Ignored terms: {}", parsed.skipped().join(", "));
            }
            let resolved = resolve(&parsed, &bank);
            if !resolved.absent.is_empty() {
                eprintln!("Not in bank: {}", format_ranges(&resolved.absent));
            }
            resolved.sequence(&bank)?
        }
        None => bank.sequence(),
    };

    if let Order::Shuffled { seed } = question_order(shuffle, no_shuffle, seed, &config) {
        sequence = QuestionBank::from_shared(sequence)?.shuffle(seed).sequence();
    }

    let mut session = Session::new(mode);
    session.start(sequence)?;

    eprintln!(
        "quizforge v{}: {} question(s), {} mode",
        env!("CARGO_PKG_VERSION"),
        session.sequence().len(),
        mode
    );
    eprintln!("{}", help_line(mode));

    let stdin = io::stdin();
    let mut stderr = io::stderr();
    drive(&mut session, stdin.lock(), &mut stderr, config.show_feedback)?;

    let report = session.score()?;
    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        _ => print_summary(&report),
    }

    Ok(())
}

/// How the selected questions are ordered for the session.
#[derive(Debug, PartialEq, Eq)]
enum Order {
    AsSelected,
    Shuffled { seed: Option<u64> },
}

/// A seed on the command line implies a shuffle, and `--no-shuffle` wins
/// over the config file.
fn question_order(
    shuffle: bool,
    no_shuffle: bool,
    seed: Option<u64>,
    config: &QuizforgeConfig,
) -> Order {
    if no_shuffle {
        Order::AsSelected
    } else if shuffle || seed.is_some() || config.shuffle {
        Order::Shuffled {
            seed: seed.or(config.seed),
        }
    } else {
        Order::AsSelected
    }
}

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Answer(String),
    Next,
    Previous,
    Jump(usize),
    Reveal,
    Finish,
    Help,
    Blank,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Input {
        let line = line.trim();
        if line.is_empty() {
            return Input::Blank;
        }
        let Some(command) = line.strip_prefix(':') else {
            return Input::Answer(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("next" | "n"), None) => Input::Next,
            (Some("prev" | "p"), None) => Input::Previous,
            (Some("jump" | "j"), Some(n)) => match n.parse::<usize>() {
                Ok(n) if n >= 1 => Input::Jump(n - 1),
                _ => Input::Unknown(line.to_string()),
            },
            (Some("reveal" | "r"), None) => Input::Reveal,
            (Some("finish" | "quit" | "q"), None) => Input::Finish,
            (Some("help" | "h"), None) => Input::Help,
            _ => Input::Unknown(line.to_string()),
        }
    }
}

fn help_line(mode: NavigationMode) -> &'static str {
    match mode {
        NavigationMode::Sequential => "Answer with option letters (e.g. A or A,C). :quit ends early.",
        NavigationMode::Free => {
            "Answer with option letters (e.g. A or A,C). \
             :next :prev :jump N :reveal move around, :finish ends."
        }
    }
}

/// Run the session until it completes or input runs out.
fn drive(
    session: &mut Session,
    input: impl BufRead,
    out: &mut impl Write,
    show_feedback: bool,
) -> Result<()> {
    let mut lines = input.lines();
    let mut redraw = true;

    while session.status() == SessionStatus::InProgress {
        if redraw {
            if let Some(view) = session.current() {
                print_question(out, &view)?;
            }
        }
        redraw = true;

        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line.context("failed to read input")?;

        match Input::parse(&line) {
            Input::Blank => redraw = false,
            Input::Help => {
                writeln!(out, "{}", help_line(session.mode()))?;
                redraw = false;
            }
            Input::Unknown(cmd) => {
                writeln!(out, "! unknown command: {cmd}")?;
                redraw = false;
            }
            Input::Answer(text) => {
                let outcome = parse_keys(&text).and_then(|keys| session.submit_answer(keys));
                match outcome {
                    Ok(outcome) => {
                        if session.mode() == NavigationMode::Free && show_feedback {
                            if outcome.correct {
                                writeln!(out, "Correct.")?;
                            } else if let Ok(answer) = session.reveal() {
                                writeln!(out, "Incorrect. Answer: {}", format_keys(answer))?;
                            }
                        }
                        redraw = session.mode() == NavigationMode::Sequential;
                    }
                    Err(e) => {
                        writeln!(out, "! {e}")?;
                        redraw = false;
                    }
                }
            }
            Input::Next => match session.next_question() {
                Ok(true) => {}
                Ok(false) => {
                    writeln!(out, "Already at the last question.")?;
                    redraw = false;
                }
                Err(e) => {
                    writeln!(out, "! {e}")?;
                    redraw = false;
                }
            },
            Input::Previous => match session.previous_question() {
                Ok(true) => {}
                Ok(false) => {
                    writeln!(out, "Already at the first question.")?;
                    redraw = false;
                }
                Err(e) => {
                    writeln!(out, "! {e}")?;
                    redraw = false;
                }
            },
            Input::Jump(index) => {
                if let Err(e) = session.jump_to(index) {
                    writeln!(out, "! {e}")?;
                    redraw = false;
                }
            }
            Input::Reveal => {
                match session.reveal() {
                    Ok(answer) => writeln!(out, "Answer: {}", format_keys(answer))?,
                    Err(e) => writeln!(out, "! {e}")?,
                }
                redraw = false;
            }
            Input::Finish => {
                session.finish()?;
            }
        }
    }

    if session.status() == SessionStatus::InProgress {
        session.finish()?;
    }

    let progress = session.progress();
    writeln!(
        out,
        "Session complete: {}/{} answered.",
        progress.answered, progress.total
    )?;

    Ok(())
}

fn print_question(out: &mut impl Write, view: &QuestionView<'_>) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Question {}/{} (#{})",
        view.index + 1,
        view.total,
        view.id
    )?;
    writeln!(out, "{}", view.text)?;
    for (key, text) in view.options {
        writeln!(out, "  {key}) {text}")?;
    }
    if view.multi_answer {
        writeln!(out, "(select {} answers)", view.expected_selections)?;
    }
    if let Some(response) = view.response {
        writeln!(out, "(your answer: {})", format_keys(response))?;
    }
    Ok(())
}

fn print_summary(report: &ScoreReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct", "Result"]);

    for o in &report.outcomes {
        let submitted = o
            .submitted
            .as_ref()
            .map(format_keys)
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(o.id),
            Cell::new(&o.text),
            Cell::new(submitted),
            Cell::new(format_keys(&o.correct_answer)),
            Cell::new(if o.correct { "OK" } else { "WRONG" }),
        ]);
    }

    println!("{table}");
    println!(
        "Score: {}/{} correct ({}%)",
        report.correct_count, report.total, report.percentage
    );
}
