//! The `quizforge select` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::loader::load_bank;
use quizforge_core::selection::{format_ranges, parse_selection, resolve};

pub fn execute(bank_path: PathBuf, range: String) -> Result<()> {
    let bank = load_bank(&bank_path)?;
    let parsed = parse_selection(&range);
    let resolved = resolve(&parsed, &bank);

    println!(
        "Requested: {} ({} ids)",
        display_or_none(&format_ranges(parsed.ids())),
        parsed.len()
    );
    println!(
        "Selected:  {} ({} questions)",
        display_or_none(&format_ranges(&resolved.present)),
        resolved.present.len()
    );
    if !resolved.absent.is_empty() {
        println!(
            "Not in bank: {} ({} ids)",
            format_ranges(&resolved.absent),
            resolved.absent.len()
        );
    }
    if !parsed.skipped().is_empty() {
        println!("Ignored terms: {}", parsed.skipped().join(", "));
    }

    Ok(())
}

fn display_or_none(s: &str) -> &str {
    if s.is_empty() {
        "(none)"
    } else {
        s
    }
}
