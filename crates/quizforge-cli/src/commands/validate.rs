//! The `quizforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::loader;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = if bank_path.is_dir() {
        loader::load_bank_directory(&bank_path)?
    } else {
        let bank = loader::load_bank(&bank_path)?;
        vec![(bank_path, bank)]
    };

    anyhow::ensure!(!banks.is_empty(), "no loadable banks found");

    let mut total_warnings = 0;

    for (path, bank) in &banks {
        println!("Bank: {} ({} questions)", path.display(), bank.len());

        let warnings = loader::validate_bank(bank);
        for w in &warnings {
            let prefix = w
                .question_id
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
