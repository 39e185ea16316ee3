//! The `quizforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizforge.toml
    if std::path::Path::new("quizforge.toml").exists() {
        println!("quizforge.toml already exists, skipping.");
    } else {
        std::fs::write("quizforge.toml", SAMPLE_CONFIG)?;
        println!("Created quizforge.toml");
    }

    // Create sample bank
    std::fs::create_dir_all("banks")?;
    let sample_path = std::path::Path::new("banks/sample.json");
    if sample_path.exists() {
        println!("banks/sample.json already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_BANK)?;
        println!("Created banks/sample.json");
    }

    println!("\nNext steps:");
    println!("  1. Add your questions to banks/sample.json");
    println!("  2. Run: quizforge validate --bank banks/sample.json");
    println!("  3. Run: quizforge run --bank banks/sample.json --range 1~3");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

# sequential (exam) or free (study)
default_mode = "sequential"
shuffle = false
# seed = 42
bank = "banks/sample.json"
show_feedback = true
"#;

const SAMPLE_BANK: &str = r#"[
  {
    "number": 1,
    "question": "Which HTTP method is idempotent by definition?",
    "options": { "A": "POST", "B": "PUT", "C": "PATCH", "D": "CONNECT" },
    "answer": "B"
  },
  {
    "number": 2,
    "question": "Which of the following are transport-layer protocols? (Choose two.)",
    "options": { "A": "TCP", "B": "HTTP", "C": "UDP", "D": "DNS" },
    "answer": "A,C"
  },
  {
    "number": 3,
    "question": "What does the acronym ACID stand for in databases?",
    "options": {
      "A": "Atomicity, Consistency, Isolation, Durability",
      "B": "Availability, Consistency, Integrity, Distribution",
      "C": "Atomicity, Concurrency, Integrity, Durability",
      "D": "Availability, Concurrency, Isolation, Distribution"
    },
    "answer": "A"
  }
]
"#;
