//! End-to-end engine tests: load a bank, select from it, run sessions, score.

use quizforge_core::evaluator::parse_keys;
use quizforge_core::loader::{parse_bank_str, BankFormat};
use quizforge_core::selection::{format_ranges, parse_selection, resolve};
use quizforge_core::{
    InvalidAnswer, NavigationMode, QuestionBank, QuizError, Session, SessionStatus,
};

fn bank_json(n: u32) -> String {
    let records: Vec<String> = (1..=n)
        .map(|i| {
            let answer = if i % 2 == 0 { "A,C" } else { "B" };
            format!(
                r#"{{"number": {i}, "question": "Question {i}", "options": {{"A": "alpha", "B": "beta", "C": "gamma", "D": "delta"}}, "answer": "{answer}"}}"#
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

fn load(n: u32) -> QuestionBank {
    parse_bank_str(&bank_json(n), BankFormat::Json).unwrap()
}

fn correct_text(id: u32) -> &'static str {
    if id % 2 == 0 {
        "C, A"
    } else {
        "b"
    }
}

#[test]
fn exam_over_selected_range() {
    let bank = load(20);
    let parsed = parse_selection("1~3, oops, 19~25");
    let resolved = resolve(&parsed, &bank);

    assert_eq!(format_ranges(&resolved.present), "1~3,19~20");
    assert_eq!(format_ranges(&resolved.absent), "21~25");
    assert_eq!(parsed.skipped(), &["oops".to_string()]);

    let mut session = Session::new(NavigationMode::Sequential);
    session.start(resolved.sequence(&bank).unwrap()).unwrap();

    let mut seen_positions = Vec::new();
    while session.status() == SessionStatus::InProgress {
        seen_positions.push(session.position());
        let id = session.current().unwrap().id;
        session.submit_answer(parse_keys(correct_text(id)).unwrap()).unwrap();
    }

    assert_eq!(seen_positions, vec![0, 1, 2, 3, 4]);
    let report = session.score().unwrap();
    assert_eq!(report.total, 5);
    assert_eq!(report.correct_count, 5);
    assert_eq!(report.percentage, 100);
}

#[test]
fn ten_questions_six_correct_four_unanswered() {
    let bank = load(10);
    let mut session = Session::new(NavigationMode::Free);
    session.start(bank.sequence()).unwrap();

    for index in 0..6 {
        session.jump_to(index).unwrap();
        let id = session.current().unwrap().id;
        session.submit_answer(parse_keys(correct_text(id)).unwrap()).unwrap();
    }
    session.finish().unwrap();

    let report = session.score().unwrap();
    assert_eq!(report.correct_count, 6);
    assert_eq!(report.percentage, 60);
    assert_eq!(report.unanswered_ids(), vec![7, 8, 9, 10]);
}

#[test]
fn rejected_submission_leaves_session_untouched() {
    let bank = load(3);
    let mut session = Session::new(NavigationMode::Sequential);
    session.start(bank.sequence()).unwrap();

    // Question 1 is single-answer.
    let err = session
        .submit_answer(parse_keys("A,B").unwrap())
        .unwrap_err();
    assert_eq!(
        err,
        QuizError::InvalidAnswer(InvalidAnswer::TooManyForSingle { submitted: 2 })
    );
    assert!(session.responses().is_empty());
    assert_eq!(session.position(), 0);
    assert_eq!(session.status(), SessionStatus::InProgress);
}

#[test]
fn shuffled_retake_keeps_bank_intact() {
    let bank = load(8);
    let mut session = Session::new(NavigationMode::Sequential);
    session.start(bank.sequence()).unwrap();
    session.submit_answer(parse_keys("B").unwrap()).unwrap();
    session.finish().unwrap();
    assert_eq!(session.score().unwrap().correct_count, 1);

    let shuffled = bank.shuffle(Some(42));
    session.restart(Some(shuffled.sequence())).unwrap();
    assert_eq!(session.status(), SessionStatus::NotStarted);
    session.begin().unwrap();

    let first = session.current().unwrap().id;
    assert_eq!(first, shuffled.questions()[0].id());
    assert_eq!(session.score().unwrap().answered_count, 0);

    let original: Vec<u32> = bank.ids().collect();
    assert_eq!(original, (1..=8).collect::<Vec<_>>());
}

#[test]
fn empty_selection_refuses_session() {
    let bank = load(5);
    let resolved = resolve(&parse_selection("100~105, nope"), &bank);
    assert!(resolved.present.is_empty());

    let mut session = Session::new(NavigationMode::Sequential);
    let err = session.start(resolved.sequence(&bank).unwrap()).unwrap_err();
    assert_eq!(err, QuizError::EmptySelection);
}
