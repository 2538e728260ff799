// Integration tests for the mastermind crate
// These tests verify that all modules work together correctly

use mastermind::cli::{CliInterface, format_code};
use mastermind::settings::write_settings;
use mastermind::*;
use std::io::Cursor;

fn options(
    colors: usize,
    len: usize,
    dup: bool,
    rounds: Option<usize>,
    seed: u64,
) -> SessionOptions {
    SessionOptions {
        rules: Rules::new(colors, len, dup).unwrap(),
        max_rounds: rounds,
        seed: Some(seed),
    }
}

fn secret_for(options: &SessionOptions) -> Code {
    Session::start(options).unwrap().reveal().clone()
}

#[test]
fn test_end_to_end_cli_win() {
    // Same seed, same secret: the first game of the loop uses it unchanged
    let opts = options(6, 4, true, None, 2024);
    let secret = secret_for(&opts);

    let input = format!("{}\n", format_code(&secret));
    let mut interface = CliInterface::new(Cursor::new(input));
    let summary = game_loop(&opts, &mut interface).unwrap();

    assert_eq!(summary.won, 1);
    assert_eq!(summary.lost, 0);
}

#[test]
fn test_end_to_end_cli_loss_then_new_game() {
    let opts = options(4, 3, false, Some(2), 5);
    let secret = secret_for(&opts);
    let wrong: Code = Code::new(secret.symbols().iter().map(|s| (s + 1) % 4).collect());

    // Two wrong guesses use up the budget, a third is refused, then a fresh game starts
    let line = format_code(&wrong);
    let input = format!("{line}\n{line}\n{line}\nnext\nexit\n");
    let mut interface = CliInterface::new(Cursor::new(input));
    let summary = game_loop(&opts, &mut interface).unwrap();

    assert_eq!(summary.lost, 1);
    assert_eq!(summary.won, 0);
    assert_eq!(summary.abandoned, 0);
}

#[test]
fn test_end_to_end_cli_rejects_bad_guesses() {
    let opts = options(6, 4, false, None, 9);
    // Wrong length, repeated symbol, out-of-range symbol, garbage: none reach the session
    let input = "012\n0012\n0129\n??\nexit\n";
    let mut interface = CliInterface::new(Cursor::new(input));
    let summary = game_loop(&opts, &mut interface).unwrap();
    assert_eq!(summary, GameSummary::default());
}

#[test]
fn test_concrete_scoring_scenarios() {
    let secret = Code::from([1, 2, 3, 4]);

    let fb = score(&secret, &Code::from([4, 3, 2, 1])).unwrap();
    assert_eq!((fb.blacks(), fb.whites(), fb.nones()), (0, 4, 0));

    let fb = score(&secret, &Code::from([1, 2, 4, 3])).unwrap();
    assert_eq!((fb.blacks(), fb.whites(), fb.nones()), (2, 2, 0));

    let fb = score(&Code::from([1, 1, 2, 2]), &Code::from([1, 2, 1, 2])).unwrap();
    assert_eq!((fb.blacks(), fb.whites(), fb.nones()), (2, 2, 0));
}

#[test]
fn test_small_universe_matches_brute_force_for_every_pair() {
    let rules = Rules::new(3, 2, false).unwrap();
    let universe = enumerate_universe(&rules);
    assert_eq!(universe.len(), 6);

    for secret in &universe {
        for guess in &universe {
            let mut space = CodeSpace::with_secret(rules, secret.clone()).unwrap();
            let (feedback, before) = space.submit_guess(guess).unwrap();
            assert_eq!(before, 6);

            let expected = universe
                .iter()
                .filter(|c| score(c, guess).unwrap() == feedback)
                .count();
            assert_eq!(space.remaining_count(), expected, "secret {secret}, guess {guess}");
            assert!(space.contains(secret));
        }
    }
}

#[test]
fn test_session_progression_shrinks_and_wins() {
    let opts = options(6, 4, true, Some(10), 77);
    let mut session = Session::start(&opts).unwrap();
    let secret = session.reveal().clone();
    let mut previous = session.remaining_count();
    assert_eq!(previous, 1296);

    for guess in [[0, 0, 1, 1], [2, 2, 3, 3], [4, 4, 5, 5]] {
        let report = session.submit_guess(&Code::from(guess)).unwrap();
        if report.feedback.is_win() {
            break;
        }
        assert_eq!(report.remaining_before, previous);
        assert!(session.remaining_count() <= previous);
        assert!(session.is_candidate(&secret));
        previous = session.remaining_count();
    }

    if !session.is_won() {
        let report = session.submit_guess(&secret).unwrap();
        assert!(report.feedback.is_win());
    }
    assert!(session.is_won());
    assert_eq!(session.state(), SessionState::Won);
    assert_eq!(session.remaining_count(), 1);
}

#[test]
fn test_create_session_defaults() {
    let session = create_session(6, 4, false).unwrap();
    assert_eq!(session.remaining_count(), 360);
    assert_eq!(session.state(), SessionState::NotStarted);
    assert!(!session.is_won());
    // round(0.75 * ln(6^4) + 2)
    assert_eq!(session.max_rounds(), 7);
    assert!(session.rules().admits(session.reveal()));
}

#[test]
fn test_create_session_configuration_errors() {
    for (colors, len, dup) in [(0, 4, true), (6, 0, true), (3, 4, false), (10, 9, true)] {
        let result = create_session(colors, len, dup);
        assert!(
            matches!(result, Err(EngineError::Configuration { .. })),
            "{colors} colors, length {len}, duplicates {dup}"
        );
    }
}

#[test]
fn test_settings_file_to_game() {
    let path = std::env::temp_dir().join("mastermind_integration_settings.toml");
    let stored = Settings {
        colors: 4,
        code_length: 3,
        allow_duplicates: false,
        max_rounds: Some(5),
    };
    write_settings(&path, &stored).unwrap();

    let loaded = load_settings_from_file(&path).unwrap();
    assert_eq!(loaded, stored);

    let opts = loaded.session_options(Some(3)).unwrap();
    let session = Session::start(&opts).unwrap();
    assert_eq!(session.remaining_count(), 24);
    assert_eq!(session.max_rounds(), 5);

    let secret = session.reveal().clone();
    let input = format!("{}\nexit\n", format_code(&secret));
    let mut interface = CliInterface::new(Cursor::new(input));
    let summary = game_loop(&opts, &mut interface).unwrap();
    assert_eq!(summary.won, 1);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_is_consistent_agrees_with_score() {
    let rules = Rules::new(4, 3, true).unwrap();
    let universe = enumerate_universe(&rules);
    let guess = Code::from([0, 1, 1]);
    let observed = score(&Code::from([1, 1, 3]), &guess).unwrap();

    for candidate in &universe {
        let by_score = score(candidate, &guess).unwrap() == observed;
        assert_eq!(is_consistent(candidate, &guess, &observed).unwrap(), by_score);
    }
}
