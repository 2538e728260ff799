use crate::code_space::Rules;
use crate::error::EngineError;
use crate::feedback::Code;
use crate::info_log;
use crate::session::{RoundReport, Session, SessionOptions, SessionState};

/// What the player asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(Code),
    NewGame,
    Exit,
}

/// Shown when a game starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGameInfo {
    pub game_number: usize,
    pub rules: Rules,
    pub max_rounds: usize,
    pub candidates: usize,
}

/// Games finished during one `game_loop` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameSummary {
    pub won: usize,
    pub lost: usize,
    pub abandoned: usize,
}

/// Presentation layer driven by [`game_loop`].
pub trait GameInterface {
    fn display_new_game(&mut self, info: &NewGameInfo);
    /// Blocks for the next action. `None` means the input was unusable and
    /// has already been reported; the loop asks again.
    fn read_action(&mut self, rules: &Rules) -> Option<UserAction>;
    fn display_invalid_guess(&mut self, reason: &str);
    fn display_round(&mut self, report: &RoundReport, max_rounds: usize);
    fn display_won(&mut self, secret: &Code, rounds: usize);
    fn display_lost(&mut self, secret: &Code);
    fn display_exit_message(&mut self);
}

/// Checks a guess against the rules before it reaches the session.
///
/// # Errors
///
/// A message describing the first problem found.
pub fn validate_guess(rules: &Rules, guess: &Code) -> Result<(), String> {
    if guess.len() != rules.code_length() {
        return Err(format!(
            "Guess must have exactly {} symbols (got {}).",
            rules.code_length(),
            guess.len()
        ));
    }
    if let Some(&bad) = guess
        .symbols()
        .iter()
        .find(|&&s| usize::from(s) >= rules.colors())
    {
        return Err(format!(
            "Symbol {bad} is out of range; there are {} colors.",
            rules.colors()
        ));
    }
    if !rules.allow_duplicates() && guess.has_duplicates() {
        return Err("Repeated symbols are not allowed in this game.".to_string());
    }
    Ok(())
}

/// Options for the `game_number`-th game; a fixed seed still varies per game.
fn options_for_game(options: &SessionOptions, game_number: usize) -> SessionOptions {
    SessionOptions {
        seed: options
            .seed
            .map(|seed| seed.wrapping_add(game_number as u64 - 1)),
        ..options.clone()
    }
}

fn start_game<I: GameInterface + ?Sized>(
    options: &SessionOptions,
    game_number: usize,
    interface: &mut I,
) -> Result<Session, EngineError> {
    let session = Session::start(&options_for_game(options, game_number))?;
    interface.display_new_game(&NewGameInfo {
        game_number,
        rules: *session.rules(),
        max_rounds: session.max_rounds(),
        candidates: session.remaining_count(),
    });
    Ok(session)
}

/// Plays games until the interface asks to exit.
///
/// # Errors
///
/// [`EngineError::Configuration`] if a session cannot be created from `options`.
pub fn game_loop<I: GameInterface + ?Sized>(
    options: &SessionOptions,
    interface: &mut I,
) -> Result<GameSummary, EngineError> {
    let mut summary = GameSummary::default();
    let mut game_number = 1;
    let mut session = start_game(options, game_number, interface)?;

    loop {
        let Some(action) = interface.read_action(session.rules()) else {
            continue;
        };

        match action {
            UserAction::Exit => {
                if !session.is_over() && session.rounds_played() > 0 {
                    summary.abandoned += 1;
                }
                interface.display_exit_message();
                break;
            }
            UserAction::NewGame => {
                if !session.is_over() && session.rounds_played() > 0 {
                    summary.abandoned += 1;
                }
                game_number += 1;
                session = start_game(options, game_number, interface)?;
            }
            UserAction::Guess(guess) => {
                if session.is_over() {
                    interface.display_invalid_guess(
                        "This game is over. Type 'next' for a new game or 'exit' to quit.",
                    );
                    continue;
                }
                if let Err(reason) = validate_guess(session.rules(), &guess) {
                    interface.display_invalid_guess(&reason);
                    continue;
                }

                let report = session.submit_guess(&guess)?;
                info_log!("Round {}: {} -> {}", report.round, guess, report.feedback);
                interface.display_round(&report, session.max_rounds());

                match session.state() {
                    SessionState::Won => {
                        summary.won += 1;
                        interface.display_won(session.reveal(), session.rounds_played());
                    }
                    SessionState::Lost => {
                        summary.lost += 1;
                        interface.display_lost(session.reveal());
                    }
                    SessionState::NotStarted | SessionState::InProgress => {}
                }
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Debug, PartialEq)]
    enum Event {
        NewGame(usize),
        Invalid,
        Round(usize, usize),
        Won(usize),
        Lost,
        Exit,
    }

    /// Replays a fixed list of actions, then exits.
    struct Scripted {
        actions: VecDeque<Option<UserAction>>,
        events: Vec<Event>,
        secrets: Vec<Code>,
    }

    impl Scripted {
        fn new(actions: Vec<Option<UserAction>>) -> Self {
            Self {
                actions: actions.into(),
                events: Vec::new(),
                secrets: Vec::new(),
            }
        }
    }

    impl GameInterface for Scripted {
        fn display_new_game(&mut self, info: &NewGameInfo) {
            self.events.push(Event::NewGame(info.game_number));
        }

        fn read_action(&mut self, _rules: &Rules) -> Option<UserAction> {
            self.actions.pop_front().unwrap_or(Some(UserAction::Exit))
        }

        fn display_invalid_guess(&mut self, _reason: &str) {
            self.events.push(Event::Invalid);
        }

        fn display_round(&mut self, report: &RoundReport, _max_rounds: usize) {
            self.events
                .push(Event::Round(report.round, report.feedback.blacks()));
        }

        fn display_won(&mut self, secret: &Code, rounds: usize) {
            self.secrets.push(secret.clone());
            self.events.push(Event::Won(rounds));
        }

        fn display_lost(&mut self, secret: &Code) {
            self.secrets.push(secret.clone());
            self.events.push(Event::Lost);
        }

        fn display_exit_message(&mut self) {
            self.events.push(Event::Exit);
        }
    }

    fn options(rounds: Option<usize>) -> SessionOptions {
        SessionOptions {
            rules: Rules::new(3, 2, false).unwrap(),
            max_rounds: rounds,
            seed: Some(11),
        }
    }

    fn secret_for(options: &SessionOptions) -> Code {
        Session::start(options).unwrap().reveal().clone()
    }

    #[test]
    fn test_validate_guess() {
        let rules = Rules::new(4, 3, false).unwrap();
        assert!(validate_guess(&rules, &Code::from([0, 1, 2])).is_ok());
        assert!(validate_guess(&rules, &Code::from([0, 1])).is_err());
        assert!(validate_guess(&rules, &Code::from([0, 1, 4])).is_err());
        assert!(validate_guess(&rules, &Code::from([0, 1, 1])).is_err());
    }

    #[test]
    fn test_game_loop_immediate_exit() {
        let mut ui = Scripted::new(vec![Some(UserAction::Exit)]);
        let summary = game_loop(&options(None), &mut ui).unwrap();
        assert_eq!(summary, GameSummary::default());
        assert_eq!(ui.events, vec![Event::NewGame(1), Event::Exit]);
    }

    #[test]
    fn test_game_loop_win() {
        let opts = options(None);
        let secret = secret_for(&opts);
        let mut ui = Scripted::new(vec![Some(UserAction::Guess(secret.clone()))]);
        let summary = game_loop(&opts, &mut ui).unwrap();
        assert_eq!(summary.won, 1);
        assert_eq!(
            ui.events,
            vec![Event::NewGame(1), Event::Round(1, 2), Event::Won(1), Event::Exit]
        );
        assert_eq!(ui.secrets, vec![secret]);
    }

    #[test]
    fn test_game_loop_loss_then_guess_rejected() {
        let opts = options(Some(1));
        let secret = secret_for(&opts);
        let wrong = Code::new(secret.symbols().iter().rev().copied().collect());
        let mut ui = Scripted::new(vec![
            Some(UserAction::Guess(wrong.clone())),
            Some(UserAction::Guess(secret)),
        ]);
        let summary = game_loop(&opts, &mut ui).unwrap();
        assert_eq!(summary.lost, 1);
        assert_eq!(summary.won, 0);
        assert_eq!(
            ui.events,
            vec![
                Event::NewGame(1),
                Event::Round(1, 0),
                Event::Lost,
                Event::Invalid,
                Event::Exit
            ]
        );
    }

    #[test]
    fn test_game_loop_invalid_guesses_do_not_count() {
        let mut ui = Scripted::new(vec![
            None,
            Some(UserAction::Guess(Code::from([0, 0]))),
            Some(UserAction::Guess(Code::from([0, 1, 2]))),
            Some(UserAction::Guess(Code::from([5, 1]))),
        ]);
        game_loop(&options(None), &mut ui).unwrap();
        assert_eq!(
            ui.events,
            vec![
                Event::NewGame(1),
                Event::Invalid,
                Event::Invalid,
                Event::Invalid,
                Event::Exit
            ]
        );
    }

    #[test]
    fn test_game_loop_new_game_abandons_current() {
        let opts = options(None);
        let secret = secret_for(&opts);
        let wrong = Code::new(secret.symbols().iter().rev().copied().collect());
        let mut ui = Scripted::new(vec![
            Some(UserAction::Guess(wrong)),
            Some(UserAction::NewGame),
        ]);
        let summary = game_loop(&opts, &mut ui).unwrap();
        assert_eq!(summary.abandoned, 1);
        assert_eq!(
            ui.events,
            vec![
                Event::NewGame(1),
                Event::Round(1, 0),
                Event::NewGame(2),
                Event::Exit
            ]
        );
    }

    #[test]
    fn test_game_loop_bad_configuration() {
        let opts = SessionOptions {
            max_rounds: Some(0),
            ..options(None)
        };
        let mut ui = Scripted::new(vec![]);
        assert!(game_loop(&opts, &mut ui).is_err());
    }

    #[test]
    fn test_options_for_game_varies_seed() {
        let opts = options(None);
        assert_eq!(options_for_game(&opts, 1).seed, Some(11));
        assert_eq!(options_for_game(&opts, 3).seed, Some(13));
        let unseeded = SessionOptions::new(Rules::new(3, 2, false).unwrap());
        assert_eq!(options_for_game(&unseeded, 2).seed, None);
    }
}
