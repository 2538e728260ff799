//! One game: the code space, the round budget and the win/loss state.

use std::fmt;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::code_space::{CodeSpace, Rules};
use crate::error::EngineError;
use crate::feedback::{Code, Feedback};

/// Lifecycle of a session. `Won` and `Lost` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl SessionState {
    #[must_use]
    pub fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Board annotation for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationHint {
    /// No candidate survived. Cannot happen while guesses are scored
    /// against the real secret.
    Contradiction,
    /// Exactly one candidate is left.
    Solved,
    /// Share of the candidates this round removed, 0-100.
    Percent(u8),
}

impl EliminationHint {
    #[must_use]
    pub fn from_counts(before: usize, after: usize) -> Self {
        match after {
            0 => Self::Contradiction,
            1 => Self::Solved,
            _ => {
                let eliminated = before.saturating_sub(after) as f64;
                let percent = (eliminated / before as f64 * 100.0).round_ties_even();
                Self::Percent(percent.clamp(0.0, 100.0) as u8)
            }
        }
    }
}

impl fmt::Display for EliminationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contradiction => write!(f, "!"),
            Self::Solved => write!(f, "W"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// Outcome of one submitted guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    /// 1-based round number.
    pub round: usize,
    pub guess: Code,
    pub feedback: Feedback,
    pub remaining_before: usize,
    pub remaining_after: usize,
    pub hint: EliminationHint,
}

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub rules: Rules,
    /// Round budget; `None` derives it from the size of the universe.
    pub max_rounds: Option<usize>,
    /// Fixes the secret draw for reproducible games.
    pub seed: Option<u64>,
}

impl SessionOptions {
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            max_rounds: None,
            seed: None,
        }
    }
}

/// Round budget the original board used: `round(0.75 * ln(colors^length) + 2)`.
#[must_use]
pub fn default_round_budget(rules: &Rules) -> usize {
    let ln_universe = rules.code_length() as f64 * (rules.colors() as f64).ln();
    ((0.75 * ln_universe + 2.0).round_ties_even() as usize).max(1)
}

/// Starts a session with the default round budget and an OS-seeded secret.
///
/// # Errors
///
/// [`EngineError::Configuration`] for parameters that give an empty or
/// impractically large universe.
pub fn create_session(
    colors: usize,
    code_length: usize,
    allow_duplicates: bool,
) -> Result<Session, EngineError> {
    let rules = Rules::new(colors, code_length, allow_duplicates)?;
    Session::start(&SessionOptions::new(rules))
}

#[derive(Debug, Clone)]
pub struct Session {
    space: CodeSpace,
    max_rounds: usize,
    state: SessionState,
    history: Vec<RoundReport>,
}

impl Session {
    /// # Errors
    ///
    /// [`EngineError::Configuration`] if `max_rounds` is zero.
    pub fn start(options: &SessionOptions) -> Result<Self, EngineError> {
        let max_rounds = resolve_rounds(options)?;
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let space = CodeSpace::new(options.rules, &mut rng);
        info!(
            "New session: {} codes, {} rounds",
            space.initial_count(),
            max_rounds
        );
        Ok(Self::from_space(space, max_rounds))
    }

    /// Starts a session around a known secret.
    ///
    /// # Errors
    ///
    /// [`EngineError::Configuration`] if the secret violates the rules or
    /// `max_rounds` is zero.
    pub fn with_secret(options: &SessionOptions, secret: Code) -> Result<Self, EngineError> {
        let max_rounds = resolve_rounds(options)?;
        let space = CodeSpace::with_secret(options.rules, secret)?;
        Ok(Self::from_space(space, max_rounds))
    }

    fn from_space(space: CodeSpace, max_rounds: usize) -> Self {
        Self {
            space,
            max_rounds,
            state: SessionState::NotStarted,
            history: Vec::with_capacity(max_rounds.min(32)),
        }
    }

    /// Scores a guess, shrinks the candidate set and advances the state.
    ///
    /// The guess is expected to be complete and valid for the rules; only its
    /// length is checked here.
    ///
    /// # Errors
    ///
    /// [`EngineError::SessionFinished`] once the session is won or lost, and
    /// [`EngineError::LengthMismatch`] for a guess of the wrong length.
    pub fn submit_guess(&mut self, guess: &Code) -> Result<RoundReport, EngineError> {
        if self.state.is_over() {
            return Err(EngineError::SessionFinished { state: self.state });
        }

        let (feedback, remaining_before) = self.space.submit_guess(guess)?;
        let remaining_after = self.space.remaining_count();
        let report = RoundReport {
            round: self.history.len() + 1,
            guess: guess.clone(),
            hint: EliminationHint::from_counts(remaining_before, remaining_after),
            feedback,
            remaining_before,
            remaining_after,
        };

        self.state = if report.feedback.is_win() {
            SessionState::Won
        } else if report.round >= self.max_rounds {
            SessionState::Lost
        } else {
            SessionState::InProgress
        };
        if self.state.is_over() {
            debug!("Session ended after {} rounds: {:?}", report.round, self.state);
        }

        self.history.push(report.clone());
        Ok(report)
    }

    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.space.remaining_count()
    }

    #[must_use]
    pub fn initial_count(&self) -> usize {
        self.space.initial_count()
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.state == SessionState::Won
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        self.space.rules()
    }

    #[must_use]
    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    #[must_use]
    pub fn rounds_played(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn rounds_left(&self) -> usize {
        self.max_rounds.saturating_sub(self.history.len())
    }

    #[must_use]
    pub fn history(&self) -> &[RoundReport] {
        &self.history
    }

    /// The secret, for display once the game is over.
    #[must_use]
    pub fn reveal(&self) -> &Code {
        self.space.secret()
    }

    #[must_use]
    pub fn is_candidate(&self, code: &Code) -> bool {
        self.space.contains(code)
    }
}

fn resolve_rounds(options: &SessionOptions) -> Result<usize, EngineError> {
    match options.max_rounds {
        Some(0) => Err(EngineError::configuration("round budget must be at least 1")),
        Some(rounds) => Ok(rounds),
        None => Ok(default_round_budget(&options.rules)),
    }
}
