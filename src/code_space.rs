//! The code universe and the live candidate set.

use std::collections::HashSet;

use log::{debug, trace};
use rand::Rng;

use crate::error::EngineError;
use crate::feedback::{Code, Feedback, Symbol, is_consistent, score};

/// Largest universe a session may enumerate.
pub const MAX_UNIVERSE_SIZE: u64 = 5_000_000;

/// Symbols are rendered `0-9` then `a-z`.
pub const MAX_COLORS: usize = 36;

/// Shape of every code in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    colors: usize,
    code_length: usize,
    allow_duplicates: bool,
}

impl Rules {
    /// # Errors
    ///
    /// [`EngineError::Configuration`] if the universe would be empty or
    /// larger than [`MAX_UNIVERSE_SIZE`].
    pub fn new(
        colors: usize,
        code_length: usize,
        allow_duplicates: bool,
    ) -> Result<Self, EngineError> {
        if colors < 1 {
            return Err(EngineError::configuration("number of colors must be at least 1"));
        }
        if code_length < 1 {
            return Err(EngineError::configuration("code length must be at least 1"));
        }
        if colors > MAX_COLORS {
            return Err(EngineError::configuration(format!(
                "at most {MAX_COLORS} colors are supported, got {colors}"
            )));
        }
        if !allow_duplicates && code_length > colors {
            return Err(EngineError::configuration(format!(
                "code length {code_length} exceeds {colors} colors without duplicates"
            )));
        }
        let rules = Self {
            colors,
            code_length,
            allow_duplicates,
        };
        match rules.universe_size() {
            Some(size) if size <= MAX_UNIVERSE_SIZE => Ok(rules),
            _ => Err(EngineError::configuration(format!(
                "{colors} colors and length {code_length} give more than {MAX_UNIVERSE_SIZE} codes"
            ))),
        }
    }

    #[must_use]
    pub fn colors(&self) -> usize {
        self.colors
    }

    #[must_use]
    pub fn code_length(&self) -> usize {
        self.code_length
    }

    #[must_use]
    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// Number of valid codes, or `None` on overflow.
    #[must_use]
    pub fn universe_size(&self) -> Option<u64> {
        let colors = self.colors as u64;
        (0..self.code_length as u64).try_fold(1u64, |acc, i| {
            let choices = if self.allow_duplicates {
                colors
            } else {
                colors.checked_sub(i)?
            };
            acc.checked_mul(choices)
        })
    }

    /// Whether `code` has the right length, only in-range symbols, and
    /// respects the duplicate policy.
    #[must_use]
    pub fn admits(&self, code: &Code) -> bool {
        code.len() == self.code_length
            && code.symbols().iter().all(|&s| usize::from(s) < self.colors)
            && (self.allow_duplicates || !code.has_duplicates())
    }
}

/// Every code the rules admit.
#[must_use]
pub fn enumerate_universe(rules: &Rules) -> HashSet<Code> {
    let capacity = rules.universe_size().unwrap_or(0);
    let mut universe = HashSet::with_capacity(usize::try_from(capacity).unwrap_or(0));
    let steps = walk_codes(rules, |symbols| {
        universe.insert(Code::new(symbols.to_vec()));
    });
    trace!("Enumerated {} codes in {steps} steps", universe.len());
    universe
}

/// Calls `visit` once per admitted code, in lexicographic order.
///
/// Without duplicates a symbol already placed is never tried again, so the
/// walk only visits prefixes of valid codes. Returns the number of prefixes
/// visited, the empty one included.
fn walk_codes(rules: &Rules, mut visit: impl FnMut(&[Symbol])) -> u64 {
    let mut prefix = Vec::with_capacity(rules.code_length);
    let mut steps = 0;
    extend_prefix(rules, &mut prefix, 0, &mut steps, &mut visit);
    steps
}

fn extend_prefix(
    rules: &Rules,
    prefix: &mut Vec<Symbol>,
    used: u64,
    steps: &mut u64,
    visit: &mut impl FnMut(&[Symbol]),
) {
    *steps += 1;
    if prefix.len() == rules.code_length {
        visit(prefix.as_slice());
        return;
    }
    for symbol in 0..rules.colors {
        let bit = 1u64 << symbol;
        if !rules.allow_duplicates && used & bit != 0 {
            continue;
        }
        prefix.push(symbol as Symbol);
        extend_prefix(rules, prefix, used | bit, steps, visit);
        prefix.pop();
    }
}

/// Draws a secret uniformly from the codes the rules admit.
///
/// A whole draw containing a repeated symbol is thrown away when duplicates
/// are disallowed, so every distinct-symbol code stays equally likely.
pub fn draw_secret<R: Rng>(rules: &Rules, rng: &mut R) -> Code {
    loop {
        let symbols: Vec<Symbol> = (0..rules.code_length)
            .map(|_| rng.random_range(0..rules.colors) as Symbol)
            .collect();
        let code = Code::new(symbols);
        if rules.allow_duplicates || !code.has_duplicates() {
            return code;
        }
        trace!("Rejected secret draw with repeated symbols");
    }
}

/// The secret plus every code still consistent with the feedback so far.
#[derive(Debug, Clone)]
pub struct CodeSpace {
    rules: Rules,
    secret: Code,
    candidates: HashSet<Code>,
    initial_count: usize,
}

impl CodeSpace {
    pub fn new<R: Rng>(rules: Rules, rng: &mut R) -> Self {
        let secret = draw_secret(&rules, rng);
        Self::build(rules, secret)
    }

    /// # Errors
    ///
    /// [`EngineError::Configuration`] if the rules do not admit `secret`.
    pub fn with_secret(rules: Rules, secret: Code) -> Result<Self, EngineError> {
        if !rules.admits(&secret) {
            return Err(EngineError::configuration(format!(
                "secret {secret} is not a valid code for these rules"
            )));
        }
        Ok(Self::build(rules, secret))
    }

    fn build(rules: Rules, secret: Code) -> Self {
        let candidates = enumerate_universe(&rules);
        let initial_count = candidates.len();
        debug!(
            "Code space ready: {} colors, length {}, duplicates {}, {} codes",
            rules.colors, rules.code_length, rules.allow_duplicates, initial_count
        );
        trace!("Secret: {secret}");
        Self {
            rules,
            secret,
            candidates,
            initial_count,
        }
    }

    /// Scores `guess` and drops every candidate inconsistent with the result.
    ///
    /// Returns the feedback and the candidate count before filtering.
    ///
    /// # Errors
    ///
    /// [`EngineError::LengthMismatch`] if `guess` has the wrong length. The
    /// candidate set is untouched in that case.
    pub fn submit_guess(&mut self, guess: &Code) -> Result<(Feedback, usize), EngineError> {
        let feedback = score(&self.secret, guess)?;
        let before = self.candidates.len();

        // `score` already matched the guess to the secret's length, and every
        // candidate shares it
        self.candidates.retain(|candidate| {
            let consistent = is_consistent(candidate, guess, &feedback);
            debug_assert!(consistent.is_ok(), "candidate {candidate}: {consistent:?}");
            matches!(consistent, Ok(true))
        });

        debug!(
            "Guess {guess} -> {feedback}: {before} -> {} candidates",
            self.candidates.len()
        );
        Ok((feedback, before))
    }

    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.candidates.len()
    }

    /// Size of the universe before any feedback.
    #[must_use]
    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    #[must_use]
    pub fn contains(&self, code: &Code) -> bool {
        self.candidates.contains(code)
    }

    #[must_use]
    pub fn secret(&self) -> &Code {
        &self.secret
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Remaining candidates in no particular order.
    pub fn candidates(&self) -> impl Iterator<Item = &Code> {
        self.candidates.iter()
    }
}
