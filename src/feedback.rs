//! Peg scoring.
//!
//! [`score`] grades a guess against a secret with the usual two-pass
//! discipline: exact matches first, then at most one WHITE per physical
//! symbol on either side. [`is_consistent`] reuses the same counting to
//! decide whether a candidate could have produced an observed feedback.

use std::fmt;

use crate::error::EngineError;

/// A peg color, `0..colors`.
pub type Symbol = u8;

/// An ordered sequence of symbols: a secret, a guess or a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Vec<Symbol>);

impl Code {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }

    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any symbol occurs more than once.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.0
            .iter()
            .enumerate()
            .any(|(i, s)| self.0[i + 1..].contains(s))
    }
}

impl From<Vec<Symbol>> for Code {
    fn from(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }
}

impl<const N: usize> From<[Symbol; N]> for Code {
    fn from(symbols: [Symbol; N]) -> Self {
        Self(symbols.to_vec())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, symbol) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{symbol}")?;
        }
        write!(f, "]")
    }
}

/// Grade of a single feedback peg. Ordered by value so sorting descending
/// puts BLACK first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    None = 0,
    White = 1,
    Black = 2,
}

impl Grade {
    #[must_use]
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::White),
            2 => Some(Self::Black),
            _ => None,
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self as u8
    }

    fn as_char(self) -> char {
        match self {
            Self::Black => 'B',
            Self::White => 'W',
            Self::None => '-',
        }
    }
}

/// Feedback for one guess. Grades are kept sorted BLACK, WHITE, NONE, so
/// two feedbacks are equal exactly when their counts are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Feedback {
    grades: Vec<Grade>,
}

impl Feedback {
    /// Builds feedback of `len` pegs. Panics in debug builds if the counts
    /// exceed `len`.
    #[must_use]
    pub fn from_counts(blacks: usize, whites: usize, len: usize) -> Self {
        debug_assert!(blacks + whites <= len);
        let mut grades = Vec::with_capacity(len);
        grades.extend(std::iter::repeat_n(Grade::Black, blacks));
        grades.extend(std::iter::repeat_n(Grade::White, whites));
        grades.resize(len, Grade::None);
        Self { grades }
    }

    /// Builds feedback from grades in any order.
    pub fn from_grades<I: IntoIterator<Item = Grade>>(grades: I) -> Self {
        let mut grades: Vec<Grade> = grades.into_iter().collect();
        grades.sort_unstable_by(|a, b| b.cmp(a));
        Self { grades }
    }

    #[must_use]
    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    /// The grades as the conventional 0/1/2 integers.
    #[must_use]
    pub fn values(&self) -> Vec<u8> {
        self.grades.iter().map(|g| g.value()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.grades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    #[must_use]
    pub fn blacks(&self) -> usize {
        self.count(Grade::Black)
    }

    #[must_use]
    pub fn whites(&self) -> usize {
        self.count(Grade::White)
    }

    #[must_use]
    pub fn nones(&self) -> usize {
        self.count(Grade::None)
    }

    /// All pegs BLACK: the guess was the secret.
    #[must_use]
    pub fn is_win(&self) -> bool {
        !self.grades.is_empty() && self.blacks() == self.grades.len()
    }

    fn count(&self, grade: Grade) -> usize {
        self.grades.iter().filter(|&&g| g == grade).count()
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for grade in &self.grades {
            write!(f, "{}", grade.as_char())?;
        }
        Ok(())
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), EngineError> {
    if expected == actual {
        Ok(())
    } else {
        Err(EngineError::LengthMismatch { expected, actual })
    }
}

/// Returns `(blacks, whites)` for `guess` against `secret`. Lengths must match.
fn peg_counts(secret: &[Symbol], guess: &[Symbol]) -> (usize, usize) {
    let mut secret_left: Vec<Option<Symbol>> = secret.iter().copied().map(Some).collect();
    let mut guess_left: Vec<Option<Symbol>> = guess.iter().copied().map(Some).collect();

    // First pass: exact positions
    let mut blacks = 0;
    for i in 0..secret_left.len() {
        if secret_left[i] == guess_left[i] {
            blacks += 1;
            secret_left[i] = None;
            guess_left[i] = None;
        }
    }

    // Second pass: each remaining secret symbol claims the first unclaimed guess symbol
    let mut whites = 0;
    for slot in &mut secret_left {
        let Some(symbol) = *slot else {
            continue;
        };
        if let Some(pos) = guess_left.iter().position(|&g| g == Some(symbol)) {
            whites += 1;
            *slot = None;
            guess_left[pos] = None;
        }
    }

    (blacks, whites)
}

/// Scores `guess` against `secret`.
///
/// # Errors
///
/// [`EngineError::LengthMismatch`] if the codes differ in length.
pub fn score(secret: &Code, guess: &Code) -> Result<Feedback, EngineError> {
    check_len(secret.len(), guess.len())?;
    let (blacks, whites) = peg_counts(secret.symbols(), guess.symbols());
    Ok(Feedback::from_counts(blacks, whites, secret.len()))
}

/// Whether `candidate`, taken as the secret, would have produced `observed`
/// for `guess`. Only BLACK and WHITE counts are compared.
///
/// # Errors
///
/// [`EngineError::LengthMismatch`] if the guess or the feedback differ in
/// length from the candidate.
pub fn is_consistent(
    candidate: &Code,
    guess: &Code,
    observed: &Feedback,
) -> Result<bool, EngineError> {
    check_len(candidate.len(), guess.len())?;
    check_len(candidate.len(), observed.len())?;
    let (blacks, whites) = peg_counts(candidate.symbols(), guess.symbols());
    Ok(blacks == observed.blacks() && whites == observed.whites())
}
