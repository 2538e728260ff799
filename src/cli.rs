use crate::code_space::{MAX_COLORS, Rules};
use crate::feedback::{Code, Symbol};
use crate::game_state::{GameInterface, NewGameInfo, UserAction};
use crate::session::{EliminationHint, RoundReport};
use crate::settings::Settings;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

/// Mastermind in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of peg colors
    #[arg(short = 'c', long)]
    pub colors: Option<usize>,

    /// Number of pegs in the secret code
    #[arg(short = 'l', long)]
    pub length: Option<usize>,

    /// Whether a color may appear more than once (true/false)
    #[arg(short = 'd', long, value_name = "BOOL")]
    pub duplicates: Option<bool>,

    /// Rounds allowed per game (default derived from the board size)
    #[arg(short = 'r', long)]
    pub rounds: Option<usize>,

    /// Seed for a reproducible secret
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to a settings file
    #[arg(short = 's', long = "settings")]
    pub settings_path: Option<PathBuf>,

    /// Store the effective settings for next time
    #[arg(long)]
    pub save_settings: bool,

    /// Play on the full-screen board instead of the line prompt
    #[arg(long)]
    pub tui: bool,

    /// Log debug output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Write log records to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Applies command-line overrides on top of stored settings.
    #[must_use]
    pub fn merge_settings(&self, base: Settings) -> Settings {
        Settings {
            colors: self.colors.unwrap_or(base.colors),
            code_length: self.length.unwrap_or(base.code_length),
            allow_duplicates: self.duplicates.unwrap_or(base.allow_duplicates),
            max_rounds: self.rounds.or(base.max_rounds),
        }
        .clamped()
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// Symbol rendering and guess parsing

/// `0-9` then `a-z`.
#[must_use]
pub fn symbol_char(symbol: Symbol) -> char {
    char::from_digit(u32::from(symbol), MAX_COLORS as u32).unwrap_or('?')
}

#[must_use]
pub fn parse_symbol(c: char) -> Option<Symbol> {
    c.to_digit(MAX_COLORS as u32).map(|d| d as Symbol)
}

/// Renders a code with one character per peg, e.g. `0 1 a 3`.
#[must_use]
pub fn format_code(code: &Code) -> String {
    code.symbols()
        .iter()
        .map(|&s| symbol_char(s).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses `0 1 2 3`, `0,1,2,3`, `12 3` (decimal tokens) or a compact `0a13`.
///
/// # Errors
///
/// A message naming the token that could not be read.
pub fn parse_guess(input: &str) -> Result<Code, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty guess.".to_string());
    }

    let symbols: Option<Vec<Symbol>> =
        if input.contains(|c: char| c.is_whitespace() || c == ',') {
            input
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .map(parse_token)
                .collect()
        } else {
            input.chars().map(parse_symbol).collect()
        };

    symbols
        .map(Code::new)
        .ok_or_else(|| format!("Could not read '{input}' as a guess."))
}

fn parse_token(token: &str) -> Option<Symbol> {
    if let Ok(value) = token.parse::<Symbol>() {
        return Some(value);
    }
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => parse_symbol(c),
        _ => None,
    }
}

// UI Input/Output functions

pub enum GuessInput {
    Valid(Code),
    Invalid,
    Exit,
    NewGame,
}

pub fn read_guess<R: BufRead>(reader: &mut R, rules: &Rules) -> GuessInput {
    println!(
        "\nEnter your guess ({} symbols from 0-{}, or 'exit' to quit, or 'next' to start a new game):",
        rules.code_length(),
        symbol_char((rules.colors() - 1) as Symbol)
    );
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => return GuessInput::Exit,
        Ok(_) => {}
    }
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "exit" | "quit" => GuessInput::Exit,
        "next" | "new" => GuessInput::NewGame,
        _ => match parse_guess(&input) {
            Ok(code) => GuessInput::Valid(code),
            Err(message) => {
                println!("Invalid guess. {message}");
                GuessInput::Invalid
            }
        },
    }
}

pub fn display_new_game(info: &NewGameInfo) {
    let rules = &info.rules;
    println!(
        "Game {}: {} colors, {} pegs, duplicates {}. {} possible codes, {} rounds.",
        info.game_number,
        rules.colors(),
        rules.code_length(),
        if rules.allow_duplicates() {
            "allowed"
        } else {
            "not allowed"
        },
        info.candidates,
        info.max_rounds
    );
}

#[must_use]
pub fn describe_hint(report: &RoundReport) -> String {
    match report.hint {
        EliminationHint::Contradiction => "no candidates remain".to_string(),
        EliminationHint::Solved => "1 candidate left".to_string(),
        EliminationHint::Percent(p) => {
            format!("remaining {}, {p}% eliminated", report.remaining_after)
        }
    }
}

#[must_use]
pub fn format_round(report: &RoundReport, max_rounds: usize) -> String {
    format!(
        "Round {}/{}: {} -> {} ({})",
        report.round,
        max_rounds,
        format_code(&report.guess),
        report.feedback,
        describe_hint(report)
    )
}

pub fn display_round(report: &RoundReport, max_rounds: usize) {
    println!("{}", format_round(report, max_rounds));
}

pub fn display_won(secret: &Code, rounds: usize) {
    let plural = if rounds == 1 { "" } else { "s" };
    println!(
        "You won! The code was {} ({rounds} round{plural}).",
        format_code(secret)
    );
    println!("Type 'next' to play again or 'exit' to quit.");
}

pub fn display_lost(secret: &Code) {
    println!("You lost! The code was {}.", format_code(secret));
    println!("Type 'next' to play again or 'exit' to quit.");
}

pub fn display_invalid_guess(reason: &str) {
    println!("Invalid guess. {reason}");
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and implements the game interface for CLI interaction
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_new_game(&mut self, info: &NewGameInfo) {
        display_new_game(info);
    }

    fn read_action(&mut self, rules: &Rules) -> Option<UserAction> {
        match read_guess(&mut self.reader, rules) {
            GuessInput::Valid(code) => Some(UserAction::Guess(code)),
            GuessInput::Exit => Some(UserAction::Exit),
            GuessInput::NewGame => Some(UserAction::NewGame),
            GuessInput::Invalid => None,
        }
    }

    fn display_invalid_guess(&mut self, reason: &str) {
        display_invalid_guess(reason);
    }

    fn display_round(&mut self, report: &RoundReport, max_rounds: usize) {
        display_round(report, max_rounds);
    }

    fn display_won(&mut self, secret: &Code, rounds: usize) {
        display_won(secret, rounds);
    }

    fn display_lost(&mut self, secret: &Code) {
        display_lost(secret);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}
