//! TUI (Terminal User Interface) front end using Ratatui.
//!
//! # Architecture
//! - `GuessEditor`: the row being composed, independent of the terminal
//! - `TuiInterface`: rendering and input, implements `GameInterface`
//!
//! # State Machine
//! `EnteringGuess` until the game is won or lost, then `GameOver` until the
//! player starts a new game or quits.

use crate::cli::{format_code, parse_symbol, symbol_char};
use crate::code_space::Rules;
use crate::feedback::{Code, Feedback, Grade, Symbol};
use crate::game_state::{GameInterface, NewGameInfo, UserAction};
use crate::session::RoundReport;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const PALETTE: [Color; 12] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
];

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const EMPTY_PEG_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

fn symbol_color(symbol: Symbol) -> Color {
    PALETTE[usize::from(symbol) % PALETTE.len()]
}

fn peg_span(symbol: Option<Symbol>, highlighted: bool) -> Span<'static> {
    let style = match symbol {
        Some(s) => Style::new().fg(Color::Black).bg(symbol_color(s)),
        None => EMPTY_PEG_STYLE,
    };
    let style = if highlighted {
        style.add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        style
    };
    let label = symbol.map_or(' ', symbol_char);
    Span::styled(format!(" {label} "), style)
}

fn feedback_spans(feedback: &Feedback) -> Vec<Span<'static>> {
    feedback
        .grades()
        .iter()
        .map(|grade| match grade {
            Grade::Black => Span::styled(
                "●",
                Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Grade::White => Span::styled("○", Style::new().fg(Color::Gray)),
            Grade::None => Span::styled("·", Style::new().fg(Color::DarkGray)),
        })
        .collect()
}

/// The row being composed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GuessEditor {
    slots: Vec<Option<Symbol>>,
    cursor: usize,
}

impl GuessEditor {
    fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
            cursor: 0,
        }
    }

    fn set(&mut self, symbol: Symbol) {
        if let Some(slot) = self.slots.get_mut(self.cursor) {
            *slot = Some(symbol);
        }
        self.move_right();
    }

    fn backspace(&mut self) {
        if self.slots.get(self.cursor).copied().flatten().is_none() {
            self.move_left();
        }
        if let Some(slot) = self.slots.get_mut(self.cursor) {
            *slot = None;
        }
    }

    fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_right(&mut self) {
        if self.cursor + 1 < self.slots.len() {
            self.cursor += 1;
        }
    }

    /// The guess, once every slot is filled.
    fn to_code(&self) -> Option<Code> {
        self.slots
            .iter()
            .copied()
            .collect::<Option<Vec<Symbol>>>()
            .map(Code::new)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum EditOutcome {
    Edited,
    Submit(Code),
    Incomplete,
    Rejected(char),
    NewGame,
    Exit,
    Ignored,
}

fn has_modifier_keys(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
}

fn apply_guess_key(editor: &mut GuessEditor, key: KeyEvent, colors: usize) -> EditOutcome {
    if key.code == KeyCode::Char('n') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return EditOutcome::NewGame;
    }
    if has_modifier_keys(&key) {
        return EditOutcome::Ignored;
    }

    match key.code {
        KeyCode::Esc => EditOutcome::Exit,
        KeyCode::Enter => editor
            .to_code()
            .map_or(EditOutcome::Incomplete, EditOutcome::Submit),
        KeyCode::Left => {
            editor.move_left();
            EditOutcome::Edited
        }
        KeyCode::Right => {
            editor.move_right();
            EditOutcome::Edited
        }
        KeyCode::Backspace | KeyCode::Delete => {
            editor.backspace();
            EditOutcome::Edited
        }
        KeyCode::Char(c) => match parse_symbol(c) {
            Some(symbol) if usize::from(symbol) < colors => {
                editor.set(symbol);
                EditOutcome::Edited
            }
            _ => EditOutcome::Rejected(c),
        },
        _ => EditOutcome::Ignored,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    EnteringGuess,
    GameOver,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    rows: &'a [RoundReport],
    editor: &'a GuessEditor,
    state: TuiState,
    rules: Option<&'a Rules>,
    max_rounds: usize,
    candidates: usize,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    rows: Vec<RoundReport>,
    editor: GuessEditor,
    state: TuiState,
    rules: Option<Rules>,
    max_rounds: usize,
    candidates: usize,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal ready: raw mode, alternate screen");

        Ok(Self {
            terminal,
            rows: Vec::new(),
            editor: GuessEditor::new(0),
            state: TuiState::EnteringGuess,
            rules: None,
            max_rounds: 0,
            candidates: 0,
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            rows: &self.rows,
            editor: &self.editor,
            state: self.state,
            rules: self.rules.as_ref(),
            max_rounds: self.max_rounds,
            candidates: self.candidates,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(6),    // Board
                Constraint::Length(6), // Info panel
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0], ctx.rules);
        Self::render_board(f, chunks[1], ctx);
        Self::render_info(f, chunks[2], ctx);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state, ctx.rules);
    }

    fn render_title(f: &mut Frame, area: Rect, rules: Option<&Rules>) {
        let text = match rules {
            Some(r) => format!(
                "MASTERMIND - {} colors, {} pegs, duplicates {}",
                r.colors(),
                r.code_length(),
                if r.allow_duplicates() { "on" } else { "off" }
            ),
            None => "MASTERMIND".to_string(),
        };
        let title = Paragraph::new(text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default()
            .title(format!("Rounds ({}/{})", ctx.rows.len(), ctx.max_rounds))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let showing_editor =
            ctx.state == TuiState::EnteringGuess && ctx.rows.len() < ctx.max_rounds;
        let rows_needed = ctx.rows.len() + usize::from(showing_editor);
        let available_rows = inner.height as usize;
        // Keep the most recent rows visible
        let skip_count = rows_needed.saturating_sub(available_rows);

        let mut lines: Vec<Line> = ctx
            .rows
            .iter()
            .skip(skip_count)
            .map(Self::round_line)
            .collect();

        if showing_editor {
            let mut spans = vec![Span::raw(format!("{:>3}  ", ctx.rows.len() + 1))];
            for (i, slot) in ctx.editor.slots.iter().enumerate() {
                spans.push(peg_span(*slot, i == ctx.editor.cursor));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        f.render_widget(Paragraph::new(lines), inner);
    }

    fn round_line(report: &RoundReport) -> Line<'static> {
        let mut spans = vec![Span::raw(format!("{:>3}  ", report.round))];
        for &symbol in report.guess.symbols() {
            spans.push(peg_span(Some(symbol), false));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::raw("  "));
        spans.extend(feedback_spans(&report.feedback));
        spans.push(Span::styled(format!("  {}", report.hint), INFO_STYLE));
        Line::from(spans)
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = vec![Line::from(vec![Span::styled(
            format!("Codes still possible: {}", ctx.candidates),
            INFO_STYLE,
        )])];

        if let Some(rules) = ctx.rules {
            let mut palette = vec![Span::raw("Colors: ")];
            for symbol in 0..rules.colors() as Symbol {
                palette.push(peg_span(Some(symbol), false));
            }
            lines.push(Line::from(palette));
        }

        if !ctx.message.is_empty() {
            let style = if ctx.state == TuiState::GameOver {
                SUCCESS_STYLE
            } else {
                MESSAGE_STYLE
            };
            lines.push(Line::from(vec![Span::styled(ctx.message, style)]));
        }

        if !ctx.error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState, rules: Option<&Rules>) {
        let text = match state {
            TuiState::EnteringGuess => {
                let last = rules.map_or('?', |r| symbol_char((r.colors() - 1) as Symbol));
                format!(
                    "0-{last}: Place peg | ←/→: Move | BACKSPACE: Clear | ENTER: Submit | CTRL-N: New game | ESC: Quit"
                )
            }
            TuiState::GameOver => "N/ENTER: New Game | ESC: Quit".to_string(),
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self, colors: usize) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let key = match event::read()? {
            Event::Key(key) => key,
            other => {
                debug_log!("handle_input() - Ignoring non-key event: {:?}", other);
                return Ok(None);
            }
        };
        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }

        match self.state {
            TuiState::EnteringGuess => Ok(self.handle_guess_input(key, colors)),
            TuiState::GameOver => Ok(Self::handle_game_over_input(key)),
        }
    }

    fn handle_guess_input(&mut self, key: KeyEvent, colors: usize) -> Option<UserAction> {
        self.error_message.clear();
        match apply_guess_key(&mut self.editor, key, colors) {
            EditOutcome::Submit(code) => {
                info_log!("handle_guess_input() - Submitting {}", code);
                Some(UserAction::Guess(code))
            }
            EditOutcome::Incomplete => {
                self.error_message = "Fill every peg before submitting.".to_string();
                None
            }
            EditOutcome::Rejected(c) => {
                self.error_message = format!("'{c}' is not one of the colors in this game.");
                None
            }
            EditOutcome::NewGame => Some(UserAction::NewGame),
            EditOutcome::Exit => Some(UserAction::Exit),
            EditOutcome::Edited | EditOutcome::Ignored => None,
        }
    }

    fn handle_game_over_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('n' | 'N') | KeyCode::Enter => Some(UserAction::NewGame),
            KeyCode::Esc => Some(UserAction::Exit),
            _ => None,
        }
    }
}

impl GameInterface for TuiInterface {
    fn display_new_game(&mut self, info: &NewGameInfo) {
        self.rows.clear();
        self.editor = GuessEditor::new(info.rules.code_length());
        self.state = TuiState::EnteringGuess;
        self.rules = Some(info.rules);
        self.max_rounds = info.max_rounds;
        self.candidates = info.candidates;
        self.message = format!("Game {} started.", info.game_number);
        self.error_message.clear();
        self.status = "Enter your first guess".to_string();
        self.draw_or_log();
    }

    fn read_action(&mut self, rules: &Rules) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }
            match self.handle_input(rules.colors()) {
                Ok(Some(action)) => return Some(action),
                Ok(None) => {}
                Err(_e) => {
                    info_log!("read_action() - Error handling input, returning Exit");
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_invalid_guess(&mut self, reason: &str) {
        self.error_message = reason.to_string();
        self.draw_or_log();
    }

    fn display_round(&mut self, report: &RoundReport, max_rounds: usize) {
        self.rows.push(report.clone());
        self.editor = GuessEditor::new(report.guess.len());
        self.candidates = report.remaining_after;
        self.max_rounds = max_rounds;
        self.message.clear();
        self.status = format!(
            "Round {}: {} black, {} white",
            report.round,
            report.feedback.blacks(),
            report.feedback.whites()
        );
        self.draw_or_log();
    }

    fn display_won(&mut self, secret: &Code, rounds: usize) {
        self.state = TuiState::GameOver;
        self.message = format!(
            "You won in {rounds} rounds! The code was {}.",
            format_code(secret)
        );
        self.status = "Game Over - solved".to_string();
        self.draw_or_log();
    }

    fn display_lost(&mut self, secret: &Code) {
        self.state = TuiState::GameOver;
        self.message = format!("You lost. The code was {}.", format_code(secret));
        self.status = "Game Over - out of rounds".to_string();
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
