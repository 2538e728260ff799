// Library interface for the mastermind engine
// The binary and integration tests use it through these re-exports

pub mod cli;
pub mod code_space;
pub mod error;
pub mod feedback;
pub mod game_state;
pub mod logging;
pub mod session;
pub mod settings;
pub mod tui;

// Re-export commonly used items for easier testing
pub use code_space::{CodeSpace, Rules, draw_secret, enumerate_universe};
pub use error::{EngineError, SettingsError};
pub use feedback::{Code, Feedback, Grade, Symbol, is_consistent, score};
pub use game_state::{GameInterface, GameSummary, UserAction, game_loop};
pub use session::{
    EliminationHint, RoundReport, Session, SessionOptions, SessionState, create_session,
};
pub use settings::{Settings, load_settings_from_file, load_settings_from_str};
