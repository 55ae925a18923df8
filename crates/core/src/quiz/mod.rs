mod event;
mod session;

pub use event::{InvalidTransition, QuizEvent};
pub use session::{AvailableActions, QuizPhase, QuizSession, dispatch};

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
