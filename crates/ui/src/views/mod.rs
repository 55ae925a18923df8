mod module;
mod quiz;
mod scripts;
mod state;
mod tutor;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use module::ModuleView;
pub use quiz::QuizView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use tutor::TutorView;
