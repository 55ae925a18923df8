use services::{ModuleCompletion, QuizGate};

use super::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq)]
pub struct ReadingProgressVm {
    /// CSS width for the progress bar, e.g. `"42%"`.
    pub bar_width: String,
    pub gate: QuizGate,
    pub gate_label: &'static str,
}

#[must_use]
pub fn map_reading_progress(percent: f64, gate: QuizGate) -> ReadingProgressVm {
    let clamped = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let gate_label = match gate {
        QuizGate::Locked => "Quiz locked",
        QuizGate::Unlocked => "Quiz unlocked",
    };
    ReadingProgressVm {
        bar_width: format!("{clamped:.0}%"),
        gate,
        gate_label,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedModuleVm {
    pub id: String,
    pub completed_label: String,
}

#[must_use]
pub fn map_completed_modules(completions: &[ModuleCompletion]) -> Vec<CompletedModuleVm> {
    completions
        .iter()
        .map(|completion| CompletedModuleVm {
            id: completion.module_id.to_string(),
            completed_label: format!("Read {}", format_datetime(completion.completed_at)),
        })
        .collect()
}
