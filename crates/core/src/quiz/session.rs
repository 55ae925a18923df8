use std::fmt;

use crate::model::{OptionLabel, Question, QuizData};
use crate::scoring::{self, AnswerReview, QuizResult};

use super::event::{InvalidTransition, QuizEvent};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Coarse lifecycle stage of a quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    #[default]
    Start,
    InProgress,
    Results,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizPhase::Start => "start",
            QuizPhase::InProgress => "in progress",
            QuizPhase::Results => "results",
        };
        f.write_str(name)
    }
}

/// Which commands the current snapshot accepts. The view enables exactly these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailableActions {
    pub begin: bool,
    /// Number of selectable options; zero outside of play.
    pub options: usize,
    pub previous: bool,
    pub retry: bool,
    /// The "Back to Course" link.
    pub exit: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through a fixed question bank.
///
/// All mutation goes through [`QuizSession::apply`] (or the typed helpers it
/// delegates to). A rejected command leaves the session exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<Option<OptionLabel>>,
    score: usize,
    phase: QuizPhase,
}

impl QuizSession {
    /// Fresh session on the start screen.
    ///
    /// An empty bank has nothing to play, so it opens directly on the results
    /// screen with a score of zero.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        let phase = if questions.is_empty() {
            QuizPhase::Results
        } else {
            QuizPhase::Start
        };
        Self {
            answers: vec![None; questions.len()],
            questions,
            current_index: 0,
            score: 0,
            phase,
        }
    }

    #[must_use]
    pub fn from_data(data: &QuizData) -> Self {
        Self::new(data.questions.clone())
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question on screen, only while in progress.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::InProgress => self.questions.get(self.current_index),
            QuizPhase::Start | QuizPhase::Results => None,
        }
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<OptionLabel>] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<OptionLabel> {
        self.answers.get(index).copied().flatten()
    }

    /// Raw score. Only meaningful on the results screen; zero elsewhere after a retry.
    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Score, percentage and tier once the quiz is finished.
    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        (self.phase == QuizPhase::Results).then(|| QuizResult::new(self.score, self.total()))
    }

    #[must_use]
    pub fn review(&self) -> Vec<AnswerReview> {
        scoring::review_answers(&self.questions, &self.answers)
    }

    #[must_use]
    pub fn available_actions(&self) -> AvailableActions {
        match self.phase {
            QuizPhase::Start => AvailableActions {
                begin: true,
                ..AvailableActions::default()
            },
            QuizPhase::InProgress => AvailableActions {
                options: self
                    .current_question()
                    .map_or(0, Question::option_count)
                    .min(crate::model::MAX_OPTIONS),
                previous: self.current_index > 0,
                ..AvailableActions::default()
            },
            QuizPhase::Results => AvailableActions {
                retry: true,
                exit: true,
                ..AvailableActions::default()
            },
        }
    }

    /// Apply one command and report the phase it left the session in.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the command does not fit the current
    /// state; the session is unchanged in that case.
    pub fn apply(&mut self, event: QuizEvent) -> Result<QuizPhase, InvalidTransition> {
        match event {
            QuizEvent::Begin => self.begin(),
            QuizEvent::SelectOption { question, option } => self.select_option(question, option),
            QuizEvent::Previous => self.go_previous(),
            QuizEvent::Retry => self.retry(),
        }?;
        Ok(self.phase)
    }

    /// Leave the start screen for the first question.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition::NotAtStart` outside the start screen.
    pub fn begin(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != QuizPhase::Start {
            return Err(InvalidTransition::NotAtStart { phase: self.phase });
        }
        self.current_index = 0;
        if self.questions.is_empty() {
            self.finish();
        } else {
            self.phase = QuizPhase::InProgress;
        }
        Ok(())
    }

    /// Record `option` as the answer to `question` and move on.
    ///
    /// Answering the last question scores the session and shows the results.
    /// A question with no options accepts no answer, so the session stays on it;
    /// `QuizData::validate` reports such banks.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when not in progress, when `question` is not
    /// the question on screen, or when `option` is not one of its options.
    pub fn select_option(&mut self, question: usize, option: usize) -> Result<(), InvalidTransition> {
        if self.phase != QuizPhase::InProgress {
            return Err(InvalidTransition::NotInProgress { phase: self.phase });
        }
        if question != self.current_index {
            return Err(InvalidTransition::StaleQuestion {
                expected: self.current_index,
                got: question,
            });
        }

        let available = self.questions[self.current_index].option_count();
        let label = OptionLabel::from_index(option)
            .ok()
            .filter(|_| option < available)
            .ok_or(InvalidTransition::OptionOutOfRange { option, available })?;

        self.answers[question] = Some(label);

        if question + 1 >= self.questions.len() {
            self.finish();
        } else {
            self.current_index += 1;
        }
        Ok(())
    }

    /// Step back one question without touching the recorded answers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when not in progress or already on the first question.
    pub fn go_previous(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != QuizPhase::InProgress {
            return Err(InvalidTransition::NotInProgress { phase: self.phase });
        }
        if self.current_index == 0 {
            return Err(InvalidTransition::AtFirstQuestion);
        }
        self.current_index -= 1;
        Ok(())
    }

    /// Clear every answer and return to the start screen.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition::NotFinished` outside the results screen.
    pub fn retry(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != QuizPhase::Results {
            return Err(InvalidTransition::NotFinished { phase: self.phase });
        }
        self.current_index = 0;
        self.answers = vec![None; self.questions.len()];
        self.score = 0;
        self.phase = QuizPhase::Start;
        Ok(())
    }

    fn finish(&mut self) {
        self.score = scoring::compute_score(&self.questions, &self.answers);
        self.phase = QuizPhase::Results;
    }
}

/// Reducer form of [`QuizSession::apply`]: invalid events return the session unchanged.
#[must_use]
pub fn dispatch(mut session: QuizSession, event: QuizEvent) -> QuizSession {
    let _ = session.apply(event);
    session
}
