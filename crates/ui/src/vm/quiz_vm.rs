use course_core::model::OptionLabel;
use course_core::{
    AvailableActions, InvalidTransition, QuizEvent, QuizPhase, QuizSession, percentage,
};

/// What the quiz screens can ask for. Mirrors the session's event set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Start,
    /// `question` is the index the button was rendered for.
    Select { question: usize, option: usize },
    Previous,
    Retry,
}

impl From<QuizIntent> for QuizEvent {
    fn from(intent: QuizIntent) -> Self {
        match intent {
            QuizIntent::Start => QuizEvent::Begin,
            QuizIntent::Select { question, option } => QuizEvent::SelectOption { question, option },
            QuizIntent::Previous => QuizEvent::Previous,
            QuizIntent::Retry => QuizEvent::Retry,
        }
    }
}

/// Owns the live session for the quiz view.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    session: QuizSession,
    course_index_url: String,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession, course_index_url: impl Into<String>) -> Self {
        Self {
            session,
            course_index_url: course_index_url.into(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn actions(&self) -> AvailableActions {
        self.session.available_actions()
    }

    /// Apply an intent. Rejected intents leave the session untouched.
    ///
    /// # Errors
    ///
    /// Returns the `InvalidTransition` the session reported.
    pub fn dispatch(&mut self, intent: QuizIntent) -> Result<QuizPhase, InvalidTransition> {
        let result = self.session.apply(intent.into());
        if let Err(err) = &result {
            tracing::debug!(?intent, error = %err, "quiz intent ignored");
        }
        result
    }

    #[must_use]
    pub fn screen(&self) -> QuizScreenVm {
        map_quiz_screen(&self.session, &self.course_index_url)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScreenVm {
    Start(QuizStartVm),
    Question(QuizQuestionVm),
    Results(QuizResultsVm),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizStartVm {
    pub total: usize,
    pub count_label: String,
    pub is_empty: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub question: usize,
    pub option: usize,
    pub label: char,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizQuestionVm {
    pub index: usize,
    pub counter_label: String,
    pub progress_percent: u8,
    pub progress_label: String,
    pub text: String,
    pub options: Vec<QuizOptionVm>,
    pub can_go_previous: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRowVm {
    pub number: usize,
    pub question: String,
    pub given_label: String,
    pub correct_label: String,
    pub explanation: Option<String>,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResultsVm {
    pub percentage_label: String,
    pub score_line: String,
    pub message: &'static str,
    pub tier_class: &'static str,
    pub review: Vec<ReviewRowVm>,
    pub course_index_url: String,
}

/// Progress through the quiz before answering the current question.
#[must_use]
pub fn progress_percent(current_index: usize, total: usize) -> u8 {
    percentage(current_index, total)
}

#[must_use]
pub fn map_quiz_screen(session: &QuizSession, course_index_url: &str) -> QuizScreenVm {
    match session.phase() {
        QuizPhase::Start => {
            let total = session.total();
            let noun = if total == 1 { "question" } else { "questions" };
            QuizScreenVm::Start(QuizStartVm {
                total,
                count_label: format!("{total} {noun}"),
                is_empty: session.is_empty(),
            })
        }
        QuizPhase::InProgress => map_question(session),
        QuizPhase::Results => map_results(session, course_index_url),
    }
}

fn map_question(session: &QuizSession) -> QuizScreenVm {
    let index = session.current_index();
    let total = session.total();
    let actions = session.available_actions();
    let recorded = session.answer(index);
    let question = session.current_question();
    let percent = progress_percent(index, total);

    let options = question
        .map(|question| {
            question
                .options
                .iter()
                .take(actions.options)
                .enumerate()
                .filter_map(|(option, text)| {
                    let label = OptionLabel::from_index(option).ok()?;
                    Some(QuizOptionVm {
                        question: index,
                        option,
                        label: label.as_char(),
                        text: text.clone(),
                        selected: recorded == Some(label),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    QuizScreenVm::Question(QuizQuestionVm {
        index,
        counter_label: format!("Question {} of {total}", index + 1),
        progress_percent: percent,
        progress_label: format!("{percent}% Complete"),
        text: question.map(|q| q.text.clone()).unwrap_or_default(),
        options,
        can_go_previous: actions.previous,
    })
}

fn map_results(session: &QuizSession, course_index_url: &str) -> QuizScreenVm {
    let result = session
        .result()
        .unwrap_or_else(|| course_core::QuizResult::new(0, session.total()));
    let review = session
        .review()
        .into_iter()
        .map(|row| {
            let given_label = match (row.given, row.given_text) {
                (Some(label), Some(text)) => format!("{label}. {text}"),
                (Some(label), None) => label.to_string(),
                (None, _) => "Skipped".to_string(),
            };
            let correct_label = match row.correct_text {
                Some(text) => format!("{}. {text}", row.correct),
                None => row.correct.clone(),
            };
            ReviewRowVm {
                number: row.index + 1,
                question: row.question,
                given_label,
                correct_label,
                explanation: row.explanation,
                is_correct: row.is_correct,
            }
        })
        .collect();

    QuizScreenVm::Results(QuizResultsVm {
        percentage_label: format!("{}%", result.percentage),
        score_line: format!(
            "You got {} out of {} correct.",
            result.score, result.total
        ),
        message: result.tier.message(),
        tier_class: result.tier.as_str(),
        review,
        course_index_url: course_index_url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::Question;

    fn vm(keys: &[&str]) -> QuizVm {
        let questions = keys
            .iter()
            .map(|key| Question::new("Which?", ["w", "x", "y", "z"], *key))
            .collect();
        QuizVm::new(QuizSession::new(questions), "../Course_Index.html")
    }

    #[test]
    fn progress_uses_one_formula() {
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn question_screen_carries_index_and_labels() {
        let mut vm = vm(&["B", "C"]);
        vm.dispatch(QuizIntent::Start).unwrap();
        let QuizScreenVm::Question(screen) = vm.screen() else {
            panic!("expected question screen");
        };
        assert_eq!(screen.counter_label, "Question 1 of 2");
        assert_eq!(screen.progress_label, "0% Complete");
        assert!(!screen.can_go_previous);
        let labels: String = screen.options.iter().map(|o| o.label).collect();
        assert_eq!(labels, "ABCD");
        assert!(screen.options.iter().all(|o| o.question == 0));
    }

    #[test]
    fn revisited_question_shows_recorded_answer() {
        let mut vm = vm(&["B", "C"]);
        vm.dispatch(QuizIntent::Start).unwrap();
        vm.dispatch(QuizIntent::Select { question: 0, option: 2 }).unwrap();
        vm.dispatch(QuizIntent::Previous).unwrap();
        let QuizScreenVm::Question(screen) = vm.screen() else {
            panic!("expected question screen");
        };
        let selected: Vec<char> = screen
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.label)
            .collect();
        assert_eq!(selected, vec!['C']);
    }

    #[test]
    fn stale_button_is_ignored() {
        let mut vm = vm(&["A", "A"]);
        vm.dispatch(QuizIntent::Start).unwrap();
        vm.dispatch(QuizIntent::Select { question: 0, option: 0 }).unwrap();
        assert!(vm.dispatch(QuizIntent::Select { question: 0, option: 1 }).is_err());
        assert_eq!(vm.session().current_index(), 1);
    }

    #[test]
    fn results_screen_lists_review() {
        let mut vm = vm(&["B", "C", "D"]);
        vm.dispatch(QuizIntent::Start).unwrap();
        for (question, option) in [(0, 1), (1, 0), (2, 3)] {
            vm.dispatch(QuizIntent::Select { question, option }).unwrap();
        }
        let QuizScreenVm::Results(screen) = vm.screen() else {
            panic!("expected results screen");
        };
        assert_eq!(screen.percentage_label, "67%");
        assert_eq!(screen.score_line, "You got 2 out of 3 correct.");
        assert_eq!(screen.message, "Great job! You have a solid understanding.");
        assert_eq!(screen.review[1].given_label, "A. w");
        assert_eq!(screen.review[1].correct_label, "C. y");
        assert!(!screen.review[1].is_correct);
    }

    #[test]
    fn empty_bank_shows_zero_results() {
        let vm = QuizVm::new(QuizSession::new(Vec::new()), "../Course_Index.html");
        let QuizScreenVm::Results(screen) = vm.screen() else {
            panic!("expected results screen");
        };
        assert_eq!(screen.percentage_label, "0%");
        assert_eq!(screen.score_line, "You got 0 out of 0 correct.");
    }
}
