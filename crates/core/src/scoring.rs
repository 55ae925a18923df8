//! Stateless scoring over a question bank and the answers recorded for it.

use crate::model::{OptionLabel, Question};

/// Lowest percentage (inclusive) of the "mastered" tier.
pub const MASTERED_THRESHOLD: u8 = 80;
/// Lowest percentage (inclusive) of the "solid understanding" tier.
pub const SOLID_THRESHOLD: u8 = 60;

/// Number of questions whose recorded answer matches the key.
///
/// Unanswered slots and questions with a malformed key count as incorrect.
/// Extra answers past the end of `questions` are ignored.
#[must_use]
pub fn compute_score(questions: &[Question], answers: &[Option<OptionLabel>]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| answer.is_some_and(|label| question.is_correct(label)))
        .count()
}

/// `score / total` as a whole percentage, rounded half up. An empty quiz is 0%.
#[must_use]
pub fn percentage(score: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let score = score.min(total) as u128;
    let total = total as u128;
    let rounded = (score * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Feedback bracket for a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeTier {
    Mastered,
    Solid,
    NeedsReview,
}

impl GradeTier {
    /// Thresholds are closed lower bounds checked from the top, so exactly 80 is `Mastered`.
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage >= MASTERED_THRESHOLD {
            Self::Mastered
        } else if percentage >= SOLID_THRESHOLD {
            Self::Solid
        } else {
            Self::NeedsReview
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Mastered => "Outstanding! You have mastered this module.",
            Self::Solid => "Great job! You have a solid understanding.",
            Self::NeedsReview => "Keep It Up! Review the notes and try again.",
        }
    }

    /// Stable token for styling hooks.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mastered => "mastered",
            Self::Solid => "solid",
            Self::NeedsReview => "needs-review",
        }
    }
}

/// Outcome of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub percentage: u8,
    pub tier: GradeTier,
}

impl QuizResult {
    #[must_use]
    pub fn new(score: usize, total: usize) -> Self {
        let percentage = percentage(score, total);
        Self {
            score,
            total,
            percentage,
            tier: GradeTier::from_percentage(percentage),
        }
    }
}

/// One row of the post-quiz answer review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReview {
    pub index: usize,
    pub question: String,
    pub given: Option<OptionLabel>,
    pub given_text: Option<String>,
    /// The key as supplied, even when it does not resolve to an option.
    pub correct: String,
    pub correct_text: Option<String>,
    pub explanation: Option<String>,
    pub is_correct: bool,
}

#[must_use]
pub fn review_answers(questions: &[Question], answers: &[Option<OptionLabel>]) -> Vec<AnswerReview> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let given = answers.get(index).copied().flatten();
            AnswerReview {
                index,
                question: question.text.clone(),
                given,
                given_text: given
                    .and_then(|label| question.option_text(label))
                    .map(str::to_owned),
                correct: question.correct.clone(),
                correct_text: question
                    .correct_label()
                    .and_then(|label| question.option_text(label))
                    .map(str::to_owned),
                explanation: question.explanation.clone(),
                is_correct: given.is_some_and(|label| question.is_correct(label)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> Option<OptionLabel> {
        Some(s.parse().unwrap())
    }

    fn bank(keys: &[&str]) -> Vec<Question> {
        keys.iter()
            .enumerate()
            .map(|(i, key)| Question::new(format!("Q{i}"), ["w", "x", "y", "z"], *key))
            .collect()
    }

    #[test]
    fn counts_matching_answers() {
        let questions = bank(&["B", "C", "D"]);
        let answers = [label("B"), label("A"), label("D")];
        assert_eq!(compute_score(&questions, &answers), 2);
        assert_eq!(compute_score(&questions, &answers), 2);
    }

    #[test]
    fn unanswered_and_malformed_keys_score_zero() {
        let questions = bank(&["A", "Q", "E"]);
        let answers = [None, label("A"), label("E")];
        assert_eq!(compute_score(&questions, &answers), 0);
    }

    #[test]
    fn percentage_rounds_half_up_and_handles_empty() {
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(7, 4), 100);
    }

    #[test]
    fn tiers_use_closed_lower_bounds() {
        assert_eq!(GradeTier::from_percentage(100), GradeTier::Mastered);
        assert_eq!(GradeTier::from_percentage(80), GradeTier::Mastered);
        assert_eq!(GradeTier::from_percentage(79), GradeTier::Solid);
        assert_eq!(GradeTier::from_percentage(60), GradeTier::Solid);
        assert_eq!(GradeTier::from_percentage(59), GradeTier::NeedsReview);
        assert_eq!(GradeTier::from_percentage(0), GradeTier::NeedsReview);
    }

    #[test]
    fn result_for_two_of_three_is_solid() {
        let result = QuizResult::new(2, 3);
        assert_eq!(result.percentage, 67);
        assert_eq!(result.tier, GradeTier::Solid);
        assert_eq!(result.tier.message(), "Great job! You have a solid understanding.");
    }

    #[test]
    fn review_lists_given_and_correct_text() {
        let questions = vec![
            Question::new("Bridge?", ["NAT", "Bridged"], "B").with_explanation("Bridged joins the LAN."),
            Question::new("DNS?", ["names", "ips"], "A"),
        ];
        let rows = review_answers(&questions, &[label("A"), None]);

        assert_eq!(rows[0].given_text.as_deref(), Some("NAT"));
        assert_eq!(rows[0].correct_text.as_deref(), Some("Bridged"));
        assert_eq!(rows[0].explanation.as_deref(), Some("Bridged joins the LAN."));
        assert!(!rows[0].is_correct);

        assert_eq!(rows[1].given, None);
        assert_eq!(rows[1].given_text, None);
        assert!(!rows[1].is_correct);
    }
}
