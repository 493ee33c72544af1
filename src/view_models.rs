// src/view_models.rs

use crate::model::CompletedAssessment;
use crate::session::QuestionReview;

#[derive(Clone, Debug)]
pub struct HistoryRow {
    pub topic: String,
    pub score_percent: u32,
    pub elapsed_seconds: u32,
}

impl HistoryRow {
    pub fn from_entry(entry: &CompletedAssessment) -> Self {
        Self {
            topic: entry.topic.clone(),
            score_percent: entry.score_percent,
            elapsed_seconds: entry.elapsed_seconds,
        }
    }

    pub fn score_label(&self) -> String {
        if self.score_percent >= 50 {
            format!("{} % ✅", self.score_percent)
        } else {
            format!("{} % ❌", self.score_percent)
        }
    }

    pub fn elapsed_label(&self) -> String {
        elapsed_label(self.elapsed_seconds)
    }
}

#[derive(Clone, Debug)]
pub struct ResultRow {
    pub number: usize, // 1-based
    pub given_answer: String,
    pub correct_answer: String,
    pub correct: Option<bool>,
}

impl ResultRow {
    pub fn from_review(number: usize, review: &QuestionReview) -> Self {
        Self {
            number,
            given_answer: review.given_answer.clone(),
            correct_answer: review.correct_answer.clone(),
            correct: review.correct,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self.correct {
            Some(true) => "✅ Correcta",
            Some(false) => "❌ Incorrecta",
            None => "📝 Revisión manual",
        }
    }

    /// La respuesta esperada solo tiene sentido en opción múltiple.
    pub fn expected_label(&self) -> &str {
        if self.correct.is_some() {
            &self.correct_answer
        } else {
            "—"
        }
    }
}

pub fn elapsed_label(seconds: u32) -> String {
    format!("{} min {:02} s", seconds / 60, seconds % 60)
}

/// mm:ss para el cronómetro en pantalla.
pub fn clock_label(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_format_minutes_and_seconds() {
        assert_eq!(elapsed_label(200), "3 min 20 s");
        assert_eq!(clock_label(65), "01:05");
        assert_eq!(clock_label(600), "10:00");
    }

    #[test]
    fn score_label_marks_passing_grade() {
        let row = HistoryRow {
            topic: "Ríos".to_string(),
            score_percent: 67,
            elapsed_seconds: 90,
        };
        assert_eq!(row.score_label(), "67 % ✅");
    }
}
