use crate::model::{QuestionKind, QuizQuestion};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tiempo asignado por pregunta al crear la sesión.
pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 120;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("una evaluación necesita al menos una pregunta")]
    EmptyQuestionSet,
    #[error("pregunta {0} fuera de rango")]
    OutOfRange(usize),
    #[error("la pregunta actual está sin responder")]
    AnswerRequired,
    #[error("la evaluación ya fue entregada")]
    AlreadySubmitted,
}

/// Resultado de `advance`: o hay otra pregunta o la sesión quedó entregada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub question: String,
    pub given_answer: String,
    pub correct_answer: String,
    /// `None` en preguntas abiertas: quedan para revisión manual.
    pub correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Porcentaje redondeado calculado SOLO sobre opción múltiple.
    pub score_percent: u32,
    pub correct_count: usize,
    pub mcq_count: usize,
    pub open_count: usize,
    pub elapsed_seconds: u32,
    pub reviews: Vec<QuestionReview>,
}

/// Una tentativa de evaluación, desde que llegan las preguntas hasta el
/// resultado puntuado. Los campos son privados: las invariantes
/// (`answers.len() == questions.len()`, índice siempre dentro de rango,
/// resultado calculado una sola vez) se mantienen desde aquí.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    answers: Vec<String>,
    current_index: usize,
    time_remaining: u32,
    allotted_seconds: u32,
    assessment_id: Option<String>,
    demo: bool,
    result: Option<QuizResult>,
}

impl QuizSession {
    pub fn new(
        questions: Vec<QuizQuestion>,
        assessment_id: Option<String>,
        demo: bool,
    ) -> Result<Self, SessionError> {
        Self::with_seconds_per_question(questions, assessment_id, demo, DEFAULT_SECONDS_PER_QUESTION)
    }

    pub fn with_seconds_per_question(
        questions: Vec<QuizQuestion>,
        assessment_id: Option<String>,
        demo: bool,
        seconds_per_question: u32,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionSet);
        }
        let allotted = questions.len() as u32 * seconds_per_question.max(1);
        Ok(Self {
            answers: vec![String::new(); questions.len()],
            questions,
            current_index: 0,
            time_remaining: allotted,
            allotted_seconds: allotted,
            assessment_id,
            demo,
            result: None,
        })
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current_index]
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    pub fn current_answer(&self) -> &str {
        &self.answers[self.current_index]
    }

    /// Enlace directo para el campo de texto de las preguntas abiertas.
    /// Tras la entrega la sesión queda congelada y devuelve `None`.
    pub fn current_answer_mut(&mut self) -> Option<&mut String> {
        if self.result.is_some() {
            return None;
        }
        self.answers.get_mut(self.current_index)
    }

    pub fn has_current_answer(&self) -> bool {
        !self.current_answer().trim().is_empty()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn allotted_seconds(&self) -> u32 {
        self.allotted_seconds
    }

    pub fn assessment_id(&self) -> Option<&str> {
        self.assessment_id.as_deref()
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Sobrescribe la respuesta de una pregunta. El valor no se contrasta
    /// con las opciones (eso lo acota la interfaz), pero el índice sí.
    pub fn record_answer(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.result.is_some() {
            return Err(SessionError::AlreadySubmitted);
        }
        if index >= self.answers.len() {
            return Err(SessionError::OutOfRange(index));
        }
        self.answers[index] = value.into();
        Ok(())
    }

    /// Pasa a la siguiente pregunta; en la última, entrega. Exige que la
    /// pregunta actual tenga respuesta no vacía.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        if self.result.is_some() {
            return Err(SessionError::AlreadySubmitted);
        }
        if !self.has_current_answer() {
            return Err(SessionError::AnswerRequired);
        }
        if self.is_last_question() {
            self.submit();
            return Ok(Advance::Submitted);
        }
        self.current_index += 1;
        Ok(Advance::Next)
    }

    /// Vuelve a la pregunta anterior; en la primera no hace nada.
    pub fn retreat(&mut self) {
        if self.current_index > 0 && self.result.is_none() {
            self.current_index -= 1;
        }
    }

    /// Un segundo de reloj. Devuelve `true` si agotó el tiempo y forzó la
    /// entrega en este mismo tick.
    pub fn tick(&mut self) -> bool {
        if self.result.is_some() || self.time_remaining == 0 {
            return false;
        }
        self.time_remaining -= 1;
        if self.time_remaining == 0 {
            self.submit();
            return true;
        }
        false
    }

    /// Congela la sesión y calcula el resultado. Idempotente: la segunda
    /// llamada devuelve el resultado ya calculado sin tocarlo.
    pub fn submit(&mut self) -> &QuizResult {
        let computed = match self.result.take() {
            Some(existing) => existing,
            None => self.compute_result(),
        };
        self.result.insert(computed)
    }

    fn compute_result(&self) -> QuizResult {
        let mut correct_count = 0;
        let mut mcq_count = 0;
        let mut open_count = 0;
        let mut reviews = Vec::with_capacity(self.questions.len());

        for (question, answer) in self.questions.iter().zip(&self.answers) {
            let correct = match question.kind {
                QuestionKind::MultipleChoice => {
                    mcq_count += 1;
                    // Coincidencia exacta con la opción correcta
                    let ok = answer == &question.correct_answer;
                    if ok {
                        correct_count += 1;
                    }
                    Some(ok)
                }
                QuestionKind::OpenEnded => {
                    open_count += 1;
                    None
                }
            };
            reviews.push(QuestionReview {
                question: question.question.clone(),
                given_answer: answer.clone(),
                correct_answer: question.correct_answer.clone(),
                correct,
            });
        }

        let score_percent = if mcq_count == 0 {
            0
        } else {
            ((correct_count as f64 / mcq_count as f64) * 100.0).round() as u32
        };

        QuizResult {
            score_percent,
            correct_count,
            mcq_count,
            open_count,
            elapsed_seconds: self.allotted_seconds - self.time_remaining,
            reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    fn mcq(prompt: &str, options: &[&str], correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct.to_string(),
            difficulty: Difficulty::Easy,
            kind: QuestionKind::MultipleChoice,
            rubric: None,
        }
    }

    fn open(prompt: &str) -> QuizQuestion {
        QuizQuestion {
            question: prompt.to_string(),
            options: vec![],
            correct_answer: String::new(),
            difficulty: Difficulty::Medium,
            kind: QuestionKind::OpenEnded,
            rubric: None,
        }
    }

    fn three_mcq_session() -> QuizSession {
        QuizSession::new(
            vec![
                mcq("q1", &["A", "B"], "A"),
                mcq("q2", &["B", "C"], "B"),
                mcq("q3", &["C", "D"], "C"),
            ],
            None,
            false,
        )
        .unwrap()
    }

    #[test]
    fn empty_question_set_is_rejected() {
        assert_eq!(
            QuizSession::new(vec![], None, false).unwrap_err(),
            SessionError::EmptyQuestionSet
        );
    }

    #[test]
    fn answers_len_matches_questions_after_every_record() {
        let mut session = three_mcq_session();
        for i in 0..3 {
            session.record_answer(i, "A").unwrap();
            assert_eq!(session.questions().len(), 3);
            assert_eq!((0..3).filter(|&j| session.answer(j).is_some()).count(), 3);
        }
        assert!(session.answer(3).is_none());
    }

    #[test]
    fn record_answer_out_of_range_is_rejected() {
        let mut session = three_mcq_session();
        assert_eq!(
            session.record_answer(3, "A").unwrap_err(),
            SessionError::OutOfRange(3)
        );
    }

    #[test]
    fn advance_requires_a_non_blank_answer() {
        let mut session = three_mcq_session();
        assert_eq!(session.advance().unwrap_err(), SessionError::AnswerRequired);
        session.record_answer(0, "   ").unwrap();
        assert_eq!(session.advance().unwrap_err(), SessionError::AnswerRequired);
        session.record_answer(0, "A").unwrap();
        assert_eq!(session.advance().unwrap(), Advance::Next);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn advance_on_last_question_submits_and_never_overflows_index() {
        let mut session = three_mcq_session();
        for (i, ans) in ["A", "B", "C"].iter().enumerate() {
            session.record_answer(i, *ans).unwrap();
            session.advance().unwrap();
        }
        assert!(session.is_submitted());
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.advance().unwrap_err(), SessionError::AlreadySubmitted);
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn retreat_at_first_question_is_a_noop() {
        let mut session = three_mcq_session();
        session.retreat();
        assert_eq!(session.current_index(), 0);
        session.record_answer(0, "A").unwrap();
        session.advance().unwrap();
        session.retreat();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn three_mcq_two_correct_rounds_to_67() {
        let mut session = three_mcq_session();
        for (i, ans) in ["A", "X", "C"].iter().enumerate() {
            session.record_answer(i, *ans).unwrap();
        }
        let result = session.submit();
        assert_eq!(result.score_percent, 67);
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.mcq_count, 3);
    }

    #[test]
    fn score_is_zero_without_multiple_choice_questions() {
        let mut session =
            QuizSession::new(vec![open("explica"), open("razona")], None, false).unwrap();
        session.record_answer(0, "una respuesta larga").unwrap();
        session.record_answer(1, "otra respuesta").unwrap();
        let result = session.submit();
        assert_eq!(result.score_percent, 0);
        assert_eq!(result.mcq_count, 0);
        assert_eq!(result.open_count, 2);
        assert!(result.reviews.iter().all(|r| r.correct.is_none()));
    }

    #[test]
    fn submit_twice_yields_identical_result() {
        let mut session = three_mcq_session();
        session.record_answer(0, "A").unwrap();
        let first = session.submit().clone();
        session.tick();
        let second = session.submit().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn tick_reaching_zero_forces_submit_exactly_once() {
        let mut session = QuizSession::with_seconds_per_question(
            vec![mcq("q1", &["A", "B"], "A")],
            None,
            false,
            3,
        )
        .unwrap();
        assert!(!session.tick());
        assert!(!session.tick());
        assert!(session.tick());
        assert!(session.is_submitted());
        assert_eq!(session.time_remaining(), 0);
        // Tras la entrega el reloj queda parado
        assert!(!session.tick());
        assert_eq!(session.result().map(|r| r.elapsed_seconds), Some(3));
    }

    #[test]
    fn answers_are_frozen_after_submit() {
        let mut session = three_mcq_session();
        session.record_answer(0, "A").unwrap();
        session.submit();
        assert_eq!(
            session.record_answer(1, "B").unwrap_err(),
            SessionError::AlreadySubmitted
        );
        assert!(session.current_answer_mut().is_none());
    }

    #[test]
    fn demo_flag_travels_with_the_session() {
        let session = QuizSession::new(vec![mcq("q", &["A", "B"], "A")], None, true).unwrap();
        assert!(session.is_demo());
        assert!(session.assessment_id().is_none());
    }
}
