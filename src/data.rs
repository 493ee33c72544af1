// src/data.rs

use crate::model::{ArScene, QuizQuestion, Story, VisualAid};
use serde::Deserialize;

/// Contenido de demostración embebido. Se usa cuando el backend no responde
/// o devuelve una forma inválida; las evaluaciones hechas con él nunca se
/// guardan como datos reales.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoPack {
    pub questions: Vec<QuizQuestion>,
    pub story: Story,
    pub visual_aid: VisualAid,
    pub ar_scene: ArScene,
}

/// Carga el contenido de demostración desde el YAML embebido
pub fn read_demo_pack() -> DemoPack {
    let file_content = include_str!("data/demo_content.yaml");
    serde_yaml::from_str(file_content).expect("No se pudo parsear el contenido de demostración YAML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{QuizResponse, validate_quiz};
    use crate::model::QuestionKind;

    #[test]
    fn demo_pack_parses() {
        let pack = read_demo_pack();
        assert!(!pack.questions.is_empty());
        assert!(!pack.story.paragraphs.is_empty());
        assert!(!pack.visual_aid.sections.is_empty());
        assert!(!pack.ar_scene.objects.is_empty());
    }

    #[test]
    fn demo_questions_pass_the_same_validation_as_backend_quizzes() {
        let pack = read_demo_pack();
        let response = QuizResponse {
            assessment_id: None,
            questions: pack.questions,
        };
        assert!(validate_quiz(&response).is_ok());
    }

    #[test]
    fn demo_pack_mixes_mcq_and_open_questions() {
        let pack = read_demo_pack();
        assert!(pack.questions.iter().any(|q| q.kind == QuestionKind::MultipleChoice));
        let abiertas: Vec<_> = pack
            .questions
            .iter()
            .filter(|q| q.kind == QuestionKind::OpenEnded)
            .collect();
        assert!(!abiertas.is_empty());
        assert!(abiertas.iter().all(|q| q.rubric.is_some()));
    }
}
