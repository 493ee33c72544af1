use super::*;
use crate::api::{
    ApiTask, ArSceneRequest, AssistantSendRequest, AttachmentPayload, LoginRequest, QuizRequest,
    StoryRequest, VisualAidRequest,
};
use crate::model::ChatRole;
use crate::session::{Advance, SessionError};

const MAX_ADJUNTOS: usize = 4;
const MAX_ADJUNTO_BYTES: usize = 1_000_000;

impl EduApp {
    // ---------- Acceso ----------

    pub fn iniciar_sesion(&mut self) {
        let email = self.login_form.email.trim().to_string();
        let password = self.login_form.password.clone();

        // Validación en el formulario, antes de tocar la red
        if email.is_empty() || !email.contains('@') {
            self.message = "⚠ Escribe un correo válido.".into();
            return;
        }
        if password.is_empty() {
            self.message = "⚠ La contraseña no puede estar vacía.".into();
            return;
        }

        self.lanzar(
            PendingRequest::Login,
            ApiTask::Login(LoginRequest { email, password }),
        );
    }

    // ---------- Evaluaciones ----------

    pub fn solicitar_evaluacion(&mut self) {
        let topic = self.quiz_form.topic.trim().to_string();
        if topic.is_empty() {
            self.message = "⚠ Escribe un tema para la evaluación.".into();
            return;
        }

        let request = QuizRequest {
            topic,
            difficulty: self.quiz_form.difficulty,
            question_count: self.quiz_form.question_count,
            grade_level: self.quiz_form.grade_level.clone(),
        };
        self.lanzar(PendingRequest::Quiz, ApiTask::GenerateQuiz(request));
    }

    /// Arranca una sesión con el cuestionario embebido cuando el backend no
    /// está disponible. Estas sesiones no entran en el historial.
    pub fn usar_cuestionario_demo(&mut self) {
        match QuizSession::new(self.demo.questions.clone(), None, true) {
            Ok(session) => {
                self.session = Some(session);
                self.assessment_phase = AssessmentPhase::Taking;
                self.last_tick = None;
            }
            Err(err) => {
                // El banco embebido nunca debería estar vacío
                log::error!("banco de demostración inválido: {err}");
                self.message = "No hay preguntas disponibles.".into();
            }
        }
    }

    pub fn responder_actual(&mut self, valor: String) {
        if let Some(session) = &mut self.session {
            let idx = session.current_index();
            if let Err(err) = session.record_answer(idx, valor) {
                log::warn!("respuesta rechazada: {err}");
            }
        }
    }

    pub fn avanzar_pregunta(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        match session.advance() {
            Ok(Advance::Next) => self.message.clear(),
            Ok(Advance::Submitted) => self.terminar_evaluacion(),
            Err(SessionError::AnswerRequired) => {
                self.message = "⚠ Responde antes de continuar.".into();
            }
            Err(err) => log::warn!("no se pudo avanzar: {err}"),
        }
    }

    pub fn retroceder_pregunta(&mut self) {
        if let Some(session) = &mut self.session {
            session.retreat();
        }
    }

    /// Avanza el cronómetro: un tick por cada segundo entero transcurrido
    /// del reloj de egui. Si el tiempo se agota, la entrega es forzosa.
    pub fn tick_cronometro(&mut self, now: f64) {
        let mut forzada = false;
        if let Some(session) = &mut self.session {
            if session.is_submitted() {
                return;
            }
            let last = self.last_tick.get_or_insert(now);
            while now - *last >= 1.0 && !forzada {
                *last += 1.0;
                forzada = session.tick();
            }
        }
        if forzada {
            self.terminar_evaluacion();
            self.message = "⏰ Tiempo agotado: la evaluación se entregó sola.".into();
        }
    }

    /// Cierra la sesión actual: calcula el resultado, lo apunta en el
    /// historial (salvo demostraciones) y pasa a la pantalla de resultados.
    pub(crate) fn terminar_evaluacion(&mut self) {
        if self.assessment_phase == AssessmentPhase::Results {
            return;
        }
        let Some(session) = &mut self.session else {
            return;
        };
        let result = session.submit().clone();
        if !session.is_demo() {
            self.history.push(CompletedAssessment {
                topic: self.quiz_form.topic.clone(),
                score_percent: result.score_percent,
                correct_count: result.correct_count,
                mcq_count: result.mcq_count,
                open_count: result.open_count,
                elapsed_seconds: result.elapsed_seconds,
            });
        }
        self.assessment_phase = AssessmentPhase::Results;
        self.last_tick = None;
    }

    /// «Hacer otra evaluación»: descarta la sesión por completo y vuelve a
    /// la preparación.
    pub fn reiniciar_evaluacion(&mut self) {
        self.session = None;
        self.assessment_phase = AssessmentPhase::Setup;
        self.last_tick = None;
        self.message.clear();
    }

    // ---------- Generadores de contenido ----------

    pub fn generar_contenido(&mut self, kind: ContentKind) {
        let (topic, grade_level) = {
            let pane = self.pane(kind);
            (pane.topic.trim().to_string(), pane.grade_level.clone())
        };
        if topic.is_empty() {
            self.message = "⚠ Escribe un tema.".into();
            return;
        }
        match kind {
            ContentKind::Story => self.lanzar(
                PendingRequest::Story,
                ApiTask::GenerateStory(StoryRequest {
                    topic,
                    grade_level,
                }),
            ),
            ContentKind::VisualAid => self.lanzar(
                PendingRequest::VisualAid,
                ApiTask::GenerateVisualAid(VisualAidRequest {
                    concept: topic,
                    grade_level,
                }),
            ),
        }
    }

    pub fn generar_escena(&mut self) {
        let theme = self.ar_pane.theme.trim().to_string();
        if theme.is_empty() {
            self.message = "⚠ Escribe un tema para la escena.".into();
            return;
        }
        self.lanzar(
            PendingRequest::ArScene,
            ApiTask::GenerateArScene(ArSceneRequest {
                theme,
                object_count: self.ar_pane.object_count,
            }),
        );
    }

    // ---------- Asistente ----------

    pub fn adjuntar_archivo(&mut self, name: String, bytes: Vec<u8>) {
        if self.chat_attachments.len() >= MAX_ADJUNTOS {
            self.message = format!("⚠ Máximo {MAX_ADJUNTOS} adjuntos por mensaje.");
            return;
        }
        if bytes.len() > MAX_ADJUNTO_BYTES {
            self.message = format!("⚠ «{name}» pesa demasiado (máximo 1 MB).");
            return;
        }
        self.chat_attachments.push(Attachment { name, bytes });
    }

    pub fn quitar_adjunto(&mut self, index: usize) {
        if index < self.chat_attachments.len() {
            self.chat_attachments.remove(index);
        }
    }

    pub fn enviar_mensaje(&mut self) {
        let texto = self.chat_input.trim().to_string();
        if texto.is_empty() && self.chat_attachments.is_empty() {
            self.message = "⚠ Escribe un mensaje o adjunta un archivo.".into();
            return;
        }
        if self.pending.is_some() {
            return;
        }

        let attachments: Vec<AttachmentPayload> = self
            .chat_attachments
            .iter()
            .map(AttachmentPayload::from_attachment)
            .collect();
        let nombres = self
            .chat_attachments
            .iter()
            .map(|a| a.name.clone())
            .collect();

        self.chat.push(ChatMessage {
            role: ChatRole::User,
            text: texto.clone(),
            attachments: nombres,
        });
        self.chat_input.clear();
        self.chat_attachments.clear();

        self.lanzar(
            PendingRequest::AssistantSend,
            ApiTask::AssistantSend(AssistantSendRequest {
                message: texto,
                attachments,
            }),
        );
    }

    /// Corta el envío o el sondeo en vuelo. Una respuesta que llegue tarde
    /// se descarta en `procesar_eventos`.
    pub fn cancelar_asistente(&mut self) {
        if let Some(cancel) = self.poll_cancel.take() {
            cancel.cancel();
        }
        if matches!(
            self.pending,
            Some(PendingRequest::AssistantSend | PendingRequest::AssistantReply)
        ) {
            self.pending = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, QuestionKind, QuizQuestion};

    fn app_de_prueba() -> EduApp {
        EduApp::with_auth(AuthSession::default())
    }

    fn mcq(correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: "¿...?".to_string(),
            options: vec!["A".to_string(), correct.to_string()],
            correct_answer: correct.to_string(),
            difficulty: Difficulty::Easy,
            kind: QuestionKind::MultipleChoice,
            rubric: None,
        }
    }

    #[test]
    fn demo_sessions_never_reach_the_history() {
        let mut app = app_de_prueba();
        app.usar_cuestionario_demo();
        assert_eq!(app.assessment_phase, AssessmentPhase::Taking);

        app.terminar_evaluacion();
        assert_eq!(app.assessment_phase, AssessmentPhase::Results);
        assert!(app.history.is_empty());
    }

    #[test]
    fn real_sessions_are_recorded_once() {
        let mut app = app_de_prueba();
        app.quiz_form.topic = "Ríos de Europa".to_string();
        app.session = Some(QuizSession::new(vec![mcq("B")], None, false).unwrap());
        app.assessment_phase = AssessmentPhase::Taking;

        app.responder_actual("B".to_string());
        app.avanzar_pregunta();
        assert_eq!(app.assessment_phase, AssessmentPhase::Results);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].topic, "Ríos de Europa");
        assert_eq!(app.history[0].score_percent, 100);

        // Repetir la entrega no duplica el historial
        app.terminar_evaluacion();
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn timer_runs_out_and_submits_by_itself() {
        let mut app = app_de_prueba();
        app.session = Some(
            QuizSession::with_seconds_per_question(vec![mcq("B")], None, false, 2).unwrap(),
        );
        app.assessment_phase = AssessmentPhase::Taking;

        app.tick_cronometro(10.0); // fija el origen del reloj
        assert_eq!(app.assessment_phase, AssessmentPhase::Taking);
        app.tick_cronometro(12.5); // consume los 2 segundos asignados
        assert_eq!(app.assessment_phase, AssessmentPhase::Results);
        let session = app.session.as_ref().unwrap();
        assert!(session.is_submitted());
        assert_eq!(session.result().map(|r| r.elapsed_seconds), Some(2));
    }

    #[test]
    fn reiniciar_discards_the_session_entirely() {
        let mut app = app_de_prueba();
        app.usar_cuestionario_demo();
        app.terminar_evaluacion();
        app.reiniciar_evaluacion();
        assert!(app.session.is_none());
        assert_eq!(app.assessment_phase, AssessmentPhase::Setup);
    }

    #[test]
    fn attachments_are_capped_in_count_and_size() {
        let mut app = app_de_prueba();
        for i in 0..MAX_ADJUNTOS {
            app.adjuntar_archivo(format!("n{i}.txt"), vec![0; 10]);
        }
        assert_eq!(app.chat_attachments.len(), MAX_ADJUNTOS);
        app.adjuntar_archivo("extra.txt".to_string(), vec![0; 10]);
        assert_eq!(app.chat_attachments.len(), MAX_ADJUNTOS);

        let mut app = app_de_prueba();
        app.adjuntar_archivo("grande.bin".to_string(), vec![0; MAX_ADJUNTO_BYTES + 1]);
        assert!(app.chat_attachments.is_empty());
    }

    #[test]
    fn login_form_is_validated_before_any_request() {
        let mut app = app_de_prueba();
        app.login_form.email = "sin-arroba".to_string();
        app.login_form.password = "1234".to_string();
        app.iniciar_sesion();
        assert!(app.pending.is_none());
        assert!(!app.message.is_empty());
    }
}
