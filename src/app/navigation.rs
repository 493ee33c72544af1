use super::*;

impl EduApp {
    /// Cambia de pantalla. Al salir del asistente se cancela el sondeo en
    /// vuelo para que una respuesta tardía no toque el estado.
    pub fn ir_a(&mut self, destino: AppState) {
        if self.state == AppState::Assistant && destino != AppState::Assistant {
            self.cancelar_asistente();
        }
        self.state = destino;
        self.message.clear();
    }

    pub fn volver_al_panel(&mut self) {
        self.ir_a(AppState::Dashboard);
    }

    pub fn cerrar_sesion(&mut self) {
        self.cancelar_asistente();
        self.auth.cerrar();

        // Nada del alumno anterior debe quedar en memoria
        self.session = None;
        self.assessment_phase = AssessmentPhase::Setup;
        self.history.clear();
        self.quiz_form = QuizForm::default();
        self.chat.clear();
        self.chat_input.clear();
        self.chat_attachments.clear();
        self.story_pane = GeneratorPane::new(ContentKind::Story);
        self.visual_pane = GeneratorPane::new(ContentKind::VisualAid);
        self.ar_pane = ArPane::default();
        self.login_form = LoginForm::default();
        self.last_tick = None;

        self.state = AppState::Login;
        self.message.clear();
        log::info!("sesión cerrada");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, UserProfile};

    #[test]
    fn leaving_the_assistant_cancels_the_poll() {
        let mut app = EduApp::with_auth(AuthSession::default());
        app.state = AppState::Assistant;
        app.pending = Some(PendingRequest::AssistantReply);
        let cancel = CancelHandle::new();
        app.poll_cancel = Some(cancel.clone());

        app.ir_a(AppState::Dashboard);
        assert!(cancel.is_cancelled());
        assert!(app.pending.is_none());
        assert_eq!(app.state, AppState::Dashboard);
    }

    #[test]
    fn logout_wipes_student_state() {
        let mut auth = AuthSession::default();
        auth.iniciar(
            UserProfile {
                name: "Ana".to_string(),
                email: "ana@escuela.edu".to_string(),
                role: Role::Student,
            },
            "tok".to_string(),
        );
        let mut app = EduApp::with_auth(auth);
        app.usar_cuestionario_demo();
        app.chat_input = "hola".to_string();

        app.cerrar_sesion();
        assert!(!app.auth.is_authenticated);
        assert!(app.session.is_none());
        assert!(app.chat_input.is_empty());
        assert_eq!(app.state, AppState::Login);
    }
}
