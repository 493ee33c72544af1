use super::*;
use crate::api::{self, ApiError, ApiTask};
use crate::model::ChatRole;
use crate::poll::{self, PollOutcome, PollPlan};

#[cfg(not(target_arch = "wasm32"))]
fn spawn_task(client: ApiClient, task: ApiTask, tx: Sender<ApiEvent>) {
    std::thread::spawn(move || {
        let event = api::perform(&client, &task);
        let _ = tx.send(event);
    });
}

#[cfg(target_arch = "wasm32")]
fn spawn_task(client: ApiClient, task: ApiTask, tx: Sender<ApiEvent>) {
    wasm_bindgen_futures::spawn_local(async move {
        let event = api::perform(&client, &task).await;
        let _ = tx.send(event);
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_poll(client: ApiClient, reply_id: String, cancel: CancelHandle, tx: Sender<ApiEvent>) {
    std::thread::spawn(move || {
        let outcome = poll::run_poll(&client, &reply_id, &PollPlan::default(), &cancel);
        let _ = tx.send(ApiEvent::AssistantPoll(outcome));
    });
}

#[cfg(target_arch = "wasm32")]
fn spawn_poll(client: ApiClient, reply_id: String, cancel: CancelHandle, tx: Sender<ApiEvent>) {
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = poll::run_poll(&client, &reply_id, &PollPlan::default(), &cancel).await;
        let _ = tx.send(ApiEvent::AssistantPoll(outcome));
    });
}

impl EduApp {
    /// Lanza una petición en segundo plano. Con otra en vuelo no hace nada:
    /// los botones de envío ya están deshabilitados en ese estado.
    pub(crate) fn lanzar(&mut self, kind: PendingRequest, task: ApiTask) {
        if self.pending.is_some() {
            return;
        }
        self.pending = Some(kind);
        spawn_task(self.api.clone(), task, self.events_tx.clone());
    }

    /// Recoge los resultados que llegan por el canal. Se llama una vez por
    /// frame desde el bucle de la interfaz.
    pub fn procesar_eventos(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.aplicar_evento(event);
        }
    }

    fn aplicar_evento(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Login(Ok(response)) => {
                self.pending = None;
                log::info!("sesión iniciada para {}", response.user.email);
                self.auth.iniciar(response.user, response.token);
                self.login_form = LoginForm::default();
                self.state = AppState::Dashboard;
                self.message.clear();
            }
            ApiEvent::Login(Err(err)) => {
                self.pending = None;
                log::warn!("fallo de acceso: {err}");
                self.message = format!("❌ No se pudo iniciar sesión: {err}");
            }

            ApiEvent::Quiz(Ok(response)) => {
                self.pending = None;
                match QuizSession::new(response.questions, response.assessment_id, false) {
                    Ok(session) => {
                        self.session = Some(session);
                        self.assessment_phase = AssessmentPhase::Taking;
                        self.last_tick = None;
                        self.message.clear();
                    }
                    // `validate_quiz` ya rechaza la lista vacía
                    Err(err) => self.caer_a_demo_quiz(ApiError::InvalidShape(err.to_string())),
                }
            }
            ApiEvent::Quiz(Err(err)) => {
                self.pending = None;
                self.caer_a_demo_quiz(err);
            }

            ApiEvent::Story(result) => {
                self.aplicar_contenido(ContentKind::Story, result.map(GeneratedContent::Story));
            }
            ApiEvent::VisualAid(result) => {
                self.aplicar_contenido(
                    ContentKind::VisualAid,
                    result.map(GeneratedContent::VisualAid),
                );
            }

            ApiEvent::ArScene(Ok(scene)) => {
                self.pending = None;
                self.ar_pane.scene = Some(scene);
                self.ar_pane.is_demo = false;
                self.message.clear();
            }
            ApiEvent::ArScene(Err(err)) => {
                self.pending = None;
                log::warn!("escena no disponible: {err}");
                self.ar_pane.scene = Some(self.demo.ar_scene.clone());
                self.ar_pane.is_demo = true;
                self.message = "Sin conexión con el backend: escena de demostración.".into();
            }

            ApiEvent::AssistantAccepted(Ok(response)) => {
                // Si el usuario canceló o salió de la vista, se descarta
                if self.pending != Some(PendingRequest::AssistantSend) {
                    return;
                }
                self.pending = Some(PendingRequest::AssistantReply);
                let cancel = CancelHandle::new();
                self.poll_cancel = Some(cancel.clone());
                spawn_poll(
                    self.api.clone(),
                    response.reply_id,
                    cancel,
                    self.events_tx.clone(),
                );
            }
            ApiEvent::AssistantAccepted(Err(err)) => {
                if self.pending != Some(PendingRequest::AssistantSend) {
                    return;
                }
                self.pending = None;
                log::warn!("asistente no disponible: {err}");
                self.message = format!("❌ El asistente no está disponible: {err}");
            }

            ApiEvent::AssistantPoll(outcome) => {
                if self.pending != Some(PendingRequest::AssistantReply) {
                    return;
                }
                self.pending = None;
                self.poll_cancel = None;
                match outcome {
                    PollOutcome::Reply(text) => {
                        self.chat.push(ChatMessage {
                            role: ChatRole::Assistant,
                            text,
                            attachments: vec![],
                        });
                        self.message.clear();
                    }
                    PollOutcome::AttemptsExhausted { attempts } => {
                        self.message =
                            format!("⏰ El asistente no respondió tras {attempts} intentos.");
                    }
                    PollOutcome::Failed(err) => {
                        log::warn!("sondeo del asistente fallido: {err}");
                        self.message = format!("❌ Se perdió la conexión con el asistente: {err}");
                    }
                    PollOutcome::Cancelled => {}
                }
            }
        }
    }

    fn caer_a_demo_quiz(&mut self, err: ApiError) {
        log::warn!("no se pudo generar la evaluación: {err}");
        self.message =
            "Sin conexión con el backend: cuestionario de demostración (no puntúa).".into();
        self.usar_cuestionario_demo();
    }

    fn aplicar_contenido(
        &mut self,
        kind: ContentKind,
        result: Result<GeneratedContent, ApiError>,
    ) {
        self.pending = None;
        match result {
            Ok(content) => {
                let pane = self.pane_mut(kind);
                pane.result = Some(content);
                pane.is_demo = false;
                self.message.clear();
            }
            Err(err) => {
                log::warn!("contenido no disponible: {err}");
                let demo = match kind {
                    ContentKind::Story => GeneratedContent::Story(self.demo.story.clone()),
                    ContentKind::VisualAid => {
                        GeneratedContent::VisualAid(self.demo.visual_aid.clone())
                    }
                };
                let pane = self.pane_mut(kind);
                pane.result = Some(demo);
                pane.is_demo = true;
                self.message = "Sin conexión con el backend: contenido de demostración.".into();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LoginResponse, QuizResponse};
    use crate::model::{Role, UserProfile};

    fn app_de_prueba() -> EduApp {
        EduApp::with_auth(AuthSession::default())
    }

    #[test]
    fn backend_failure_falls_back_to_the_demo_quiz() {
        let mut app = app_de_prueba();
        app.pending = Some(PendingRequest::Quiz);
        app.aplicar_evento(ApiEvent::Quiz(Err(ApiError::Network("sin red".into()))));

        let session = app.session.as_ref().expect("debe haber sesión demo");
        assert!(session.is_demo());
        assert_eq!(app.assessment_phase, AssessmentPhase::Taking);
        assert!(app.pending.is_none());
        assert!(app.message.contains("demostración"));
    }

    #[test]
    fn login_event_fills_the_auth_container() {
        let mut app = app_de_prueba();
        app.pending = Some(PendingRequest::Login);
        app.aplicar_evento(ApiEvent::Login(Ok(LoginResponse {
            user: UserProfile {
                name: "Mario".to_string(),
                email: "mario@escuela.edu".to_string(),
                role: Role::Student,
            },
            token: "tok-9".to_string(),
        })));

        assert!(app.auth.is_authenticated);
        assert_eq!(app.auth.token.as_deref(), Some("tok-9"));
        assert_eq!(app.state, AppState::Dashboard);
    }

    #[test]
    fn story_failure_uses_demo_content_and_marks_it() {
        let mut app = app_de_prueba();
        app.pending = Some(PendingRequest::Story);
        app.aplicar_evento(ApiEvent::Story(Err(ApiError::Status {
            status: 503,
            body: String::new(),
        })));

        let pane = app.pane(ContentKind::Story);
        assert!(pane.is_demo);
        assert!(matches!(pane.result, Some(GeneratedContent::Story(_))));
    }

    #[test]
    fn stale_assistant_events_are_dropped_after_cancel() {
        let mut app = app_de_prueba();
        app.pending = Some(PendingRequest::AssistantSend);
        app.cancelar_asistente();
        assert!(app.pending.is_none());

        // La aceptación llega tarde: no debe reactivar nada
        app.aplicar_evento(ApiEvent::AssistantAccepted(Ok(
            crate::api::AssistantSendResponse {
                reply_id: "r-7".to_string(),
            },
        )));
        assert!(app.pending.is_none());
        assert!(app.poll_cancel.is_none());
    }

    #[test]
    fn assistant_reply_lands_in_the_chat() {
        let mut app = app_de_prueba();
        app.pending = Some(PendingRequest::AssistantReply);
        app.aplicar_evento(ApiEvent::AssistantPoll(PollOutcome::Reply(
            "Claro, te lo explico.".to_string(),
        )));

        assert_eq!(app.chat.len(), 1);
        assert_eq!(app.chat[0].role, ChatRole::Assistant);
        assert!(app.pending.is_none());
    }

    #[test]
    fn empty_quiz_response_still_falls_back() {
        let mut app = app_de_prueba();
        app.pending = Some(PendingRequest::Quiz);
        // Una respuesta vacía que esquivara la validación del cliente
        app.aplicar_evento(ApiEvent::Quiz(Ok(QuizResponse {
            assessment_id: None,
            questions: vec![],
        })));

        let session = app.session.as_ref().expect("debe haber sesión demo");
        assert!(session.is_demo());
    }
}
