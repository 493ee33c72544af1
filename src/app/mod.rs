use crate::api::{ApiClient, ApiEvent};
use crate::auth::AuthSession;
use crate::data::{DemoPack, read_demo_pack};
use crate::model::{
    AppState, AssessmentPhase, Attachment, ChatMessage, CompletedAssessment, ContentKind,
    Difficulty, GeneratedContent,
};
use crate::poll::CancelHandle;
use crate::session::QuizSession;
use std::sync::mpsc::{Receiver, Sender, channel};

// Submódulos
pub mod actions;
pub mod navigation;
pub mod pending;
pub mod queries;

/// Formulario de acceso.
#[derive(Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Formulario de la fase de preparación de una evaluación.
#[derive(Clone)]
pub struct QuizForm {
    pub topic: String,
    pub difficulty: Difficulty,
    pub question_count: usize,
    pub grade_level: String,
}

impl Default for QuizForm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            difficulty: Difficulty::Medium,
            question_count: 5,
            grade_level: "Primaria".to_string(),
        }
    }
}

/// Panel parametrizado de generación de contenido. Cuentos y apoyos
/// visuales comparten este estado y una sola vista.
pub struct GeneratorPane {
    pub kind: ContentKind,
    pub topic: String,
    pub grade_level: String,
    pub result: Option<GeneratedContent>,
    pub is_demo: bool,
}

impl GeneratorPane {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            topic: String::new(),
            grade_level: "Primaria".to_string(),
            result: None,
            is_demo: false,
        }
    }
}

/// Estado del visor de escenas RA.
pub struct ArPane {
    pub theme: String,
    pub object_count: usize,
    pub scene: Option<crate::model::ArScene>,
    pub is_demo: bool,
}

impl Default for ArPane {
    fn default() -> Self {
        Self {
            theme: String::new(),
            object_count: 5,
            scene: None,
            is_demo: false,
        }
    }
}

/// Qué petición está en vuelo. Mientras haya una, los botones de envío
/// quedan deshabilitados (una petición a la vez).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingRequest {
    Login,
    Quiz,
    Story,
    VisualAid,
    ArScene,
    AssistantSend,
    AssistantReply,
}

pub struct EduApp {
    // Sesión y navegación
    pub auth: AuthSession,
    pub state: AppState,
    pub message: String,
    pub login_form: LoginForm,

    // Evaluaciones
    pub quiz_form: QuizForm,
    pub assessment_phase: AssessmentPhase,
    pub session: Option<QuizSession>,
    pub history: Vec<CompletedAssessment>,
    pub last_tick: Option<f64>,

    // Generadores de contenido
    pub story_pane: GeneratorPane,
    pub visual_pane: GeneratorPane,
    pub ar_pane: ArPane,

    // Asistente
    pub chat: Vec<ChatMessage>,
    pub chat_input: String,
    pub chat_attachments: Vec<Attachment>,
    pub poll_cancel: Option<CancelHandle>,

    // Infraestructura
    pub api: ApiClient,
    pub demo: DemoPack,
    pub pending: Option<PendingRequest>,
    pub events_tx: Sender<ApiEvent>,
    pub events_rx: Receiver<ApiEvent>,
}

impl EduApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_auth(AuthSession::load(cc.storage))
    }

    /// Construye la app a partir de una sesión de autenticación ya cargada.
    pub fn with_auth(auth: AuthSession) -> Self {
        let state = if auth.is_authenticated {
            AppState::Dashboard
        } else {
            AppState::Login
        };
        let (events_tx, events_rx) = channel();

        Self {
            auth,
            state,
            message: String::new(),
            login_form: LoginForm::default(),
            quiz_form: QuizForm::default(),
            assessment_phase: AssessmentPhase::Setup,
            session: None,
            history: Vec::new(),
            last_tick: None,
            story_pane: GeneratorPane::new(ContentKind::Story),
            visual_pane: GeneratorPane::new(ContentKind::VisualAid),
            ar_pane: ArPane::default(),
            chat: Vec::new(),
            chat_input: String::new(),
            chat_attachments: Vec::new(),
            poll_cancel: None,
            api: ApiClient::from_env(),
            demo: read_demo_pack(),
            pending: None,
            events_tx,
            events_rx,
        }
    }

    pub fn pane(&self, kind: ContentKind) -> &GeneratorPane {
        match kind {
            ContentKind::Story => &self.story_pane,
            ContentKind::VisualAid => &self.visual_pane,
        }
    }

    pub fn pane_mut(&mut self, kind: ContentKind) -> &mut GeneratorPane {
        match kind {
            ContentKind::Story => &mut self.story_pane,
            ContentKind::VisualAid => &mut self.visual_pane,
        }
    }
}
