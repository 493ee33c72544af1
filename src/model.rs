use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pantallas de la aplicación.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    Login,
    Dashboard,
    Assessment,
    Activities,
    VisualAids,
    ArViewer,
    Assistant,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Login
    }
}

/// Fase del flujo de evaluación: preparación → examen → resultados.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AssessmentPhase {
    #[default]
    Setup,
    Taking,
    Results,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const TODAS: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn etiqueta(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Fácil",
            Difficulty::Medium => "Media",
            Difficulty::Hard => "Difícil",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    OpenEnded,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub question: String,
    /// Solo las preguntas de opción múltiple traen opciones.
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: Difficulty,
    pub kind: QuestionKind,
    /// Rúbrica de corrección manual para preguntas abiertas.
    #[serde(default)]
    pub rubric: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn etiqueta(&self) -> &'static str {
        match self {
            Role::Student => "Estudiante",
            Role::Teacher => "Docente",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: Role,
}

// ---------- Contenido generado ----------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VocabEntry {
    pub word: String,
    pub meaning: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Story {
    pub title: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub vocabulary: Vec<VocabEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AidSection {
    pub heading: String,
    pub body: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VisualAid {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub sections: Vec<AidSection>,
    #[serde(default)]
    pub mnemonic: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArShape {
    Cube,
    Sphere,
    Cylinder,
    Cone,
}

impl ArShape {
    pub fn etiqueta(&self) -> &'static str {
        match self {
            ArShape::Cube => "Cubo",
            ArShape::Sphere => "Esfera",
            ArShape::Cylinder => "Cilindro",
            ArShape::Cone => "Cono",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArObject {
    pub label: String,
    pub shape: ArShape,
    /// RGB 0-255.
    pub color: [u8; 3],
}

fn default_rotation_speed() -> f32 {
    0.4
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArScene {
    #[serde(default)]
    pub objects: Vec<ArObject>,
    /// Radianes por segundo del giro del corro de figuras.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
}

/// Qué genera el panel parametrizado de contenido.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Story,
    VisualAid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedContent {
    Story(Story),
    VisualAid(VisualAid),
}

// ---------- Asistente ----------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    /// Nombres de los archivos que acompañaron al mensaje.
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

// ---------- Historial ----------

/// Evaluación terminada, tal y como la muestra el panel. Las sesiones de
/// demostración nunca llegan aquí.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedAssessment {
    pub topic: String,
    pub score_percent: u32,
    pub correct_count: usize,
    pub mcq_count: usize,
    pub open_count: usize,
    pub elapsed_seconds: u32,
}
