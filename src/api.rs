//! Cliente del backend remoto.
//!
//! Serializa peticiones tipadas como JSON contra una URL base fija y
//! clasifica los fallos (red, timeout, HTTP no-2xx, forma inesperada).
//! No hay reintentos ni backoff: el que llama decide si recurre al
//! contenido de demostración.

use crate::model::{ArScene, Attachment, Difficulty, QuestionKind, QuizQuestion, Story, UserProfile, VisualAid};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// En web se sirve desde el mismo origen que la página.
#[cfg(target_arch = "wasm32")]
const DEFAULT_BASE_URL: &str = "";

#[cfg(not(target_arch = "wasm32"))]
const REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("no se pudo conectar con el backend: {0}")]
    Network(String),
    #[error("el backend tardó demasiado en responder")]
    Timeout,
    #[error("el backend devolvió HTTP {status}")]
    Status { status: u16, body: String },
    #[error("respuesta del backend con forma inesperada: {0}")]
    InvalidShape(String),
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn from_env() -> Self {
        Self {
            base_url: resolved_base_url(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn resolved_base_url() -> String {
    std::env::var("AULA_IA_BACKEND_URL")
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[cfg(target_arch = "wasm32")]
fn resolved_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

// ---------- DTOs ----------

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub question_count: usize,
    pub grade_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizResponse {
    #[serde(default)]
    pub assessment_id: Option<String>,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryRequest {
    pub topic: String,
    pub grade_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisualAidRequest {
    pub concept: String,
    pub grade_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArSceneRequest {
    pub theme: String,
    pub object_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachmentPayload {
    pub name: String,
    pub mime: String,
    pub data_base64: String,
}

impl AttachmentPayload {
    pub fn from_attachment(attachment: &Attachment) -> Self {
        Self {
            name: attachment.name.clone(),
            mime: mime_for(&attachment.name).to_string(),
            data_base64: BASE64.encode(&attachment.bytes),
        }
    }
}

fn mime_for(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "txt" | "md" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantSendRequest {
    pub message: String,
    pub attachments: Vec<AttachmentPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantSendResponse {
    pub reply_id: String,
}

/// Estado del sondeo de respuesta del asistente.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssistantPollResponse {
    Pending,
    Ready { reply: String },
}

// ---------- Peticiones en segundo plano ----------

/// Trabajo que se lanza fuera del hilo de la interfaz.
#[derive(Debug, Clone)]
pub enum ApiTask {
    Login(LoginRequest),
    GenerateQuiz(QuizRequest),
    GenerateStory(StoryRequest),
    GenerateVisualAid(VisualAidRequest),
    GenerateArScene(ArSceneRequest),
    AssistantSend(AssistantSendRequest),
}

/// Resultado que vuelve por el canal al hilo de la interfaz.
#[derive(Debug)]
pub enum ApiEvent {
    Login(Result<LoginResponse, ApiError>),
    Quiz(Result<QuizResponse, ApiError>),
    Story(Result<Story, ApiError>),
    VisualAid(Result<VisualAid, ApiError>),
    ArScene(Result<ArScene, ApiError>),
    AssistantAccepted(Result<AssistantSendResponse, ApiError>),
    AssistantPoll(crate::poll::PollOutcome),
}

#[cfg(not(target_arch = "wasm32"))]
pub fn perform(client: &ApiClient, task: &ApiTask) -> ApiEvent {
    match task {
        ApiTask::Login(req) => ApiEvent::Login(
            client.post_json("/api/auth/login", req).and_then(parse_body),
        ),
        ApiTask::GenerateQuiz(req) => ApiEvent::Quiz(
            client.post_json("/api/content/quiz", req).and_then(parse_quiz),
        ),
        ApiTask::GenerateStory(req) => ApiEvent::Story(
            client.post_json("/api/content/story", req).and_then(parse_story),
        ),
        ApiTask::GenerateVisualAid(req) => ApiEvent::VisualAid(
            client.post_json("/api/content/visual-aid", req).and_then(parse_body),
        ),
        ApiTask::GenerateArScene(req) => ApiEvent::ArScene(
            client.post_json("/api/content/ar-scene", req).and_then(parse_scene),
        ),
        ApiTask::AssistantSend(req) => ApiEvent::AssistantAccepted(
            client.post_json("/api/assistant/message", req).and_then(parse_body),
        ),
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn perform(client: &ApiClient, task: &ApiTask) -> ApiEvent {
    match task {
        ApiTask::Login(req) => ApiEvent::Login(
            client.post_json("/api/auth/login", req).await.and_then(parse_body),
        ),
        ApiTask::GenerateQuiz(req) => ApiEvent::Quiz(
            client.post_json("/api/content/quiz", req).await.and_then(parse_quiz),
        ),
        ApiTask::GenerateStory(req) => ApiEvent::Story(
            client.post_json("/api/content/story", req).await.and_then(parse_story),
        ),
        ApiTask::GenerateVisualAid(req) => ApiEvent::VisualAid(
            client.post_json("/api/content/visual-aid", req).await.and_then(parse_body),
        ),
        ApiTask::GenerateArScene(req) => ApiEvent::ArScene(
            client.post_json("/api/content/ar-scene", req).await.and_then(parse_scene),
        ),
        ApiTask::AssistantSend(req) => ApiEvent::AssistantAccepted(
            client.post_json("/api/assistant/message", req).await.and_then(parse_body),
        ),
    }
}

// ---------- Interpretación de respuestas (común a ambos transportes) ----------

fn parse_body<T: DeserializeOwned>(body: String) -> Result<T, ApiError> {
    serde_json::from_str(&body).map_err(|err| ApiError::InvalidShape(err.to_string()))
}

fn parse_quiz(body: String) -> Result<QuizResponse, ApiError> {
    let response: QuizResponse = parse_body(body)?;
    validate_quiz(&response)?;
    Ok(response)
}

fn parse_story(body: String) -> Result<Story, ApiError> {
    let story: Story = parse_body(body)?;
    if story.paragraphs.is_empty() {
        return Err(ApiError::InvalidShape("el cuento llegó sin párrafos".into()));
    }
    Ok(story)
}

fn parse_scene(body: String) -> Result<ArScene, ApiError> {
    let scene: ArScene = parse_body(body)?;
    if scene.objects.is_empty() {
        return Err(ApiError::InvalidShape("la escena llegó sin objetos".into()));
    }
    Ok(scene)
}

/// Formas que el backend no debería producir nunca. Se tratan igual que un
/// error de backend y disparan el contenido de demostración.
pub fn validate_quiz(response: &QuizResponse) -> Result<(), ApiError> {
    if response.questions.is_empty() {
        return Err(ApiError::InvalidShape("la lista de preguntas llegó vacía".into()));
    }
    for (i, q) in response.questions.iter().enumerate() {
        match q.kind {
            QuestionKind::MultipleChoice => {
                if q.options.len() < 2 {
                    return Err(ApiError::InvalidShape(format!(
                        "la pregunta {i} es de opción múltiple pero trae {} opciones",
                        q.options.len()
                    )));
                }
                if !q.options.contains(&q.correct_answer) {
                    return Err(ApiError::InvalidShape(format!(
                        "la respuesta correcta de la pregunta {i} no está entre sus opciones"
                    )));
                }
            }
            QuestionKind::OpenEnded => {
                if !q.options.is_empty() {
                    return Err(ApiError::InvalidShape(format!(
                        "la pregunta abierta {i} no debería traer opciones"
                    )));
                }
            }
        }
    }
    Ok(())
}

// ---------- Transporte nativo ----------

#[cfg(not(target_arch = "wasm32"))]
impl ApiClient {
    fn http_client(&self) -> Result<reqwest::blocking::Client, ApiError> {
        reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))
    }

    fn post_json(&self, path: &str, payload: &impl Serialize) -> Result<String, ApiError> {
        let response = self
            .http_client()?
            .post(self.url(path))
            .json(payload)
            .send()
            .map_err(classify_reqwest)?;
        read_response(response)
    }

    fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let response = self
            .http_client()?
            .get(self.url(path))
            .send()
            .map_err(classify_reqwest)?;
        read_response(response)
    }

    /// Consulta el estado de una respuesta del asistente.
    pub fn poll_assistant(&self, reply_id: &str) -> Result<AssistantPollResponse, ApiError> {
        self.get_text(&format!("/api/assistant/reply/{reply_id}"))
            .and_then(parse_body)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn classify_reqwest(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_response(response: reqwest::blocking::Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().map_err(classify_reqwest)?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }
    Ok(body)
}

// ---------- Transporte WASM ----------

#[cfg(target_arch = "wasm32")]
impl ApiClient {
    async fn fetch_text(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> Result<String, ApiError> {
        use wasm_bindgen::{JsCast, JsValue};
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, RequestMode, Response};

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(json) = &body {
            opts.set_body(&JsValue::from_str(json));
        }

        let request = Request::new_with_str_and_init(&self.url(path), &opts)
            .map_err(|err| ApiError::Network(format!("no se pudo crear el request: {err:?}")))?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|err| ApiError::Network(format!("no se pudieron fijar headers: {err:?}")))?;
        }

        let window = web_sys::window()
            .ok_or_else(|| ApiError::Network("no existe window en el entorno WASM".into()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|err| ApiError::Network(format!("fetch falló: {err:?}")))?;
        let response: Response = resp_value
            .dyn_into()
            .map_err(|_| ApiError::Network("la respuesta fetch no es un Response válido".into()))?;

        let text_promise = response
            .text()
            .map_err(|err| ApiError::Network(format!("no se pudo leer el body: {err:?}")))?;
        let text = JsFuture::from(text_promise)
            .await
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();

        if !response.ok() {
            return Err(ApiError::Status {
                status: response.status(),
                body: text.trim().to_string(),
            });
        }
        Ok(text)
    }

    async fn post_json(&self, path: &str, payload: &impl Serialize) -> Result<String, ApiError> {
        let json = serde_json::to_string(payload)
            .map_err(|err| ApiError::Network(format!("no se pudo serializar el payload: {err}")))?;
        self.fetch_text("POST", path, Some(json)).await
    }

    /// Consulta el estado de una respuesta del asistente.
    pub async fn poll_assistant(&self, reply_id: &str) -> Result<AssistantPollResponse, ApiError> {
        self.fetch_text("GET", &format!("/api/assistant/reply/{reply_id}"), None)
            .await
            .and_then(parse_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pregunta(kind: QuestionKind, options: &[&str], correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: "¿...?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct.to_string(),
            difficulty: Difficulty::Easy,
            kind,
            rubric: None,
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::with_base_url("http://backend:9000/");
        assert_eq!(client.base_url(), "http://backend:9000");
        assert_eq!(client.url("/api/auth/login"), "http://backend:9000/api/auth/login");
    }

    #[test]
    fn quiz_with_foreign_correct_answer_is_invalid_shape() {
        let response = QuizResponse {
            assessment_id: None,
            questions: vec![pregunta(QuestionKind::MultipleChoice, &["A", "B"], "Z")],
        };
        assert!(matches!(
            validate_quiz(&response).unwrap_err(),
            ApiError::InvalidShape(_)
        ));
    }

    #[test]
    fn quiz_with_single_option_is_invalid_shape() {
        let response = QuizResponse {
            assessment_id: None,
            questions: vec![pregunta(QuestionKind::MultipleChoice, &["A"], "A")],
        };
        assert!(matches!(
            validate_quiz(&response).unwrap_err(),
            ApiError::InvalidShape(_)
        ));
    }

    #[test]
    fn empty_quiz_is_invalid_shape() {
        let response = QuizResponse {
            assessment_id: None,
            questions: vec![],
        };
        assert!(validate_quiz(&response).is_err());
    }

    #[test]
    fn open_question_with_options_is_invalid_shape() {
        let response = QuizResponse {
            assessment_id: None,
            questions: vec![pregunta(QuestionKind::OpenEnded, &["A"], "")],
        };
        assert!(validate_quiz(&response).is_err());
    }

    #[test]
    fn valid_quiz_passes_validation() {
        let response = QuizResponse {
            assessment_id: Some("a-1".to_string()),
            questions: vec![
                pregunta(QuestionKind::MultipleChoice, &["A", "B", "C"], "B"),
                pregunta(QuestionKind::OpenEnded, &[], ""),
            ],
        };
        assert!(validate_quiz(&response).is_ok());
    }

    #[test]
    fn poll_response_parses_both_states() {
        let pending: AssistantPollResponse =
            serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert!(matches!(pending, AssistantPollResponse::Pending));

        let ready: AssistantPollResponse =
            serde_json::from_str(r#"{"status":"ready","reply":"¡Hola!"}"#).unwrap();
        match ready {
            AssistantPollResponse::Ready { reply } => assert_eq!(reply, "¡Hola!"),
            other => panic!("se esperaba ready, llegó {other:?}"),
        }
    }

    #[test]
    fn attachment_payload_guesses_mime_and_encodes_base64() {
        let attachment = Attachment {
            name: "nota.png".to_string(),
            bytes: vec![1, 2, 3],
        };
        let payload = AttachmentPayload::from_attachment(&attachment);
        assert_eq!(payload.mime, "image/png");
        assert_eq!(payload.data_base64, BASE64.encode([1u8, 2, 3]));
    }
}
