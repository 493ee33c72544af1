//! Sondeo acotado de la respuesta del asistente: intervalo fijo, tope duro
//! de intentos y cancelación cooperativa, de modo que una respuesta tardía
//! nunca toque el estado después de abandonar la vista.

use crate::api::{ApiClient, ApiError, AssistantPollResponse};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const POLL_INTERVAL_MS: u64 = 2_000;
pub const POLL_MAX_ATTEMPTS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPlan {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for PollPlan {
    fn default() -> Self {
        Self {
            interval_ms: POLL_INTERVAL_MS,
            max_attempts: POLL_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Reply(String),
    AttemptsExhausted { attempts: u32 },
    Failed(ApiError),
    Cancelled,
}

/// Mando de cancelación compartido entre la vista y el sondeo en vuelo.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// `attempts_done` son los intentos ya consumidos.
pub fn should_continue(attempts_done: u32, plan: &PollPlan) -> bool {
    attempts_done < plan.max_attempts
}

fn interpret(response: Result<AssistantPollResponse, ApiError>) -> Option<PollOutcome> {
    match response {
        Ok(AssistantPollResponse::Ready { reply }) => Some(PollOutcome::Reply(reply)),
        Ok(AssistantPollResponse::Pending) => None,
        Err(err) => Some(PollOutcome::Failed(err)),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run_poll(
    client: &ApiClient,
    reply_id: &str,
    plan: &PollPlan,
    cancel: &CancelHandle,
) -> PollOutcome {
    let mut attempts = 0;
    loop {
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }
        attempts += 1;
        if let Some(outcome) = interpret(client.poll_assistant(reply_id)) {
            return outcome;
        }
        if !should_continue(attempts, plan) {
            log::warn!("asistente sin respuesta tras {attempts} intentos");
            return PollOutcome::AttemptsExhausted { attempts };
        }
        std::thread::sleep(std::time::Duration::from_millis(plan.interval_ms));
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn run_poll(
    client: &ApiClient,
    reply_id: &str,
    plan: &PollPlan,
    cancel: &CancelHandle,
) -> PollOutcome {
    let mut attempts = 0;
    loop {
        if cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }
        attempts += 1;
        if let Some(outcome) = interpret(client.poll_assistant(reply_id).await) {
            return outcome;
        }
        if !should_continue(attempts, plan) {
            log::warn!("asistente sin respuesta tras {attempts} intentos");
            return PollOutcome::AttemptsExhausted { attempts };
        }
        sleep_ms(plan.interval_ms as i32).await;
    }
}

#[cfg(target_arch = "wasm32")]
async fn sleep_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        match web_sys::window() {
            Some(window) => {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
            }
            None => {
                let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
            }
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_continue_stops_exactly_at_the_cap() {
        let plan = PollPlan {
            interval_ms: 10,
            max_attempts: 3,
        };
        assert!(should_continue(0, &plan));
        assert!(should_continue(2, &plan));
        assert!(!should_continue(3, &plan));
        assert!(!should_continue(4, &plan));
    }

    #[test]
    fn interpret_maps_the_three_cases() {
        assert_eq!(
            interpret(Ok(AssistantPollResponse::Ready {
                reply: "hola".to_string()
            })),
            Some(PollOutcome::Reply("hola".to_string()))
        );
        assert_eq!(interpret(Ok(AssistantPollResponse::Pending)), None);
        assert!(matches!(
            interpret(Err(ApiError::Timeout)),
            Some(PollOutcome::Failed(ApiError::Timeout))
        ));
    }

    #[test]
    fn cancel_handle_is_shared_between_clones() {
        let handle = CancelHandle::new();
        let clone = handle.clone();
        assert!(!clone.is_cancelled());
        handle.cancel();
        assert!(clone.is_cancelled());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn cancelled_poll_returns_without_touching_the_network() {
        // La bandera se comprueba antes del primer intento, así que este
        // cliente nunca llega a conectar.
        let client = ApiClient::with_base_url("http://127.0.0.1:1");
        let cancel = CancelHandle::new();
        cancel.cancel();
        let outcome = run_poll(&client, "r-1", &PollPlan::default(), &cancel);
        assert_eq!(outcome, PollOutcome::Cancelled);
    }
}
