use super::*;

impl EduApp {
    pub fn nombre_usuario(&self) -> &str {
        self.auth
            .user
            .as_ref()
            .map(|u| u.name.as_str())
            .unwrap_or("estudiante")
    }

    pub fn evaluaciones_completadas(&self) -> usize {
        self.history.len()
    }

    pub fn media_puntuacion(&self) -> Option<u32> {
        if self.history.is_empty() {
            return None;
        }
        let suma: u32 = self.history.iter().map(|h| h.score_percent).sum();
        Some(suma / self.history.len() as u32)
    }

    pub fn mejor_puntuacion(&self) -> Option<u32> {
        self.history.iter().map(|h| h.score_percent).max()
    }

    pub fn hay_peticion_en_vuelo(&self) -> bool {
        self.pending.is_some()
    }

    pub fn esperando_asistente(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingRequest::AssistantSend | PendingRequest::AssistantReply)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_over_the_history() {
        let mut app = EduApp::with_auth(AuthSession::default());
        assert_eq!(app.evaluaciones_completadas(), 0);
        assert!(app.media_puntuacion().is_none());

        for score in [40, 80, 100] {
            app.history.push(CompletedAssessment {
                topic: "tema".to_string(),
                score_percent: score,
                correct_count: 0,
                mcq_count: 0,
                open_count: 0,
                elapsed_seconds: 60,
            });
        }
        assert_eq!(app.evaluaciones_completadas(), 3);
        assert_eq!(app.media_puntuacion(), Some(73));
        assert_eq!(app.mejor_puntuacion(), Some(100));
    }
}
