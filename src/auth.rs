use crate::model::UserProfile;
use serde::{Deserialize, Serialize};

/// Única clave persistida: `{ user, token, is_authenticated }`.
pub const AUTH_STORAGE_KEY: &str = "aula_ia_auth";

/// Contenedor explícito de la sesión de autenticación. Se lee al arrancar y
/// se escribe al iniciar o cerrar sesión; nada más toca el almacenamiento.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AuthSession {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

impl AuthSession {
    pub fn iniciar(&mut self, user: UserProfile, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.is_authenticated = true;
    }

    pub fn cerrar(&mut self) {
        *self = AuthSession::default();
    }

    /// Frontera de serialización pura: el estado completo como JSON plano.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Una cadena ilegible o con otra forma se trata como sesión vacía.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        storage
            .and_then(|s| s.get_string(AUTH_STORAGE_KEY))
            .map(|raw| Self::from_json(&raw))
            .unwrap_or_default()
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        storage.set_string(AUTH_STORAGE_KEY, self.to_json());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn perfil() -> UserProfile {
        UserProfile {
            name: "Lucía".to_string(),
            email: "lucia@escuela.edu".to_string(),
            role: Role::Student,
        }
    }

    #[test]
    fn json_round_trip_preserves_the_session() {
        let mut session = AuthSession::default();
        session.iniciar(perfil(), "tok-123".to_string());
        let restored = AuthSession::from_json(&session.to_json());
        assert_eq!(restored, session);
        assert!(restored.is_authenticated);
    }

    #[test]
    fn garbage_json_becomes_an_empty_session() {
        let restored = AuthSession::from_json("{esto no es json");
        assert_eq!(restored, AuthSession::default());
        assert!(!restored.is_authenticated);
    }

    #[test]
    fn cerrar_clears_every_field() {
        let mut session = AuthSession::default();
        session.iniciar(perfil(), "tok-123".to_string());
        session.cerrar();
        assert!(session.user.is_none());
        assert!(session.token.is_none());
        assert!(!session.is_authenticated);
    }
}
