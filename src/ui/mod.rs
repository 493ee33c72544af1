pub mod helpers;
pub mod layout;
pub mod views;

use crate::app::EduApp;
use crate::model::{AppState, ContentKind};
use eframe::{App, Frame};
use egui::Context;
use layout::{bottom_panel, top_panel};

impl App for EduApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        // Primero, lo que haya llegado de las peticiones en segundo plano
        self.procesar_eventos();

        if self.auth.is_authenticated && self.state != AppState::Login {
            top_panel(self, ctx);
        }

        // PANEL INFERIOR TEMA OSCURO O CLARO
        bottom_panel(ctx);

        // Dispatch por estado a las funciones de views
        match self.state {
            AppState::Login => views::login::ui_login(self, ctx),
            AppState::Dashboard => views::dashboard::ui_dashboard(self, ctx),
            AppState::Assessment => views::assessment::ui_assessment(self, ctx),
            AppState::Activities => views::generator::ui_generator(self, ctx, ContentKind::Story),
            AppState::VisualAids => {
                views::generator::ui_generator(self, ctx, ContentKind::VisualAid)
            }
            AppState::ArViewer => views::ar_viewer::ui_ar_viewer(self, ctx),
            AppState::Assistant => views::assistant::ui_assistant(self, ctx),
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        // Única clave persistida: la sesión de autenticación
        self.auth.save(storage);
    }
}
