use crate::app::EduApp;
use crate::model::AppState;
use crate::ui::helpers::big_list_button;
use crate::ui::layout::centered_panel;
use egui::{Align, Context, Grid, RichText, ScrollArea};

pub fn ui_dashboard(app: &mut EduApp, ctx: &Context) {
    centered_panel(ctx, 520.0, 560.0, |ui| {
        ui.with_layout(egui::Layout::top_down(Align::Center), |ui| {
            ui.heading(format!("Hola, {} 👋", app.nombre_usuario()));
            ui.add_space(4.0);
            ui.label("¿Qué quieres hacer hoy?");
            ui.add_space(14.0);

            // Resumen rápido del historial
            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() - 360.0).max(0.0) / 2.0);
                ui.label(format!("📋 {} completadas", app.evaluaciones_completadas()));
                if let Some(media) = app.media_puntuacion() {
                    ui.separator();
                    ui.label(format!("📈 media {media} %"));
                }
                if let Some(mejor) = app.mejor_puntuacion() {
                    ui.separator();
                    ui.label(format!("🏆 mejor {mejor} %"));
                }
            });
            ui.add_space(14.0);

            let btn_w = (ui.available_width() * 0.9).clamp(200.0, 420.0);
            let btn_h = 40.0;

            let mut destino = None;
            if big_list_button(ui, "📋 Evaluación con IA".to_string(), btn_w, btn_h, true) {
                destino = Some(AppState::Assessment);
            }
            ui.add_space(5.0);
            if big_list_button(ui, "📚 Cuentos y actividades".to_string(), btn_w, btn_h, true) {
                destino = Some(AppState::Activities);
            }
            ui.add_space(5.0);
            if big_list_button(ui, "🖼 Apoyos visuales".to_string(), btn_w, btn_h, true) {
                destino = Some(AppState::VisualAids);
            }
            ui.add_space(5.0);
            if big_list_button(ui, "🧊 Visor de escenas RA".to_string(), btn_w, btn_h, true) {
                destino = Some(AppState::ArViewer);
            }
            ui.add_space(5.0);
            if big_list_button(ui, "🎙 Asistente".to_string(), btn_w, btn_h, true) {
                destino = Some(AppState::Assistant);
            }
            if let Some(destino) = destino {
                app.ir_a(destino);
            }

            // Últimas evaluaciones
            if !app.history.is_empty() {
                ui.add_space(18.0);
                ui.label(RichText::new("Tus últimas evaluaciones").strong());
                ui.add_space(6.0);

                let filas: Vec<crate::view_models::HistoryRow> = app
                    .history
                    .iter()
                    .rev()
                    .take(5)
                    .map(crate::view_models::HistoryRow::from_entry)
                    .collect();

                ScrollArea::vertical().max_height(140.0).show(ui, |ui| {
                    Grid::new("history_grid")
                        .striped(true)
                        .spacing([14.0, 4.0])
                        .show(ui, |ui| {
                            ui.label(RichText::new("Tema").strong());
                            ui.label(RichText::new("Nota").strong());
                            ui.label(RichText::new("Tiempo").strong());
                            ui.end_row();
                            for fila in &filas {
                                ui.label(&fila.topic);
                                ui.label(fila.score_label());
                                ui.label(fila.elapsed_label());
                                ui.end_row();
                            }
                        });
                });
            }
        });
    });
}
