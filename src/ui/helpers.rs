// src/ui/helpers.rs
use egui::{Button, Color32, RichText, Ui, Vec2};

pub fn big_list_button(ui: &mut Ui, label: String, width: f32, height: f32, enabled: bool) -> bool {
    ui.add_enabled(enabled, Button::new(label).min_size(Vec2::new(width, height)))
        .clicked()
}

/// Botón-opción de las preguntas de opción múltiple. Marca la opción
/// seleccionada y devuelve true al pulsarla.
pub fn option_button(ui: &mut Ui, label: &str, width: f32, selected: bool) -> bool {
    let text = if selected {
        RichText::new(format!("◉ {label}")).strong()
    } else {
        RichText::new(format!("○ {label}"))
    };
    ui.add_sized([width, 32.0], egui::SelectableLabel::new(selected, text))
        .clicked()
}

/// Aviso amarillo de contenido de demostración.
pub fn demo_banner(ui: &mut Ui, texto: &str) {
    ui.label(
        RichText::new(format!("🟡 {texto}"))
            .color(Color32::YELLOW)
            .strong(),
    );
}

/// Mensaje de estado al pie de la vista.
pub fn status_message(ui: &mut Ui, message: &str) {
    if !message.is_empty() {
        ui.add_space(8.0);
        ui.label(RichText::new(message).color(Color32::YELLOW));
    }
}
