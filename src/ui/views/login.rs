use crate::app::EduApp;
use crate::ui::helpers::status_message;
use crate::ui::layout::centered_panel;
use egui::{Align, Button, Context, TextEdit};

pub fn ui_login(app: &mut EduApp, ctx: &Context) {
    centered_panel(ctx, 340.0, 440.0, |ui| {
        ui.with_layout(egui::Layout::top_down(Align::Center), |ui| {
            ui.heading("👋 ¡Bienvenido a AulaIA!");
            ui.add_space(6.0);
            ui.label("Tu aula con inteligencia artificial");
            ui.add_space(18.0);

            let field_w = (ui.available_width() * 0.9).clamp(220.0, 340.0);

            ui.add_sized(
                [field_w, 26.0],
                TextEdit::singleline(&mut app.login_form.email).hint_text("correo@escuela.edu"),
            );
            ui.add_space(6.0);
            ui.add_sized(
                [field_w, 26.0],
                TextEdit::singleline(&mut app.login_form.password)
                    .password(true)
                    .hint_text("contraseña"),
            );
            ui.add_space(16.0);

            let ocupado = app.hay_peticion_en_vuelo();
            let entrar = ui.add_enabled(
                !ocupado,
                Button::new("Entrar").min_size([field_w, 36.0].into()),
            );
            if entrar.clicked() {
                app.iniciar_sesion();
            }

            if ocupado {
                ui.add_space(10.0);
                ui.spinner();
                ui.label("Comprobando credenciales…");
            }

            status_message(ui, &app.message);
        });
    });
}
