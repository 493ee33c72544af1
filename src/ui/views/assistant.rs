use crate::app::EduApp;
use crate::model::ChatRole;
use crate::ui::helpers::status_message;
use crate::ui::layout::simple_panel;
use egui::{Button, Color32, Context, RichText, ScrollArea, TextEdit};

pub fn ui_assistant(app: &mut EduApp, ctx: &Context) {
    recoger_archivos_soltados(app, ctx);

    simple_panel(ctx, 700.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("🎙 Asistente");
            ui.label(
                RichText::new("Pregunta lo que quieras; arrastra archivos para adjuntarlos.")
                    .weak(),
            );
        });
        ui.add_space(10.0);

        // Conversación
        let alto_chat = (ui.available_height() - 140.0).max(160.0);
        ScrollArea::vertical()
            .max_height(alto_chat)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.chat.is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(30.0);
                        ui.label(RichText::new("Todavía no hay mensajes.").weak());
                    });
                }
                for msg in &app.chat {
                    let (prefijo, color) = match msg.role {
                        ChatRole::User => ("🧑 Tú", Color32::LIGHT_BLUE),
                        ChatRole::Assistant => ("🤖 AulaIA", Color32::LIGHT_GREEN),
                    };
                    ui.label(RichText::new(prefijo).color(color).strong());
                    ui.label(&msg.text);
                    if !msg.attachments.is_empty() {
                        ui.label(
                            RichText::new(format!("📎 {}", msg.attachments.join(", "))).weak(),
                        );
                    }
                    ui.add_space(8.0);
                }

                if app.esperando_asistente() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("El asistente está pensando…");
                        if ui.small_button("Cancelar").clicked() {
                            app.cancelar_asistente();
                        }
                    });
                }
            });

        ui.add_space(8.0);

        // Adjuntos pendientes de enviar
        if !app.chat_attachments.is_empty() {
            let mut quitar = None;
            ui.horizontal_wrapped(|ui| {
                for (i, adjunto) in app.chat_attachments.iter().enumerate() {
                    ui.label(format!("📎 {}", adjunto.name));
                    if ui.small_button("✖").clicked() {
                        quitar = Some(i);
                    }
                    ui.add_space(6.0);
                }
            });
            if let Some(i) = quitar {
                app.quitar_adjunto(i);
            }
            ui.add_space(6.0);
        }

        // Entrada
        let ocupado = app.hay_peticion_en_vuelo();
        ui.horizontal(|ui| {
            let ancho_boton = 90.0;
            let ancho_campo = (ui.available_width() - ancho_boton - 12.0).max(160.0);
            ui.add_sized(
                [ancho_campo, 28.0],
                TextEdit::singleline(&mut app.chat_input).hint_text("Escribe tu pregunta…"),
            );
            let enviar = ui.add_enabled(
                !ocupado,
                Button::new("Enviar").min_size([ancho_boton, 28.0].into()),
            );
            if enviar.clicked() {
                app.enviar_mensaje();
            }
        });

        status_message(ui, &app.message);
    });
}

/// Archivos soltados sobre la ventana: en nativo llegan como ruta, en web
/// como bytes ya leídos.
fn recoger_archivos_soltados(app: &mut EduApp, ctx: &Context) {
    let soltados = ctx.input(|i| i.raw.dropped_files.clone());
    for archivo in soltados {
        if let Some(bytes) = archivo.bytes {
            let nombre = if archivo.name.is_empty() {
                "archivo".to_string()
            } else {
                archivo.name.clone()
            };
            app.adjuntar_archivo(nombre, bytes.to_vec());
            continue;
        }
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = archivo.path {
            let nombre = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "archivo".to_string());
            match std::fs::read(&path) {
                Ok(bytes) => app.adjuntar_archivo(nombre, bytes),
                Err(err) => {
                    log::warn!("no se pudo leer {}: {err}", path.display());
                    app.message = format!("⚠ No se pudo leer «{nombre}».");
                }
            }
        }
    }
}
