use crate::app::EduApp;
use crate::model::{ContentKind, GeneratedContent};
use crate::ui::helpers::{demo_banner, status_message};
use crate::ui::layout::simple_panel;
use egui::{Button, ComboBox, Context, Grid, RichText, ScrollArea, TextEdit};

const GRADOS: [&str; 3] = ["Infantil", "Primaria", "Secundaria"];

/// Vista única para los dos generadores de contenido (cuentos y apoyos
/// visuales): mismo formulario, mismo fallback, distinto render.
pub fn ui_generator(app: &mut EduApp, ctx: &Context, kind: ContentKind) {
    let (titulo, hint, boton) = match kind {
        ContentKind::Story => (
            "📚 Cuentos y actividades",
            "Tema del cuento, por ejemplo: una tortuga valiente",
            "✨ Generar cuento",
        ),
        ContentKind::VisualAid => (
            "🖼 Apoyos visuales",
            "Concepto a explicar, por ejemplo: el ciclo del agua",
            "✨ Generar apoyo visual",
        ),
    };

    let ocupado = app.hay_peticion_en_vuelo();
    let mut generar = false;

    simple_panel(ctx, 680.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading(titulo);
            ui.add_space(12.0);

            let field_w = (ui.available_width() * 0.9).clamp(260.0, 480.0);
            {
                let pane = app.pane_mut(kind);
                ui.add_sized(
                    [field_w, 26.0],
                    TextEdit::singleline(&mut pane.topic).hint_text(hint),
                );
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.add_space((ui.available_width() - field_w).max(0.0) / 2.0);
                    ComboBox::from_id_salt(("grado_generador", pane.kind == ContentKind::Story))
                        .selected_text(pane.grade_level.clone())
                        .show_ui(ui, |ui| {
                            for grado in GRADOS {
                                ui.selectable_value(
                                    &mut pane.grade_level,
                                    grado.to_string(),
                                    grado,
                                );
                            }
                        });
                    ui.add_space(12.0);
                    generar = ui
                        .add_enabled(!ocupado, Button::new(boton).min_size([200.0, 30.0].into()))
                        .clicked();
                });
            }

            if ocupado {
                ui.add_space(10.0);
                ui.spinner();
                ui.label("Generando contenido…");
            }

            status_message(ui, &app.message);
            ui.add_space(10.0);

            let pane = app.pane(kind);
            if pane.is_demo && pane.result.is_some() {
                demo_banner(ui, "Contenido de demostración (el backend no respondió).");
                ui.add_space(6.0);
            }

            match &pane.result {
                Some(GeneratedContent::Story(story)) => {
                    ScrollArea::vertical().max_height(380.0).show(ui, |ui| {
                        ui.heading(&story.title);
                        ui.add_space(8.0);
                        for parrafo in &story.paragraphs {
                            ui.label(RichText::new(parrafo).size(15.0));
                            ui.add_space(8.0);
                        }
                        if !story.vocabulary.is_empty() {
                            ui.add_space(6.0);
                            ui.label(RichText::new("Vocabulario").strong());
                            ui.add_space(4.0);
                            Grid::new("vocab_grid")
                                .striped(true)
                                .spacing([14.0, 4.0])
                                .show(ui, |ui| {
                                    for entrada in &story.vocabulary {
                                        ui.label(RichText::new(&entrada.word).strong());
                                        ui.label(&entrada.meaning);
                                        ui.end_row();
                                    }
                                });
                        }
                    });
                }
                Some(GeneratedContent::VisualAid(aid)) => {
                    ScrollArea::vertical().max_height(380.0).show(ui, |ui| {
                        ui.heading(&aid.title);
                        ui.add_space(4.0);
                        ui.label(RichText::new(&aid.summary).italics());
                        ui.add_space(10.0);
                        for seccion in &aid.sections {
                            ui.label(RichText::new(&seccion.heading).strong().size(16.0));
                            ui.label(&seccion.body);
                            ui.add_space(8.0);
                        }
                        if let Some(mnemonic) = &aid.mnemonic {
                            ui.add_space(4.0);
                            ui.label(
                                RichText::new(format!("💡 {mnemonic}"))
                                    .color(egui::Color32::LIGHT_BLUE),
                            );
                        }
                    });
                }
                None => {
                    ui.add_space(20.0);
                    ui.label(RichText::new("Aún no has generado nada.").weak());
                }
            }
        });
    });

    if generar {
        app.generar_contenido(kind);
    }
}
