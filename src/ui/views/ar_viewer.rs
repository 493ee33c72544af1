use crate::app::EduApp;
use crate::ui::helpers::{demo_banner, status_message};
use crate::ui::layout::simple_panel;
use egui::{
    Align2, Button, Color32, Context, FontId, Pos2, Rect, RichText, Sense, Slider, Stroke,
    TextEdit, Vec2, pos2, vec2,
};

/// Visor de escenas RA: pide al backend una descripción de escena (figuras
/// primitivas en corro con una velocidad de giro) y la enseña como vista
/// esquemática 2D. El render 3D real queda delegado fuera de la app.
pub fn ui_ar_viewer(app: &mut EduApp, ctx: &Context) {
    let ocupado = app.hay_peticion_en_vuelo();
    let mut generar = false;

    simple_panel(ctx, 680.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("🧊 Visor de escenas RA");
            ui.add_space(12.0);

            let field_w = (ui.available_width() * 0.9).clamp(260.0, 480.0);
            ui.add_sized(
                [field_w, 26.0],
                TextEdit::singleline(&mut app.ar_pane.theme)
                    .hint_text("Tema de la escena, por ejemplo: el ciclo del agua"),
            );
            ui.add_space(8.0);
            ui.add(Slider::new(&mut app.ar_pane.object_count, 3..=8).text("figuras"));
            ui.add_space(10.0);

            generar = ui
                .add_enabled(
                    !ocupado,
                    Button::new("✨ Generar escena").min_size([220.0, 32.0].into()),
                )
                .clicked();

            if ocupado {
                ui.add_space(10.0);
                ui.spinner();
                ui.label("Componiendo la escena…");
            }

            status_message(ui, &app.message);
            ui.add_space(10.0);

            if app.ar_pane.is_demo && app.ar_pane.scene.is_some() {
                demo_banner(ui, "Escena de demostración (el backend no respondió).");
                ui.add_space(6.0);
            }

            if let Some(scene) = &app.ar_pane.scene {
                // Vista esquemática: las figuras giran en corro
                let lado = (ui.available_width() * 0.8).clamp(240.0, 340.0);
                let (response, painter) = ui.allocate_painter(Vec2::splat(lado), Sense::hover());
                let rect = response.rect;
                painter.rect_filled(rect, 8, ui.visuals().extreme_bg_color);

                let t = ui.input(|i| i.time) as f32;
                let centro = rect.center();
                let radio = rect.width() * 0.34;
                let n = scene.objects.len().max(1);

                for (i, obj) in scene.objects.iter().enumerate() {
                    let angulo =
                        t * scene.rotation_speed + i as f32 * std::f32::consts::TAU / n as f32;
                    let pos = centro + Vec2::angled(angulo) * radio;
                    let color = Color32::from_rgb(obj.color[0], obj.color[1], obj.color[2]);
                    dibujar_figura(&painter, obj.shape, pos, color);
                    painter.text(
                        pos + vec2(0.0, 24.0),
                        Align2::CENTER_TOP,
                        &obj.label,
                        FontId::proportional(12.0),
                        ui.visuals().text_color(),
                    );
                }
                // Giro continuo
                ctx.request_repaint();

                ui.add_space(8.0);
                ui.label(
                    RichText::new(format!(
                        "{} figuras · giro {:.1} rad/s",
                        scene.objects.len(),
                        scene.rotation_speed
                    ))
                    .weak(),
                );
                ui.add_space(6.0);
                ui.horizontal_wrapped(|ui| {
                    for obj in &scene.objects {
                        let color = Color32::from_rgb(obj.color[0], obj.color[1], obj.color[2]);
                        ui.label(RichText::new("⏺").color(color));
                        ui.label(format!("{} ({})", obj.label, obj.shape.etiqueta()));
                        ui.add_space(10.0);
                    }
                });
            } else {
                ui.add_space(20.0);
                ui.label(RichText::new("Aún no hay ninguna escena.").weak());
            }
        });
    });

    if generar {
        app.generar_escena();
    }
}

fn dibujar_figura(painter: &egui::Painter, shape: crate::model::ArShape, pos: Pos2, color: Color32) {
    use crate::model::ArShape;
    match shape {
        ArShape::Sphere => {
            painter.circle_filled(pos, 14.0, color);
        }
        ArShape::Cube => {
            painter.rect_filled(Rect::from_center_size(pos, Vec2::splat(24.0)), 4, color);
        }
        ArShape::Cylinder => {
            painter.rect_filled(Rect::from_center_size(pos, vec2(18.0, 28.0)), 9, color);
        }
        ArShape::Cone => {
            let puntos = vec![
                pos2(pos.x, pos.y - 14.0),
                pos2(pos.x - 13.0, pos.y + 12.0),
                pos2(pos.x + 13.0, pos.y + 12.0),
            ];
            painter.add(egui::Shape::convex_polygon(puntos, color, Stroke::NONE));
        }
    }
}
