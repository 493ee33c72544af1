use crate::app::EduApp;
use crate::model::{AssessmentPhase, Difficulty, QuestionKind};
use crate::ui::helpers::{demo_banner, option_button, status_message};
use crate::ui::layout::{centered_panel, simple_panel, two_button_row};
use crate::view_models::{ResultRow, clock_label, elapsed_label};
use egui::{
    Align, Button, ComboBox, Context, Grid, ProgressBar, RichText, ScrollArea, Slider, TextEdit,
};

const GRADOS: [&str; 3] = ["Infantil", "Primaria", "Secundaria"];

pub fn ui_assessment(app: &mut EduApp, ctx: &Context) {
    match app.assessment_phase {
        AssessmentPhase::Setup => ui_setup(app, ctx),
        AssessmentPhase::Taking => ui_taking(app, ctx),
        AssessmentPhase::Results => ui_results(app, ctx),
    }
}

// ----------- PREPARACIÓN -----------
fn ui_setup(app: &mut EduApp, ctx: &Context) {
    centered_panel(ctx, 360.0, 520.0, |ui| {
        ui.with_layout(egui::Layout::top_down(Align::Center), |ui| {
            ui.heading("📋 Evaluación con IA");
            ui.add_space(6.0);
            ui.label("El backend genera las preguntas sobre el tema que elijas.");
            ui.add_space(16.0);

            let field_w = (ui.available_width() * 0.9).clamp(240.0, 420.0);

            ui.add_sized(
                [field_w, 26.0],
                TextEdit::singleline(&mut app.quiz_form.topic)
                    .hint_text("Tema, por ejemplo: los ríos de Europa"),
            );
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.add_space((ui.available_width() - field_w).max(0.0) / 2.0);
                ComboBox::from_id_salt("dificultad")
                    .selected_text(app.quiz_form.difficulty.etiqueta())
                    .show_ui(ui, |ui| {
                        for dif in Difficulty::TODAS {
                            ui.selectable_value(&mut app.quiz_form.difficulty, dif, dif.etiqueta());
                        }
                    });
                ui.add_space(12.0);
                ComboBox::from_id_salt("grado")
                    .selected_text(app.quiz_form.grade_level.clone())
                    .show_ui(ui, |ui| {
                        for grado in GRADOS {
                            ui.selectable_value(
                                &mut app.quiz_form.grade_level,
                                grado.to_string(),
                                grado,
                            );
                        }
                    });
            });
            ui.add_space(10.0);

            ui.add(
                Slider::new(&mut app.quiz_form.question_count, 3..=10).text("preguntas"),
            );
            ui.add_space(16.0);

            let ocupado = app.hay_peticion_en_vuelo();
            let generar = ui.add_enabled(
                !ocupado,
                Button::new("✨ Generar evaluación").min_size([field_w, 36.0].into()),
            );
            if generar.clicked() {
                app.solicitar_evaluacion();
            }
            if ocupado {
                ui.add_space(10.0);
                ui.spinner();
                ui.label("Generando preguntas…");
            }

            status_message(ui, &app.message);
        });
    });
}

// ----------- EXAMEN -----------
fn ui_taking(app: &mut EduApp, ctx: &Context) {
    // Cronómetro: un tick por cada segundo entero del reloj de egui
    app.tick_cronometro(ctx.input(|i| i.time));
    if app.assessment_phase != AssessmentPhase::Taking {
        // La entrega forzosa acaba de pasar a resultados
        return;
    }
    ctx.request_repaint_after(std::time::Duration::from_millis(200));

    let Some(lectura) = app.session.as_ref().map(|session| {
        (
            session.current_index(),
            session.questions().len(),
            session.time_remaining(),
            session.allotted_seconds(),
            session.current_question().clone(),
            session.current_answer().to_string(),
            session.is_demo(),
            session.is_last_question(),
            session.has_current_answer(),
        )
    }) else {
        app.assessment_phase = AssessmentPhase::Setup;
        return;
    };
    let (idx, total, remaining, allotted, question, current_answer, is_demo, is_last, has_answer) =
        lectura;

    simple_panel(ctx, 660.0, |ui| {
        ui.vertical_centered(|ui| {
            if is_demo {
                demo_banner(ui, "Práctica con preguntas de demostración: no puntúa.");
                ui.add_space(6.0);
            }

            ui.heading(format!("Pregunta {} de {}", idx + 1, total));
            ui.add_space(6.0);

            let frac = remaining as f32 / allotted.max(1) as f32;
            ui.add(
                ProgressBar::new(frac)
                    .desired_width(420.0)
                    .text(format!("⏳ {}", clock_label(remaining))),
            );
            ui.add_space(14.0);

            ui.label(RichText::new(&question.question).size(18.0));
            ui.add_space(12.0);

            let option_w = (ui.available_width() * 0.9).clamp(240.0, 460.0);
            match question.kind {
                QuestionKind::MultipleChoice => {
                    let mut elegida = None;
                    for option in &question.options {
                        if option_button(ui, option, option_w, current_answer == *option) {
                            elegida = Some(option.clone());
                        }
                        ui.add_space(4.0);
                    }
                    if let Some(valor) = elegida {
                        app.responder_actual(valor);
                    }
                }
                QuestionKind::OpenEnded => {
                    ScrollArea::vertical().max_height(170.0).show(ui, |ui| {
                        if let Some(buffer) =
                            app.session.as_mut().and_then(|s| s.current_answer_mut())
                        {
                            ui.add(
                                TextEdit::multiline(buffer)
                                    .desired_width(option_w)
                                    .desired_rows(6)
                                    .hint_text("Escribe tu respuesta…"),
                            );
                        }
                    });
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new("Las preguntas abiertas se corrigen a mano y no puntúan.")
                            .weak(),
                    );
                }
            }

            ui.add_space(14.0);
            let next_label = if is_last { "Entregar ✅" } else { "Siguiente ➡" };
            let (prev, next) = two_button_row(ui, option_w, "⬅ Anterior", next_label, has_answer);
            if prev {
                app.retroceder_pregunta();
            }
            if next {
                app.avanzar_pregunta();
            }

            status_message(ui, &app.message);
        });
    });
}

// ----------- RESULTADOS -----------
fn ui_results(app: &mut EduApp, ctx: &Context) {
    let Some((result, is_demo, referencia)) = app.session.as_ref().and_then(|s| {
        s.result()
            .map(|r| (r.clone(), s.is_demo(), s.assessment_id().map(str::to_string)))
    }) else {
        app.assessment_phase = AssessmentPhase::Setup;
        return;
    };

    simple_panel(ctx, 660.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("🎉 Resultados");
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("{} %", result.score_percent))
                    .size(44.0)
                    .strong(),
            );
            ui.label(format!(
                "{} de {} de opción múltiple correctas",
                result.correct_count, result.mcq_count
            ));
            if result.open_count > 0 {
                ui.label(format!(
                    "📝 {} abiertas pendientes de revisión manual",
                    result.open_count
                ));
            }
            ui.label(format!("⏱ Tiempo: {}", elapsed_label(result.elapsed_seconds)));
            if let Some(referencia) = &referencia {
                ui.label(RichText::new(format!("Referencia: {referencia}")).weak());
            }

            if is_demo {
                ui.add_space(6.0);
                demo_banner(ui, "Evaluación de práctica: no se guarda en tu historial.");
            }
            ui.add_space(12.0);

            ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                Grid::new("results_grid")
                    .striped(true)
                    .spacing([14.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("#").strong());
                        ui.label(RichText::new("Tu respuesta").strong());
                        ui.label(RichText::new("Correcta").strong());
                        ui.label(RichText::new("Estado").strong());
                        ui.end_row();

                        for (i, review) in result.reviews.iter().enumerate() {
                            let row = ResultRow::from_review(i + 1, review);
                            ui.label(format!("{}", row.number));
                            if row.given_answer.trim().is_empty() {
                                ui.label("—");
                            } else {
                                ui.label(&row.given_answer);
                            }
                            ui.label(row.expected_label());
                            ui.label(row.status_label());
                            ui.end_row();
                        }
                    });
            });

            ui.add_space(16.0);
            let (otra, volver) = two_button_row(
                ui,
                440.0,
                "🔄 Hacer otra evaluación",
                "🏠 Volver al panel",
                true,
            );
            if otra {
                app.reiniciar_evaluacion();
            }
            if volver {
                app.volver_al_panel();
            }
        });
    });
}
