#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    pretty_env_logger::init();
    log::info!("Arrancando AulaIA v{}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "AulaIA — Aprende con IA",
        options,
        Box::new(|cc| Ok(Box::new(aula_ia::EduApp::new(cc)))),
    )
}

// En web la página arranca la app desde JS con eframe::WebRunner;
// este binario solo aplica en escritorio.
#[cfg(target_arch = "wasm32")]
fn main() {}
