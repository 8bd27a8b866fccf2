fn main() -> Result<(), eframe::Error> {
    // Set up logging, controlled by RUST_LOG
    env_logger::init();

    // Run the viewer application
    diagram_preview::run_app()
}
