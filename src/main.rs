use std::path::Path;

use log::{error, info};

use adventure::engine::Engine;
use adventure::input::InputState;
use adventure::render::SfmlRenderer;
use adventure::script::SpawnWave;

fn main() {
    simple_logger::init_with_level(log::Level::Info).ok();

    let renderer = match SfmlRenderer::new(800, 600, "Adventure") {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut engine = Engine::new(renderer);
    if let Err(e) = engine.setup_world(Path::new("assets")) {
        error!("world setup failed: {}", e);
        std::process::exit(1);
    }
    engine.add_script(Box::new(SpawnWave::new(15_000)));

    let mut input = InputState::new();
    loop {
        let snapshot = input.poll(engine.renderer_mut().window_mut());
        if snapshot.quit {
            break;
        }
        engine.process_frame(&snapshot);
        engine.render_frame();
    }

    info!("shutting down");
}
