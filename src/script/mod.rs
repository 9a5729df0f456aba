use log::info;

use crate::engine::Engine;
use crate::render::Renderer;

/// Per-tick callback with full access to the engine's public spawn
/// operations. The engine takes the script list out before invoking it
/// (see `Engine::run_scripts`), so a script is free to add entities or
/// even register further scripts.
pub trait Script<R: Renderer> {
    fn execute(&mut self, engine: &mut Engine<R>);
}

/// Spawns an enemy at a random spot inside the world bounds on a fixed
/// interval.
pub struct SpawnWave {
    interval_ms: u64,
    last_spawn_ms: u64,
}

impl SpawnWave {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_spawn_ms: 0,
        }
    }
}

impl<R: Renderer> Script<R> for SpawnWave {
    fn execute(&mut self, engine: &mut Engine<R>) {
        let now = engine.clock_ms();
        if now.saturating_sub(self.last_spawn_ms) < self.interval_ms {
            return;
        }
        self.last_spawn_ms = now;

        let bounds = engine.world_bounds();
        let x = bounds.x + (rand::random::<f64>() * bounds.w as f64) as i32;
        let y = bounds.y + (rand::random::<f64>() * bounds.h as f64) as i32;
        info!("spawn wave: enemy at ({}, {})", x, y);
        engine.add_enemy(x, y);
    }
}
