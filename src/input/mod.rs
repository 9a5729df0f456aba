use sfml::graphics::RenderWindow;
use sfml::window::{mouse, Event, Key};

use crate::geom::Point;

/// Everything the engine consumes from input in one tick: held
/// directional/action keys plus one-shot click and quit signals. Built
/// fresh every tick so the engine never holds callback subscriptions.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Held action key, drops a bomb at the player every tick it is
    /// down.
    pub action: bool,
    /// Primary click this tick, in screen coordinates. Attack.
    pub primary_click: Option<Point>,
    /// Secondary click this tick, in screen coordinates. Bomb.
    pub secondary_click: Option<Point>,
    pub quit: bool,
}

/// Event pump that tracks key state across ticks and folds each tick's
/// events into an `InputSnapshot`.
#[derive(Debug, Default)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    action: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, window: &mut RenderWindow) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();

        while let Some(event) = window.poll_event() {
            match event {
                Event::Closed => snapshot.quit = true,
                Event::KeyPressed { code, .. } => {
                    if code == Key::Escape {
                        snapshot.quit = true;
                    }
                    self.set_key(code, true);
                }
                Event::KeyReleased { code, .. } => self.set_key(code, false),
                Event::MouseButtonPressed { button, x, y } => match button {
                    mouse::Button::Left => snapshot.primary_click = Some(Point::new(x, y)),
                    mouse::Button::Right => snapshot.secondary_click = Some(Point::new(x, y)),
                    _ => {}
                },
                _ => {}
            }
        }

        snapshot.up = self.up;
        snapshot.down = self.down;
        snapshot.left = self.left;
        snapshot.right = self.right;
        snapshot.action = self.action;
        snapshot
    }

    fn set_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::W | Key::Up => self.up = pressed,
            Key::S | Key::Down => self.down = pressed,
            Key::A | Key::Left => self.left = pressed,
            Key::D | Key::Right => self.right = pressed,
            Key::Space => self.action = pressed,
            _ => {}
        }
    }
}
