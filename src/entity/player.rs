use log::{debug, info};

use crate::geom::{Point, Rect};

/// How long one attack keeps the player in the Attack state.
pub const ATTACK_DURATION_MS: u64 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Move,
    Attack,
    GameOver,
}

/// Player-specific state. Position lives on the owning `Entity`; the
/// movement update borrows it alongside this struct.
#[derive(Clone, Debug)]
pub struct Player {
    health: i32,
    max_health: i32,
    speed: f64,
    state: PlayerState,
    attack_started_ms: u64,
}

impl Player {
    pub fn new(max_health: i32, speed: f64) -> Self {
        Self {
            health: max_health,
            max_health,
            speed,
            state: PlayerState::Idle,
            attack_started_ms: 0,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_attacking(&self) -> bool {
        self.state == PlayerState::Attack
    }

    /// Apply one tick of directional input. Each pressed direction
    /// contributes its full per-axis displacement, so diagonal movement
    /// is faster than a single direction; that quirk is deliberate and
    /// covered by a test. Position is clamped so the `frame_w`×`frame_h`
    /// box stays inside the world. No-op once the game is over.
    #[allow(clippy::too_many_arguments)]
    pub fn update_position(
        &mut self,
        position: &mut Point,
        up: bool,
        down: bool,
        left: bool,
        right: bool,
        frame_w: i32,
        frame_h: i32,
        world: Rect,
        elapsed_ms: f64,
        now_ms: u64,
    ) {
        if self.state == PlayerState::GameOver {
            return;
        }

        let pixels = self.speed * elapsed_ms / 1000.0;
        let dx = (right as i32 as f64 * pixels) as i32 - (left as i32 as f64 * pixels) as i32;
        let dy = (down as i32 as f64 * pixels) as i32 - (up as i32 as f64 * pixels) as i32;

        position.x = (position.x + dx).clamp(world.x, world.x + world.w - frame_w);
        position.y = (position.y + dy).clamp(world.y, world.y + world.h - frame_h);

        // An attack in progress owns the state until its window closes.
        if self.state == PlayerState::Attack
            && now_ms.saturating_sub(self.attack_started_ms) < ATTACK_DURATION_MS
        {
            return;
        }

        self.state = if up || down || left || right {
            PlayerState::Move
        } else {
            PlayerState::Idle
        };
    }

    /// Enter the Attack state (idempotent, refreshes the window). The
    /// combat resolver decides how often the attack actually lands.
    pub fn attack(&mut self, now_ms: u64) {
        if self.state == PlayerState::GameOver {
            return;
        }
        self.state = PlayerState::Attack;
        self.attack_started_ms = now_ms;
    }

    pub fn take_damage(&mut self, amount: i32) {
        if self.state == PlayerState::GameOver {
            debug!("player already down, ignoring {} damage", amount);
            return;
        }
        self.health = (self.health - amount).clamp(0, self.max_health);
        if self.health == 0 {
            info!("player is down");
            self.state = PlayerState::GameOver;
        }
    }

    /// Immediate kill, used by fatal hazards.
    pub fn game_over(&mut self) {
        self.health = 0;
        self.state = PlayerState::GameOver;
    }
}
