use log::debug;

use crate::geom::Point;

/// Hostile entity: pursues the player in a straight line and deals
/// contact damage on a cooldown. Death is terminal and marks the
/// enemy expired for the same tick's prune pass.
#[derive(Clone, Debug)]
pub struct Enemy {
    health: i32,
    max_health: i32,
    contact_damage: i32,
    speed: f64,
    attack_cooldown_ms: u64,
    last_attack_ms: Option<u64>,
    dead: bool,
}

impl Enemy {
    pub fn new(max_health: i32, speed: f64, contact_damage: i32, attack_cooldown_ms: u64) -> Self {
        Self {
            health: max_health,
            max_health,
            contact_damage,
            speed,
            attack_cooldown_ms,
            last_attack_ms: None,
            dead: false,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn contact_damage(&self) -> i32 {
        self.contact_damage
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_expired(&self) -> bool {
        self.dead
    }

    /// Straight pursuit toward the player's current position: unit
    /// direction vector (zero when coincident), advanced by
    /// `speed * elapsed / 1000` and truncated to integer coordinates.
    /// No pathfinding, no obstacle avoidance.
    pub fn update(&mut self, position: &mut Point, elapsed_ms: f64, player: Point) {
        if self.dead {
            return;
        }

        let dx = (player.x - position.x) as f64;
        let dy = (player.y - position.y) as f64;
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return;
        }

        let step = self.speed * elapsed_ms / 1000.0;
        position.x += (dx / length * step) as i32;
        position.y += (dy / length * step) as i32;
    }

    pub fn can_attack(&self, now_ms: u64) -> bool {
        if self.dead {
            return false;
        }
        match self.last_attack_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.attack_cooldown_ms,
        }
    }

    /// Record the attack timestamp. Damage application belongs to the
    /// combat resolver.
    pub fn attack(&mut self, now_ms: u64) {
        self.last_attack_ms = Some(now_ms);
    }

    pub fn take_damage(&mut self, amount: i32) {
        if self.dead {
            debug!("enemy already dead, ignoring {} damage", amount);
            return;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.dead = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pursuit_moves_straight_at_the_player() {
        let mut enemy = Enemy::new(50, 100.0, 10, 1000);
        let mut pos = Point::new(0, 0);
        enemy.update(&mut pos, 1000.0, Point::new(100, 0));
        assert!((pos.x - 100).abs() <= 1);
        assert_eq!(pos.y, 0);
    }

    #[test]
    fn pursuit_holds_still_when_coincident_with_player() {
        let mut enemy = Enemy::new(50, 100.0, 10, 1000);
        let mut pos = Point::new(40, 40);
        enemy.update(&mut pos, 1000.0, Point::new(40, 40));
        assert_eq!(pos, Point::new(40, 40));
    }

    #[test]
    fn attack_cooldown_gates_by_timestamp() {
        let mut enemy = Enemy::new(50, 100.0, 10, 1000);
        assert!(enemy.can_attack(0));
        enemy.attack(0);
        assert!(!enemy.can_attack(500));
        assert!(!enemy.can_attack(999));
        assert!(enemy.can_attack(1000));
    }

    #[test]
    fn death_is_terminal() {
        let mut enemy = Enemy::new(50, 100.0, 10, 1000);
        enemy.take_damage(60);
        assert!(enemy.is_dead());
        assert!(enemy.is_expired());
        let health = enemy.health();
        assert!(health <= 0);

        // No more movement, attacks or damage intake.
        let mut pos = Point::new(0, 0);
        enemy.update(&mut pos, 1000.0, Point::new(100, 0));
        assert_eq!(pos, Point::new(0, 0));
        assert!(!enemy.can_attack(10_000));
        enemy.take_damage(10);
        assert_eq!(enemy.health(), health);
    }
}
