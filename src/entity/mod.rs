use crate::geom::Point;
use crate::sprite::SpriteAnimation;

pub mod effect;
pub mod enemy;
pub mod player;

pub use effect::TemporaryEffect;
pub use enemy::Enemy;
pub use player::{Player, PlayerState};

/// Unique entity identifier. Assigned monotonically by the engine's
/// counter and never reused within a session.
pub type EntityId = u64;

/// A game object in the entity collection: shared fields plus a closed
/// variant for the behavior it carries. The engine and the combat
/// resolver dispatch on the variant directly, there is no runtime type
/// probing.
#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub position: Point,
    pub sprite: Option<SpriteAnimation>,
    pub kind: EntityKind,
}

#[derive(Clone, Debug)]
pub enum EntityKind {
    Player(Player),
    Enemy(Enemy),
    Effect(TemporaryEffect),
    /// Renderable with no behavior of its own.
    Decoration,
}

impl Entity {
    pub fn new(id: EntityId, position: Point, sprite: Option<SpriteAnimation>, kind: EntityKind) -> Self {
        Self {
            id,
            position,
            sprite,
            kind,
        }
    }

    /// True once this entity must leave the collection at the end of
    /// the current tick: a spent effect or a dead enemy. The player is
    /// never expired, GameOver keeps it in the world.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match &self.kind {
            EntityKind::Player(_) => false,
            EntityKind::Enemy(enemy) => enemy.is_expired(),
            EntityKind::Effect(effect) => effect.is_expired(now_ms),
            EntityKind::Decoration => false,
        }
    }
}
