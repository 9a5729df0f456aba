//! Per-tick combat and collision resolution. Runs once per tick, after
//! all movement updates, in a fixed order: enemy contact attacks, then
//! player attack damage, then blast detonation for expired effects,
//! then pruning. Reordering any of these steps is observable, so keep
//! the sequence.

use std::collections::HashMap;

use log::{debug, info};

use crate::entity::{Entity, EntityId, EntityKind};
use crate::geom::Point;

/// Axis-aligned contact box: |Δx| and |Δy| both under 32px. This is a
/// box check, not a radius.
pub const PROXIMITY_THRESHOLD: i32 = 32;

/// Damage an enemy takes each tick it sits in range of an attacking
/// player. There is deliberately no player-side cooldown.
pub const PLAYER_ATTACK_DAMAGE: i32 = 25;

/// Blast damage to enemies is effectively always lethal.
pub const BLAST_ENEMY_DAMAGE: i32 = 999;

/// Blast damage to the player; stacks across overlapping blasts that
/// expire in the same tick.
pub const BLAST_PLAYER_DAMAGE: i32 = 50;

pub fn in_proximity(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < PROXIMITY_THRESHOLD && (a.y - b.y).abs() < PROXIMITY_THRESHOLD
}

/// Resolve all combat interactions for this tick and prune expired
/// entities. Returns the number of entities removed.
pub fn resolve(entities: &mut HashMap<EntityId, Entity>, player_id: EntityId, now_ms: u64) -> usize {
    let Some((player_pos, player_attacking)) = player_snapshot(entities, player_id) else {
        return 0;
    };

    // Steps 1 and 2: contact exchange between the player and every
    // live enemy in the proximity box.
    let mut damage_to_player = 0;
    for entity in entities.values_mut() {
        let Entity {
            position,
            sprite,
            kind,
            ..
        } = entity;
        let EntityKind::Enemy(enemy) = kind else {
            continue;
        };
        if enemy.is_dead() || !in_proximity(*position, player_pos) {
            continue;
        }

        if enemy.can_attack(now_ms) {
            enemy.attack(now_ms);
            if let Some(sprite) = sprite.as_mut() {
                sprite.activate("Attack", now_ms);
            }
            damage_to_player += enemy.contact_damage();
        }

        if player_attacking {
            enemy.take_damage(PLAYER_ATTACK_DAMAGE);
            if enemy.is_dead() {
                info!("enemy slain by the player");
                if let Some(sprite) = sprite.as_mut() {
                    sprite.activate("Dead", now_ms);
                }
            }
        }
    }
    if damage_to_player > 0 {
        apply_player_damage(entities, player_id, damage_to_player, now_ms);
    }

    // Step 3: every effect that expired this tick detonates
    // independently, so overlapping blasts stack.
    let blasts: Vec<Point> = entities
        .values()
        .filter_map(|e| match &e.kind {
            EntityKind::Effect(effect) if effect.is_expired(now_ms) => Some(e.position),
            _ => None,
        })
        .collect();

    for blast in &blasts {
        for entity in entities.values_mut() {
            let Entity {
                position,
                sprite,
                kind,
                ..
            } = entity;
            let EntityKind::Enemy(enemy) = kind else {
                continue;
            };
            if enemy.is_dead() || !in_proximity(*position, *blast) {
                continue;
            }
            enemy.take_damage(BLAST_ENEMY_DAMAGE);
            info!("enemy caught in blast at ({}, {})", blast.x, blast.y);
            if let Some(sprite) = sprite.as_mut() {
                sprite.activate("Dead", now_ms);
            }
        }

        if in_proximity(player_pos, *blast) {
            apply_player_damage(entities, player_id, BLAST_PLAYER_DAMAGE, now_ms);
        }
    }

    // Step 4: batched removal, never mid-iteration.
    let expired: Vec<EntityId> = entities
        .iter()
        .filter(|(_, e)| e.is_expired(now_ms))
        .map(|(id, _)| *id)
        .collect();
    for id in &expired {
        entities.remove(id);
    }
    if !expired.is_empty() {
        debug!("pruned {} expired entities", expired.len());
    }
    expired.len()
}

fn player_snapshot(
    entities: &HashMap<EntityId, Entity>,
    player_id: EntityId,
) -> Option<(Point, bool)> {
    let entity = entities.get(&player_id)?;
    match &entity.kind {
        EntityKind::Player(player) => Some((entity.position, player.is_attacking())),
        _ => None,
    }
}

fn apply_player_damage(
    entities: &mut HashMap<EntityId, Entity>,
    player_id: EntityId,
    amount: i32,
    now_ms: u64,
) {
    let Some(entity) = entities.get_mut(&player_id) else {
        return;
    };
    let Entity { sprite, kind, .. } = entity;
    let EntityKind::Player(player) = kind else {
        return;
    };
    let was_down = player.state() == crate::entity::PlayerState::GameOver;
    player.take_damage(amount);
    if !was_down && player.state() == crate::entity::PlayerState::GameOver {
        if let Some(sprite) = sprite.as_mut() {
            sprite.activate("GameOver", now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Enemy, Player, PlayerState, TemporaryEffect};

    fn world_with_player(pos: Point) -> (HashMap<EntityId, Entity>, EntityId) {
        let mut entities = HashMap::new();
        let player_id = 1;
        entities.insert(
            player_id,
            Entity::new(
                player_id,
                pos,
                None,
                EntityKind::Player(Player::new(100, 128.0)),
            ),
        );
        (entities, player_id)
    }

    fn add_enemy(entities: &mut HashMap<EntityId, Entity>, id: EntityId, pos: Point) {
        entities.insert(
            id,
            Entity::new(
                id,
                pos,
                None,
                EntityKind::Enemy(Enemy::new(50, 100.0, 10, 1000)),
            ),
        );
    }

    fn add_effect(entities: &mut HashMap<EntityId, Entity>, id: EntityId, pos: Point, created: u64) {
        entities.insert(
            id,
            Entity::new(
                id,
                pos,
                None,
                EntityKind::Effect(TemporaryEffect::new(created, 2100)),
            ),
        );
    }

    fn player_health(entities: &HashMap<EntityId, Entity>, id: EntityId) -> i32 {
        match &entities[&id].kind {
            EntityKind::Player(p) => p.health(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn contact_damage_respects_the_cooldown() {
        let (mut entities, player_id) = world_with_player(Point::new(100, 100));
        add_enemy(&mut entities, 2, Point::new(110, 110));

        resolve(&mut entities, player_id, 0);
        assert_eq!(player_health(&entities, player_id), 90);

        // Still in range every tick, but the 1000ms cooldown holds.
        for now in [100, 400, 999] {
            resolve(&mut entities, player_id, now);
            assert_eq!(player_health(&entities, player_id), 90);
        }

        resolve(&mut entities, player_id, 1000);
        assert_eq!(player_health(&entities, player_id), 80);
    }

    #[test]
    fn out_of_range_enemy_never_attacks() {
        let (mut entities, player_id) = world_with_player(Point::new(100, 100));
        // Δx = 32 fails the strict |Δx| < 32 check.
        add_enemy(&mut entities, 2, Point::new(132, 100));
        resolve(&mut entities, player_id, 0);
        assert_eq!(player_health(&entities, player_id), 100);
    }

    #[test]
    fn attacking_player_damages_enemies_every_tick() {
        let (mut entities, player_id) = world_with_player(Point::new(100, 100));
        add_enemy(&mut entities, 2, Point::new(110, 110));
        match &mut entities.get_mut(&player_id).unwrap().kind {
            EntityKind::Player(p) => p.attack(0),
            _ => unreachable!(),
        }

        resolve(&mut entities, player_id, 0);
        match &entities[&2].kind {
            EntityKind::Enemy(e) => assert_eq!(e.health(), 25),
            _ => unreachable!(),
        }

        // Second tick in range while still attacking: the enemy dies
        // and is pruned in the same tick.
        resolve(&mut entities, player_id, 16);
        assert!(!entities.contains_key(&2));
    }

    #[test]
    fn blast_kills_enemies_in_the_box_and_spares_the_rest() {
        let (mut entities, player_id) = world_with_player(Point::new(300, 300));
        add_enemy(&mut entities, 2, Point::new(60, 55));
        add_enemy(&mut entities, 3, Point::new(100, 100));
        add_effect(&mut entities, 4, Point::new(50, 50), 0);

        // Effect expires at t=2100: the near enemy dies that tick.
        resolve(&mut entities, player_id, 2100);
        assert!(!entities.contains_key(&2));
        assert!(!entities.contains_key(&4));
        match &entities[&3].kind {
            EntityKind::Enemy(e) => assert!(!e.is_dead()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn overlapping_blasts_stack_on_the_player() {
        let (mut entities, player_id) = world_with_player(Point::new(50, 50));
        add_effect(&mut entities, 2, Point::new(55, 55), 0);
        add_effect(&mut entities, 3, Point::new(45, 45), 0);

        resolve(&mut entities, player_id, 2100);
        assert_eq!(player_health(&entities, player_id), 0);
        match &entities[&player_id].kind {
            EntityKind::Player(p) => assert_eq!(p.state(), PlayerState::GameOver),
            _ => unreachable!(),
        }
    }

    #[test]
    fn prune_leaves_no_expired_entity_behind() {
        let (mut entities, player_id) = world_with_player(Point::new(500, 500));
        add_enemy(&mut entities, 2, Point::new(60, 55));
        add_effect(&mut entities, 3, Point::new(50, 50), 0);
        add_effect(&mut entities, 4, Point::new(800, 800), 1000);

        // t=2100: effect 3 expires and kills enemy 2; effect 4 lives on.
        let removed = resolve(&mut entities, player_id, 2100);
        assert_eq!(removed, 2);
        assert!(entities.values().all(|e| !e.is_expired(2100)));
        assert!(entities.contains_key(&4));
        assert!(entities.contains_key(&player_id));
    }
}
