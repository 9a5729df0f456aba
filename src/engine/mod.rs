use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use log::{debug, info, warn};

use crate::combat;
use crate::entity::{Enemy, Entity, EntityId, EntityKind, Player, PlayerState, TemporaryEffect};
use crate::error::SetupError;
use crate::geom::{Point, Rect};
use crate::input::InputSnapshot;
use crate::level::{Level, Tile, TileSet};
use crate::render::{Flip, Renderer, TextureId, TextureInfo};
use crate::script::Script;
use crate::sprite::{SpriteAnimation, SpriteSheetDef};

const PLAYER_MAX_HEALTH: i32 = 100;
const PLAYER_SPEED: f64 = 128.0;
/// Player collision/render box, matches the sprite frame.
const PLAYER_FRAME: i32 = 48;

const ENEMY_HEALTH: i32 = 50;
const ENEMY_SPEED: f64 = 100.0;
const ENEMY_CONTACT_DAMAGE: i32 = 10;
const ENEMY_ATTACK_COOLDOWN_MS: u64 = 1000;

const BOMB_LIFETIME_MS: u64 = 2100;

const HEALTH_BAR_HEIGHT: i32 = 6;
const HEALTH_BAR_OFFSET: i32 = 10;

/// Sprite templates and decorative assets resolved at setup. Spawning
/// clones the relevant template.
struct Assets {
    player: SpriteAnimation,
    enemy: SpriteAnimation,
    bomb: SpriteAnimation,
    death_screen: Option<(TextureId, TextureInfo)>,
}

/// The frame loop. Owns the entity collection, the level, the session
/// clock and the renderer; each `tick` runs the fixed
/// update → combat → prune pipeline and `render_frame` draws the
/// result. Not ready until `setup_world` has produced a player.
pub struct Engine<R: Renderer> {
    renderer: R,
    level: Level,
    tiles: HashMap<u32, Tile>,
    entities: HashMap<EntityId, Entity>,
    next_id: EntityId,
    /// Entities spawned mid-tick; joined into the collection at the
    /// start of the next tick so in-progress iteration never sees them.
    pending: Vec<Entity>,
    player_id: Option<EntityId>,
    scripts: Vec<Box<dyn Script<R>>>,
    assets: Option<Assets>,
    clock_ms: u64,
    last_tick: Option<Instant>,
}

impl<R: Renderer> Engine<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            level: Level::default(),
            tiles: HashMap::new(),
            entities: HashMap::new(),
            next_id: 1,
            pending: Vec::new(),
            player_id: None,
            scripts: Vec::new(),
            assets: None,
            clock_ms: 0,
            last_tick: None,
        }
    }

    /// Load the level, tile sets and sprite sheets, then spawn the
    /// player and the first enemy. Everything here is required except
    /// the death-screen image, which degrades to a warning.
    pub fn setup_world(&mut self, assets_dir: &Path) -> Result<(), SetupError> {
        let level = Level::load(&assets_dir.join("level.tmj"))?;

        let mut tiles = HashMap::new();
        for set_ref in &level.tile_sets {
            let set = TileSet::load(&assets_dir.join(&set_ref.source))?;
            for tile in &set.tiles {
                let (texture, _) = self.renderer.load_texture(&assets_dir.join(&tile.image))?;
                tiles.insert(
                    tile.id,
                    Tile {
                        texture,
                        width: tile.image_width,
                        height: tile.image_height,
                    },
                );
            }
            info!("loaded tile set '{}' ({} tiles)", set.name, set.tiles.len());
        }

        self.renderer
            .set_world_bounds(Rect::new(0, 0, level.pixel_width(), level.pixel_height()));

        let player_sheet = self.load_sheet(assets_dir, "player.json")?;
        let enemy_sheet = self.load_sheet(assets_dir, "minotaur.json")?;
        let bomb_sheet = self.load_sheet(assets_dir, "bomb.json")?;
        let death_screen = match self.renderer.load_texture(&assets_dir.join("gameover.png")) {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                warn!("death screen unavailable, will skip it: {}", e);
                None
            }
        };

        let mut player_sprite = player_sheet.clone();
        player_sprite.activate("Idle", self.clock_ms);

        self.level = level;
        self.tiles = tiles;
        self.assets = Some(Assets {
            player: player_sheet,
            enemy: enemy_sheet,
            bomb: bomb_sheet,
            death_screen,
        });

        // The player must exist before the first tick runs.
        let id = self.alloc_id();
        self.entities.insert(
            id,
            Entity::new(
                id,
                Point::new(100, 100),
                Some(player_sprite),
                EntityKind::Player(Player::new(PLAYER_MAX_HEALTH, PLAYER_SPEED)),
            ),
        );
        self.player_id = Some(id);

        self.add_enemy(200, 200);
        self.flush_pending();

        info!(
            "world ready: {}x{} px, {} entities",
            self.level.pixel_width(),
            self.level.pixel_height(),
            self.entities.len()
        );
        Ok(())
    }

    pub fn add_script(&mut self, script: Box<dyn Script<R>>) {
        self.scripts.push(script);
    }

    /// Advance one tick using wall-clock elapsed time.
    pub fn process_frame(&mut self, input: &InputSnapshot) {
        let now = Instant::now();
        let elapsed_ms = match self.last_tick {
            Some(last) => now.duration_since(last).as_millis() as u64,
            None => 0,
        };
        self.last_tick = Some(now);
        self.tick(input, elapsed_ms);
    }

    /// One full update pass: pending spawns join, the clock advances,
    /// the player consumes the input snapshot, scripts run, enemies
    /// pursue, then the combat resolver exchanges damage, detonates
    /// expired effects and prunes. Rendering is separate.
    pub fn tick(&mut self, input: &InputSnapshot, elapsed_ms: u64) {
        let Some(player_id) = self.player_id else {
            warn!("tick before world setup, skipping");
            return;
        };

        self.flush_pending();
        self.clock_ms += elapsed_ms;
        let now = self.clock_ms;
        let world = self.world_bounds();

        if let Some(entity) = self.entities.get_mut(&player_id) {
            let Entity {
                position,
                sprite,
                kind,
                ..
            } = entity;
            if let EntityKind::Player(player) = kind {
                let before = player.state();
                player.update_position(
                    position,
                    input.up,
                    input.down,
                    input.left,
                    input.right,
                    PLAYER_FRAME,
                    PLAYER_FRAME,
                    world,
                    elapsed_ms as f64,
                    now,
                );
                if input.primary_click.is_some() {
                    player.attack(now);
                }
                let after = player.state();
                if after != before {
                    if let Some(sprite) = sprite.as_mut() {
                        sprite.activate(clip_for(after), now);
                    }
                }
            }
        }

        if let Some(click) = input.secondary_click {
            self.add_bomb(click.x, click.y, true);
        }
        if input.action {
            if let Some(pos) = self.player_position() {
                self.add_bomb(pos.x, pos.y, false);
            }
        }

        self.run_scripts();

        if let Some(player_pos) = self.player_position() {
            for entity in self.entities.values_mut() {
                let Entity {
                    position,
                    sprite,
                    kind,
                    ..
                } = entity;
                if let EntityKind::Enemy(enemy) = kind {
                    enemy.update(position, elapsed_ms as f64, player_pos);
                }
                if let Some(sprite) = sprite.as_mut() {
                    sprite.update(now);
                }
            }
        }

        combat::resolve(&mut self.entities, player_id, now);
    }

    /// Draw the current world state: camera on the player, terrain,
    /// entities, the player on top with its health bar. A downed
    /// player swaps the scene for the death presentation, but every
    /// tick still clears and presents.
    pub fn render_frame(&mut self) {
        self.renderer.set_draw_color(0, 0, 0, 255);
        self.renderer.clear();

        let player = self.player_id.and_then(|id| {
            self.entities.get(&id).map(|e| {
                let down = matches!(&e.kind,
                    EntityKind::Player(p) if p.state() == PlayerState::GameOver);
                (e.id, e.position, down)
            })
        });
        let Some((player_id, player_pos, game_over)) = player else {
            self.renderer.present();
            return;
        };

        self.renderer.camera_look_at(player_pos.x, player_pos.y);

        if game_over {
            self.render_death_screen();
        } else {
            self.render_terrain();
            self.render_entities(player_id);
            self.render_health_bar(player_id, player_pos);
        }

        self.renderer.present();
    }

    pub fn add_enemy(&mut self, x: i32, y: i32) {
        let Some(assets) = self.assets.as_ref() else {
            warn!("add_enemy before world setup, ignoring");
            return;
        };
        let mut sprite = assets.enemy.clone();
        sprite.activate("Walk", self.clock_ms);

        let id = self.alloc_id();
        self.pending.push(Entity::new(
            id,
            Point::new(x, y),
            Some(sprite),
            EntityKind::Enemy(Enemy::new(
                ENEMY_HEALTH,
                ENEMY_SPEED,
                ENEMY_CONTACT_DAMAGE,
                ENEMY_ATTACK_COOLDOWN_MS,
            )),
        ));
    }

    /// Place a bomb. `translate` treats (x, y) as screen coordinates
    /// (a mouse click) and converts them through the camera.
    pub fn add_bomb(&mut self, x: i32, y: i32, translate: bool) {
        let Some(assets) = self.assets.as_ref() else {
            warn!("add_bomb before world setup, ignoring");
            return;
        };
        let mut sprite = assets.bomb.clone();
        sprite.activate("Explode", self.clock_ms);

        let position = if translate {
            self.renderer.to_world(x, y)
        } else {
            Point::new(x, y)
        };

        let id = self.alloc_id();
        self.pending.push(Entity::new(
            id,
            position,
            Some(sprite),
            EntityKind::Effect(TemporaryEffect::new(self.clock_ms, BOMB_LIFETIME_MS)),
        ));
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn world_bounds(&self) -> Rect {
        Rect::new(0, 0, self.level.pixel_width(), self.level.pixel_height())
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player_id
    }

    pub fn player_position(&self) -> Option<Point> {
        self.player_id
            .and_then(|id| self.entities.get(&id))
            .map(|e| e.position)
    }

    pub fn entities(&self) -> &HashMap<EntityId, Entity> {
        &self.entities
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn alloc_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        debug!("{} pending entities join the collection", self.pending.len());
        let pending = std::mem::take(&mut self.pending);
        for entity in pending {
            self.entities.insert(entity.id, entity);
        }
    }

    /// Scripts get `&mut self`, so the list is taken out for the
    /// duration of the pass; scripts registering further scripts land
    /// in `self.scripts` and are appended afterwards.
    fn run_scripts(&mut self) {
        if self.scripts.is_empty() {
            return;
        }
        let mut scripts = std::mem::take(&mut self.scripts);
        for script in scripts.iter_mut() {
            script.execute(self);
        }
        scripts.extend(self.scripts.drain(..));
        self.scripts = scripts;
    }

    fn load_sheet(&mut self, assets_dir: &Path, file: &str) -> Result<SpriteAnimation, SetupError> {
        let def = SpriteSheetDef::load(&assets_dir.join(file))?;
        let (texture, _) = self.renderer.load_texture(&assets_dir.join(&def.texture))?;
        Ok(SpriteAnimation::from_def(&def, texture))
    }

    fn render_terrain(&mut self) {
        let (Some(width), Some(height)) = (self.level.width, self.level.height) else {
            return;
        };

        for layer in &self.level.layers {
            for i in 0..width {
                for j in 0..height {
                    let index = (j * layer.width + i) as usize;
                    let Some(&raw) = layer.data.get(index) else {
                        continue;
                    };
                    if raw == 0 {
                        continue;
                    }
                    let tile_id = raw - 1;
                    // A malformed tile reference skips this tile for
                    // this frame, never the whole pass.
                    let Some(tile) = self.tiles.get(&tile_id) else {
                        debug!("tile id {} not in tile table, skipping", tile_id);
                        continue;
                    };

                    let src = Rect::new(0, 0, tile.width, tile.height);
                    let dst = Rect::new(i * tile.width, j * tile.height, tile.width, tile.height);
                    self.renderer
                        .render_texture(tile.texture, src, dst, Flip::None, 0.0, Point::default());
                }
            }
        }
    }

    fn render_entities(&mut self, player_id: EntityId) {
        for entity in self.entities.values() {
            if entity.id == player_id {
                continue;
            }
            Self::render_sprite(&mut self.renderer, entity);
        }

        // Player draws above everything else.
        if let Some(player) = self.entities.get(&player_id) {
            Self::render_sprite(&mut self.renderer, player);
        }
    }

    fn render_sprite(renderer: &mut R, entity: &Entity) {
        let Some(sprite) = &entity.sprite else { return };
        let Some(src) = sprite.frame_rect() else { return };
        let dst = Rect::new(
            entity.position.x,
            entity.position.y,
            sprite.frame_width(),
            sprite.frame_height(),
        );
        renderer.render_texture(sprite.texture(), src, dst, Flip::None, 0.0, Point::default());
    }

    fn render_health_bar(&mut self, player_id: EntityId, player_pos: Point) {
        let Some((health, max_health)) = self.entities.get(&player_id).and_then(|e| match &e.kind {
            EntityKind::Player(p) => Some((p.health(), p.max_health())),
            _ => None,
        }) else {
            return;
        };

        let bar = Rect::new(
            player_pos.x,
            player_pos.y - HEALTH_BAR_OFFSET,
            PLAYER_FRAME,
            HEALTH_BAR_HEIGHT,
        );
        self.renderer.set_draw_color(160, 30, 30, 255);
        self.renderer.fill_rect(bar);

        let filled = PLAYER_FRAME * health / max_health.max(1);
        self.renderer.set_draw_color(40, 180, 60, 255);
        self.renderer
            .fill_rect(Rect::new(bar.x, bar.y, filled, bar.h));
    }

    fn render_death_screen(&mut self) {
        let death_screen = self.assets.as_ref().and_then(|a| a.death_screen);
        let Some((texture, info)) = death_screen else {
            debug!("no death screen asset, presenting empty frame");
            return;
        };

        let sx = (self.renderer.screen_width() - info.width) / 2;
        let sy = (self.renderer.screen_height() - info.height) / 2;
        let world = self.renderer.to_world(sx, sy);
        self.renderer.render_texture(
            texture,
            Rect::new(0, 0, info.width, info.height),
            Rect::new(world.x, world.y, info.width, info.height),
            Flip::None,
            0.0,
            Point::default(),
        );
    }
}

fn clip_for(state: PlayerState) -> &'static str {
    match state {
        PlayerState::Idle => "Idle",
        PlayerState::Move => "Move",
        PlayerState::Attack => "Attack",
        PlayerState::GameOver => "GameOver",
    }
}
