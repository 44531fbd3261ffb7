//! Per-tick game logic.
//!
//! `tick` advances the whole game state by one frame: player, bullets,
//! particles, spawner, monsters, then collisions and culling. All randomness
//! comes through the injected RNG so callers control determinism (tests use
//! a seeded one).

use glam::Vec2;
use log::{debug, info, trace};
use rand::Rng;

use crate::entities::{Bullet, Entity, Monster, MonsterKind, Particle, Player, PLAYER_COLOR};
use crate::input::KeySet;
use crate::surface::Surface;

// ── Tuning ───────────────────────────────────────────────────────────────────

pub const STARTING_LIVES: u32 = 3;
pub const DEFAULT_SPAWN_INTERVAL: u64 = 60;

/// Monsters spawn this far above the top edge.
const SPAWN_Y: f32 = -30.0;
/// Keep spawns this far from the side edges.
const SPAWN_MARGIN: f32 = 30.0;

/// Collision radius of the player ship.
pub const PLAYER_HIT_RADIUS: f32 = 20.0;

const HIT_SPARKS: usize = 5;
const EXPLOSION_PARTICLES: usize = 20;
const PLAYER_HIT_PARTICLES: usize = 30;

// ── State ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

/// Everything the loop owns for one game session.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub monsters: Vec<Monster>,
    pub particles: Vec<Particle>,
    pub score: u32,
    /// Best score seen this process, updated live during play.
    pub high_score: u32,
    pub lives: u32,
    pub status: GameStatus,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
    pub spawn_interval: u64,
}

/// Build a fresh game on a `width × height` canvas.
pub fn init_state(width: f32, height: f32, high_score: u32) -> GameState {
    GameState {
        player: Player::new(width, height),
        player_bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        monsters: Vec::new(),
        particles: Vec::new(),
        score: 0,
        high_score,
        lives: STARTING_LIVES,
        status: GameStatus::Playing,
        frame: 0,
        width,
        height,
        spawn_interval: DEFAULT_SPAWN_INTERVAL,
    }
}

/// What happened during one tick, for logging and callers that care.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: Option<MonsterKind>,
    pub kills: u32,
    pub player_hits: u32,
}

// ── Spawner ──────────────────────────────────────────────────────────────────

/// Roll a monster kind: boss 10 %, fast 30 %, basic 60 %.
pub fn roll_kind(rng: &mut impl Rng) -> MonsterKind {
    match rng.gen_range(0..10) {
        0 => MonsterKind::Boss,
        1..=3 => MonsterKind::Fast,
        _ => MonsterKind::Basic,
    }
}

fn spawn_monster(state: &GameState, rng: &mut impl Rng) -> Monster {
    let hi = (state.width - SPAWN_MARGIN).max(SPAWN_MARGIN + 1.0);
    let x = rng.gen_range(SPAWN_MARGIN..hi);
    Monster::new(Vec2::new(x, SPAWN_Y), roll_kind(rng))
}

// ── Controls ─────────────────────────────────────────────────────────────────

/// Flip between playing and paused. Has no effect after game over.
pub fn toggle_pause(state: &mut GameState) {
    state.status = match state.status {
        GameStatus::Playing => GameStatus::Paused,
        GameStatus::Paused => GameStatus::Playing,
        GameStatus::GameOver => GameStatus::GameOver,
    };
}

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Advance the simulation by one frame. Does nothing unless playing.
pub fn tick(state: &mut GameState, keys: &KeySet, rng: &mut impl Rng) -> TickReport {
    let mut report = TickReport::default();
    if state.status != GameStatus::Playing {
        return report;
    }

    // ── 1. Player ───────────────────────────────────────────────────────────
    state.player.advance(keys);
    if let Some(shot) = state.player.fire(keys) {
        state.player_bullets.push(shot);
    }

    // ── 2. Projectiles and effects ──────────────────────────────────────────
    for bullet in state.player_bullets.iter_mut().chain(state.enemy_bullets.iter_mut()) {
        bullet.advance();
    }
    for particle in &mut state.particles {
        particle.advance();
    }

    // ── 3. Spawner ──────────────────────────────────────────────────────────
    if state.spawn_interval > 0 && (state.frame + 1) % state.spawn_interval == 0 {
        let monster = spawn_monster(state, rng);
        debug!("spawned {:?} at x={:.0}", monster.kind(), monster.pos.x);
        report.spawned = Some(monster.kind());
        state.monsters.push(monster);
    }

    // ── 4. Monsters ─────────────────────────────────────────────────────────
    let target = state.player.pos;
    for monster in &mut state.monsters {
        let volley = monster.advance(target);
        state.enemy_bullets.extend(volley);
    }

    // ── 5. Collisions ───────────────────────────────────────────────────────
    report.kills = resolve_player_shots(state, rng);
    report.player_hits = resolve_player_hits(state, rng);

    // ── 6. Culling ──────────────────────────────────────────────────────────
    let (w, h) = (state.width, state.height);
    state.player_bullets.retain(|b| !b.is_off_screen(w, h));
    state.enemy_bullets.retain(|b| !b.is_off_screen(w, h));
    state.monsters.retain(|m| !m.is_off_screen(h));
    state.particles.retain(Particle::is_alive);

    // ── 7. Bookkeeping ──────────────────────────────────────────────────────
    state.frame += 1;
    state.high_score = state.high_score.max(state.score);
    trace!(
        "frame {}: {} monsters, {} shots, {} enemy shots, {} particles",
        state.frame,
        state.monsters.len(),
        state.player_bullets.len(),
        state.enemy_bullets.len(),
        state.particles.len()
    );

    report
}

/// Player bullets against monsters. Returns the number of kills.
fn resolve_player_shots(state: &mut GameState, rng: &mut impl Rng) -> u32 {
    let mut kills = 0;
    let mut bullets = std::mem::take(&mut state.player_bullets);

    bullets.retain(|bullet| {
        let Some(monster) = state.monsters.iter_mut().find(|m| {
            !m.is_dead() && m.pos.distance(bullet.pos) < m.size() / 2.0 + bullet.size / 2.0
        }) else {
            return true;
        };

        state
            .particles
            .extend(Particle::burst(bullet.pos, bullet.color, HIT_SPARKS, rng));

        if monster.take_hit() {
            kills += 1;
            state.score += monster.score_value();
            state.particles.extend(Particle::burst(
                monster.pos,
                monster.color(),
                EXPLOSION_PARTICLES,
                rng,
            ));
            debug!("destroyed {:?}, score {}", monster.kind(), state.score);
        }
        false
    });

    state.player_bullets = bullets;
    state.monsters.retain(|m| !m.is_dead());
    kills
}

/// Enemy bullets and monster bodies against the player. Returns the number
/// of hits that landed (hits during invulnerability do not count).
fn resolve_player_hits(state: &mut GameState, rng: &mut impl Rng) -> u32 {
    let player_pos = state.player.pos;
    let mut contacts = 0;

    let before = state.enemy_bullets.len();
    state
        .enemy_bullets
        .retain(|b| b.pos.distance(player_pos) >= PLAYER_HIT_RADIUS);
    contacts += before - state.enemy_bullets.len();

    let mut rammed = Vec::new();
    state.monsters.retain(|m| {
        let touching = m.pos.distance(player_pos) < m.size() / 2.0 + PLAYER_HIT_RADIUS;
        if touching {
            rammed.push((m.pos, m.color()));
        }
        !touching
    });
    contacts += rammed.len();
    for (pos, color) in rammed {
        state
            .particles
            .extend(Particle::burst(pos, color, EXPLOSION_PARTICLES, rng));
    }

    let mut landed = 0;
    for _ in 0..contacts {
        if state.player.hit() {
            landed += 1;
            state.lives = state.lives.saturating_sub(1);
            state.particles.extend(Particle::burst(
                player_pos,
                PLAYER_COLOR,
                PLAYER_HIT_PARTICLES,
                rng,
            ));
            info!("player hit, {} lives left", state.lives);
        }
    }

    if state.lives == 0 && state.status == GameStatus::Playing {
        state.status = GameStatus::GameOver;
        info!("game over at frame {} with score {}", state.frame, state.score);
    }
    landed
}

// ── Drawing ──────────────────────────────────────────────────────────────────

/// Draw every entity, back to front.
pub fn draw(state: &GameState, surface: &mut dyn Surface) {
    for particle in &state.particles {
        particle.render(surface);
    }
    for bullet in &state.enemy_bullets {
        bullet.render(surface);
    }
    for monster in &state.monsters {
        monster.render(surface);
    }
    for bullet in &state.player_bullets {
        bullet.render(surface);
    }
    state.player.render(surface);
}
