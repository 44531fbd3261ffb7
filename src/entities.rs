//! Game entities — each one owns its per-tick behaviour and knows how to
//! draw itself onto a [`Surface`].

use std::collections::VecDeque;
use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use crate::input::{KeySet, DOWN_KEYS, FIRE_KEYS, LEFT_KEYS, RIGHT_KEYS, UP_KEYS};
use crate::surface::{Color, Surface};

/// Shared shape of everything the game loop draws.
///
/// `advance` is not part of the trait: each entity reads different inputs
/// (nothing, the player's position, the held keys).
pub trait Entity {
    fn position(&self) -> Vec2;
    fn render(&self, surface: &mut dyn Surface);
}

fn fill_polygon(surface: &mut dyn Surface, points: impl IntoIterator<Item = Vec2>) {
    surface.begin_path();
    for (i, p) in points.into_iter().enumerate() {
        if i == 0 {
            surface.move_to(p.x, p.y);
        } else {
            surface.line_to(p.x, p.y);
        }
    }
    surface.close_path();
    surface.fill();
}

fn clear_glow(surface: &mut dyn Surface) {
    surface.set_shadow(0.0, Color::BLACK);
}

// ── Bullet ────────────────────────────────────────────────────────────────────

/// Number of past positions a bullet remembers for its glow trail.
pub const TRAIL_LENGTH: usize = 8;

pub const BULLET_SPEED: f32 = 8.0;
pub const BULLET_COLOR: Color = Color::rgb(0x00, 0xff, 0xff);
pub const BULLET_SIZE: f32 = 4.0;

#[derive(Clone, Debug)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    trail: VecDeque<Vec2>,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, color: Color, size: f32) -> Self {
        Bullet {
            pos,
            vel,
            color,
            size,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// A player shot: straight up, cyan, size 4.
    pub fn player_shot(pos: Vec2) -> Self {
        Bullet::new(pos, Vec2::new(0.0, -BULLET_SPEED), BULLET_COLOR, BULLET_SIZE)
    }

    /// Past positions, oldest first.
    pub fn trail(&self) -> &VecDeque<Vec2> {
        &self.trail
    }

    pub fn advance(&mut self) {
        self.trail.push_back(self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
        self.pos += self.vel;
    }

    /// True once the bullet is fully outside the canvas.
    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        self.pos.x < -self.size
            || self.pos.x > width + self.size
            || self.pos.y < -self.size
            || self.pos.y > height + self.size
    }
}

impl Entity for Bullet {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn render(&self, surface: &mut dyn Surface) {
        let half = self.size / 2.0;
        surface.set_shadow(15.0, self.color);
        surface.set_fill_color(self.color);

        let len = self.trail.len() as f32;
        for (i, p) in self.trail.iter().enumerate() {
            surface.set_global_alpha(i as f32 / len * 0.7);
            surface.fill_rect(p.x - half, p.y - half, self.size, self.size);
        }

        surface.set_global_alpha(1.0);
        surface.fill_rect(self.pos.x - half, self.pos.y - half, self.size, self.size);
        clear_glow(surface);
    }
}

// ── Monster ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonsterKind {
    /// Star-shaped, wobbles side to side on its way down.
    Basic,
    /// Hexagon that homes in on the player while drifting down.
    Fast,
    /// Slow, tough, fires a three-way spread.
    Boss,
}

/// Fixed stat block for a monster kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterProfile {
    pub health: i32,
    pub speed: f32,
    pub size: f32,
    pub color: Color,
    /// Score awarded for destroying it.
    pub score: u32,
}

impl MonsterKind {
    pub const fn profile(self) -> MonsterProfile {
        match self {
            MonsterKind::Boss => MonsterProfile {
                health: 5,
                speed: 1.0,
                size: 60.0,
                color: Color::rgb(0xff, 0x00, 0x66),
                score: 500,
            },
            MonsterKind::Fast => MonsterProfile {
                health: 1,
                speed: 3.0,
                size: 25.0,
                color: Color::rgb(0xff, 0xff, 0x00),
                score: 150,
            },
            MonsterKind::Basic => MonsterProfile {
                health: 2,
                speed: 2.0,
                size: 35.0,
                color: Color::rgb(0xff, 0x66, 0x00),
                score: 100,
            },
        }
    }
}

/// Rotation / wobble phase added every tick.
pub const MONSTER_SPIN: f32 = 0.05;
/// Ticks between boss volleys.
pub const BOSS_FIRE_INTERVAL: i32 = 60;
pub const BOSS_SPREAD: [f32; 3] = [-0.5, 0.0, 0.5];
pub const BOSS_BULLET_SPEED: f32 = 4.0;
pub const BOSS_BULLET_SIZE: f32 = 6.0;

#[derive(Clone, Debug)]
pub struct Monster {
    pub pos: Vec2,
    /// Countdown to the next volley; only bosses fire. Goes negative
    /// between volleys.
    pub shoot_cooldown: i32,
    pub angle: f32,
    kind: MonsterKind,
    health: i32,
    max_health: i32,
    speed: f32,
    size: f32,
    color: Color,
}

impl Monster {
    pub fn new(pos: Vec2, kind: MonsterKind) -> Self {
        let profile = kind.profile();
        Monster {
            pos,
            shoot_cooldown: 0,
            angle: 0.0,
            kind,
            health: profile.health,
            max_health: profile.health,
            speed: profile.speed,
            size: profile.size,
            color: profile.color,
        }
    }

    pub fn kind(&self) -> MonsterKind {
        self.kind
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn score_value(&self) -> u32 {
        self.kind.profile().score
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }

    /// Apply one point of damage. Returns true if this hit killed it.
    pub fn take_hit(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health -= 1;
        self.is_dead()
    }

    /// True once the monster has fully left through the bottom edge.
    pub fn is_off_screen(&self, height: f32) -> bool {
        self.pos.y - self.size / 2.0 > height
    }

    /// Move one tick and return any bullets fired this tick.
    pub fn advance(&mut self, player_pos: Vec2) -> Vec<Bullet> {
        self.angle += MONSTER_SPIN;

        match self.kind {
            MonsterKind::Fast => {
                // Zero distance: nothing to chase, keep only the drift.
                let chase = (player_pos - self.pos).normalize_or_zero();
                self.pos += chase * self.speed * 0.5;
                self.pos.y += self.speed;
            }
            MonsterKind::Basic | MonsterKind::Boss => {
                self.pos.y += self.speed;
                self.pos.x += self.angle.sin() * 2.0;
            }
        }

        let mut fired = Vec::new();
        if self.kind == MonsterKind::Boss && self.shoot_cooldown <= 0 {
            let muzzle = Vec2::new(self.pos.x, self.pos.y + self.size / 2.0);
            fired.extend(BOSS_SPREAD.iter().map(|a| {
                Bullet::new(
                    muzzle,
                    Vec2::new(a.sin() * 3.0, BOSS_BULLET_SPEED),
                    self.color,
                    BOSS_BULLET_SIZE,
                )
            }));
            self.shoot_cooldown = BOSS_FIRE_INTERVAL;
        }
        self.shoot_cooldown -= 1;

        fired
    }

    fn render_shape(&self, surface: &mut dyn Surface) {
        let half = self.size / 2.0;
        surface.set_fill_color(self.color);
        match self.kind {
            MonsterKind::Boss => {
                surface.fill_rect(-half, -half, self.size, self.size);
                surface.set_fill_color(Color::WHITE);
                surface.fill_rect(-self.size / 4.0, -self.size / 4.0, half, half);
            }
            MonsterKind::Fast => {
                let hexagon = (0..6).map(|i| {
                    let a = i as f32 * PI * 2.0 / 6.0;
                    Vec2::new(a.cos(), a.sin()) * half
                });
                fill_polygon(surface, hexagon);
            }
            MonsterKind::Basic => {
                let star = (0..8).map(|i| {
                    let a = i as f32 * PI * 2.0 / 8.0;
                    let r = if i % 2 == 0 { half } else { self.size / 3.0 };
                    Vec2::new(a.cos(), a.sin()) * r
                });
                fill_polygon(surface, star);
            }
        }
    }
}

impl Entity for Monster {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.translate(self.pos.x, self.pos.y);
        surface.rotate(self.angle);
        surface.set_shadow(20.0, self.color);

        self.render_shape(surface);

        if self.is_damaged() {
            let left = -self.size / 2.0;
            let top = -self.size / 2.0 - 10.0;
            let ratio = self.health as f32 / self.max_health as f32;
            surface.set_fill_color(Color::RED);
            surface.fill_rect(left, top, self.size, 4.0);
            surface.set_fill_color(Color::GREEN);
            surface.fill_rect(left, top, ratio * self.size, 4.0);
        }

        surface.restore();
        clear_glow(surface);
    }
}

// ── Particle ──────────────────────────────────────────────────────────────────

pub const GRAVITY: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub life: i32,
    max_life: i32,
    size: f32,
}

impl Particle {
    /// `life` is the number of ticks the particle stays visible.
    pub fn new(pos: Vec2, vel: Vec2, color: Color, life: i32, rng: &mut impl Rng) -> Self {
        Particle {
            pos,
            vel,
            color,
            life,
            max_life: life,
            size: rng.gen_range(2.0..6.0),
        }
    }

    /// `count` particles flying out of `pos` in random directions.
    pub fn burst(pos: Vec2, color: Color, count: usize, rng: &mut impl Rng) -> Vec<Particle> {
        (0..count)
            .map(|_| {
                let angle = rng.gen_range(0.0..PI * 2.0);
                let speed = rng.gen_range(1.0..5.0);
                let life = rng.gen_range(20..50);
                Particle::new(pos, Vec2::from_angle(angle) * speed, color, life, rng)
            })
            .collect()
    }

    pub fn max_life(&self) -> i32 {
        self.max_life
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Opacity fades linearly with remaining life.
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0 {
            return 0.0;
        }
        (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.vel.y += GRAVITY;
        self.life -= 1;
    }
}

impl Entity for Particle {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn render(&self, surface: &mut dyn Surface) {
        let half = self.size / 2.0;
        surface.set_global_alpha(self.alpha());
        surface.set_fill_color(self.color);
        surface.fill_rect(self.pos.x - half, self.pos.y - half, self.size, self.size);
        surface.set_global_alpha(1.0);
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Distance the ship keeps from every canvas edge.
pub const PLAYER_MARGIN: f32 = 20.0;
pub const PLAYER_SIZE: f32 = 40.0;
pub const PLAYER_SPEED: f32 = 5.0;
/// Ticks between shots while fire is held.
pub const PLAYER_FIRE_COOLDOWN: u32 = 15;
/// Ticks of invulnerability after taking a hit.
pub const INVULNERABLE_TICKS: u32 = 120;
pub const PLAYER_COLOR: Color = Color::rgb(0x00, 0xff, 0xff);

/// Arrow-shaped hull, nose pointing up.
const HULL: [(f32, f32); 6] = [
    (0.0, -20.0),
    (-15.0, 15.0),
    (-5.0, 10.0),
    (0.0, 20.0),
    (5.0, 10.0),
    (15.0, 15.0),
];

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub shoot_cooldown: u32,
    pub invulnerable: u32,
    canvas_width: f32,
    canvas_height: f32,
}

impl Player {
    /// Place the ship centred near the bottom of the canvas.
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Player {
            pos: Vec2::new(canvas_width / 2.0, canvas_height - 80.0),
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            shoot_cooldown: 0,
            invulnerable: 0,
            canvas_width,
            canvas_height,
        }
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn advance(&mut self, keys: &KeySet) {
        if keys.any(LEFT_KEYS) {
            self.pos.x = (self.pos.x - self.speed).max(PLAYER_MARGIN);
        }
        if keys.any(RIGHT_KEYS) {
            self.pos.x = (self.pos.x + self.speed).min(self.canvas_width - PLAYER_MARGIN);
        }
        if keys.any(UP_KEYS) {
            self.pos.y = (self.pos.y - self.speed).max(PLAYER_MARGIN);
        }
        if keys.any(DOWN_KEYS) {
            self.pos.y = (self.pos.y + self.speed).min(self.canvas_height - PLAYER_MARGIN);
        }

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        self.invulnerable = self.invulnerable.saturating_sub(1);
    }

    /// Fire from the nose if the fire key is held and the gun is ready.
    pub fn fire(&mut self, keys: &KeySet) -> Option<Bullet> {
        if !keys.any(FIRE_KEYS) || self.shoot_cooldown > 0 {
            return None;
        }
        self.shoot_cooldown = PLAYER_FIRE_COOLDOWN;
        Some(Bullet::player_shot(Vec2::new(self.pos.x, self.pos.y - 20.0)))
    }

    /// Register a hit. Returns false (and changes nothing) while invulnerable.
    pub fn hit(&mut self) -> bool {
        if self.invulnerable > 0 {
            return false;
        }
        self.invulnerable = INVULNERABLE_TICKS;
        true
    }

    /// Half-opacity phase of the post-hit blink, alternating every 5 ticks.
    pub fn is_blinking(&self) -> bool {
        self.invulnerable > 0 && (self.invulnerable / 5) % 2 == 1
    }
}

impl Entity for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.translate(self.pos.x, self.pos.y);

        if self.is_blinking() {
            surface.set_global_alpha(0.5);
        }

        surface.set_shadow(15.0, PLAYER_COLOR);
        surface.set_fill_color(PLAYER_COLOR);
        fill_polygon(surface, HULL.iter().map(|&(x, y)| Vec2::new(x, y)));

        // Cockpit
        surface.set_fill_color(Color::WHITE);
        surface.fill_rect(-8.0, -5.0, 16.0, 10.0);

        surface.restore();
        clear_glow(surface);
    }
}
