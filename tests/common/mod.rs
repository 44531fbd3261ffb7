//! Shared test helpers.

#![allow(dead_code)]

use neon_shooter::surface::{Color, Surface};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// One recorded `Surface` call.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    FillRect { x: f32, y: f32, w: f32, h: f32 },
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    ClosePath,
    Fill,
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    FillColor(Color),
    Alpha(f32),
    Shadow(f32, Color),
}

/// A `Surface` that only records what was asked of it.
#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl Recorder {
    /// Alpha values in effect at each `fill_rect`, in order.
    pub fn rect_alphas(&self) -> Vec<f32> {
        let mut alpha = 1.0;
        let mut out = Vec::new();
        for call in &self.calls {
            match call {
                Call::Alpha(a) => alpha = *a,
                Call::FillRect { .. } => out.push(alpha),
                _ => {}
            }
        }
        out
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for Recorder {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.calls.push(Call::FillRect { x, y, w, h });
    }
    fn begin_path(&mut self) {
        self.calls.push(Call::BeginPath);
    }
    fn move_to(&mut self, x: f32, y: f32) {
        self.calls.push(Call::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f32, y: f32) {
        self.calls.push(Call::LineTo(x, y));
    }
    fn close_path(&mut self) {
        self.calls.push(Call::ClosePath);
    }
    fn fill(&mut self) {
        self.calls.push(Call::Fill);
    }
    fn save(&mut self) {
        self.calls.push(Call::Save);
    }
    fn restore(&mut self) {
        self.calls.push(Call::Restore);
    }
    fn translate(&mut self, x: f32, y: f32) {
        self.calls.push(Call::Translate(x, y));
    }
    fn rotate(&mut self, angle: f32) {
        self.calls.push(Call::Rotate(angle));
    }
    fn set_fill_color(&mut self, color: Color) {
        self.calls.push(Call::FillColor(color));
    }
    fn set_global_alpha(&mut self, alpha: f32) {
        self.calls.push(Call::Alpha(alpha));
    }
    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.calls.push(Call::Shadow(blur, color));
    }
}
