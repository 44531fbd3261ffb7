//! Drawing collaborator used by every `render` method.
//!
//! The interface mirrors a 2D immediate-mode canvas: filled rectangles,
//! filled paths, a save/restore stack for transforms and style, global
//! opacity and a glow (shadow blur) setting.

// ── Colour ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
    pub const CYAN: Color = Color::rgb(0x00, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Linear blend from `self` toward `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

pub trait Surface {
    /// Fill an axis-aligned rectangle in the current transform.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);
    /// Fill every sub-path recorded since the last `begin_path`.
    fn fill(&mut self);

    /// Push transform, fill colour, alpha and glow onto the state stack.
    fn save(&mut self);
    /// Pop the state stack. Unbalanced calls are ignored.
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    /// Rotate by `angle` radians, clockwise in screen space (y down).
    fn rotate(&mut self, angle: f32);

    fn set_fill_color(&mut self, color: Color);
    fn set_global_alpha(&mut self, alpha: f32);
    /// Glow around subsequent fills. A blur of 0 disables it.
    fn set_shadow(&mut self, blur: f32, color: Color);
}
