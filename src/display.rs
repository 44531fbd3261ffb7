//! Rendering layer — all terminal I/O lives here.
//!
//! [`TerminalCanvas`] implements [`Surface`] by rasterising the logical
//! canvas into a grid of terminal cells. `present` then writes the cells and
//! the HUD with crossterm. No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color as TermColor, Print},
    terminal, QueueableCommand,
};
use glam::{Affine2, Vec2};

use crate::compute::{GameState, GameStatus};
use crate::surface::{Color, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::BLACK;
const C_HUD_SCORE: TermColor = TermColor::Yellow;
const C_HUD_LIVES: TermColor = TermColor::Red;
const C_HINT: TermColor = TermColor::DarkGrey;
const C_PAUSED: TermColor = TermColor::Cyan;

/// Glyph for a glow-only cell.
const GLOW_GLYPH: char = '░';
/// Opacity of the glow tint relative to the glow colour.
const GLOW_STRENGTH: f32 = 0.3;
/// Share of the shadow blur, in canvas units, that the glow reaches past
/// the shape's edge.
const GLOW_REACH: f32 = 0.5;

fn to_term(c: Color) -> TermColor {
    TermColor::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── Cells ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    pub const EMPTY: Cell = Cell { glyph: ' ', color: C_BACKGROUND };

    pub fn is_empty(&self) -> bool {
        self.glyph == ' '
    }
}

/// Style and transform captured by `save`.
#[derive(Clone, Copy, Debug)]
struct DrawState {
    transform: Affine2,
    fill: Color,
    alpha: f32,
    shadow_blur: f32,
    shadow_color: Color,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            transform: Affine2::IDENTITY,
            fill: Color::WHITE,
            alpha: 1.0,
            shadow_blur: 0.0,
            shadow_color: C_BACKGROUND,
        }
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

/// A `Surface` backed by `cols × rows` terminal cells covering a
/// `width × height` logical canvas.
pub struct TerminalCanvas {
    cols: u16,
    rows: u16,
    width: f32,
    height: f32,
    cells: Vec<Cell>,
    state: DrawState,
    stack: Vec<DrawState>,
    /// Closed and open sub-paths in canvas space, already transformed.
    paths: Vec<Vec<Vec2>>,
}

impl TerminalCanvas {
    pub fn new(cols: u16, rows: u16, width: f32, height: f32) -> Self {
        TerminalCanvas {
            cols: cols.max(1),
            rows: rows.max(1),
            width,
            height,
            cells: vec![Cell::EMPTY; cols.max(1) as usize * rows.max(1) as usize],
            state: DrawState::default(),
            stack: Vec::new(),
            paths: Vec::new(),
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    /// Wipe every cell and reset the drawing state.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
        self.state = DrawState::default();
        self.stack.clear();
        self.paths.clear();
    }

    /// Match a new terminal size, discarding the current frame.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.cells = vec![Cell::EMPTY; self.cols as usize * self.rows as usize];
    }

    fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.width / self.cols as f32,
            self.height / self.rows as f32,
        )
    }

    fn cell_center(&self, col: u16, row: u16) -> Vec2 {
        (Vec2::new(col as f32, row as f32) + 0.5) * self.cell_size()
    }

    fn cell_at(&self, p: Vec2) -> Option<(u16, u16)> {
        let c = p / self.cell_size();
        if c.x < 0.0 || c.y < 0.0 || c.x >= self.cols as f32 || c.y >= self.rows as f32 {
            return None;
        }
        Some((c.x as u16, c.y as u16))
    }

    fn blend(&mut self, col: u16, row: u16, color: Color, alpha: f32, glyph: char) {
        let idx = row as usize * self.cols as usize + col as usize;
        let cell = &mut self.cells[idx];
        cell.color = cell.color.lerp(color, alpha);
        cell.glyph = glyph;
    }

    /// Rasterise one polygon (canvas space) with the current style.
    fn fill_polygon(&mut self, poly: &[Vec2]) {
        if poly.len() < 3 || self.state.alpha <= 0.0 {
            return;
        }
        let Some((min, max)) = bounds(poly) else {
            return;
        };
        let cell = self.cell_size();
        let first = (min / cell).floor().max(Vec2::ZERO);
        let last = (max / cell)
            .ceil()
            .min(Vec2::new(self.cols as f32, self.rows as f32));

        let (fill, alpha) = (self.state.fill, self.state.alpha);
        let mut covered = Vec::new();
        for row in first.y as u16..last.y as u16 {
            for col in first.x as u16..last.x as u16 {
                if contains(poly, self.cell_center(col, row)) {
                    covered.push((col, row));
                }
            }
        }

        // Shapes smaller than a cell still show up.
        if covered.is_empty() {
            let centroid = poly.iter().copied().sum::<Vec2>() / poly.len() as f32;
            if let Some(c) = self.cell_at(centroid) {
                covered.push(c);
            }
        }

        for &(col, row) in &covered {
            self.blend(col, row, fill, alpha, '█');
        }
        if self.state.shadow_blur > 0.0 {
            self.glow(&covered);
        }
    }

    /// Tint empty cells around `covered` with the glow colour. Runs after the
    /// fill, so the shape's own cells are no longer empty.
    fn glow(&mut self, covered: &[(u16, u16)]) {
        let reach = self.state.shadow_blur * GLOW_REACH / self.cell_size();
        let spread_x = reach.x.ceil().max(1.0) as i32;
        let spread_y = reach.y.ceil().max(1.0) as i32;
        let color = self.state.shadow_color;
        let strength = GLOW_STRENGTH * self.state.alpha;
        for &(col, row) in covered {
            for dr in -spread_y..=spread_y {
                for dc in -spread_x..=spread_x {
                    let (c, r) = (col as i32 + dc, row as i32 + dr);
                    if c < 0 || r < 0 || c >= self.cols as i32 || r >= self.rows as i32 {
                        continue;
                    }
                    let (c, r) = (c as u16, r as u16);
                    if self.cell(c, r).is_some_and(Cell::is_empty) {
                        self.blend(c, r, color, strength, GLOW_GLYPH);
                    }
                }
            }
        }
    }

    // ── Output ────────────────────────────────────────────────────────────────

    /// Write the rasterised frame, then the HUD and overlays.
    pub fn present<W: Write>(&self, out: &mut W, state: &GameState) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let mut current: Option<Color> = None;
            for col in 0..self.cols {
                let cell = self.cells[row as usize * self.cols as usize + col as usize];
                if cell.is_empty() {
                    out.queue(Print(' '))?;
                    continue;
                }
                if current != Some(cell.color) {
                    out.queue(style::SetForegroundColor(to_term(cell.color)))?;
                    current = Some(cell.color);
                }
                out.queue(Print(cell.glyph))?;
            }
        }

        draw_hud(out, state, self.cols)?;
        match state.status {
            GameStatus::Paused => draw_paused(out, self.cols, self.rows)?,
            GameStatus::GameOver => draw_game_over(out, state, self.cols, self.rows)?,
            GameStatus::Playing => {}
        }
        draw_controls_hint(out, self.rows)?;

        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        out.flush()?;
        Ok(())
    }
}

fn bounds(poly: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *poly.first()?;
    Some(
        poly.iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
    )
}

/// Even-odd point-in-polygon test.
fn contains(poly: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl Surface for TerminalCanvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let t = self.state.transform;
        let corners = [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ]
        .map(|p| t.transform_point2(p));
        self.fill_polygon(&corners);
    }

    fn begin_path(&mut self) {
        self.paths.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.state.transform.transform_point2(Vec2::new(x, y));
        self.paths.push(vec![p]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.state.transform.transform_point2(Vec2::new(x, y));
        match self.paths.last_mut() {
            Some(path) => path.push(p),
            None => self.paths.push(vec![p]),
        }
    }

    fn close_path(&mut self) {
        // Filling closes implicitly; a following line_to starts afresh.
        if let Some(start) = self.paths.last().and_then(|p| p.first()).copied() {
            self.paths.push(vec![start]);
        }
    }

    fn fill(&mut self) {
        let paths = std::mem::take(&mut self.paths);
        for path in &paths {
            self.fill_polygon(path);
        }
        self.paths = paths;
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.state = saved;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Affine2::from_translation(Vec2::new(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(angle);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.state.shadow_blur = blur.max(0.0);
        self.state.shadow_color = color;
    }
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, cols: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if state.high_score > 0 {
        out.queue(Print(format!(
            "Score:{:>6}  Hi:{:>6}",
            state.score, state.high_score
        )))?;
    } else {
        out.queue(Print(format!("Score:{:>6}", state.score)))?;
    }

    let lives_str = format!("Lives:{}", "♥".repeat(state.lives as usize));
    let x = cols.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(x, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("←↑→↓ / WASD : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

fn print_centered<W: Write>(
    out: &mut W,
    cols: u16,
    row: u16,
    msg: &str,
    color: TermColor,
) -> std::io::Result<()> {
    let col = (cols / 2).saturating_sub(msg.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(msg))?;
    Ok(())
}

fn draw_paused<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    print_centered(out, cols, rows / 2, "‖ PAUSED ‖  P - Resume", C_PAUSED)
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let new_best = state.score >= state.high_score && state.score > 0;
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", state.high_score)
    } else {
        format!("Best Score:  {:>6}", state.high_score)
    };

    let lines: [(String, TermColor); 6] = [
        ("╔════════════════════╗".to_string(), TermColor::Red),
        ("║    GAME  OVER      ║".to_string(), TermColor::Red),
        ("╚════════════════════╝".to_string(), TermColor::Red),
        (format!("Final Score: {:>6}", state.score), TermColor::Yellow),
        (best_line, if new_best { TermColor::Yellow } else { TermColor::DarkGrey }),
        ("R - Play Again  Q - Quit".to_string(), TermColor::White),
    ];

    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        print_centered(out, cols, start_row + i as u16, msg, *color)?;
    }
    Ok(())
}
