//! GameView: draws published board and preview snapshots into a framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{BoardSnapshot, Matrix};
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{Cell, CellState, ColorTag, Phase};

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Everything one frame shows.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub board: &'a BoardSnapshot,
    pub preview: Option<&'a Matrix>,
    pub phase: Phase,
    pub ticks: u64,
    /// Occupied coordinates of the active piece, shown when debugging
    pub debug_coords: Option<&'a [(i16, i16)]>,
}

impl<'a> Frame<'a> {
    pub fn new(board: &'a BoardSnapshot) -> Self {
        Self {
            board,
            preview: None,
            phase: Phase::NotStarted,
            ticks: 0,
            debug_coords: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render a frame into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, frame: &Frame<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Style::default().glyph(' '));

        let board = frame.board;
        let board_px_w = board.width() as u16 * self.cell_w;
        let board_px_h = board.height() as u16 * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            board_px_w,
            board_px_h,
            ' ',
            Style::new(Rgb::new(80, 80, 90), PLAY_BG),
        );
        draw_border(
            fb,
            start_x,
            start_y,
            frame_w,
            frame_h,
            Style::new(Rgb::new(200, 200, 200), PANEL_BG),
        );

        for (y, row) in board.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let (ch, style) = cell_glyph(cell);
                let px = start_x + 1 + x as u16 * self.cell_w;
                let py = start_y + 1 + y as u16 * self.cell_h;
                fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
            }
        }

        self.draw_side_panel(fb, frame, viewport, start_x + frame_w + 2, start_y);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, frame: &Frame<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(frame, viewport, &mut fb);
        fb
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        frame: &Frame<'_>,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }
        let label = Style::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = Style::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = start_y;
        fb.put_str(panel_x, y, "NEXT", label);
        y += 1;
        if let Some(preview) = frame.preview {
            for ly in 0..preview.size() {
                for lx in 0..preview.size() {
                    let Some(cell) = preview.cell(lx, ly) else {
                        continue;
                    };
                    if cell.is_solid() {
                        let px = panel_x + lx as u16 * self.cell_w;
                        let style = Style::new(color_rgb(cell.color), PANEL_BG).bold();
                        fb.fill_rect(px, y, self.cell_w, 1, '█', style);
                    }
                }
                y += 1;
            }
        } else {
            fb.put_str(panel_x, y, "-", value);
            y += 1;
        }
        y += 1;

        fb.put_str(panel_x, y, "STATE", label);
        fb.put_str(panel_x, y + 1, phase_label(frame.phase), value);
        y += 3;

        fb.put_str(panel_x, y, "TICKS", label);
        fb.put_num(panel_x, y + 1, frame.ticks, value);
        y += 3;

        if let Some(coords) = frame.debug_coords {
            fb.put_str(panel_x, y, "ACTIVE", label);
            y += 1;
            for &(cx, cy) in coords {
                if y >= viewport.height {
                    break;
                }
                let mut x = fb.put_str(panel_x, y, "(", value);
                x = put_signed(fb, x, y, cx, value);
                x = fb.put_str(x, y, ",", value);
                x = put_signed(fb, x, y, cy, value);
                fb.put_str(x, y, ")", value);
                y += 1;
            }
        }
    }
}

fn put_signed(fb: &mut FrameBuffer, x: u16, y: u16, n: i16, style: Style) -> u16 {
    let x = if n < 0 { fb.put_str(x, y, "-", style) } else { x };
    fb.put_num(x, y, n.unsigned_abs() as u64, style)
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: Style) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn cell_glyph(cell: &Cell) -> (char, Style) {
    let empty = Style::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
    match cell.state {
        CellState::Empty => ('·', empty),
        CellState::Locked => ('█', Style::new(color_rgb(cell.color), PLAY_BG)),
        CellState::Player => ('█', Style::new(color_rgb(cell.color), PLAY_BG).bold()),
        // Window cells are only visible when tagged for debugging.
        CellState::Ghost if cell.color == ColorTag::Window => {
            ('░', Style::new(color_rgb(ColorTag::Window), PLAY_BG).dim())
        }
        CellState::Ghost => ('·', empty),
    }
}

/// Terminal color for a cell's color tag
pub fn color_rgb(tag: ColorTag) -> Rgb {
    match tag {
        ColorTag::Black => Rgb::new(30, 30, 40),
        ColorTag::Cyan => Rgb::new(80, 220, 220),
        ColorTag::Blue => Rgb::new(80, 120, 220),
        ColorTag::Orange => Rgb::new(255, 165, 0),
        ColorTag::Yellow => Rgb::new(240, 220, 80),
        ColorTag::Green => Rgb::new(100, 220, 120),
        ColorTag::Purple => Rgb::new(200, 120, 220),
        ColorTag::Red => Rgb::new(220, 80, 80),
        ColorTag::Window => Rgb::new(140, 140, 140),
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::NotStarted => "stopped",
        Phase::WaitingForPiece => "landing",
        Phase::Dropping => "dropping",
    }
}
