use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::{Block, Borders, Widget};

/// Skyline profile, left to right, as a percentage of the drawing height.
/// Zero entries are gaps between towers.
const SKYLINE: [u16; 19] = [
    30, 30, 55, 55, 0, 85, 100, 100, 85, 0, 45, 70, 70, 45, 0, 60, 90, 60, 25,
];

const SOLID: &str = "█";
const SHADOW: &str = "░";

/// Tower skyline revealed from the bottom up as the countdown progresses.
pub struct TowerReveal {
    fraction: f64,
    urgent: bool,
    finished: bool,
}

impl TowerReveal {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction,
            urgent: false,
            finished: false,
        }
    }

    pub fn urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = finished;
        self
    }

    fn color(&self) -> Color {
        if self.finished {
            Color::Green
        } else if self.urgent {
            Color::Red
        } else {
            Color::Yellow
        }
    }
}

/// Number of rows, counted from the bottom, that are revealed at `fraction`
pub fn revealed_rows(fraction: f64, height: u16) -> u16 {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    (fraction * height as f64).round() as u16
}

/// Height in rows of the tower standing in column `col`
fn tower_height(col: u16, width: u16, height: u16) -> u16 {
    let index = (col as usize * SKYLINE.len()) / width.max(1) as usize;
    let percent = SKYLINE[index.min(SKYLINE.len() - 1)];
    ((percent as u32 * height as u32) / 100) as u16
}

impl Widget for TowerReveal {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().title(" Towers ").borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let shown = revealed_rows(self.fraction, inner.height);
        let color = self.color();

        for col in 0..inner.width {
            let height = tower_height(col, inner.width, inner.height);
            for row in 0..height {
                let position = (inner.x + col, inner.bottom() - 1 - row);
                if let Some(cell) = buf.cell_mut(position) {
                    if row < shown {
                        cell.set_symbol(SOLID).set_fg(color);
                    } else {
                        cell.set_symbol(SHADOW).set_fg(Color::DarkGray);
                    }
                }
            }
        }
    }
}
