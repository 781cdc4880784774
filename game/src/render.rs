use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;
use sim::{Cell, MapView, SeaMonster};
use std::fmt::Write;

/// Map colours. Passed to the renderer instead of living in a global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub enabled: bool,
    pub water: Color,
    pub inhabited: Color,
    pub uninhabited: Color,
    pub ship: Color,
    pub player: Color,
    pub hazard: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            enabled: true,
            water: Color::Blue,
            inhabited: Color::Green,
            uninhabited: Color::Yellow,
            ship: Color::Red,
            player: Color::White,
            hazard: Color::DarkGrey,
        }
    }
}

impl Palette {
    /// Colours only when stdout is a terminal
    pub fn detect() -> Self {
        Self {
            enabled: std::io::stdout().is_tty(),
            ..Self::default()
        }
    }

    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    fn paint(&self, glyph: impl Into<String>, color: Color) -> String {
        let glyph = glyph.into();
        if self.enabled {
            glyph.with(color).to_string()
        } else {
            glyph
        }
    }
}

/// Fixed-width grid with row and column numbers, followed by the legend
pub fn render_map(view: &MapView, palette: &Palette) -> String {
    let mut out = String::from("\n=== World Map ===\n   ");
    for y in 0..view.size {
        let _ = write!(out, "{:>2} ", y);
    }
    out.push('\n');

    let viewer = view.viewer();
    for x in 0..view.size {
        let _ = write!(out, "{:>2} ", x);
        for y in 0..view.size {
            let here = shared::Coord::new(x as i32, y as i32);
            let glyph = if viewer == Some(here) {
                palette.paint("@", palette.player)
            } else if view.hazard == Some(here) {
                palette.paint(SeaMonster::GLYPH, palette.hazard)
            } else if let Some(ship) = view.ships.iter().find(|s| s.position == here) {
                palette.paint(ship.glyph, palette.ship)
            } else {
                match view.cells[x][y] {
                    Cell::Water => palette.paint("~", palette.water),
                    Cell::Inhabited => palette.paint("I", palette.inhabited),
                    Cell::Uninhabited => palette.paint("o", palette.uninhabited),
                }
            };
            let _ = write!(out, "{}  ", glyph);
        }
        out.push('\n');
    }

    out.push_str("\nLegend:\n");
    let legend = [
        (palette.paint("@", palette.player), "You"),
        (palette.paint("I", palette.inhabited), "Inhabited Island"),
        (palette.paint("o", palette.uninhabited), "Uninhabited Island"),
        (palette.paint("~", palette.water), "Water"),
        (palette.paint("S/B/G", palette.ship), "Sloop/Brigantine/Galleon"),
        (palette.paint(SeaMonster::GLYPH, palette.hazard), "Sea Monster"),
    ];
    for (glyph, meaning) in legend {
        let _ = writeln!(out, "{} = {}", glyph, meaning);
    }
    out
}
