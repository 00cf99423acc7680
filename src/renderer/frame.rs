//! Text frame composition
//!
//! Turns a road snapshot into lines of tinted spans. The platform layer maps
//! tints to terminal colors; `Display` gives the plain text.

use std::fmt;

use crate::sim::{AssetKind, Road, SpriteState};

/// Color role of a run of characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tint {
    #[default]
    Plain,
    Obstacle,
    PowerUp,
    /// Shielded car on its lit ticks
    Shield,
    Divider,
}

/// A run of same-tinted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tint: Tint,
}

/// One terminal row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::tinted(text, Tint::Plain)
    }

    pub fn tinted(text: impl Into<String>, tint: Tint) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            spans: vec![Span { text, tint }],
        }
    }

    /// Build from cells, merging neighbours with the same tint and trimming trailing blanks
    fn from_cells(cells: &[Cell]) -> Self {
        let end = cells
            .iter()
            .rposition(|c| c.ch != ' ')
            .map_or(0, |i| i + 1);

        let mut spans: Vec<Span> = Vec::new();
        for cell in &cells[..end] {
            match spans.last_mut() {
                Some(span) if span.tint == cell.tint => span.text.push(cell.ch),
                _ => spans.push(Span {
                    text: cell.ch.to_string(),
                    tint: cell.tint,
                }),
            }
        }
        Self { spans }
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A full screen of output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Line>,
}

impl Frame {
    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(&line.text())?;
        }
        Ok(())
    }
}

/// Heads-up display values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    tint: Tint,
}

const BLANK: Cell = Cell {
    ch: ' ',
    tint: Tint::Plain,
};

pub const TITLE: &str = "LANE RUNNER";
pub const CONTROLS: &str = "MOVE WITH ARROW-KEYS : [↑] & [↓]    QUIT : [ESC]";

/// Compose the full frame for the current road state
pub fn compose(road: &Road, hud: &Hud) -> Frame {
    let track = road.track();
    let mut frame = Frame::default();

    frame.push(Line::plain(TITLE));
    frame.blank();
    frame.push(Line::plain(format!(
        "SCORE: {}    LEVEL: {}",
        hud.score, hud.level
    )));
    frame.blank();

    let barrier = track.barrier();
    frame.push(Line::plain(barrier.clone()));
    for lane in 0..track.width() {
        for line in compose_lane(road, lane) {
            frame.push(line);
        }
        if lane + 1 < track.width() {
            // Halves of a logical lane are separated by the divider
            if lane % 2 == 1 {
                frame.push(Line::tinted(track.divider(), Tint::Divider));
            } else {
                frame.blank();
            }
        }
    }
    frame.push(Line::plain(barrier));

    frame.blank();
    frame.push(Line::plain(CONTROLS));
    frame
}

/// Rows for one lane, bottom-aligned to the tallest sprite in it
///
/// The player's lane is prefixed by the car; asset columns are measured from
/// the end of that prefix, which is why lane changes shift approach distances.
fn compose_lane(road: &Road, lane: usize) -> Vec<Line> {
    let track = road.track();
    let player = road.player();
    let catalog = road.catalog();
    let length = track.length();

    let has_player = player.lane() == lane;
    let car = has_player.then(|| catalog.car());
    let prefix = if has_player { player.footprint() } else { 0 };

    let height = road
        .assets_in_lane(lane)
        .map(|a| catalog.sprite(a.kind).height)
        .chain(car.map(|s| s.height))
        .max()
        .unwrap_or(1)
        .max(1);
    let mut grid = vec![vec![BLANK; prefix + length]; height];

    for asset in road.assets_in_lane(lane) {
        let sprite = catalog.sprite(asset.kind);
        let tint = match asset.kind {
            AssetKind::Obstacle(_) => Tint::Obstacle,
            AssetKind::PowerUp(_) => Tint::PowerUp,
        };
        let column = prefix as isize + length as isize - asset.distance as isize;
        let top = height - sprite.height;
        for (row, text) in sprite.lines().enumerate() {
            draw(&mut grid[top + row], column, text, tint, prefix);
        }
    }

    if let Some(car) = car {
        let tint = match player.sprite() {
            SpriteState::Shielded { lit: true } => Tint::Shield,
            _ => Tint::Plain,
        };
        let top = height - car.height;
        for (row, text) in car.lines().enumerate() {
            draw(&mut grid[top + row], 0, text, tint, 0);
        }
        if player.sprite() == SpriteState::Armed {
            let column = (prefix + player.weapon_offset()) as isize;
            let bullet = catalog.bullet().to_string();
            draw(&mut grid[height - 1], column, &bullet, Tint::Plain, prefix);
        }
    }

    grid.iter().map(|row| Line::from_cells(row)).collect()
}

/// Write `text` into `row` starting at `column`, clipped to `[min_column, row.len())`
fn draw(row: &mut [Cell], column: isize, text: &str, tint: Tint, min_column: usize) {
    for (i, ch) in text.chars().enumerate() {
        let x = column + i as isize;
        if x < min_column as isize || x >= row.len() as isize {
            continue;
        }
        row[x as usize] = Cell { ch, tint };
    }
}
