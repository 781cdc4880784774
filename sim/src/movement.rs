//! Straight-line stepping shared by trade ships, plus the compass used for
//! hand sailing.

use serde::{Deserialize, Serialize};
use shared::Coord;

/// One day's move from `from` towards `to` at `speed` cells per day.
///
/// Within reach the ship snaps onto the target. Otherwise each axis moves by
/// the truncated share of `speed` along the bearing; if both shares truncate
/// to zero the ship takes one cell along the longer axis so it never stalls.
pub fn step_toward(from: Coord, to: Coord, speed: u32) -> Coord {
    let dx = (to.x - from.x) as f64;
    let dy = (to.y - from.y) as f64;
    let distance = (dx * dx + dy * dy).sqrt();
    let speed = speed as f64;

    if distance <= speed {
        return to;
    }

    let mut step_x = (dx / distance * speed).trunc() as i32;
    let mut step_y = (dy / distance * speed).trunc() as i32;
    if step_x == 0 && step_y == 0 {
        if dx.abs() >= dy.abs() {
            step_x = dx.signum() as i32;
        } else {
            step_y = dy.signum() as i32;
        }
    }

    from.offset(step_x, step_y)
}

/// Whole days a voyage is expected to take, never less than one
pub fn travel_days(distance: f64, speed: u32) -> u32 {
    if speed == 0 {
        return u32::MAX;
    }
    ((distance / speed as f64).floor() as u32).max(1)
}

/// Eight sailing directions, laid out like a numeric keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// (row, column) delta; north is up the printed map
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
            Direction::SouthWest => (1, -1),
            Direction::South => (1, 0),
            Direction::SouthEast => (1, 1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::NorthWest => "northwest",
            Direction::North => "north",
            Direction::NorthEast => "northeast",
            Direction::West => "west",
            Direction::East => "east",
            Direction::SouthWest => "southwest",
            Direction::South => "south",
            Direction::SouthEast => "southeast",
        }
    }
}
