//! Procedural dungeon generation.
//!
//! Levels start as solid rock. A centred starting room is always carved
//! first, then a fixed number of random room placements are attempted.
//! Each attempt is rejection-sampled: a candidate that touches existing floor
//! (including a one-tile margin) is dropped and does not count as a room.
//! Every accepted room is joined to the previously accepted one by an
//! L-shaped hallway, so the floor is one connected region by construction.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::grid::{FLOOR, Grid, WALL};

/// Inclusive `[min, max]` size range for room sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct SizeRange {
    pub min: usize,
    pub max: usize,
}

impl SizeRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    fn as_range(self) -> RangeInclusive<usize> {
        self.min..=self.max
    }
}

/// Parameters controlling level generation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenParams {
    pub grid_width: usize,
    pub grid_height: usize,
    pub max_room_attempts: usize,
    pub start_room_width: SizeRange,
    pub start_room_height: SizeRange,
    pub room_width: SizeRange,
    pub room_height: SizeRange,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            grid_width: 50,
            grid_height: 50,
            max_room_attempts: 100,
            start_room_width: SizeRange::new(4, 8),
            start_room_height: SizeRange::new(4, 8),
            room_width: SizeRange::new(2, 6),
            room_height: SizeRange::new(4, 8),
        }
    }
}

impl GenParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::InvalidGeneration(format!(
                "grid must be non-empty, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        let ranges = [
            ("start_room_width", self.start_room_width),
            ("start_room_height", self.start_room_height),
            ("room_width", self.room_width),
            ("room_height", self.room_height),
        ];
        for (name, range) in ranges {
            if range.min == 0 || range.min > range.max {
                return Err(ConfigError::InvalidGeneration(format!(
                    "{name} must satisfy 1 <= min <= max, got [{}, {}]",
                    range.min, range.max
                )));
            }
        }
        if self.start_room_width.max + 2 > self.grid_width
            || self.start_room_height.max + 2 > self.grid_height
        {
            return Err(ConfigError::InvalidGeneration(format!(
                "a {}x{} grid cannot hold a {}x{} start room with a wall border",
                self.grid_width,
                self.grid_height,
                self.start_room_width.max,
                self.start_room_height.max
            )));
        }
        Ok(())
    }
}

/// Rectangle of floor carved during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Room {
    /// Continuous grid-space centre of the room.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    /// The room grown by `margin` tiles on every side.
    pub fn expanded(&self, margin: i32) -> Room {
        Room {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + 2 * margin,
            h: self.h + 2 * margin,
        }
    }

    pub fn intersects(&self, other: &Room) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> (i32, i32) {
        (
            rng.gen_range(self.x..self.x + self.w),
            rng.gen_range(self.y..self.y + self.h),
        )
    }
}

/// A generated level: the finished grid plus the rooms it was built from.
#[derive(Clone, Debug)]
pub struct Level {
    pub grid: Grid,
    /// Accepted rooms in placement order; `rooms[0]` is the starting room.
    pub rooms: Vec<Room>,
}

impl Level {
    pub fn start_room(&self) -> &Room {
        &self.rooms[0]
    }

    /// Player spawn point: the centre of the starting room.
    pub fn spawn_point(&self) -> (f32, f32) {
        let (x, y) = self.start_room().center();
        debug_assert!(!self.grid.is_solid_at(x, y), "spawn point inside a wall");
        (x, y)
    }

    pub fn is_connected(&self) -> bool {
        let (x, y) = self.spawn_point();
        self.grid.reachable_floor(x as i32, y as i32) == self.grid.floor_count()
    }
}

/// Carves every in-bounds cell of the rectangle to floor.
pub fn place_room(grid: &mut Grid, room: &Room) {
    for y in room.y..room.y + room.h {
        for x in room.x..room.x + room.w {
            grid.set(x, y, FLOOR);
        }
    }
}

/// True if any cell of the room, or the one-tile margin around it, is already floor.
pub fn room_overlaps(grid: &Grid, room: &Room) -> bool {
    let margin = room.expanded(1);
    for y in margin.y..margin.y + margin.h {
        for x in margin.x..margin.x + margin.w {
            if grid.get(x, y) == Some(FLOOR) {
                return true;
            }
        }
    }
    false
}

/// Carves an L-shaped hallway: along x until `x2` is reached, then along y.
pub fn carve_hallway(grid: &mut Grid, (x1, y1): (i32, i32), (x2, y2): (i32, i32)) {
    let (mut cx, mut cy) = (x1, y1);
    while cx != x2 || cy != y2 {
        if cx != x2 {
            cx += (x2 - cx).signum();
        } else {
            cy += (y2 - cy).signum();
        }
        grid.set(cx, cy, FLOOR);
    }
}

/// Generates a level. Parameters are validated first.
pub fn generate<R: Rng + ?Sized>(params: &GenParams, rng: &mut R) -> Result<Level, ConfigError> {
    params.validate()?;

    let gw = params.grid_width as i32;
    let gh = params.grid_height as i32;
    let mut grid = Grid::filled(params.grid_width, params.grid_height, WALL);
    let mut rooms = Vec::new();

    let sw = rng.gen_range(params.start_room_width.as_range()) as i32;
    let sh = rng.gen_range(params.start_room_height.as_range()) as i32;
    let start = Room {
        x: (gw - sw) / 2,
        y: (gh - sh) / 2,
        w: sw,
        h: sh,
    };
    place_room(&mut grid, &start);
    rooms.push(start);

    for attempt in 0..params.max_room_attempts {
        let w = rng.gen_range(params.room_width.as_range()) as i32;
        let h = rng.gen_range(params.room_height.as_range()) as i32;
        // Origins keep a one-tile wall border; a room too big for that is a rejected attempt.
        if gw - w - 1 < 1 || gh - h - 1 < 1 {
            continue;
        }
        let candidate = Room {
            x: rng.gen_range(1..=gw - w - 1),
            y: rng.gen_range(1..=gh - h - 1),
            w,
            h,
        };
        if room_overlaps(&grid, &candidate) {
            continue;
        }

        place_room(&mut grid, &candidate);
        let prev = rooms[rooms.len() - 1];
        let from = prev.random_cell(rng);
        let to = candidate.random_cell(rng);
        carve_hallway(&mut grid, from, to);

        tracing::debug!(
            attempt,
            x = candidate.x,
            y = candidate.y,
            w,
            h,
            "room accepted"
        );
        rooms.push(candidate);
    }

    let level = Level { grid, rooms };
    tracing::info!(
        rooms = level.rooms.len(),
        attempts = params.max_room_attempts,
        floor_cells = level.grid.floor_count(),
        "level generated"
    );
    Ok(level)
}
