use std::collections::VecDeque;

/// Tile code for open floor.
pub const FLOOR: u8 = 0;
/// Tile code for the default wall variant. Any code above zero is solid.
pub const WALL: u8 = 1;

/// Row-major 2D tile map.
///
/// Every accessor is bounds-checked; anything outside the map reads as solid
/// so rays and movement can never leave it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Creates a `width` x `height` grid with every cell set to `fill`.
    pub fn filled(width: usize, height: usize, fill: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Builds a grid from rows of tile codes. Rows must all have the same length.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            assert_eq!(row.len(), width, "ragged grid rows");
            cells.extend_from_slice(row);
        }
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Tile code at `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Sets the tile at `(x, y)`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, tile: u8) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = tile;
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// True for wall tiles and for anything outside the grid.
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_none_or(|t| t > FLOOR)
    }

    #[inline]
    pub fn is_floor(&self, x: i32, y: i32) -> bool {
        !self.is_solid(x, y)
    }

    /// Solid test for a continuous grid-space position (floored to its cell).
    #[inline]
    pub fn is_solid_at(&self, x: f32, y: f32) -> bool {
        self.is_solid(x.floor() as i32, y.floor() as i32)
    }

    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|&&t| t == FLOOR).count()
    }

    /// Number of floor cells reachable from `(x, y)` under 4-neighbour adjacency.
    /// Returns 0 when the start itself is not floor.
    pub fn reachable_floor(&self, x: i32, y: i32) -> usize {
        if !self.is_floor(x, y) {
            return 0;
        }
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        let mut count = 0;

        if let Some(i) = self.index(x, y) {
            seen[i] = true;
            queue.push_back((x, y));
        }
        while let Some((cx, cy)) = queue.pop_front() {
            count += 1;
            for (nx, ny) in [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)] {
                if let Some(i) = self.index(nx, ny) {
                    if !seen[i] && self.cells[i] == FLOOR {
                        seen[i] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
        count
    }

    /// Worst-case number of grid lines a ray can cross before leaving the map.
    #[inline]
    pub fn max_ray_steps(&self) -> u32 {
        (self.width + self.height + 2) as u32
    }
}
