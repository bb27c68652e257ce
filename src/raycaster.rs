//! Grid ray casting and wall-strip rendering.
//!
//! Every screen column casts one ray with a DDA walk over the grid. The hit
//! gives a fisheye-free perpendicular distance, which sets the projected
//! strip height, and the exact hit offset along the wall, which picks the
//! texture column.

use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::camera::Camera;
use crate::grid::Grid;
use crate::surface::RenderSurface;
use crate::texture::Texture;

/// Stand-in for 1/0 when a ray component is zero.
const FAR: f32 = 1e30;

/// Which family of grid lines a ray crossed when it hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    /// A vertical grid line (the ray stepped along X).
    #[default]
    X,
    /// A horizontal grid line (the ray stepped along Y).
    Y,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RayHit {
    pub map_x: i32,
    pub map_y: i32,
    pub side: Side,
    /// Distance along the camera's forward axis, not the raw ray length.
    pub perp_dist: f32,
    /// Tile code of the struck cell; 0 for a boundary hit.
    pub tile: u8,
    /// Set when the ray left the grid or ran out of steps.
    pub boundary: bool,
    pub steps: u32,
}

/// Walks the grid from `pos` along `ray_dir` until a wall is struck.
///
/// The walk is bounded by [`Grid::max_ray_steps`]; leaving the grid or
/// exhausting the step budget is reported as a boundary hit.
pub fn cast_ray(grid: &Grid, pos: [f32; 2], ray_dir: [f32; 2]) -> RayHit {
    let [px, py] = pos;
    let [rx, ry] = ray_dir;
    let mut map_x = px.floor() as i32;
    let mut map_y = py.floor() as i32;

    let delta_x = if rx == 0.0 { FAR } else { (1.0 / rx).abs() };
    let delta_y = if ry == 0.0 { FAR } else { (1.0 / ry).abs() };

    let (step_x, mut side_x) = if rx < 0.0 {
        (-1, (px - map_x as f32) * delta_x)
    } else {
        (1, (map_x as f32 + 1.0 - px) * delta_x)
    };
    let (step_y, mut side_y) = if ry < 0.0 {
        (-1, (py - map_y as f32) * delta_y)
    } else {
        (1, (map_y as f32 + 1.0 - py) * delta_y)
    };

    let max_steps = grid.max_ray_steps();
    let mut side = Side::X;
    let mut steps = 0;
    let mut tile = 0;
    let mut boundary = false;

    loop {
        if steps >= max_steps {
            boundary = true;
            break;
        }
        if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            side = Side::X;
        } else {
            side_y += delta_y;
            map_y += step_y;
            side = Side::Y;
        }
        steps += 1;

        match grid.get(map_x, map_y) {
            None => {
                boundary = true;
                break;
            }
            Some(t) if t > 0 => {
                tile = t;
                break;
            }
            Some(_) => {}
        }
    }

    let perp_dist = match side {
        Side::X => (map_x as f32 - px + (1 - step_x) as f32 / 2.0) / rx,
        Side::Y => (map_y as f32 - py + (1 - step_y) as f32 / 2.0) / ry,
    };

    RayHit {
        map_x,
        map_y,
        side,
        perp_dist,
        tile,
        boundary,
        steps,
    }
}

/// Texture column for a hit, mirrored so walls read the same from either side.
pub fn texture_column(hit: &RayHit, pos: [f32; 2], ray_dir: [f32; 2], tex_width: u32) -> u32 {
    if tex_width == 0 {
        return 0;
    }
    let mut wall_x = match hit.side {
        Side::X => pos[1] + hit.perp_dist * ray_dir[1],
        Side::Y => pos[0] + hit.perp_dist * ray_dir[0],
    };
    wall_x -= wall_x.floor();

    let raw = ((wall_x * tex_width as f32) as u32).min(tex_width - 1);
    let mirrored = match hit.side {
        Side::X => ray_dir[0] > 0.0,
        Side::Y => ray_dir[1] < 0.0,
    };
    if mirrored { tex_width - raw - 1 } else { raw }
}

/// Screen span and matching texture rows for one wall column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallStrip {
    pub line_height: i32,
    /// First drawn row.
    pub draw_start: usize,
    /// One past the last drawn row.
    pub draw_end: usize,
    pub tex_y0: f32,
    pub tex_y1: f32,
}

/// Projects a wall at `perp_dist` onto a screen `screen_h` rows tall.
pub fn project_strip(perp_dist: f32, screen_h: usize, min_dist: f32, tex_height: u32) -> WallStrip {
    let dist = perp_dist.max(min_dist);
    let h = screen_h as f32;
    let line_height = (h / dist) as i32;

    let top = h / 2.0 - line_height as f32 / 2.0;
    let draw_start = top.max(0.0) as usize;
    let draw_end = ((h / 2.0 + line_height as f32 / 2.0) as usize).min(screen_h);

    let texels_per_row = if line_height > 0 {
        tex_height as f32 / line_height as f32
    } else {
        0.0
    };

    WallStrip {
        line_height,
        draw_start,
        draw_end,
        tex_y0: (draw_start as f32 - top) * texels_per_row,
        tex_y1: (draw_end as f32 - top) * texels_per_row,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderSettings {
    pub ceiling_color: u32,
    pub floor_color: u32,
    /// Distances are clamped to this before projecting.
    pub min_distance: f32,
    /// Draw Y-side walls at half brightness.
    pub side_shading: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            ceiling_color: 0x0022_2222,
            floor_color: 0x0044_4444,
            min_distance: 0.1,
            side_shading: true,
        }
    }
}

/// Result of casting one screen column.
#[derive(Clone, Copy, Debug, Default)]
pub struct Column {
    pub hit: RayHit,
    pub tex_x: u32,
}

/// Per-frame renderer. Keeps one [`Column`] slot per screen column so the
/// frame loop does not allocate once the viewport size is stable.
pub struct Renderer {
    settings: RenderSettings,
    columns: Vec<Column>,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            columns: Vec::new(),
        }
    }

    /// Columns cast by the last [`render`](Self::render) call.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Casts every column in parallel; the grid is only read.
    pub fn cast_columns(&mut self, width: usize, grid: &Grid, camera: &Camera, tex_width: u32) {
        if self.columns.len() != width {
            self.columns.resize(width, Column::default());
        }
        let w = width as f32;
        self.columns.par_iter_mut().enumerate().for_each(|(x, col)| {
            let camera_x = 2.0 * x as f32 / w - 1.0;
            let ray_dir = camera.ray_dir(camera_x);
            let hit = cast_ray(grid, camera.pos, ray_dir);
            *col = Column {
                hit,
                tex_x: texture_column(&hit, camera.pos, ray_dir, tex_width),
            };
        });
    }

    pub fn render<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        grid: &Grid,
        camera: &Camera,
        texture: &dyn Texture,
    ) {
        let (width, height) = (surface.width(), surface.height());
        if width == 0 || height == 0 {
            return;
        }

        // Ceiling and floor
        let mid = height / 2;
        surface.fill_rect(0, 0, width, mid, self.settings.ceiling_color);
        surface.fill_rect(0, mid, width, height - mid, self.settings.floor_color);

        self.cast_columns(width, grid, camera, texture.width());
        if texture.width() == 0 || texture.height() == 0 {
            return;
        }

        for (x, col) in self.columns.iter().enumerate() {
            let strip = project_strip(
                col.hit.perp_dist,
                height,
                self.settings.min_distance,
                texture.height(),
            );
            let darkened = self.settings.side_shading && col.hit.side == Side::Y;
            surface.draw_texture_column(
                texture,
                col.tex_x,
                strip.tex_y0,
                strip.tex_y1,
                x,
                strip.draw_start,
                strip.draw_end,
                darkened,
            );
        }
    }
}
