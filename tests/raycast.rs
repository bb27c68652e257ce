//! Ray casting properties over arbitrary grids and directions.

use std::f32::consts::{FRAC_PI_2, PI};

use dungeon_raycaster::camera::Camera;
use dungeon_raycaster::grid::Grid;
use dungeon_raycaster::raycaster::{Renderer, RenderSettings, Side, cast_ray, texture_column};
use dungeon_raycaster::surface::FrameBuffer;
use dungeon_raycaster::texture::PixelTexture;
use proptest::prelude::*;

fn grid_strategy() -> impl Strategy<Value = Grid> {
    (1usize..24, 1usize..24).prop_flat_map(|(w, h)| {
        prop::collection::vec(prop_oneof![3 => Just(0u8), 1 => 1u8..4], w * h).prop_map(
            move |cells| {
                let rows: Vec<&[u8]> = cells.chunks(w).collect();
                Grid::from_rows(&rows)
            },
        )
    })
}

fn angle_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![
        Just(0.0),
        Just(FRAC_PI_2),
        Just(PI),
        Just(-FRAC_PI_2),
        -PI..PI,
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn dda_terminates_on_a_wall_or_the_boundary(
        grid in grid_strategy(),
        fx in 0.0f32..1.0,
        fy in 0.0f32..1.0,
        angle in angle_strategy(),
    ) {
        let pos = [fx * grid.width() as f32, fy * grid.height() as f32];
        let ray = [angle.cos(), angle.sin()];
        let hit = cast_ray(&grid, pos, ray);

        prop_assert!(hit.steps <= grid.max_ray_steps());
        if hit.boundary {
            prop_assert_eq!(hit.tile, 0);
        } else {
            prop_assert!(hit.tile > 0);
            prop_assert_eq!(grid.get(hit.map_x, hit.map_y), Some(hit.tile));
        }
    }

    #[test]
    fn texture_columns_stay_in_range(
        grid in grid_strategy(),
        fx in 0.0f32..1.0,
        fy in 0.0f32..1.0,
        angle in -PI..PI,
        tex_w in 1u32..256,
    ) {
        let pos = [fx * grid.width() as f32, fy * grid.height() as f32];
        let ray = [angle.cos(), angle.sin()];
        let hit = cast_ray(&grid, pos, ray);
        prop_assert!(texture_column(&hit, pos, ray, tex_w) < tex_w);
    }
}

#[test]
fn mirroring_depends_on_hit_side_and_ray_sign() {
    let grid = Grid::from_rows(&[
        &[1, 1, 1, 1],
        &[1, 0, 0, 1],
        &[1, 0, 0, 1],
        &[1, 1, 1, 1],
    ]);
    let tex_w = 32;

    // Eastward ray on an X-side hit: mirrored.
    let (pos, ray) = ([1.5, 1.125], [1.0, 0.0]);
    let hit = cast_ray(&grid, pos, ray);
    assert_eq!(hit.side, Side::X);
    assert_eq!(texture_column(&hit, pos, ray, tex_w), tex_w - 4 - 1);

    // Northward ray on a Y-side hit: mirrored.
    let (pos, ray) = ([1.125, 2.5], [0.0, -1.0]);
    let hit = cast_ray(&grid, pos, ray);
    assert_eq!(hit.side, Side::Y);
    assert_eq!(texture_column(&hit, pos, ray, tex_w), tex_w - 4 - 1);

    // The opposite directions read the raw column.
    let (pos, ray) = ([2.5, 1.125], [-1.0, 0.0]);
    assert_eq!(texture_column(&cast_ray(&grid, pos, ray), pos, ray, tex_w), 4);
    let (pos, ray) = ([1.125, 1.5], [0.0, 1.0]);
    assert_eq!(texture_column(&cast_ray(&grid, pos, ray), pos, ray, tex_w), 4);
}

#[test]
fn renders_a_frame_from_inside_an_open_grid() {
    // No walls at all: every column ends at the grid boundary and still draws.
    let grid = Grid::filled(8, 8, 0);
    let camera = Camera::new([4.5, 4.5], 0.66);
    let tex = PixelTexture::bricks(16);
    let mut renderer = Renderer::new(RenderSettings::default());
    let mut fb = FrameBuffer::new(64, 48);

    renderer.render(&mut fb, &grid, &camera, &tex);

    assert_eq!(renderer.columns().len(), 64);
    assert!(renderer.columns().iter().all(|c| c.hit.boundary));
}
