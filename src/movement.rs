use crate::camera::Camera;
use crate::grid::Grid;
use crate::input::{Action, InputState};

/// Per-frame movement and turning rates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveSpeeds {
    /// Grid units per frame.
    pub move_speed: f32,
    /// Radians per frame.
    pub rot_speed: f32,
}

impl Default for MoveSpeeds {
    fn default() -> Self {
        Self {
            move_speed: 0.05,
            rot_speed: 0.03,
        }
    }
}

/// Returns the camera after one frame of input.
pub fn update(camera: &Camera, input: InputState, speeds: MoveSpeeds, grid: &Grid) -> Camera {
    let mut next = *camera;

    if input.is_held(Action::Forward) {
        step(&mut next, speeds.move_speed, grid);
    }
    if input.is_held(Action::Backward) {
        step(&mut next, -speeds.move_speed, grid);
    }
    if input.is_held(Action::RotateLeft) {
        next.rotate(speeds.rot_speed);
    }
    if input.is_held(Action::RotateRight) {
        next.rotate(-speeds.rot_speed);
    }

    next
}

/// Moves `distance` along the view direction, resolving each axis on its own
/// so a blocked axis still lets the other one slide along the wall.
fn step(camera: &mut Camera, distance: f32, grid: &Grid) {
    let [x, y] = camera.pos;
    let nx = x + camera.dir[0] * distance;
    if !grid.is_solid_at(nx, y) {
        camera.pos[0] = nx;
    }

    let x = camera.pos[0];
    let ny = y + camera.dir[1] * distance;
    if !grid.is_solid_at(x, ny) {
        camera.pos[1] = ny;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        Grid::from_rows(&[
            &[1, 1, 1, 1, 1],
            &[1, 0, 0, 0, 1],
            &[1, 1, 1, 1, 1],
        ])
    }

    #[test]
    fn forward_moves_along_dir() {
        let grid = corridor();
        let cam = Camera::new([3.5, 1.5], 0.66);
        let input = InputState::default().with(Action::Forward);
        let next = update(&cam, input, MoveSpeeds::default(), &grid);
        assert!((next.pos[0] - 3.45).abs() < 1e-6);
        assert_eq!(next.pos[1], 1.5);
    }

    #[test]
    fn backward_moves_against_dir() {
        let grid = corridor();
        let cam = Camera::new([2.5, 1.5], 0.66);
        let input = InputState::default().with(Action::Backward);
        let next = update(&cam, input, MoveSpeeds::default(), &grid);
        assert!((next.pos[0] - 2.55).abs() < 1e-6);
    }

    #[test]
    fn blocked_axis_slides_along_wall() {
        let grid = corridor();
        let mut cam = Camera::new([2.5, 1.9], 0.66);
        // Heading diagonally into the south wall.
        cam.dir = [std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2];
        let speeds = MoveSpeeds {
            move_speed: 0.2,
            rot_speed: 0.0,
        };
        let next = update(&cam, InputState::default().with(Action::Forward), speeds, &grid);
        assert!(next.pos[0] > 2.5, "x should still advance");
        assert_eq!(next.pos[1], 1.9, "y is blocked by the wall");
    }

    #[test]
    fn walls_stop_motion() {
        let grid = corridor();
        let cam = Camera::new([1.02, 1.5], 0.66);
        let input = InputState::default().with(Action::Forward);
        let next = update(&cam, input, MoveSpeeds::default(), &grid);
        assert_eq!(next.pos, cam.pos);
    }

    #[test]
    fn left_and_right_rotate_opposite_ways() {
        let grid = corridor();
        let cam = Camera::new([2.5, 1.5], 0.66);
        let speeds = MoveSpeeds::default();
        let left = update(&cam, InputState::default().with(Action::RotateLeft), speeds, &grid);
        let right = update(&cam, InputState::default().with(Action::RotateRight), speeds, &grid);
        assert!(left.dir[1] < 0.0);
        assert!(right.dir[1] > 0.0);
        let both = InputState::default()
            .with(Action::RotateLeft)
            .with(Action::RotateRight);
        let still = update(&cam, both, speeds, &grid);
        assert!((still.dir[0] - cam.dir[0]).abs() < 1e-6);
        assert!((still.dir[1] - cam.dir[1]).abs() < 1e-6);
    }

    #[test]
    fn no_input_is_identity() {
        let grid = corridor();
        let cam = Camera::new([2.5, 1.5], 0.66);
        let next = update(&cam, InputState::default(), MoveSpeeds::default(), &grid);
        assert_eq!(next, cam);
    }
}
