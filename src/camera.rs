/// Player position and view basis in grid space.
///
/// `dir` is the unit view direction. `plane` is the camera plane, kept
/// perpendicular to `dir`; its length sets the field of view
/// (`2 * atan(|plane| / |dir|)`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: [f32; 2],
    pub dir: [f32; 2],
    pub plane: [f32; 2],
}

impl Camera {
    /// Camera at `pos` looking down -X with a camera plane of length `plane_len` along +Y.
    pub fn new(pos: [f32; 2], plane_len: f32) -> Self {
        Self {
            pos,
            dir: [-1.0, 0.0],
            plane: [0.0, plane_len],
        }
    }

    /// Rotates the view basis by `angle` radians.
    ///
    /// Both vectors go through the same rotation matrix built from their
    /// pre-rotation components, which keeps them perpendicular.
    pub fn rotate(&mut self, angle: f32) {
        let (s, c) = angle.sin_cos();
        let [dx, dy] = self.dir;
        self.dir = [dx * c - dy * s, dx * s + dy * c];
        let [px, py] = self.plane;
        self.plane = [px * c - py * s, px * s + py * c];
    }

    /// Ray direction for a screen column; `camera_x` spans -1 (left) to 1 (right).
    #[inline]
    pub fn ray_dir(&self, camera_x: f32) -> [f32; 2] {
        [
            self.dir[0] + self.plane[0] * camera_x,
            self.dir[1] + self.plane[1] * camera_x,
        ]
    }

    /// Horizontal field of view in radians.
    pub fn fov(&self) -> f32 {
        2.0 * (norm(self.plane) / norm(self.dir)).atan()
    }
}

#[inline]
pub fn norm(v: [f32; 2]) -> f32 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}

#[inline]
pub fn dot(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[0] * b[0] + a[1] * b[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_rotates_both_vectors() {
        let mut cam = Camera::new([5.5, 5.5], 0.66);
        cam.rotate(std::f32::consts::FRAC_PI_2);
        assert!((cam.dir[0] - 0.0).abs() < 1e-6);
        assert!((cam.dir[1] + 1.0).abs() < 1e-6);
        assert!((cam.plane[0] + 0.66).abs() < 1e-6);
        assert!(cam.plane[1].abs() < 1e-6);
        assert_eq!(cam.pos, [5.5, 5.5]);
    }

    #[test]
    fn default_fov_is_about_66_degrees() {
        let cam = Camera::new([0.0, 0.0], 0.66);
        let deg = cam.fov().to_degrees();
        assert!((deg - 66.8).abs() < 0.5, "fov {deg}");
    }

    #[test]
    fn ray_dir_spans_the_plane() {
        let cam = Camera::new([0.0, 0.0], 0.66);
        assert_eq!(cam.ray_dir(0.0), [-1.0, 0.0]);
        assert_eq!(cam.ray_dir(1.0), [-1.0, 0.66]);
        assert_eq!(cam.ray_dir(-1.0), [-1.0, -0.66]);
    }
}
