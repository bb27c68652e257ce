use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed mapping from dest pixels to their nearest source pixel
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_row: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_row: Vec::new(),
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.src_x.len(), self.src_row.len())
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    let sx = src_w as f32 / dst_w as f32;
    let sy = src_h as f32 / dst_h as f32;

    let src_x = (0..dst_w)
        .map(|x| ((x as f32 * sx) as usize).min(src_w.saturating_sub(1)))
        .collect();
    // Store row offsets so the blit does no multiplies per row
    let src_row = (0..dst_h)
        .map(|y| ((y as f32 * sy) as usize).min(src_h.saturating_sub(1)) * src_w)
        .collect();

    ScaleLut { src_x, src_row }
}

/// Parallel nearest-neighbour stretch
/// Rows are processed in parallel for cache friendly writes
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[u32], lut: &ScaleLut) {
    if src.is_empty() || dw == 0 {
        return;
    }
    dst.par_chunks_mut(dw)
        .zip(lut.src_row.par_iter())
        .for_each(|(dst_row, &row)| {
            for (d, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
                *d = src[row + sx];
            }
        });
}

/// Internal framebuffer size for a window: fixed height, aspect-derived width.
pub fn internal_size(dst_w: usize, dst_h: usize, target_h: usize) -> (usize, usize) {
    let aspect = if dst_h > 0 {
        dst_w as f32 / dst_h as f32
    } else {
        1.0
    };

    let mut target_w = (target_h as f32 * aspect).round() as usize;
    if target_w < 160 {
        target_w = 160;
    }
    if target_w % 2 != 0 {
        target_w += 1;
    }
    (target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubling_repeats_pixels() {
        let src = [1, 2, 3, 4]; // 2x2
        let lut = build_scale_lut(4, 4, 2, 2);
        let mut dst = [0u32; 16];
        blit_nearest_stretch(&mut dst, 4, &src, &lut);
        assert_eq!(&dst[0..4], &[1, 1, 2, 2]);
        assert_eq!(&dst[4..8], &[1, 1, 2, 2]);
        assert_eq!(&dst[8..12], &[3, 3, 4, 4]);
        assert_eq!(&dst[12..16], &[3, 3, 4, 4]);
    }

    #[test]
    fn empty_source_leaves_destination_untouched() {
        let lut = build_scale_lut(4, 2, 160, 0);
        let mut dst = [9u32; 8];
        blit_nearest_stretch(&mut dst, 4, &[], &lut);
        assert_eq!(dst, [9; 8]);
    }

    #[test]
    fn internal_size_follows_aspect() {
        assert_eq!(internal_size(1600, 1200, 480), (640, 480));
        assert_eq!(internal_size(100, 1000, 480), (160, 480));
        assert_eq!(internal_size(0, 0, 480), (480, 480));
    }

    #[test]
    fn lut_reports_destination_size() {
        let lut = build_scale_lut(7, 3, 2, 2);
        assert_eq!(lut.dst_size(), (7, 3));
    }
}
