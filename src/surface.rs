use crate::texture::Texture;

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

/// Halves every channel of a packed colour.
#[inline]
pub fn darken(c: u32) -> u32 {
    (c >> 1) & 0x007F_7F7F
}

/// Drawing operations the renderer needs from its target.
pub trait RenderSurface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Fills the rectangle, clipped to the surface.
    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32);

    /// Draws rows `src_y0..src_y1` of texture column `src_x` stretched over
    /// screen rows `dst_y0..dst_y1` of column `dst_x` (nearest-neighbour).
    #[allow(clippy::too_many_arguments)]
    fn draw_texture_column(
        &mut self,
        texture: &dyn Texture,
        src_x: u32,
        src_y0: f32,
        src_y1: f32,
        dst_x: usize,
        dst_y0: usize,
        dst_y1: usize,
        darkened: bool,
    );
}

/// CPU framebuffer of packed `0RGB` pixels.
pub struct FrameBuffer {
    pub pixels: Vec<u32>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    /// Reallocates only when the size actually changes.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height];
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}

impl RenderSurface for FrameBuffer {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        if x >= x1 {
            return;
        }
        for row in y..y1 {
            let start = row * self.width;
            self.pixels[start + x..start + x1].fill(color);
        }
    }

    fn draw_texture_column(
        &mut self,
        texture: &dyn Texture,
        src_x: u32,
        src_y0: f32,
        src_y1: f32,
        dst_x: usize,
        dst_y0: usize,
        dst_y1: usize,
        darkened: bool,
    ) {
        let dst_y1 = dst_y1.min(self.height);
        if dst_x >= self.width || dst_y0 >= dst_y1 || texture.width() == 0 || texture.height() == 0
        {
            return;
        }
        let tex_h = texture.height();
        let src_x = src_x.min(texture.width() - 1);
        let step = (src_y1 - src_y0) / (dst_y1 - dst_y0) as f32;

        let mut tex_pos = src_y0;
        let mut idx = dst_y0 * self.width + dst_x;
        for _y in dst_y0..dst_y1 {
            let ty = (tex_pos.max(0.0) as u32).min(tex_h - 1);
            let c = texture.sample(src_x, ty);
            self.pixels[idx] = if darkened { darken(c) } else { c };
            tex_pos += step;
            idx += self.width;
        }
    }
}
