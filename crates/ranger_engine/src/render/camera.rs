//! Orthographic camera, view offset and viewport

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Orthographic projection.
#[derive(Debug, Clone)]
pub struct Camera {
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    width: f32,
    height: f32,
    ratio_correction: f32,
    matrix: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Identity projection with no correction
    pub fn new() -> Self {
        Self {
            left: 0.0,
            right: 0.0,
            bottom: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            ratio_correction: 1.0,
            matrix: Mat4::identity(),
        }
    }

    /// Scale factor mapping the virtual resolution onto the device.
    ///
    /// Picks the axis that keeps the whole virtual area visible: when the
    /// device is wider than the virtual aspect the height ratio wins,
    /// otherwise the width ratio.
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio_correction(device: (u32, u32), virtual_res: (u32, u32)) -> f32 {
        let (dw, dh) = (device.0 as f32, device.1 as f32);
        let (vw, vh) = (virtual_res.0 as f32, virtual_res.1 as f32);

        let device_ratio = dw / dh;
        let virtual_ratio = vw / vh;

        if virtual_ratio < device_ratio {
            dh / vh
        } else {
            dw / vw
        }
    }

    /// Project the box `left..right` by `bottom..top` with its origin at the
    /// bottom-left corner.
    pub fn set_projection(&mut self, ratio_correction: f32, bottom: f32, left: f32, top: f32, right: f32) {
        self.ratio_correction = ratio_correction;
        self.bottom = bottom;
        self.left = left;
        self.top = top;
        self.right = right;
        self.width = right - left;
        self.height = top - bottom;

        self.matrix.set_to_ortho(0.0, self.width, 0.0, self.height, NEAR, FAR);
    }

    /// Re-center the projection on the origin, scaled by the ratio
    /// correction. Applying this to an already centered camera centers the
    /// same extents again; it does not compound.
    pub fn centered(&mut self) {
        let hw = self.width / 2.0 / self.ratio_correction;
        let hh = self.height / 2.0 / self.ratio_correction;
        self.matrix.set_to_ortho(-hw, hw, -hh, hh, NEAR, FAR);
    }

    /// Frustum edges as `(left, right, bottom, top)`
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        (self.left, self.right, self.bottom, self.top)
    }

    /// Projection width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Projection height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Current ratio correction
    pub fn correction(&self) -> f32 {
        self.ratio_correction
    }

    /// Projection matrix
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }
}

/// View translation applied before projection.
#[derive(Debug, Clone)]
pub struct View {
    offset: Vec3,
    matrix: Mat4,
}

impl Default for View {
    fn default() -> Self {
        Self {
            offset: Vec3::zeros(),
            matrix: Mat4::identity(),
        }
    }
}

impl View {
    /// Identity view
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate the world by `x, y, z`. For this engine x and y are usually
    /// zero and z a small negative number such as -1.
    pub fn set_projection(&mut self, x: f32, y: f32, z: f32) {
        self.offset = Vec3::new(x, y, z);
        self.matrix.set_translate_vec(&self.offset);
    }

    /// Current offset
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// View matrix
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }
}

/// Device pixel rectangle rendered into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: i32,
    /// Bottom edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Set the pixel rectangle
    pub fn set_dimensions(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
    }

    /// Width over height, 0 for an empty viewport
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }
}
