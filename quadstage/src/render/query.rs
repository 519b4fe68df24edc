use crate::math::{Vec2, Vec3, Vec4};

/// Reference viewport the game is authored against.
pub const REFERENCE_VIEWPORT: Vec2 = Vec2::new(1280.0, 960.0);

/// Everything the renderer needs to draw one textured quad.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawQuery {
    /// Name of a registered UV rectangle.
    pub texture_key: String,
    pub scale: Vec2,
    /// Euler rotation in radians.
    pub rotation: Vec3,
    pub translation: Vec3,
    /// RGBA, each channel in `0.0..=1.0`.
    pub color: Vec4,
}

impl DrawQuery {
    pub fn new(texture_key: impl Into<String>) -> Self {
        Self {
            texture_key: texture_key.into(),
            scale: Vec2::ONE,
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
            color: Vec4::ONE,
        }
    }
}

/// Coordinate convention used to author a translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// World space, origin at the screen centre, y up.
    #[default]
    Center,
    /// Screen pixels from the top-left corner, y down; the quad's centre
    /// lands on the point.
    CenterUI,
    /// Screen pixels from the top-left corner, y down; the quad's top-left
    /// corner lands on the point.
    TopLeftUI,
}

/// Converts `query.translation` from `anchor` coordinates into the
/// centre-origin camera space.
///
/// The quad's current scale is read once here; resizing the query later does
/// not move it.
pub fn apply_anchor(mut query: DrawQuery, anchor: Anchor, viewport: Vec2) -> DrawQuery {
    query.translation = anchor_translation(query.translation, query.scale, anchor, viewport);
    query
}

/// The translation part of [`apply_anchor`] for a quad of size `scale`.
pub fn anchor_translation(translation: Vec3, scale: Vec2, anchor: Anchor, viewport: Vec2) -> Vec3 {
    let half_view = viewport * 0.5;
    let mut t = translation;
    match anchor {
        Anchor::Center => {}
        Anchor::CenterUI => {
            t.y = -t.y;
            t.x -= half_view.x;
            t.y += half_view.y;
        }
        Anchor::TopLeftUI => {
            let half_quad = scale * 0.5;
            t.y = -t.y;
            t.x -= half_view.x - half_quad.x;
            t.y += half_view.y - half_quad.y;
        }
    }
    t
}

/// Builds a [`DrawQuery`], applying the anchor transform once in
/// [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct DrawQueryBuilder {
    query: DrawQuery,
    anchor: Anchor,
    viewport: Vec2,
}

impl DrawQueryBuilder {
    pub fn new(texture_key: impl Into<String>, scale: Vec2) -> Self {
        let mut query = DrawQuery::new(texture_key);
        query.scale = scale;
        Self {
            query,
            anchor: Anchor::Center,
            viewport: REFERENCE_VIEWPORT,
        }
    }

    #[must_use]
    pub fn rotation(mut self, rotation: Vec3) -> Self {
        self.query.rotation = rotation;
        self
    }

    #[must_use]
    pub fn translation(mut self, translation: Vec3) -> Self {
        self.query.translation = translation;
        self
    }

    #[must_use]
    pub fn color(mut self, color: Vec4) -> Self {
        self.query.color = color;
        self
    }

    #[must_use]
    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Viewport used by the UI anchors. Defaults to [`REFERENCE_VIEWPORT`].
    #[must_use]
    pub fn viewport(mut self, viewport: Vec2) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn build(self) -> DrawQuery {
        apply_anchor(self.query, self.anchor, self.viewport)
    }
}

/// Normalized texture-space box `(u0, v0)`..`(u1, v1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl UvRect {
    pub const FULL: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self { u0, v0, u1, v1 }
    }

    /// Box given in pixels within an atlas of `atlas_w` x `atlas_h`.
    pub fn from_pixels(x0: f32, y0: f32, x1: f32, y1: f32, atlas_w: f32, atlas_h: f32) -> Self {
        Self::new(x0 / atlas_w, y0 / atlas_h, x1 / atlas_w, y1 / atlas_h)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.u0, self.v0, self.u1, self.v1]
    }
}
