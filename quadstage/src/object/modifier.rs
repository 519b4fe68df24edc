use crate::math::{Vec2, Vec3, Vec4};
use crate::render::{anchor_translation, Anchor, DrawQuery};

/// One-shot mutation applied to a rendering object's query.
///
/// Modifiers hold no state of their own and are not retained after
/// [`RenderingObject::modify`](super::RenderingObject::modify) returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Modifier {
    /// Sets the quad size in pixels.
    Size(Vec2),
    /// Sets the RGBA color. Channels are clamped into `0.0..=1.0`.
    Color(Vec4),
    /// Places the quad at `translation`, authored in `anchor` coordinates.
    ///
    /// UI anchors read the quad's current size, so apply `Size` first.
    Position {
        anchor: Anchor,
        translation: Vec3,
        viewport: Vec2,
    },
}

impl Modifier {
    pub fn position(anchor: Anchor, translation: Vec3, viewport: Vec2) -> Self {
        Self::Position {
            anchor,
            translation,
            viewport,
        }
    }

    pub fn apply(&self, query: &mut DrawQuery) {
        match *self {
            Modifier::Size(scale) => query.scale = scale,
            Modifier::Color(color) => query.color = color.clamp(Vec4::ZERO, Vec4::ONE),
            Modifier::Position {
                anchor,
                translation,
                viewport,
            } => {
                query.translation = anchor_translation(translation, query.scale, anchor, viewport);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::REFERENCE_VIEWPORT;

    #[test]
    fn size_then_top_left_position() {
        let mut q = DrawQuery::new("title-start");
        Modifier::Size(Vec2::new(512.0, 64.0)).apply(&mut q);
        Modifier::position(Anchor::TopLeftUI, Vec3::new(60.0, 590.0, 0.0), REFERENCE_VIEWPORT)
            .apply(&mut q);
        assert_eq!(q.translation, Vec3::new(60.0 - 640.0 + 256.0, -590.0 + 480.0 - 32.0, 0.0));
    }

    #[test]
    fn position_before_size_uses_stale_scale() {
        let mut q = DrawQuery::new("q");
        Modifier::position(Anchor::TopLeftUI, Vec3::ZERO, REFERENCE_VIEWPORT).apply(&mut q);
        let placed = q.translation;
        Modifier::Size(Vec2::new(100.0, 100.0)).apply(&mut q);
        assert_eq!(q.translation, placed);
        assert_eq!(placed, Vec3::new(-639.5, 479.5, 0.0));
    }

    #[test]
    fn color_is_clamped() {
        let mut q = DrawQuery::new("q");
        Modifier::Color(Vec4::new(1.5, -0.2, 0.5, 2.0)).apply(&mut q);
        assert_eq!(q.color, Vec4::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn later_modifier_overwrites_earlier() {
        let mut q = DrawQuery::new("q");
        Modifier::Color(Vec4::splat(0.2)).apply(&mut q);
        Modifier::Color(Vec4::splat(0.6)).apply(&mut q);
        assert_eq!(q.color, Vec4::splat(0.6));
    }
}
