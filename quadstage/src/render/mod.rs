mod query;
mod wgpu_backend;

pub use query::{
    anchor_translation, apply_anchor, Anchor, DrawQuery, DrawQueryBuilder, UvRect,
    REFERENCE_VIEWPORT,
};
pub use wgpu_backend::{Frame, Renderer, CLEAR_COLOR};
