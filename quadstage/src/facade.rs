//! The surface scenes talk to.
//!
//! Scenes never touch the renderer, window or loader directly. Everything
//! they need for one tick goes through an [`AppFacade`].

use std::cell::Cell;
use std::rc::Rc;

use crate::input::InputManager;
use crate::math::{Camera, Vec2};
use crate::render::{DrawQuery, UvRect};
use crate::text::TextLabel;

/// Progress of a bitmap request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// Handle to an in-flight bitmap request. Clones observe the same request.
#[derive(Clone, Debug)]
pub struct BitmapLoad(Rc<Cell<LoadState>>);

impl BitmapLoad {
    pub(crate) fn pending() -> Self {
        Self(Rc::new(Cell::new(LoadState::Pending)))
    }

    pub(crate) fn set_state(&self, state: LoadState) {
        self.0.set(state);
    }

    pub fn state(&self) -> LoadState {
        self.0.get()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == LoadState::Ready
    }

    /// Ready or failed; either way nothing more will happen.
    pub fn is_settled(&self) -> bool {
        self.state() != LoadState::Pending
    }
}

pub trait AppFacade {
    fn width(&self) -> f32;

    fn height(&self) -> f32;

    fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Starts loading the image at `path` (relative to the asset root) and
    /// registers every `(key, uv)` pair against it once decoded.
    fn load_bitmap(&mut self, path: &str, uvs: Vec<(String, UvRect)>) -> BitmapLoad;

    /// Camera for every draw submitted after this call.
    fn set_camera(&mut self, camera: &Camera);

    fn draw(&mut self, query: &DrawQuery);

    fn add_text(&mut self, key: &str, label: TextLabel);

    fn remove_text(&mut self, key: &str);

    fn input(&self) -> &InputManager;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let load = BitmapLoad::pending();
        let observer = load.clone();
        assert!(!observer.is_settled());
        load.set_state(LoadState::Failed);
        assert!(observer.is_settled());
        assert!(!observer.is_ready());
        load.set_state(LoadState::Ready);
        assert!(observer.is_ready());
    }

    #[test]
    fn default_size_combines_width_and_height() {
        let app = testing::RecordingFacade::new();
        assert_eq!(app.size(), Vec2::new(1280.0, 960.0));
    }
}
