//! Scene state machine.
//!
//! Exactly one [`Scene`] is active. Each tick it consumes itself and returns
//! the scene for the next tick, which is either the same variant or a newly
//! built one. Replaced scenes are dropped and never resumed.

mod load;
mod title;

pub use load::LoadScene;
pub use title::{
    blink_color, TitleDestination, TitleOption, TitleScene, TitleState, TitleStep, FADEIN_TICKS,
    FADEOUT_TICKS, FLASH_TICKS, OPTION_UNSELECTED_COLOR,
};

use crate::facade::AppFacade;

#[derive(Debug)]
pub enum Scene {
    Load(LoadScene),
    Title(TitleScene),
}

impl Scene {
    /// The first scene of the game.
    pub fn start(app: &mut dyn AppFacade) -> Self {
        Scene::Load(LoadScene::new(app))
    }

    /// Runs one tick and returns the scene for the next one.
    pub fn update(self, app: &mut dyn AppFacade, delta_time: f32) -> Scene {
        let before = self.name();
        let next = match self {
            Scene::Load(scene) => scene.update(app, delta_time),
            Scene::Title(scene) => Scene::Title(scene.update(app, delta_time)),
        };
        if next.name() != before {
            log::info!("scene {before} -> {}", next.name());
        }
        next
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scene::Load(_) => "load",
            Scene::Title(_) => "title",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::testing::RecordingFacade;
    use crate::facade::LoadState;

    #[test]
    fn game_starts_loading_then_reaches_title() {
        let mut app = RecordingFacade::new();
        let mut scene = Scene::start(&mut app);
        assert_eq!(scene.name(), "load");

        app.settle_all(LoadState::Ready);
        scene = scene.update(&mut app, 1.0);
        assert_eq!(scene.name(), "load");

        app.settle_all(LoadState::Ready);
        scene = scene.update(&mut app, 1.0);
        assert_eq!(scene.name(), "title");

        scene = scene.update(&mut app, 1.0);
        assert_eq!(scene.name(), "title");
    }
}
