use crate::facade::{AppFacade, BitmapLoad};
use crate::math::Camera;
use crate::object::{Modifier, RenderingObject};
use crate::render::UvRect;

use super::{Scene, TitleScene};

const LOAD_BITMAP: &str = "load.png";
const WHITE_BITMAP: &str = "white.png";
const TITLE_BITMAP: &str = "title.png";

const TITLE_ATLAS: (f32, f32) = (2048.0, 1024.0);

fn load_uvs() -> Vec<(String, UvRect)> {
    vec![(
        "load".to_string(),
        UvRect::from_pixels(0.0, 0.0, 640.0, 480.0, 1024.0, 512.0),
    )]
}

fn white_uvs() -> Vec<(String, UvRect)> {
    vec![("white".to_string(), UvRect::FULL)]
}

/// Background plus the five option strips stacked at x = 1280.
fn title_uvs() -> Vec<(String, UvRect)> {
    let (w, h) = TITLE_ATLAS;
    let mut uvs = vec![(
        "title".to_string(),
        UvRect::from_pixels(0.0, 0.0, 1280.0, 960.0, w, h),
    )];
    for (row, option) in super::TitleOption::ALL.iter().enumerate() {
        let top = 64.0 * row as f32;
        uvs.push((
            option.texture_key().to_string(),
            UvRect::from_pixels(1280.0, top, 1792.0, top + 64.0, w, h),
        ));
    }
    uvs
}

/// Loading screen shown while the title bitmaps decode.
///
/// The `load` bitmap is requested first; the rest follow once it settles.
#[derive(Debug)]
pub struct LoadScene {
    background: RenderingObject,
    loading_screen: BitmapLoad,
    remaining: Option<[BitmapLoad; 2]>,
}

impl LoadScene {
    pub fn new(app: &mut dyn AppFacade) -> Self {
        let background = RenderingObject::new("load").with_modifier(Modifier::Size(app.size()));
        let loading_screen = app.load_bitmap(LOAD_BITMAP, load_uvs());
        Self {
            background,
            loading_screen,
            remaining: None,
        }
    }

    pub fn update(mut self, app: &mut dyn AppFacade, _delta_time: f32) -> Scene {
        if !self.loading_screen.is_settled() {
            return Scene::Load(self);
        }

        let remaining = self.remaining.get_or_insert_with(|| {
            [
                app.load_bitmap(WHITE_BITMAP, white_uvs()),
                app.load_bitmap(TITLE_BITMAP, title_uvs()),
            ]
        });
        let finished = remaining.iter().all(BitmapLoad::is_settled);

        let camera = Camera::screen(app.width(), app.height());
        app.set_camera(&camera);
        self.background.draw(app);

        if finished {
            Scene::Title(TitleScene::new(app))
        } else {
            Scene::Load(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::testing::RecordingFacade;
    use crate::facade::LoadState;

    fn paths(app: &RecordingFacade) -> Vec<String> {
        app.requested_paths().into_iter().map(String::from).collect()
    }

    #[test]
    fn requests_load_bitmap_first() {
        let mut app = RecordingFacade::new();
        let scene = LoadScene::new(&mut app);
        assert_eq!(paths(&app), vec!["load.png"]);

        let scene = scene.update(&mut app, 1.0);
        assert!(matches!(scene, Scene::Load(_)));
        assert!(app.draws.is_empty(), "nothing drawn before the load bitmap settles");
        assert_eq!(paths(&app), vec!["load.png"]);
    }

    #[test]
    fn draws_loading_screen_while_title_bitmaps_decode() {
        let mut app = RecordingFacade::new();
        let scene = LoadScene::new(&mut app);
        app.settle_all(LoadState::Ready);

        let scene = scene.update(&mut app, 1.0);
        assert_eq!(paths(&app), vec!["load.png", "white.png", "title.png"]);
        assert_eq!(app.cameras, vec![Camera::screen(1280.0, 960.0)]);
        assert_eq!(app.draws.len(), 1);
        assert_eq!(app.draws[0].texture_key, "load");
        assert_eq!(app.draws[0].scale, app.size());

        app.clear_frame();
        let scene = scene.update(&mut app, 1.0);
        assert!(matches!(scene, Scene::Load(_)));
        assert_eq!(app.requests.len(), 3, "follow-up bitmaps are requested once");
        assert_eq!(app.draws.len(), 1);
    }

    #[test]
    fn failed_bitmaps_still_advance_to_title() {
        let mut app = RecordingFacade::new();
        let scene = LoadScene::new(&mut app);
        app.settle_all(LoadState::Failed);
        let scene = scene.update(&mut app, 1.0);
        app.settle_all(LoadState::Failed);
        let scene = scene.update(&mut app, 1.0);
        assert!(matches!(scene, Scene::Title(_)));
    }

    #[test]
    fn title_atlas_uvs() {
        let uvs = title_uvs();
        assert_eq!(uvs.len(), 6);
        assert_eq!(uvs[0].1, UvRect::new(0.0, 0.0, 0.625, 0.9375));
        let (key, rect) = &uvs[2];
        assert_eq!(key, "title-start");
        assert_eq!(*rect, UvRect::new(0.625, 0.0625, 0.875, 0.125));
        assert_eq!(load_uvs()[0].1, UvRect::new(0.0, 0.0, 0.625, 0.9375));
    }
}
