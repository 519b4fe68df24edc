use std::f32::consts::PI;

use crate::facade::AppFacade;
use crate::input::{repeat_fires, InputManager, Key};
use crate::math::{Camera, Vec2, Vec3, Vec4};
use crate::object::{DynamicColor, Fade, Modifier, RenderingObject, SharedAttachment};
use crate::render::Anchor;

/// Length of the white fade-in, in ticks.
pub const FADEIN_TICKS: f32 = 40.0;
/// Length of the confirm flash, in ticks.
pub const FLASH_TICKS: f32 = 40.0;
/// Length of the black fade-out, in ticks.
pub const FADEOUT_TICKS: f32 = 60.0;

pub const OPTION_UNSELECTED_COLOR: Vec4 = Vec4::new(0.6, 0.6, 0.6, 0.6);

const BLINK_PERIOD: f32 = 40.0;
const FLASH_BLINK_PERIOD: f32 = 6.0;

const OPTION_SIZE: Vec2 = Vec2::new(512.0, 64.0);

/// Brightness of the selected option `elapsed` ticks into a blink with the
/// given period. Stays within `0.4..=1.0`.
pub fn blink_color(elapsed: f32, period: f32) -> Vec4 {
    let c = 0.6 * (elapsed * PI / period).sin().abs() + 0.4;
    Vec4::new(c, c, c, 1.0)
}

fn blink(period: f32) -> SharedAttachment {
    SharedAttachment::new(DynamicColor::new(move |elapsed| blink_color(elapsed, period)))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleOption {
    Practice,
    Start,
    Assemble,
    Result,
    Config,
}

/// Where the title screen goes once an option has been confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleDestination {
    /// Replay the title screen from its fade-in, keeping the cursor.
    Restart,
}

impl TitleOption {
    /// Options in menu order, top to bottom.
    pub const ALL: [TitleOption; 5] = [
        TitleOption::Practice,
        TitleOption::Start,
        TitleOption::Assemble,
        TitleOption::Result,
        TitleOption::Config,
    ];

    pub fn texture_key(self) -> &'static str {
        match self {
            TitleOption::Practice => "title-practice",
            TitleOption::Start => "title-start",
            TitleOption::Assemble => "title-assemble",
            TitleOption::Result => "title-result",
            TitleOption::Config => "title-config",
        }
    }

    // None of the follow-up screens exist yet.
    pub fn destination(self) -> TitleDestination {
        match self {
            TitleOption::Practice
            | TitleOption::Start
            | TitleOption::Assemble
            | TitleOption::Result
            | TitleOption::Config => TitleDestination::Restart,
        }
    }

    /// Authored top-left corner of the option strip, in screen pixels.
    fn position(index: usize) -> Vec3 {
        let i = index as f32;
        Vec3::new(30.0 + 30.0 * i, 520.0 + 70.0 * i, 0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleState {
    Fadein,
    Normal,
    Flash,
    Fadeout,
}

/// Outcome of [`TitleState::next`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleStep {
    Stay,
    Enter(TitleState),
    /// The fade-out is over; leave for the selected option's destination.
    Finish,
}

impl TitleState {
    /// Decides the transition for a tick that starts `elapsed` ticks into
    /// this state.
    pub fn next(self, elapsed: f32, input: &InputManager) -> TitleStep {
        match self {
            TitleState::Fadein if elapsed > FADEIN_TICKS => TitleStep::Enter(TitleState::Normal),
            TitleState::Normal if input.get(Key::Z) == 1 => TitleStep::Enter(TitleState::Flash),
            TitleState::Flash if elapsed > FLASH_TICKS => TitleStep::Enter(TitleState::Fadeout),
            TitleState::Fadeout if elapsed > FADEOUT_TICKS => TitleStep::Finish,
            _ => TitleStep::Stay,
        }
    }
}

/// Cursor offset requested this tick, `None` if the cursor stays.
fn cursor_delta(input: &InputManager, count: usize) -> Option<usize> {
    let mut delta = 0;
    if repeat_fires(input.get(Key::ArrowDown)) {
        delta += 1;
    }
    if repeat_fires(input.get(Key::ArrowUp)) {
        delta += count - 1;
    }
    (delta % count != 0).then_some(delta)
}

/// Title menu: background, five options, and fade overlays.
#[derive(Debug)]
pub struct TitleScene {
    state: TitleState,
    elapsed: f32,
    cursor: usize,
    background: RenderingObject,
    options: Vec<RenderingObject>,
    overlay: Option<RenderingObject>,
    blink: SharedAttachment,
    viewport: Vec2,
}

impl TitleScene {
    pub fn new(app: &mut dyn AppFacade) -> Self {
        let viewport = app.size();
        let background = RenderingObject::new("title").with_modifier(Modifier::Size(viewport));

        let options: Vec<RenderingObject> = TitleOption::ALL
            .iter()
            .enumerate()
            .map(|(i, option)| {
                RenderingObject::new(option.texture_key())
                    .with_modifier(Modifier::Size(OPTION_SIZE))
                    .with_modifier(Modifier::Color(OPTION_UNSELECTED_COLOR))
                    .with_modifier(Modifier::position(
                        Anchor::TopLeftUI,
                        TitleOption::position(i),
                        viewport,
                    ))
            })
            .collect();

        let mut scene = Self {
            state: TitleState::Fadein,
            elapsed: 0.0,
            cursor: 0,
            background,
            options,
            overlay: None,
            blink: blink(BLINK_PERIOD),
            viewport,
        };
        scene.start_fadein();
        scene
    }

    pub fn state(&self) -> TitleState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> TitleOption {
        TitleOption::ALL[self.cursor]
    }

    /// Ticks spent in the current state.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn options(&self) -> &[RenderingObject] {
        &self.options
    }

    pub fn overlay(&self) -> Option<&RenderingObject> {
        self.overlay.as_ref()
    }

    pub fn update(mut self, app: &mut dyn AppFacade, delta_time: f32) -> Self {
        if self.state == TitleState::Normal {
            if let Some(delta) = cursor_delta(app.input(), self.options.len()) {
                self.move_cursor(delta);
            }
        }

        match self.state.next(self.elapsed, app.input()) {
            TitleStep::Stay => {}
            TitleStep::Enter(state) => self.enter(state),
            TitleStep::Finish => match self.selected().destination() {
                TitleDestination::Restart => self.start_fadein(),
            },
        }

        if let Some(overlay) = self.overlay.as_mut() {
            overlay.update(delta_time);
        }
        for option in &mut self.options {
            option.update(delta_time);
        }

        let camera = Camera::screen(app.width(), app.height());
        app.set_camera(&camera);
        self.background.draw(app);
        for option in &self.options {
            option.draw(app);
        }
        if let Some(overlay) = &self.overlay {
            overlay.draw(app);
        }

        self.elapsed += delta_time;
        self
    }

    fn enter(&mut self, state: TitleState) {
        log::debug!("title {:?} -> {:?}", self.state, state);
        self.state = state;
        self.elapsed = 0.0;
        match state {
            TitleState::Fadein => self.start_fadein(),
            TitleState::Normal => self.overlay = None,
            TitleState::Flash => self.replace_blink(FLASH_BLINK_PERIOD),
            TitleState::Fadeout => {
                self.overlay = Some(self.overlay_object(Vec4::ZERO, 0.0, 1.0, FADEOUT_TICKS));
            }
        }
    }

    fn start_fadein(&mut self) {
        self.state = TitleState::Fadein;
        self.elapsed = 0.0;
        self.overlay = Some(self.overlay_object(Vec4::ONE, 1.0, 0.0, FADEIN_TICKS));
        self.replace_blink(BLINK_PERIOD);
    }

    fn overlay_object(&self, color: Vec4, from: f32, to: f32, ticks: f32) -> RenderingObject {
        RenderingObject::new("white")
            .with_modifier(Modifier::Size(self.viewport))
            .with_modifier(Modifier::Color(color))
            .with_attachment(SharedAttachment::new(Fade::new(from, to, ticks)))
    }

    /// Swaps the selected option's blink for a fresh one with `period`.
    fn replace_blink(&mut self, period: f32) {
        let selected = &mut self.options[self.cursor];
        selected.detach(&self.blink);
        self.blink = blink(period);
        selected.attach(self.blink.clone());
    }

    fn move_cursor(&mut self, delta: usize) {
        let count = self.options.len();
        self.options[self.cursor]
            .detach(&self.blink)
            .modify(Modifier::Color(OPTION_UNSELECTED_COLOR));
        self.cursor = (self.cursor + delta) % count;
        self.blink.init();
        self.options[self.cursor].attach(self.blink.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::testing::RecordingFacade;

    fn title(app: &mut RecordingFacade) -> TitleScene {
        TitleScene::new(app)
    }

    /// Runs whole ticks of `dt` until the scene leaves `state`.
    fn run_while(mut scene: TitleScene, app: &mut RecordingFacade, state: TitleState) -> TitleScene {
        for _ in 0..1000 {
            if scene.state() != state {
                return scene;
            }
            app.input.update();
            scene = scene.update(app, 1.0);
        }
        panic!("scene stuck in {state:?}");
    }

    fn to_normal(app: &mut RecordingFacade) -> TitleScene {
        let scene = title(app);
        run_while(scene, app, TitleState::Fadein)
    }

    #[test]
    fn options_are_laid_out_from_the_top_left() {
        let mut app = RecordingFacade::new();
        let scene = title(&mut app);
        let first = scene.options()[0].query();
        assert_eq!(first.texture_key, "title-practice");
        assert_eq!(first.scale, OPTION_SIZE);
        assert_eq!(first.translation, Vec3::new(-354.0, -72.0, 0.0));
        let last = scene.options()[4].query();
        assert_eq!(last.translation, Vec3::new(150.0 - 640.0 + 256.0, -800.0 + 480.0 - 32.0, 0.0));
        assert_eq!(last.color, OPTION_UNSELECTED_COLOR);
    }

    #[test]
    fn draw_order_is_background_options_overlay() {
        let mut app = RecordingFacade::new();
        let scene = title(&mut app);
        let _scene = scene.update(&mut app, 1.0);
        let keys: Vec<&str> = app.draws.iter().map(|q| q.texture_key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "title",
                "title-practice",
                "title-start",
                "title-assemble",
                "title-result",
                "title-config",
                "white"
            ]
        );
        assert_eq!(app.cameras, vec![Camera::screen(1280.0, 960.0)]);
    }

    #[test]
    fn fadein_overlay_fades_from_white() {
        let mut app = RecordingFacade::new();
        let scene = title(&mut app);
        assert_eq!(scene.overlay().map(|o| o.query().color), Some(Vec4::ONE));
        let scene = scene.update(&mut app, 10.0);
        let alpha = scene.overlay().map(|o| o.query().color.w);
        assert_eq!(alpha, Some(0.75));
    }

    #[test]
    fn fadein_ends_after_its_duration() {
        let mut app = RecordingFacade::new();
        let mut scene = title(&mut app);
        for _ in 0..41 {
            scene = scene.update(&mut app, 1.0);
        }
        assert_eq!(scene.state(), TitleState::Fadein);
        scene = scene.update(&mut app, 1.0);
        assert_eq!(scene.state(), TitleState::Normal);
        assert_eq!(scene.elapsed(), 1.0, "counter restarts at the transition");

        app.clear_frame();
        let _scene = scene.update(&mut app, 1.0);
        assert!(app.draws.iter().all(|q| q.texture_key != "white"));
    }

    #[test]
    fn cursor_ignored_during_fadein() {
        let mut app = RecordingFacade::new();
        let scene = title(&mut app);
        app.press(Key::ArrowDown);
        let scene = scene.update(&mut app, 1.0);
        assert_eq!(scene.cursor(), 0);
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut app = RecordingFacade::new();
        let scene = to_normal(&mut app);

        app.press(Key::ArrowUp);
        let scene = scene.update(&mut app, 1.0);
        assert_eq!(scene.cursor(), 4);
        assert_eq!(scene.selected(), TitleOption::Config);

        app.release(Key::ArrowUp);
        app.press(Key::ArrowDown);
        let scene = scene.update(&mut app, 1.0);
        assert_eq!(scene.cursor(), 0);
    }

    #[test]
    fn held_arrow_auto_repeats() {
        let mut app = RecordingFacade::new();
        let mut scene = to_normal(&mut app);
        app.input.key_pressed(Key::ArrowDown);
        let mut moves = Vec::new();
        for _ in 0..48 {
            app.input.update();
            let before = scene.cursor();
            scene = scene.update(&mut app, 1.0);
            if scene.cursor() != before {
                moves.push(app.input.get(Key::ArrowDown));
            }
        }
        assert_eq!(moves, vec![1, 32, 40, 48]);
        assert_eq!(scene.cursor(), 4);
    }

    #[test]
    fn blink_follows_cursor_and_restarts() {
        let mut app = RecordingFacade::new();
        let scene = to_normal(&mut app);
        assert_eq!(scene.options()[0].attachments().len(), 1);

        app.press(Key::ArrowDown);
        let scene = scene.update(&mut app, 1.0);
        assert!(scene.options()[0].attachments().is_empty());
        assert_eq!(scene.options()[0].query().color, OPTION_UNSELECTED_COLOR);
        assert_eq!(scene.options()[1].attachments().len(), 1);
        // Attached at zero, then advanced once by the option update.
        assert_eq!(scene.options()[1].attachments()[0].elapsed(), 1.0);
        assert_eq!(scene.options()[1].query().color, blink_color(0.0, 40.0));
    }

    #[test]
    fn blink_brightness_stays_in_range() {
        for step in 0..400 {
            let c = blink_color(step as f32 * 0.25, 40.0);
            assert!(c.x >= 0.4 - 1e-6 && c.x <= 1.0 + 1e-6);
            assert_eq!(c.w, 1.0);
        }
        assert!((blink_color(20.0, 40.0).x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn confirm_runs_flash_then_fadeout_then_restarts() {
        let mut app = RecordingFacade::new();
        let scene = to_normal(&mut app);

        app.press(Key::ArrowDown);
        let scene = scene.update(&mut app, 1.0);
        app.release(Key::ArrowDown);

        app.press(Key::Z);
        let scene = scene.update(&mut app, 1.0);
        assert_eq!(scene.state(), TitleState::Flash);
        assert_eq!(scene.elapsed(), 1.0);

        // Holding confirm does not retrigger and the cursor is frozen.
        app.press(Key::ArrowDown);
        let scene = run_while(scene, &mut app, TitleState::Flash);
        assert_eq!(scene.state(), TitleState::Fadeout);
        assert_eq!(scene.cursor(), 1);
        let black = scene.overlay().map(|o| o.query().color);
        assert!(matches!(black, Some(c) if c.x == 0.0 && c.w > 0.0));

        let scene = run_while(scene, &mut app, TitleState::Fadeout);
        assert_eq!(scene.state(), TitleState::Fadein);
        assert_eq!(scene.cursor(), 1, "restart keeps the cursor");
        assert_eq!(scene.overlay().map(|o| o.query().color.x), Some(1.0));
    }

    #[test]
    fn flash_speeds_up_the_blink() {
        let mut app = RecordingFacade::new();
        let scene = to_normal(&mut app);
        app.press(Key::Z);
        let scene = scene.update(&mut app, 1.0);
        let scene = scene.update(&mut app, 2.0);
        // Fresh blink, advanced by 1 then evaluated at 1.
        assert_eq!(scene.options()[0].query().color, blink_color(1.0, 6.0));
    }

    #[test]
    fn transitions_are_ordered_and_never_skip() {
        let input = InputManager::new();
        assert_eq!(TitleState::Fadein.next(40.0, &input), TitleStep::Stay);
        assert_eq!(
            TitleState::Fadein.next(40.5, &input),
            TitleStep::Enter(TitleState::Normal)
        );
        assert_eq!(TitleState::Normal.next(1000.0, &input), TitleStep::Stay);
        assert_eq!(
            TitleState::Flash.next(41.0, &input),
            TitleStep::Enter(TitleState::Fadeout)
        );
        assert_eq!(TitleState::Fadeout.next(60.0, &input), TitleStep::Stay);
        assert_eq!(TitleState::Fadeout.next(61.0, &input), TitleStep::Finish);

        let mut pressed = InputManager::new();
        pressed.key_pressed(Key::Z);
        pressed.update();
        assert_eq!(
            TitleState::Normal.next(0.0, &pressed),
            TitleStep::Enter(TitleState::Flash)
        );
        assert_eq!(TitleState::Fadein.next(0.0, &pressed), TitleStep::Stay);
        pressed.update();
        assert_eq!(TitleState::Normal.next(0.0, &pressed), TitleStep::Stay);
    }

    #[test]
    fn cursor_delta_cancels_opposing_presses() {
        let mut input = InputManager::new();
        input.key_pressed(Key::ArrowUp);
        input.key_pressed(Key::ArrowDown);
        input.update();
        assert_eq!(cursor_delta(&input, 5), None);
    }

    #[test]
    fn every_option_restarts_for_now() {
        for option in TitleOption::ALL {
            assert_eq!(option.destination(), TitleDestination::Restart);
        }
    }
}
