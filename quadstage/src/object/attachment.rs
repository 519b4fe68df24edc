use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::math::Vec4;
use crate::render::DrawQuery;

/// Persistent, time-advancing behavior re-applied to an object every tick.
pub trait Attachment {
    /// Resets the internal clock to zero.
    fn init(&mut self);

    /// Writes the current state into `query` without advancing time.
    fn apply(&self, query: &mut DrawQuery);

    /// Writes into `query`, advances the clock by `delta_time`, and returns
    /// whether the attachment should stay attached.
    fn apply_and_advance(&mut self, query: &mut DrawQuery, delta_time: f32) -> bool;

    /// Time accumulated since construction or the last [`init`](Self::init).
    fn elapsed(&self) -> f32;
}

/// Shared handle to an attachment instance.
///
/// The same instance can be moved between objects; its clock travels with
/// it. Call [`init`](Self::init) before re-attaching to restart it.
/// Equality for [`detach`](super::RenderingObject::detach) is identity.
#[derive(Clone)]
pub struct SharedAttachment(Rc<RefCell<dyn Attachment>>);

impl SharedAttachment {
    pub fn new<A: Attachment + 'static>(attachment: A) -> Self {
        let inner: Rc<RefCell<dyn Attachment>> = Rc::new(RefCell::new(attachment));
        Self(inner)
    }

    pub fn init(&self) {
        self.0.borrow_mut().init();
    }

    pub fn apply(&self, query: &mut DrawQuery) {
        self.0.borrow().apply(query);
    }

    pub fn apply_and_advance(&self, query: &mut DrawQuery, delta_time: f32) -> bool {
        self.0.borrow_mut().apply_and_advance(query, delta_time)
    }

    pub fn elapsed(&self) -> f32 {
        self.0.borrow().elapsed()
    }

    /// True when both handles point at the same instance.
    pub fn same_instance(&self, other: &SharedAttachment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SharedAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedAttachment")
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

/// Linear alpha ramp from `start` to `end` over `interval` time units.
///
/// Detaches itself on the tick that reaches the interval.
#[derive(Clone, Debug, PartialEq)]
pub struct Fade {
    start: f32,
    end: f32,
    interval: f32,
    elapsed: f32,
}

impl Fade {
    pub fn new(start: f32, end: f32, interval: f32) -> Self {
        Self {
            start: start.clamp(0.0, 1.0),
            end: end.clamp(0.0, 1.0),
            interval,
            elapsed: 0.0,
        }
    }

    /// Alpha at the current point of the ramp.
    pub fn alpha(&self) -> f32 {
        let progress = if self.interval > 0.0 {
            (self.elapsed / self.interval).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.start + progress * (self.end - self.start)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.interval
    }
}

impl Attachment for Fade {
    fn init(&mut self) {
        self.elapsed = 0.0;
    }

    fn apply(&self, query: &mut DrawQuery) {
        query.color.w = self.alpha();
    }

    fn apply_and_advance(&mut self, query: &mut DrawQuery, delta_time: f32) -> bool {
        if self.is_finished() {
            return false;
        }
        self.elapsed += delta_time;
        query.color.w = self.alpha();
        !self.is_finished()
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// RGBA computed every tick from the attachment's own elapsed time.
///
/// Never detaches itself.
pub struct DynamicColor {
    color_fn: Box<dyn Fn(f32) -> Vec4>,
    elapsed: f32,
}

impl DynamicColor {
    pub fn new(color_fn: impl Fn(f32) -> Vec4 + 'static) -> Self {
        Self {
            color_fn: Box::new(color_fn),
            elapsed: 0.0,
        }
    }

    fn color(&self) -> Vec4 {
        (self.color_fn)(self.elapsed).clamp(Vec4::ZERO, Vec4::ONE)
    }
}

impl fmt::Debug for DynamicColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicColor")
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

impl Attachment for DynamicColor {
    fn init(&mut self) {
        self.elapsed = 0.0;
    }

    fn apply(&self, query: &mut DrawQuery) {
        query.color = self.color();
    }

    fn apply_and_advance(&mut self, query: &mut DrawQuery, delta_time: f32) -> bool {
        query.color = self.color();
        self.elapsed += delta_time;
        true
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
