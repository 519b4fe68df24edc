//! Drawable objects and the behaviors that shape their draw queries.
//!
//! A [`RenderingObject`] owns exactly one [`DrawQuery`]. [`Modifier`]s change
//! it once; [`Attachment`]s keep changing it every tick until they report
//! that they are done.

mod attachment;
mod modifier;

pub use attachment::{Attachment, DynamicColor, Fade, SharedAttachment};
pub use modifier::Modifier;

use crate::facade::AppFacade;
use crate::render::DrawQuery;

/// A drawable sprite with its query and currently attached behaviors.
#[derive(Debug)]
pub struct RenderingObject {
    query: DrawQuery,
    attachments: Vec<SharedAttachment>,
}

impl RenderingObject {
    /// Creates an object drawing the UV rectangle `texture_key` at unit size.
    pub fn new(texture_key: impl Into<String>) -> Self {
        Self {
            query: DrawQuery::new(texture_key),
            attachments: Vec::new(),
        }
    }

    /// Applies `modifier` once.
    pub fn modify(&mut self, modifier: Modifier) -> &mut Self {
        modifier.apply(&mut self.query);
        self
    }

    /// Applies the attachment's current state immediately and keeps it for
    /// subsequent [`update`](Self::update) calls.
    pub fn attach(&mut self, attachment: SharedAttachment) -> &mut Self {
        attachment.apply(&mut self.query);
        self.attachments.push(attachment);
        self
    }

    /// Removes `attachment` if this exact instance is attached.
    pub fn detach(&mut self, attachment: &SharedAttachment) -> &mut Self {
        self.attachments.retain(|a| !a.same_instance(attachment));
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modify(modifier);
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: SharedAttachment) -> Self {
        self.attach(attachment);
        self
    }

    /// Advances every attachment once, in attachment order, dropping those
    /// that report they are done.
    pub fn update(&mut self, delta_time: f32) {
        let query = &mut self.query;
        self.attachments
            .retain(|attachment| attachment.apply_and_advance(query, delta_time));
    }

    /// Submits the current query.
    pub fn draw(&self, app: &mut dyn AppFacade) {
        app.draw(&self.query);
    }

    pub fn query(&self) -> &DrawQuery {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut DrawQuery {
        &mut self.query
    }

    pub fn attachments(&self) -> &[SharedAttachment] {
        &self.attachments
    }

    pub fn is_attached(&self, attachment: &SharedAttachment) -> bool {
        self.attachments.iter().any(|a| a.same_instance(attachment))
    }
}
