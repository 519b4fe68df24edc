//! Screen text labels.
//!
//! Labels are kept as data keyed by name. Font sizes are authored against the
//! reference viewport and rescaled when the window size changes.

use std::collections::BTreeMap;

/// Screen corner a label's offsets are measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    BottomRight,
}

/// One text label. `size` is the authored font size in pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub corner: Corner,
}

impl TextLabel {
    pub fn top_left(text: impl Into<String>, size: f32, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            size,
            x,
            y,
            corner: Corner::TopLeft,
        }
    }

    pub fn bottom_right(text: impl Into<String>, size: f32, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            size,
            x,
            y,
            corner: Corner::BottomRight,
        }
    }
}

#[derive(Debug)]
pub struct TextManager {
    labels: BTreeMap<String, TextLabel>,
    rate: f32,
}

impl TextManager {
    pub fn new() -> Self {
        Self {
            labels: BTreeMap::new(),
            rate: 1.0,
        }
    }

    /// Adds or replaces the label stored under `key`.
    pub fn add(&mut self, key: impl Into<String>, label: TextLabel) {
        self.labels.insert(key.into(), label);
    }

    pub fn remove(&mut self, key: &str) -> Option<TextLabel> {
        self.labels.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&TextLabel> {
        self.labels.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TextLabel> {
        self.labels.get_mut(key)
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, &TextLabel)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sets the display scale applied to every label's font size.
    pub fn resize(&mut self, rate: f32) {
        self.rate = rate;
    }

    pub fn effective_size(&self, key: &str) -> Option<f32> {
        self.labels.get(key).map(|label| label.size * self.rate)
    }
}

impl Default for TextManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_replace_remove() {
        let mut texts = TextManager::new();
        texts.add("fps", TextLabel::bottom_right("0.0fps", 30.0, 0.0, 0.0));
        texts.add("fps", TextLabel::bottom_right("59.9fps", 30.0, 0.0, 0.0));
        assert_eq!(texts.labels().count(), 1);
        assert_eq!(texts.get("fps").map(|l| l.text.as_str()), Some("59.9fps"));
        assert!(texts.remove("fps").is_some());
        assert!(texts.remove("fps").is_none());
    }

    #[test]
    fn resize_scales_effective_size_only() {
        let mut texts = TextManager::new();
        texts.add("hint", TextLabel::top_left("press z", 20.0, 10.0, 10.0));
        texts.resize(0.5);
        assert_eq!(texts.effective_size("hint"), Some(10.0));
        assert_eq!(texts.get("hint").map(|l| l.size), Some(20.0));
        assert_eq!(texts.effective_size("missing"), None);
    }
}
