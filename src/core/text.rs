use crate::core::TextBounds;

/// Text measurement capability consumed by every layout pass.
///
/// Layout never guesses glyph metrics; hosts inject the measurer that matches
/// their font stack and tests inject a deterministic one.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size_px: f64) -> TextBounds;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font_size_px: f64) -> TextBounds {
        (**self).measure(text, font_size_px)
    }
}

/// Headless measurer assuming a fixed advance per character.
///
/// Width is `chars * font_size * advance_ratio` and height is
/// `font_size * height_ratio`; empty strings measure as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceTextMeasurer {
    pub advance_ratio: f64,
    pub height_ratio: f64,
}

impl Default for MonospaceTextMeasurer {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            height_ratio: 0.75,
        }
    }
}

impl TextMeasurer for MonospaceTextMeasurer {
    fn measure(&self, text: &str, font_size_px: f64) -> TextBounds {
        if text.is_empty() {
            return TextBounds::default();
        }
        let chars = text.chars().count() as f64;
        TextBounds::new(
            chars * font_size_px * self.advance_ratio,
            font_size_px * self.height_ratio,
        )
    }
}
