//! Sizing of the abstract layout units

use serde::Deserialize;

use super::error::LayoutError;

/// Allowed bounding box margin, in layout units
pub const MARGIN_RANGE: (f64, f64) = (0.5, 1.5);

/// Scale of the character-width and line-height units
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingContext {
    /// Absolute width of one character-width unit
    pub char_width: f64,

    /// Absolute height of one line-height unit
    pub line_height: f64,

    /// Horizontal bounding box margin, in character widths
    pub margin_x: f64,

    /// Vertical bounding box margin, in line heights
    pub margin_y: f64,
}

impl Default for SizingContext {
    fn default() -> Self {
        Self {
            char_width: 0.5,
            line_height: 0.7,
            margin_x: 1.0,
            margin_y: 0.5,
        }
    }
}

impl SizingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute size of both units
    pub fn with_units(mut self, char_width: f64, line_height: f64) -> Self {
        self.char_width = char_width;
        self.line_height = line_height;
        self
    }

    /// Set the bounding box margins
    pub fn with_margins(mut self, margin_x: f64, margin_y: f64) -> Self {
        self.margin_x = margin_x;
        self.margin_y = margin_y;
        self
    }

    /// Check unit sizes are positive and margins within [`MARGIN_RANGE`]
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (field, value) in [("char_width", self.char_width), ("line_height", self.line_height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::sizing(field, format!("{value} is not a positive size")));
            }
        }
        let (lowest, highest) = MARGIN_RANGE;
        for (field, value) in [("margin_x", self.margin_x), ("margin_y", self.margin_y)] {
            if !(lowest..=highest).contains(&value) {
                return Err(LayoutError::sizing(
                    field,
                    format!("{value} is not within [{lowest}, {highest}]"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizing() {
        let sizing = SizingContext::default();
        assert_eq!(sizing.char_width, 0.5);
        assert_eq!(sizing.line_height, 0.7);
        assert_eq!(sizing.margin_x, 1.0);
        assert_eq!(sizing.margin_y, 0.5);
        assert!(sizing.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let sizing = SizingContext::new().with_units(2.0, 3.0).with_margins(1.5, 0.5);
        assert_eq!(sizing.char_width, 2.0);
        assert_eq!(sizing.line_height, 3.0);
        assert_eq!(sizing.margin_x, 1.5);
    }

    #[test]
    fn test_margins_out_of_range() {
        let err = SizingContext::new().with_margins(2.0, 0.5).validate().unwrap_err();
        assert!(err.to_string().contains("margin_x"));
        assert!(SizingContext::new().with_units(0.0, 1.0).validate().is_err());
    }
}
