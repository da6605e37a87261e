use crate::{
    error::{DrawError, ErrorKind, Result},
    graphics::{Color, ColorExt},
};
use lyon::tessellation::{LineCap, LineJoin, StrokeOptions};

/// Paint shared by every stroke. Read at draw time, never snapshotted per
/// stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    color: Color,
    width: f32,
    tolerance: f32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        DrawStyle {
            color: Color::BLACK,
            width: crate::DEFAULT_STROKE_WIDTH,
            tolerance: crate::DEFAULT_TESSELLATION_TOLERANCE,
        }
    }
}

pub fn check_width(width: f32) -> Result<f32> {
    if width.is_finite() && width > 0. {
        Ok(width)
    } else {
        Err(DrawError::new(ErrorKind::InvalidStyle(width)))
    }
}

/// Lyon stops flattening curves below this.
pub fn check_tolerance(tolerance: f32) -> Result<f32> {
    if tolerance.is_finite() && tolerance >= crate::MIN_TESSELLATION_TOLERANCE {
        Ok(tolerance)
    } else {
        Err(DrawError::new(ErrorKind::InvalidTolerance(tolerance)))
    }
}

impl DrawStyle {
    pub fn new(color: Color, width: f32) -> Result<Self> {
        Ok(DrawStyle {
            color,
            width: check_width(width)?,
            ..Default::default()
        })
    }

    pub fn with_tolerance(self, tolerance: f32) -> Result<Self> {
        Ok(DrawStyle {
            tolerance: check_tolerance(tolerance)?,
            ..self
        })
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn cap(&self) -> LineCap {
        LineCap::Round
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) -> Result<()> {
        self.width = check_width(width)?;
        Ok(())
    }

    /// Applies both or neither.
    pub fn update(&mut self, color: Option<Color>, width: Option<f32>) -> Result<()> {
        if let Some(width) = width {
            check_width(width)?;
        }

        if let Some(color) = color {
            self.color = color;
        }

        if let Some(width) = width {
            self.width = width;
        }

        Ok(())
    }

    pub fn stroke_options(&self) -> StrokeOptions {
        StrokeOptions::default()
            .with_line_width(self.width)
            .with_line_cap(self.cap())
            .with_line_join(LineJoin::Round)
            .with_tolerance(self.tolerance)
    }
}
