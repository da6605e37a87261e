//! The swatch shown next to a width picker.

use crate::{
    error::Result,
    graphics::{Color, PixelPos},
    raster::RasterSurface,
    stroke::StrokePath,
    style::DrawStyle,
};
use lyon::tessellation::StrokeTessellator;

pub const PREVIEW_WIDTH: u32 = 400;
pub const PREVIEW_HEIGHT: u32 = 100;

const LINE_START: PixelPos = PixelPos { x: 30., y: 50. };
const LINE_END: PixelPos = PixelPos { x: 370., y: 50. };

/// One round-capped horizontal line on white.
pub fn width_preview(color: Color, width: f32) -> Result<RasterSurface> {
    let style = DrawStyle::new(color, width)?;

    let mut line = StrokePath::new();
    line.move_to(LINE_START);
    line.line_to(LINE_END);

    let mut raster = RasterSurface::new(PREVIEW_WIDTH, PREVIEW_HEIGHT);
    raster.composite_stroke(&line, &style, &mut StrokeTessellator::new())?;
    Ok(raster)
}
