use crate::{
    error::{DrawError, DrawErrorExt, Result},
    graphics::{self, Color, ColorExt},
    stroke::{Mesh, StrokePath},
    style::DrawStyle,
};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use lyon::tessellation::StrokeTessellator;
use std::{
    io::{BufWriter, Write},
    path::Path,
};

/// Blend a stroke mesh into `target`, once per covered pixel.
pub fn fill_mesh(target: &mut RgbaImage, mesh: &Mesh, color: Color) {
    let (width, height) = target.dimensions();
    graphics::cover_triangles(width, height, &mesh.vertices, &mesh.indices, |x, y| {
        let pixel = target.get_pixel_mut(x, y);
        pixel.0 = color.over(pixel.0);
    });
}

/// Pixels of every committed stroke. Vector geometry never survives a
/// commit.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
    background: Color,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Color::WHITE)
    }

    pub fn with_background(width: u32, height: u32, background: Color) -> Self {
        RasterSurface {
            image: RgbaImage::from_pixel(width, height, Rgba(background)),
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|pixel| pixel.0)
    }

    /// Every pixel is still the background color.
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|pixel| pixel.0 == self.background)
    }

    pub fn clear_to_background(&mut self) {
        let background = Rgba(self.background);
        self.image.pixels_mut().for_each(|pixel| *pixel = background);
    }

    /// Draws `path` permanently. Each call draws again, so call it once per
    /// commit.
    pub fn composite_stroke(
        &mut self,
        path: &StrokePath,
        style: &DrawStyle,
        tessellator: &mut StrokeTessellator,
    ) -> Result<()> {
        let mesh = path.tessellate(style, tessellator)?;
        fill_mesh(&mut self.image, &mesh, style.color());
        Ok(())
    }

    pub fn write_png(&self, writer: impl Write) -> Result<()> {
        PngEncoder::new(writer).write_image(
            self.image.as_raw(),
            self.width(),
            self.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }

    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::info!("export {}x{} to {}", self.width(), self.height(), path.display());

        let problem = format!("{}", path.display());
        let file = std::fs::File::create(path)
            .map_err(DrawError::from)
            .problem(problem.clone())?;

        let mut writer = BufWriter::new(file);
        self.write_png(&mut writer).problem(problem.clone())?;
        writer.flush().map_err(DrawError::from).problem(problem)?;

        Ok(())
    }
}
