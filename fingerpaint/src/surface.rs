use crate::{
    config::Config,
    error::{DrawError, DrawErrorExt, Result},
    event::{PointerEvent, Touch, TouchPhase},
    graphics::Color,
    pointer::PointerSessions,
    raster::{self, RasterSurface},
    style::DrawStyle,
    SurfaceHost,
};
use image::{Rgba, RgbaImage};
use lyon::tessellation::StrokeTessellator;
use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

/// Everything between the host window and the pixels.
pub struct DrawingSurface<H: SurfaceHost> {
    sessions: PointerSessions,
    raster: RasterSurface,
    style: DrawStyle,
    tessellator: StrokeTessellator,
    export_prefix: String,
    export_dir: Option<PathBuf>,
    host: H,
}

impl<H: SurfaceHost> DrawingSurface<H> {
    pub fn new(width: u32, height: u32, host: H) -> Self {
        tracing::info!("create {width}x{height} surface");
        DrawingSurface {
            sessions: PointerSessions::default(),
            raster: RasterSurface::new(width, height),
            style: DrawStyle::default(),
            tessellator: StrokeTessellator::new(),
            export_prefix: String::from("Draw"),
            export_dir: None,
            host,
        }
    }

    pub fn with_config(width: u32, height: u32, config: &Config, host: H) -> Result<Self> {
        tracing::info!("create {width}x{height} surface from config");
        Ok(DrawingSurface {
            sessions: config.pointer_sessions()?,
            raster: RasterSurface::with_background(width, height, config.background_color),
            style: config.style()?,
            tessellator: StrokeTessellator::new(),
            export_prefix: config.export_prefix.clone(),
            export_dir: config.export_dir().ok(),
            host,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn sessions(&self) -> &PointerSessions {
        &self.sessions
    }

    pub fn raster(&self) -> &RasterSurface {
        &self.raster
    }

    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn color(&self) -> Color {
        self.style.color()
    }

    pub fn line_width(&self) -> f32 {
        self.style.width()
    }

    pub fn on_pointer_event(&mut self, event: &PointerEvent) {
        for touch in event.touches.iter() {
            self.dispatch(*touch);
        }

        self.host.request_repaint();
    }

    fn dispatch(&mut self, touch: Touch) {
        let Touch {
            id,
            phase,
            location,
        } = touch;

        match phase {
            TouchPhase::Start => self.sessions.begin(id, location),

            TouchPhase::Move => {
                self.sessions.move_to(id, location);
            }

            TouchPhase::End => {
                self.sessions
                    .end(id, &mut self.raster, &self.style, &mut self.tessellator)
                    .problem(format!("committing stroke {id}"))
                    .report();
            }
        }
    }

    /// Committed pixels at the origin, then every open stroke on top.
    pub fn render(&mut self, target: &mut RgbaImage) {
        let width = target.width().min(self.raster.width());
        let height = target.height().min(self.raster.height());
        let committed = self.raster.image();
        for y in 0..height {
            for x in 0..width {
                target.put_pixel(x, y, *committed.get_pixel(x, y));
            }
        }

        for path in self.sessions.paths() {
            match path.tessellate(&self.style, &mut self.tessellator) {
                Ok(mesh) => raster::fill_mesh(target, &mesh, self.style.color()),
                Err(err) => err.problem(String::from("drawing live stroke")).report(),
            }
        }
    }

    /// A new frame the size of the surface, already rendered.
    pub fn render_frame(&mut self) -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(
            self.width(),
            self.height(),
            Rgba(self.raster.background()),
        );
        self.render(&mut frame);
        frame
    }

    /// Rejects the whole update if `width` is not positive.
    pub fn set_style(&mut self, color: Option<Color>, width: Option<f32>) -> Result<()> {
        self.style.update(color, width)?;
        tracing::debug!(
            "style now {:?} width {}",
            self.style.color(),
            self.style.width()
        );
        Ok(())
    }

    /// Aborts every open stroke and wipes the committed pixels.
    pub fn clear(&mut self) {
        tracing::info!("clear, dropping {} open strokes", self.sessions.len());
        self.sessions.clear();
        self.raster.clear_to_background();
        self.host.request_repaint();
    }

    /// Content does not survive a resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::info!(
            "resize {}x{} -> {width}x{height}, discarding content",
            self.width(),
            self.height()
        );
        self.raster = RasterSurface::with_background(width, height, self.raster.background());
        self.host.request_repaint();
    }

    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.raster.export_to_file(path)
    }

    /// Writes `<prefix><unix millis>.png` into `dir`.
    pub fn save_to_directory(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .map_err(DrawError::from)
            .problem(format!("{}", dir.display()))?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_millis())
            .unwrap_or_default();

        let path = dir.join(format!("{}{millis}.png", self.export_prefix));
        self.export_to_file(&path)?;
        Ok(path)
    }

    /// [`Self::save_to_directory`] into the configured export directory.
    pub fn save_default(&self) -> Result<PathBuf> {
        let dir = match self.export_dir.as_ref() {
            Some(dir) => dir.clone(),
            None => Config::new().export_dir()?,
        };
        self.save_to_directory(dir)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::ErrorKind,
        graphics::{ColorExt, PixelPos},
        stroke::PathCommand,
    };

    #[derive(Debug, Default)]
    struct Repaints(usize);

    impl SurfaceHost for Repaints {
        fn request_repaint(&mut self) {
            self.0 += 1;
        }
    }

    fn surface() -> DrawingSurface<Repaints> {
        DrawingSurface::new(64, 48, Repaints::default())
    }

    fn send(surface: &mut DrawingSurface<Repaints>, touch: Touch) {
        surface.on_pointer_event(&touch.into());
    }

    fn fresh(width: u32, height: u32) -> RgbaImage {
        RasterSurface::new(width, height).image().clone()
    }

    #[test]
    fn one_repaint_per_event() {
        let mut surface = surface();
        surface.on_pointer_event(&PointerEvent::default());
        assert_eq!(surface.host().0, 1);

        surface.on_pointer_event(&PointerEvent::new(vec![
            Touch::start(1, 0., 0.),
            Touch::start(2, 10., 10.),
        ]));
        assert_eq!(surface.host().0, 2);

        send(&mut surface, Touch::moved(1, 3., 3.));
        send(&mut surface, Touch::end(5, 0., 0.));
        assert_eq!(surface.host().0, 4);
    }

    #[test]
    fn end_to_end_stroke() {
        let mut surface = surface();
        send(&mut surface, Touch::start(1, 0., 0.));
        send(&mut surface, Touch::moved(1, 20., 0.));
        send(&mut surface, Touch::moved(1, 20., 3.));

        assert_eq!(
            surface.sessions().get(1).unwrap().path.commands(),
            [
                PathCommand::MoveTo(PixelPos::new(0., 0.)),
                PathCommand::QuadTo {
                    ctrl: PixelPos::new(0., 0.),
                    to: PixelPos::new(10., 0.),
                },
            ]
        );

        send(&mut surface, Touch::end(1, 20., 3.));
        assert!(surface.sessions().is_empty());

        let raster = surface.raster();
        assert_eq!(raster.pixel(5, 1), Some(Color::BLACK));
        assert_eq!(raster.pixel(0, 1), Some(Color::BLACK));
        assert_eq!(raster.pixel(20, 1), Some(Color::WHITE));
        assert_eq!(raster.pixel(5, 10), Some(Color::WHITE));
    }

    #[test]
    fn committed_stroke_is_not_live() {
        let mut surface = surface();
        send(&mut surface, Touch::start(1, 5., 20.));
        send(&mut surface, Touch::moved(1, 45., 20.));
        send(&mut surface, Touch::end(1, 45., 20.));

        let frame = surface.render_frame();
        assert_eq!(&frame, surface.raster().image());
        assert!(!surface.raster().is_blank());

        // changing the style afterwards leaves baked pixels alone
        surface.set_style(Some([0xff, 0, 0, 0xff]), None).unwrap();
        assert_eq!(surface.raster().pixel(15, 20), Some(Color::BLACK));
        assert_eq!(surface.render_frame().get_pixel(15, 20).0, Color::BLACK);
    }

    #[test]
    fn live_strokes_draw_over_raster() {
        let mut surface = surface();
        send(&mut surface, Touch::start(1, 5., 20.));
        send(&mut surface, Touch::moved(1, 45., 20.));
        assert!(surface.raster().is_blank());

        let red = [0xff, 0, 0, 0xff];
        surface.set_style(Some(red), None).unwrap();
        let frame = surface.render_frame();
        assert_eq!(frame.get_pixel(15, 20).0, red);
        assert_eq!(frame.get_pixel(15, 40).0, Color::WHITE);
        assert!(surface.raster().is_blank());
    }

    #[test]
    fn render_clips_to_smaller_target() {
        let mut surface = surface();
        send(&mut surface, Touch::start(1, 0., 5.));
        send(&mut surface, Touch::moved(1, 60., 5.));
        send(&mut surface, Touch::end(1, 60., 5.));

        let mut target = RgbaImage::from_pixel(16, 16, Rgba([0, 0xff, 0, 0xff]));
        surface.render(&mut target);
        assert_eq!(target.get_pixel(10, 5).0, Color::BLACK);
        assert_eq!(target.get_pixel(10, 15).0, Color::WHITE);
    }

    #[test]
    fn clear_aborts_everything() {
        let mut surface = surface();
        send(&mut surface, Touch::start(1, 5., 20.));
        send(&mut surface, Touch::moved(1, 45., 20.));
        send(&mut surface, Touch::end(1, 45., 20.));
        send(&mut surface, Touch::start(2, 5., 30.));
        send(&mut surface, Touch::moved(2, 45., 30.));
        let repaints = surface.host().0;

        surface.clear();
        assert_eq!(surface.host().0, repaints + 1);
        assert!(surface.sessions().is_empty());
        assert_eq!(surface.raster().image(), &fresh(64, 48));

        // the aborted pointer is gone, so its end bakes nothing
        send(&mut surface, Touch::end(2, 45., 30.));
        assert!(surface.raster().is_blank());
    }

    #[test]
    fn resize_discards_content() {
        let mut surface = surface();
        send(&mut surface, Touch::start(1, 5., 20.));
        send(&mut surface, Touch::moved(1, 45., 20.));
        send(&mut surface, Touch::end(1, 45., 20.));
        assert!(!surface.raster().is_blank());

        surface.resize(100, 30);
        assert_eq!((surface.width(), surface.height()), (100, 30));
        assert_eq!(surface.raster().image(), &fresh(100, 30));
    }

    #[test]
    fn invalid_width_is_rejected() {
        let mut surface = surface();
        let err = surface
            .set_style(Some([0xff, 0, 0, 0xff]), Some(0.))
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidStyle(_)));
        assert_eq!(surface.color(), Color::BLACK);
        assert_eq!(surface.line_width(), crate::DEFAULT_STROKE_WIDTH);
    }

    #[test]
    fn width_change_applies_to_open_stroke() {
        let mut surface = surface();
        send(&mut surface, Touch::start(1, 5., 24.));
        send(&mut surface, Touch::moved(1, 45., 24.));

        assert_eq!(surface.render_frame().get_pixel(15, 30).0, Color::WHITE);
        surface.set_style(None, Some(20.)).unwrap();
        assert_eq!(surface.render_frame().get_pixel(15, 30).0, Color::BLACK);

        send(&mut surface, Touch::end(1, 45., 24.));
        assert_eq!(surface.raster().pixel(15, 30), Some(Color::BLACK));
    }

    #[test]
    fn zero_tessellation_tolerance_is_refused() {
        let mut config = Config::new();
        config.tessellation_tolerance = 0.;
        let err = DrawingSurface::with_config(16, 16, &config, ()).err().unwrap();
        assert!(matches!(err.kind(), ErrorKind::InvalidTolerance(_)));

        config.tessellation_tolerance = crate::MIN_TESSELLATION_TOLERANCE;
        let mut surface = DrawingSurface::with_config(16, 16, &config, ()).unwrap();
        surface.on_pointer_event(&Touch::start(1, 2., 8.).into());
        surface.on_pointer_event(&Touch::moved(1, 14., 8.).into());
        surface.on_pointer_event(&Touch::end(1, 14., 8.).into());
        assert!(!surface.raster().is_blank());
    }

    #[test]
    fn non_finite_sample_is_ignored() {
        let mut surface = surface();
        send(&mut surface, Touch::start(1, 5., 5.));
        send(&mut surface, Touch::moved(1, f32::NAN, 40.));
        assert_eq!(surface.sessions().get(1).unwrap().path.commands().len(), 1);

        surface.render_frame();
        send(&mut surface, Touch::moved(1, 40., 5.));
        send(&mut surface, Touch::end(1, 40., 5.));
        assert_eq!(surface.raster().pixel(20, 5), Some(Color::BLACK));
    }

    #[test]
    fn unknown_pointers_change_nothing() {
        let mut surface = surface();
        send(&mut surface, Touch::moved(99, 10., 10.));
        send(&mut surface, Touch::end(99, 10., 10.));
        assert!(surface.sessions().is_empty());
        assert!(surface.raster().is_blank());
    }

    #[test]
    fn save_names_file_with_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new();
        config.export_prefix = String::from("Sketch");
        config.export_directory = Some(dir.path().join("out"));
        let surface = DrawingSurface::with_config(8, 8, &config, ()).unwrap();

        let path = surface.save_default().unwrap();
        assert_eq!(path.parent(), Some(dir.path().join("out").as_path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Sketch"), "{name}");
        assert!(name.ends_with(".png"), "{name}");
        assert!(path.exists());
    }

    #[test]
    fn config_sets_background_and_tolerance() {
        let mut config = Config::new();
        config.background_color = Color::grey(0x20);
        config.touch_tolerance = 2.;
        let mut surface = DrawingSurface::with_config(16, 16, &config, ()).unwrap();
        assert_eq!(surface.raster().pixel(0, 0), Some(Color::grey(0x20)));

        surface.on_pointer_event(&Touch::start(1, 2., 2.).into());
        surface.on_pointer_event(&Touch::moved(1, 5., 2.).into());
        assert_eq!(surface.sessions().get(1).unwrap().path.commands().len(), 2);
    }
}
