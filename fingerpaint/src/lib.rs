#![allow(clippy::new_without_default, clippy::derive_partial_eq_without_eq)]

pub mod config;
pub mod error;
pub mod event;
pub mod graphics;
pub mod pointer;
pub mod preview;
pub mod raster;
pub mod stroke;
pub mod style;
pub mod surface;

pub extern crate image;
pub extern crate lyon;

pub use crate::{
    error::{DrawError, ErrorKind},
    event::{PointerEvent, Touch, TouchPhase},
    graphics::{Color, ColorExt, PixelPos},
    pointer::PointerId,
    surface::DrawingSurface,
};

/// Smaller motions than this, in either axis, are noise.
pub const TOUCH_TOLERANCE: f32 = 10.;

pub const DEFAULT_STROKE_WIDTH: f32 = 7.;
pub const DEFAULT_TESSELLATION_TOLERANCE: f32 = 0.1;
pub const MIN_TESSELLATION_TOLERANCE: f32 = 0.001;

/// The window or view a [`DrawingSurface`] lives in.
pub trait SurfaceHost: std::fmt::Debug {
    fn request_repaint(&mut self);
}

impl SurfaceHost for () {
    fn request_repaint(&mut self) {}
}
