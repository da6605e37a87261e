use lyon::tessellation::TessellationError;
use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

pub type Result<T> = std::result::Result<T, DrawError>;

pub trait DrawErrorExt {
    fn report(self);
    fn problem(self, why: String) -> Self;
}

impl<T> DrawErrorExt for Result<T> {
    fn report(self) {
        if let Err(err) = self {
            err.report();
        }
    }

    fn problem(mut self, why: String) -> Self {
        if let Err(err) = self.as_mut() {
            err.why.push(why);
        }

        self
    }
}

impl DrawErrorExt for DrawError {
    fn report(self) {
        let msg = self
            .why
            .iter()
            .rev()
            .fold(String::new(), |acc, why| format!("{acc}{why}: "));
        tracing::error!("{msg}{}", self.kind);
    }

    fn problem(mut self, why: String) -> Self {
        self.why.push(why);
        self
    }
}

#[derive(Debug)]
pub struct DrawError {
    kind: ErrorKind,
    why: Vec<String>,
}

impl DrawError {
    pub fn because(kind: ErrorKind, reason: String) -> Self {
        DrawError {
            kind,
            why: vec![reason],
        }
    }

    pub fn new(kind: ErrorKind) -> Self {
        DrawError {
            kind,
            why: Vec::new(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Context, innermost first.
    pub fn why(&self) -> &[String] {
        &self.why
    }
}

impl Display for DrawError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for why in self.why.iter().rev() {
            write!(f, "{why}: ")?;
        }
        write!(f, "{}", self.kind)
    }
}

impl Error for DrawError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            ErrorKind::Encode(err) => Some(err),
            ErrorKind::Tessellation(err) => Some(err),
            ErrorKind::Config(err) => Some(err),
            ErrorKind::Serialize(err) => Some(err),
            ErrorKind::InvalidStyle(_) | ErrorKind::InvalidTolerance(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum ErrorKind {
    Io(std::io::Error),
    Encode(image::ImageError),
    InvalidStyle(f32),
    InvalidTolerance(f32),
    Tessellation(TessellationError),
    Config(ron::error::SpannedError),
    Serialize(ron::Error),
}

impl From<std::io::Error> for DrawError {
    fn from(err: std::io::Error) -> Self {
        DrawError::new(ErrorKind::Io(err))
    }
}

impl From<image::ImageError> for DrawError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(err) => DrawError::from(err),
            err => DrawError::new(ErrorKind::Encode(err)),
        }
    }
}

impl From<TessellationError> for DrawError {
    fn from(err: TessellationError) -> Self {
        DrawError::new(ErrorKind::Tessellation(err))
    }
}

impl From<ron::Error> for DrawError {
    fn from(err: ron::Error) -> Self {
        DrawError::new(ErrorKind::Serialize(err))
    }
}

impl From<ron::error::SpannedError> for DrawError {
    fn from(err: ron::error::SpannedError) -> Self {
        DrawError::new(ErrorKind::Config(err))
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::Io(err) => write!(f, "{err}"),
            ErrorKind::Encode(err) => write!(f, "Could not encode image: {err}"),
            ErrorKind::InvalidStyle(width) => {
                write!(f, "Stroke width must be positive, got {width}")
            }
            ErrorKind::InvalidTolerance(tolerance) => {
                write!(f, "Tolerance out of range, got {tolerance}")
            }
            ErrorKind::Tessellation(err) => write!(f, "Could not tessellate stroke: {err}"),
            ErrorKind::Config(err) => write!(f, "Bad config: {err}"),
            ErrorKind::Serialize(err) => write!(f, "Could not write config: {err}"),
        }
    }
}
