use crate::{
    error::{DrawError, DrawErrorExt, ErrorKind, Result},
    graphics::{Color, ColorExt},
    pointer::PointerSessions,
    style::DrawStyle,
};
use std::path::{Path, PathBuf};

macro_rules! config {
    ($($field:ident : $ty:ty $default:block),* $(,)?) => {
        paste::paste! {
            mod default {
                use super::*;
                $(pub fn $field() -> $ty $default)*
            }

            #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
            pub struct Config {
                $(
                    #[serde(default = "default::" $field)]
                    pub $field: $ty,
                )*

                #[serde(skip)]
                had_error_parsing: bool,
            }

            impl Config {
                pub fn new() -> Self {
                    Self {
                        $($field: default::$field(),)*
                        had_error_parsing: false,
                    }
                }
            }
        }
    };
}

config!(
    touch_tolerance: f32 { crate::TOUCH_TOLERANCE },
    stroke_color: Color { Color::BLACK },
    stroke_width: f32 { crate::DEFAULT_STROKE_WIDTH },
    background_color: Color { Color::WHITE },
    tessellation_tolerance: f32 { crate::DEFAULT_TESSELLATION_TOLERANCE },
    export_directory: Option<PathBuf> { None },
    export_prefix: String { String::from("Draw") },
);

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    fn with_error(self) -> Config {
        Config {
            had_error_parsing: true,
            ..self
        }
    }

    pub fn had_error_parsing(&self) -> bool {
        self.had_error_parsing
    }

    pub fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            DrawError::because(
                ErrorKind::Io(std::io::ErrorKind::NotFound.into()),
                String::from("no config directory on this platform"),
            )
        })?;
        path.push("fingerpaint");

        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }

        path.push("config.ron");
        Ok(path)
    }

    /// Falls back to defaults when the file is missing or broken. A broken
    /// file is never overwritten by [`Config::save`].
    pub fn from_disk(path: &Path) -> Config {
        tracing::info!("load config from {}", path.display());
        let file = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Config::default();
            }
            Err(err) => {
                DrawError::from(err)
                    .problem(format!("{}", path.display()))
                    .report();
                return Config::default().with_error();
            }
        };

        Config::from_ron_str(&file)
            .problem(format!("{}", path.display()))
            .unwrap_or_else(|err| {
                err.report();
                Config::default().with_error()
            })
    }

    pub fn from_ron_str(contents: &str) -> Result<Config> {
        Ok(ron::from_str(contents)?)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        let contents = ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::new()
                .new_line(String::from("\n"))
                .indentor(String::from("  "))
                .compact_arrays(true),
        )?;

        Ok(format!(
            "// this file generated automatically.\n// do not edit while fingerpaint is running!!\n{contents}"
        ))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        tracing::info!("save config to {}", path.display());

        if self.had_error_parsing {
            // don't overwrite broken configs
            tracing::error!("had error, not saving");
            return Ok(());
        }

        let contents = self.to_ron_string()?;
        std::fs::write(path, contents)
            .map_err(DrawError::from)
            .problem(format!("{}", path.display()))
    }

    pub fn style(&self) -> Result<DrawStyle> {
        DrawStyle::new(self.stroke_color, self.stroke_width)
            .problem(String::from("stroke_width in config"))?
            .with_tolerance(self.tessellation_tolerance)
            .problem(String::from("tessellation_tolerance in config"))
    }

    pub fn pointer_sessions(&self) -> Result<PointerSessions> {
        let tolerance = self.touch_tolerance;
        if tolerance.is_finite() && tolerance >= 0. {
            Ok(PointerSessions::new(tolerance))
        } else {
            Err(DrawError::because(
                ErrorKind::InvalidTolerance(tolerance),
                String::from("touch_tolerance in config"),
            ))
        }
    }

    pub fn export_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = self.export_directory.as_ref() {
            return Ok(dir.clone());
        }

        let mut path = dirs::data_dir().ok_or_else(|| {
            DrawError::because(
                ErrorKind::Io(std::io::ErrorKind::NotFound.into()),
                String::from("no data directory on this platform"),
            )
        })?;
        path.push("fingerpaint");
        path.push("drawings");
        Ok(path)
    }
}
