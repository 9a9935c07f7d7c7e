//! Engine settings
//!
//! Field names serialize in PascalCase so existing JSON configuration files
//! load unchanged.

use serde::{Deserialize, Serialize};

use crate::render::color::Color;

use super::{Config, ConfigError};

/// Top level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Settings {
    /// Engine switches and diagnostics
    pub engine: EngineSettings,
    /// Window and resolution
    pub window: WindowSettings,
    /// Camera placement
    pub camera: CameraSettings,
    /// Default font
    pub font: FontSettings,
}

impl Config for Settings {}

impl Settings {
    /// Reject values the engine cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.window;
        for (label, dims) in [("DeviceRes", &w.device_res), ("VirtualRes", &w.virtual_res)] {
            if dims.width == 0 || dims.height == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{label} must be non-zero, got {}x{}",
                    dims.width, dims.height
                )));
            }
        }

        if w.title.trim().is_empty() {
            return Err(ConfigError::Invalid("window Title is empty".to_string()));
        }

        if self.engine.fps_refresh_rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "FPSRefreshRate must be positive, got {}",
                self.engine.fps_refresh_rate
            )));
        }

        Ok(())
    }
}

/// Engine switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct EngineSettings {
    /// Launch refuses to start when false
    pub enabled: bool,
    /// Frames a headless host runs before stopping, 0 for unlimited
    pub loop_for: u32,
    /// Log the settings at launch
    pub show_config: bool,
    /// Log graphics driver details
    #[serde(rename = "ShowGLInfo")]
    pub show_gl_info: bool,
    /// Log monitor details
    pub show_monitor_info: bool,
    /// Log frame timing
    pub show_timing_info: bool,
    /// Log joystick details
    pub show_joystick_info: bool,
    /// Requested GL major version
    #[serde(rename = "GLMajorVersion")]
    pub gl_major_version: u32,
    /// Requested GL minor version
    #[serde(rename = "GLMinorVersion")]
    pub gl_minor_version: u32,
    /// Seconds between frame rate reports
    #[serde(rename = "FPSRefreshRate")]
    pub fps_refresh_rate: f32,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            loop_for: 0,
            show_config: false,
            show_gl_info: false,
            show_monitor_info: false,
            show_timing_info: false,
            show_joystick_info: false,
            gl_major_version: 4,
            gl_minor_version: 5,
            fps_refresh_rate: 1.0,
            log_level: "info".to_string(),
        }
    }
}

/// Window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct WindowSettings {
    /// Color depth
    pub bits_per_pixel: u32,
    /// Swap on vertical sync
    #[serde(rename = "LockToVSync")]
    pub lock_to_vsync: bool,
    /// Background color
    pub clear_color: Color,
    /// Resolution the game is designed for
    pub virtual_res: Dimensions,
    /// Physical window resolution
    pub device_res: Dimensions,
    /// Full screen window
    pub full_screen: bool,
    /// "Landscape" or "Portrait"
    pub orientation: String,
    /// Window position on the desktop
    pub position: Coordinate,
    /// Window title
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            bits_per_pixel: 32,
            lock_to_vsync: true,
            clear_color: Color::from_ints(255, 127, 0, 255),
            virtual_res: Dimensions::new(1024, 768),
            device_res: Dimensions::new(1024, 768),
            full_screen: false,
            orientation: "Landscape".to_string(),
            position: Coordinate::default(),
            title: "Ranger".to_string(),
        }
    }
}

/// Camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CameraSettings {
    /// Put the origin at the center of the screen
    pub centered: bool,
    /// View translation
    pub view: ViewOffset,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            centered: true,
            view: ViewOffset {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
        }
    }
}

/// Font settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct FontSettings {
    /// Directory holding font files
    pub path: String,
    /// Font file name
    pub name: String,
    /// Point size
    pub size: u32,
    /// Render scale
    pub scale: f32,
    /// Character set selector
    pub chars_from_set: u32,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            path: "assets/fonts".to_string(),
            name: "Roboto-Regular.ttf".to_string(),
            size: 32,
            scale: 1.0,
            chars_from_set: 0,
        }
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimensions {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Dimensions {
    /// Create dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// As a `(width, height)` pair
    pub fn as_pair(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Integer position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Coordinate {
    /// X
    pub x: i32,
    /// Y
    pub y: i32,
}

/// View translation components
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewOffset {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
    /// Z
    pub z: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"
    {
        // Engine section
        "Engine": {
            "Enabled": true,
            "LoopFor": 120,
            "ShowGLInfo": true,
            "GLMajorVersion": 4,
            "FPSRefreshRate": 0.5
        },
        /* Window section */
        "Window": {
            "ClearColor": {"R": 1.0, "G": 0.5, "B": 0.0, "A": 1.0},
            "VirtualRes": {"Width": 800, "Height": 600},
            "DeviceRes": {"Width": 1600, "Height": 900},
            "Title": "Ranger // demo"
        },
        "Camera": {"Centered": false, "View": {"X": 0.0, "Y": 0.0, "Z": -1.0}},
        "Font": {"Size": 24}
    }
    "#;

    #[test]
    fn test_json_with_comments_loads() {
        let settings = Settings::load_from_str(JSON, "config.json").unwrap();
        assert_eq!(settings.engine.loop_for, 120);
        assert!(settings.engine.show_gl_info);
        assert_eq!(settings.window.device_res, Dimensions::new(1600, 900));
        assert_eq!(settings.window.title, "Ranger // demo");
        assert!(!settings.camera.centered);
        assert_eq!(settings.camera.view.z, -1.0);
        assert_eq!(settings.font.size, 24);
        // Unspecified fields fall back to defaults.
        assert_eq!(settings.font.scale, 1.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("ranger_settings_{}.toml", std::process::id()));
        let path = path.to_string_lossy().to_string();

        let mut settings = Settings::default();
        settings.window.title = "Saved".to_string();
        settings.save_to_file(&path).unwrap();

        let loaded = Settings::load_from_file(&path).unwrap();
        assert_eq!(loaded, settings);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_ron_loads() {
        let ron = r#"(Engine: (Enabled: false), Window: (Title: "Ron"))"#;
        let settings = Settings::load_from_str(ron, "config.ron").unwrap();
        assert!(!settings.engine.enabled);
        assert_eq!(settings.window.title, "Ron");
    }

    #[test]
    fn test_unsupported_format() {
        let err = Settings::load_from_str("", "config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(p) if p == "config.yaml"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.window.virtual_res = Dimensions::new(0, 600);
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        let mut settings = Settings::default();
        settings.window.title = "  ".to_string();
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }
}
