//! Viewer options: plain data with defaults, never read from disk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Per-frame clear color, RGBA in [0, 1].
    pub background: [f32; 4],
    pub vsync: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Reverse row order before encoding 4-channel captures.
    pub flip_vertical: bool,
    pub path: PathBuf,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "vistream".to_owned(),
            background: [1.0, 1.0, 1.0, 1.0],
            vsync: true,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            flip_vertical: true,
            path: PathBuf::from("frame.png"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.window.width, 800);
        assert_eq!(parsed.window.height, 600);
        assert_eq!(parsed.window.title, "vistream");
        assert_eq!(parsed.window.background, [1.0, 1.0, 1.0, 1.0]);
        assert!(parsed.window.vsync);
        assert!(parsed.capture.flip_vertical);
        assert_eq!(parsed.capture.path, PathBuf::from("frame.png"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml_str = r#"
[window]
width = 1280
height = 720
"#;
        let parsed: Config = toml::from_str(toml_str).expect("deserialize");
        assert_eq!(parsed.window.width, 1280);
        assert_eq!(parsed.window.height, 720);
        // Other fields should be defaults
        assert_eq!(parsed.window.title, "vistream");
        assert!(parsed.capture.flip_vertical);
    }
}
