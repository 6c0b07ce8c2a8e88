//! Preferences - command line flags and the TOML preferences file
//!
//! The file only seeds a new session (starting zones, add-zone options,
//! theme, share origin). Session changes are never written back.

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::session::{default_seed, TimeZoneEntry};

pub const APP_NAME: &str = "zone_slider";
const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Parser, Debug, Default)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Compare the hour of day across time zones")]
pub struct Args {
    /// Start in dark mode
    #[arg(long)]
    pub dark: bool,

    /// Origin used for shareable links (e.g. https://meet.example.com)
    #[arg(long)]
    pub origin: Option<String>,

    /// Delete the preferences file and start from defaults
    #[arg(long)]
    pub reset_config: bool,
}

/// Persisted preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dark_mode: bool,
    pub share_origin: String,
    /// Entries offered by the add-zone selector
    pub zone_options: Vec<String>,
    /// Zones a new session starts with
    pub seed_zones: Vec<TimeZoneEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dark_mode: false,
            share_origin: DEFAULT_ORIGIN.to_string(),
            zone_options: vec![
                "Eastern Time".to_string(),
                "Pacific Standard Time".to_string(),
                "America/New_York".to_string(),
                "America/Los_Angeles".to_string(),
                "Europe/London".to_string(),
                "Asia/Tokyo".to_string(),
            ],
            seed_zones: default_seed(),
        }
    }
}

impl Config {
    /// Command line flags win over the file
    pub fn with_args(mut self, args: &Args) -> Self {
        if args.dark {
            self.dark_mode = true;
        }
        if let Some(origin) = &args.origin {
            self.share_origin = origin.clone();
        }
        self
    }
}

/// Load preferences from the platform config directory.
///
/// A missing file is created with defaults; an unreadable one is reported and
/// replaced by defaults for this run only.
pub fn load_preferences(args: &Args) -> Config {
    if args.reset_config {
        match shared::delete_config(APP_NAME) {
            Ok(()) => tracing::info!("preferences reset"),
            Err(e) => tracing::warn!("Failed to delete config: {}", e),
        }
    }

    let config = match shared::load_config::<Config>(APP_NAME) {
        Ok(Some(config)) => config,
        Ok(None) => {
            let config = Config::default();
            if let Err(e) = shared::save_config(APP_NAME, &config) {
                tracing::warn!("Failed to save config: {}", e);
            }
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    };

    config.with_args(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_file() {
        let args = Args::try_parse_from(["zone_slider", "--dark", "--origin", "https://x.test"])
            .unwrap();
        let config = Config::default().with_args(&args);
        assert!(config.dark_mode);
        assert_eq!(config.share_origin, "https://x.test");
    }

    #[test]
    fn test_no_args_keeps_file() {
        let args = Args::try_parse_from(["zone_slider"]).unwrap();
        let file = Config {
            dark_mode: true,
            ..Config::default()
        };
        assert_eq!(file.clone().with_args(&args), file);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("dark_mode = true").unwrap();
        assert!(config.dark_mode);
        assert_eq!(config.seed_zones, default_seed());
        assert_eq!(config.share_origin, DEFAULT_ORIGIN);
    }

    #[test]
    fn test_seed_zones_file_format() {
        let config: Config = toml::from_str(
            r#"
            [[seed_zones]]
            name = "Tokyo"
            zone = "Asia/Tokyo"

            [[seed_zones]]
            name = "London"
            zone = "Europe/London"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.seed_zones,
            vec![
                TimeZoneEntry::new("Tokyo", "Asia/Tokyo"),
                TimeZoneEntry::new("London", "Europe/London"),
            ]
        );
    }

    #[test]
    fn test_slider_values_not_written() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!text.contains("slider_value"));
        assert!(text.contains("Asia/Kolkata"));
    }
}
