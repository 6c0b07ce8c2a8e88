//! Shared time and configuration utilities for the zone slider.

mod config;
mod time_engine;

pub use config::{
    config_dir, config_path, delete_config, delete_config_at, load_config, load_config_from,
    save_config, save_config_to, ConfigError,
};
pub use time_engine::{
    anchor_instant, clamp_date, format_utc_offset, format_zone_label, local_date,
    parse_timezone, search_timezones, shift_date, utc_label, utc_offset_minutes,
    with_local_date, ZoneError, ZoneRule, KOLKATA,
};
