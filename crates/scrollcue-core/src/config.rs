use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files live here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// How the total scroll duration is derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollMethod {
    /// Duration follows directly from the scroll speed setting
    #[default]
    Classic,
    /// Reading pace in words per minute
    Wpm,
    /// Fixed total duration in minutes
    Duration,
    /// Lines per second, estimated from text height and font metrics
    Lines,
}

impl ScrollMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ScrollMethod::Classic => "classic",
            ScrollMethod::Wpm => "wpm",
            ScrollMethod::Duration => "duration",
            ScrollMethod::Lines => "lines",
        }
    }

    pub const ALL: [ScrollMethod; 4] = [
        ScrollMethod::Classic,
        ScrollMethod::Wpm,
        ScrollMethod::Duration,
        ScrollMethod::Lines,
    ];

    /// Next method in display order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            ScrollMethod::Classic => ScrollMethod::Wpm,
            ScrollMethod::Wpm => ScrollMethod::Duration,
            ScrollMethod::Duration => ScrollMethod::Lines,
            ScrollMethod::Lines => ScrollMethod::Classic,
        }
    }
}

impl std::str::FromStr for ScrollMethod {
    type Err = crate::Error;

    /// Parse a method label, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                crate::Error::Config(format!(
                    "unknown scroll method '{}', expected classic, wpm, duration or lines",
                    s
                ))
            })
    }
}

/// Scroll timing configuration (the "method config" of the calculator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default)]
    pub method: ScrollMethod,
    /// Initial scroll speed, 1-100
    #[serde(default = "default_speed")]
    pub speed: i32,
    /// Words per minute (wpm method)
    #[serde(default = "default_wpm")]
    pub wpm: f64,
    /// Total duration in minutes (duration method)
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: f64,
    /// Lines per second (lines method)
    #[serde(default = "default_lines_per_second")]
    pub lines_per_second: f64,
    /// Font size in pixels, used for line estimation
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Line height as a multiple of the font size
    #[serde(default = "default_line_height_multiplier")]
    pub line_height_multiplier: f64,
    /// Pixels per second at speed 1 (classic method)
    #[serde(default = "default_min_speed_px")]
    pub min_speed_px: f64,
    /// Pixels per second at speed 100 (classic method)
    #[serde(default = "default_max_speed_px")]
    pub max_speed_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            method: ScrollMethod::default(),
            speed: default_speed(),
            wpm: default_wpm(),
            duration_minutes: default_duration_minutes(),
            lines_per_second: default_lines_per_second(),
            font_size: default_font_size(),
            line_height_multiplier: default_line_height_multiplier(),
            min_speed_px: default_min_speed_px(),
            max_speed_px: default_max_speed_px(),
        }
    }
}

impl ScrollConfig {
    /// Height of one rendered line in pixels, never zero
    pub fn line_height_px(&self) -> f64 {
        let font = finite_positive_or(self.font_size, default_font_size());
        let multiplier =
            finite_positive_or(self.line_height_multiplier, default_line_height_multiplier());
        font * multiplier
    }
}

/// Touch classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Press duration before a touch counts as a hold
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
    /// Maximum gap between two touch-downs forming a double-tap
    #[serde(default = "default_double_tap_ms")]
    pub double_tap_ms: u64,
    /// Maximum distance between two touch-downs forming a double-tap
    #[serde(default = "default_double_tap_distance_px")]
    pub double_tap_distance_px: f64,
    /// Extra grace added to the deferred single-tap window
    #[serde(default = "default_tap_epsilon_ms")]
    pub tap_epsilon_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_ms: default_hold_ms(),
            double_tap_ms: default_double_tap_ms(),
            double_tap_distance_px: default_double_tap_distance_px(),
            tap_epsilon_ms: default_tap_epsilon_ms(),
        }
    }
}

impl GestureConfig {
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_ms)
    }

    /// Delay before a quick tap is committed as toggle-pause
    pub fn deferred_tap_delay(&self) -> Duration {
        Duration::from_millis(self.double_tap_ms + self.tap_epsilon_ms)
    }
}

/// Container placement and resize limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerConfig {
    #[serde(default = "default_min_height")]
    pub min_height: f64,
    /// Upper bound on height as a fraction of the screen height
    #[serde(default = "default_max_height_ratio")]
    pub max_height_ratio: f64,
    #[serde(default = "default_resize_sensitivity")]
    pub resize_sensitivity: f64,
    #[serde(default = "default_container_height")]
    pub default_height: f64,
    /// Initial offset below the top safe area
    #[serde(default = "default_container_top")]
    pub default_top: f64,
    /// Space kept free at the bottom of the screen (toolbars)
    #[serde(default)]
    pub reserved_bottom: f64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            min_height: default_min_height(),
            max_height_ratio: default_max_height_ratio(),
            resize_sensitivity: default_resize_sensitivity(),
            default_height: default_container_height(),
            default_top: default_container_top(),
            reserved_bottom: 0.0,
        }
    }
}

/// Delays used to sequence stop/start pairs and debounce resets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_reset_debounce")]
    pub reset_debounce_ms: u64,
    /// Delay before restarting after a pause ends or a touch pause is released
    #[serde(default = "default_restart_delay")]
    pub restart_delay_ms: u64,
    /// Delay before the next loop after the text has fully scrolled past
    #[serde(default = "default_loop_restart_delay")]
    pub loop_restart_delay_ms: u64,
    #[serde(default = "default_speed_restart_delay")]
    pub speed_restart_delay_ms: u64,
    #[serde(default = "default_resize_restart_delay")]
    pub resize_restart_delay_ms: u64,
    #[serde(default = "default_double_tap_restart_delay")]
    pub double_tap_restart_delay_ms: u64,
    /// How long the reset indicator stays visible
    #[serde(default = "default_reset_indicator")]
    pub reset_indicator_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reset_debounce_ms: default_reset_debounce(),
            restart_delay_ms: default_restart_delay(),
            loop_restart_delay_ms: default_loop_restart_delay(),
            speed_restart_delay_ms: default_speed_restart_delay(),
            resize_restart_delay_ms: default_resize_restart_delay(),
            double_tap_restart_delay_ms: default_double_tap_restart_delay(),
            reset_indicator_ms: default_reset_indicator(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds when idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Redraw rate while the text is scrolling
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Pixels represented by one terminal row
    #[serde(default = "default_cell_height_px")]
    pub cell_height_px: f64,
    /// Pixels represented by one terminal column
    #[serde(default = "default_cell_width_px")]
    pub cell_width_px: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            cell_height_px: default_cell_height_px(),
            cell_width_px: default_cell_width_px(),
        }
    }
}

impl UiConfig {
    pub fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }
}

pub(crate) fn finite_positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrollcue")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_speed() -> i32 {
    16
}

fn default_wpm() -> f64 {
    160.0
}

fn default_duration_minutes() -> f64 {
    3.0
}

fn default_lines_per_second() -> f64 {
    1.0
}

pub(crate) fn default_font_size() -> f64 {
    24.0
}

pub(crate) fn default_line_height_multiplier() -> f64 {
    1.5
}

pub(crate) fn default_min_speed_px() -> f64 {
    10.0
}

pub(crate) fn default_max_speed_px() -> f64 {
    200.0
}

fn default_hold_ms() -> u64 {
    500
}

fn default_double_tap_ms() -> u64 {
    300
}

fn default_double_tap_distance_px() -> f64 {
    50.0
}

fn default_tap_epsilon_ms() -> u64 {
    10
}

fn default_min_height() -> f64 {
    150.0
}

fn default_max_height_ratio() -> f64 {
    0.8
}

fn default_resize_sensitivity() -> f64 {
    1.0
}

fn default_container_height() -> f64 {
    300.0
}

fn default_container_top() -> f64 {
    80.0
}

fn default_reset_debounce() -> u64 {
    300
}

fn default_restart_delay() -> u64 {
    100
}

fn default_loop_restart_delay() -> u64 {
    100
}

fn default_speed_restart_delay() -> u64 {
    50
}

fn default_resize_restart_delay() -> u64 {
    150
}

fn default_double_tap_restart_delay() -> u64 {
    250
}

fn default_reset_indicator() -> u64 {
    1000
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_cell_height_px() -> f64 {
    20.0
}

fn default_cell_width_px() -> f64 {
    10.0
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollcue/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollcue")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used by the terminal UI
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("scrollcue.log")
    }
}
