use serde::{Deserialize, Serialize};

use crate::LatLng;

// ===== CONFIG TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub app: AppSection,
    pub refresh: RefreshSection,
    pub simulation: SimulationSection,
    pub endpoints: EndpointsSection,
    pub map: MapSection,
    pub shuffle: ShuffleConfig,
    pub legend: Vec<LegendEntry>,
}

// AppSection carries the config format version so older files can be migrated
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSection {
    pub version: String,
}

impl AppSection {
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    pub fn needs_migration(&self) -> bool {
        self.version != Self::CURRENT_VERSION
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RefreshSection {
    pub interval_secs: u32,
    pub min_interval_secs: u32,
    pub max_interval_secs: u32,
    pub request_timeout_ms: u32,
}

impl Default for RefreshSection {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            min_interval_secs: 1,
            max_interval_secs: 30,
            request_timeout_ms: 1000,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationSection {
    /// Simulation speed as a percentage of real time.
    pub time_multiplicand_percent: u32,
    pub max_percent: u32,
    pub session_var_key: String,
}

impl SimulationSection {
    pub fn multiplicand(&self) -> f64 {
        self.time_multiplicand_percent as f64 / 100.0
    }
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            time_multiplicand_percent: 100,
            max_percent: 500,
            session_var_key: "time_icand".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EndpointsSection {
    pub content: String,
    pub session_var: String,
}

impl Default for EndpointsSection {
    fn default() -> Self {
        Self {
            content: "/_home_get_async_content".to_string(),
            session_var: "/_set_sessionvar".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MapSection {
    pub api_key: String,
    pub zoom: u8,
    pub center: LatLng,
}

impl Default for MapSection {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            zoom: 8,
            center: LatLng::new(61.6, -149.1),
        }
    }
}

/// Text shuffle reveal settings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ShuffleConfig {
    /// How many characters are scrambled at once.
    pub steps_per_frame: usize,
    pub frames_per_second: u32,
}

impl ShuffleConfig {
    pub fn frame_delay_ms(&self) -> u32 {
        1000 / self.frames_per_second.max(1)
    }
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            steps_per_frame: 6,
            frames_per_second: 35,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub icon: String,
}

impl LegendEntry {
    fn new(label: &str, icon: &str) -> Self {
        Self {
            label: label.to_string(),
            icon: icon.to_string(),
        }
    }

    pub fn coverage_defaults() -> Vec<Self> {
        vec![
            Self::new("Two (or more) 220 MHz bases", "/static/img/greenline.png"),
            Self::new("Single 220 MHz base", "/static/img/orangeline.png"),
            Self::new("None", "/static/img/redline.png"),
        ]
    }
}

// ===== VALIDATION =====

impl DashboardConfig {
    /// Loads a config and immediately brings it into a usable state.
    pub fn from_toml_str(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        let warnings = config.validate_and_fix();
        Ok((config, warnings))
    }

    /// Clamps out-of-range values and fills empty sections.
    /// Returns one warning per correction.
    pub fn validate_and_fix(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.app.needs_migration() {
            warnings.push(format!(
                "Config version '{}' migrated to '{}'",
                self.app.version,
                AppSection::CURRENT_VERSION
            ));
            self.app = AppSection::default();
        }

        let refresh = &mut self.refresh;
        if refresh.min_interval_secs == 0 {
            warnings.push("refresh.min_interval_secs must be at least 1".to_string());
            refresh.min_interval_secs = 1;
        }
        if refresh.max_interval_secs < refresh.min_interval_secs {
            warnings.push(format!(
                "refresh.max_interval_secs {} below minimum, set to {}",
                refresh.max_interval_secs, refresh.min_interval_secs
            ));
            refresh.max_interval_secs = refresh.min_interval_secs;
        }
        let clamped = refresh
            .interval_secs
            .clamp(refresh.min_interval_secs, refresh.max_interval_secs);
        if clamped != refresh.interval_secs {
            warnings.push(format!(
                "refresh.interval_secs {} out of range, set to {}",
                refresh.interval_secs, clamped
            ));
            refresh.interval_secs = clamped;
        }
        if refresh.request_timeout_ms == 0 {
            warnings.push("refresh.request_timeout_ms must be positive, set to 1000".to_string());
            refresh.request_timeout_ms = 1000;
        }

        let simulation = &mut self.simulation;
        if simulation.max_percent == 0 {
            warnings.push("simulation.max_percent must be at least 1, set to 100".to_string());
            simulation.max_percent = 100;
        }
        if simulation.time_multiplicand_percent == 0 {
            warnings.push("simulation.time_multiplicand_percent must be at least 1".to_string());
            simulation.time_multiplicand_percent = 1;
        }
        if simulation.time_multiplicand_percent > simulation.max_percent {
            warnings.push(format!(
                "simulation.time_multiplicand_percent {} above maximum, set to {}",
                simulation.time_multiplicand_percent, simulation.max_percent
            ));
            simulation.time_multiplicand_percent = simulation.max_percent;
        }

        if self.shuffle.steps_per_frame == 0 || self.shuffle.frames_per_second == 0 {
            warnings.push("shuffle settings must be positive, defaults restored".to_string());
            self.shuffle = ShuffleConfig::default();
        }

        if self.legend.is_empty() {
            self.legend = LegendEntry::coverage_defaults();
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let (config, warnings) = DashboardConfig::from_toml_str("").unwrap();

        assert!(warnings.is_empty());
        assert_eq!(config.refresh.interval_secs, 5);
        assert_eq!(config.refresh.request_timeout_ms, 1000);
        assert_eq!(config.endpoints.content, "/_home_get_async_content");
        assert_eq!(config.legend.len(), 3);
        assert_eq!(config.shuffle, ShuffleConfig::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let content = r#"
            [refresh]
            interval_secs = 120
            min_interval_secs = 0
            max_interval_secs = 30

            [simulation]
            time_multiplicand_percent = 900
        "#;
        let (config, warnings) = DashboardConfig::from_toml_str(content).unwrap();

        assert_eq!(config.refresh.min_interval_secs, 1);
        assert_eq!(config.refresh.interval_secs, 30);
        assert_eq!(config.simulation.time_multiplicand_percent, 500);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn zero_simulation_maximum_is_restored() {
        let (config, warnings) =
            DashboardConfig::from_toml_str("[simulation]\nmax_percent = 0\n").unwrap();

        assert_eq!(config.simulation.max_percent, 100);
        assert_eq!(config.simulation.time_multiplicand_percent, 100);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("max_percent"));
    }

    #[test]
    fn zero_simulation_speed_is_raised() {
        let content = "[simulation]\ntime_multiplicand_percent = 0\n";
        let (config, warnings) = DashboardConfig::from_toml_str(content).unwrap();

        assert_eq!(config.simulation.time_multiplicand_percent, 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn old_version_is_migrated() {
        let content = r#"
            [app]
            version = "0.9.0"
        "#;
        let (config, warnings) = DashboardConfig::from_toml_str(content).unwrap();

        assert!(!config.app.needs_migration());
        assert!(warnings[0].contains("0.9.0"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = DashboardConfig::default();
        config.validate_and_fix();
        let text = toml::to_string(&config).unwrap();
        let (parsed, warnings) = DashboardConfig::from_toml_str(&text).unwrap();

        assert_eq!(parsed, config);
        assert!(warnings.is_empty());
    }

    #[test]
    fn frame_delay_follows_fps() {
        assert_eq!(ShuffleConfig::default().frame_delay_ms(), 28);
        let config = ShuffleConfig {
            steps_per_frame: 8,
            frames_per_second: 25,
        };
        assert_eq!(config.frame_delay_ms(), 40);
    }
}
