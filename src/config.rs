//! Configuration for interpolation, shape classification and logging.

use crate::error::{AnnotariaError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// How many frames to insert between consecutive keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum InterpolationMode {
    /// Insert `factor` frames per unit of id gap, independent of files on disk.
    Manual { factor: u32 },
    /// Insert exactly the frames that exist on disk but carry no annotation.
    Automatic,
}

/// Settings for one interpolation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    pub mode: InterpolationMode,
    /// Collect raw-vs-fitted diagnostics per track.
    #[serde(default)]
    pub debug: bool,
}

impl InterpolationConfig {
    pub fn manual(factor: u32) -> Self {
        Self {
            mode: InterpolationMode::Manual { factor },
            debug: false,
        }
    }

    pub fn automatic() -> Self {
        Self {
            mode: InterpolationMode::Automatic,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Thresholds used by the geometric shape classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Annotations with a stored area below this are degenerate (point or line).
    pub degenerate_area: f64,
    /// Maximum ratio of the second to the first singular value for a line.
    pub line_tolerance: f64,
    /// Maximum standard deviation of vertex-to-centroid distances for a circle.
    pub circle_std_threshold: f64,
    /// Polygons with fewer vertices are never reclassified as circles.
    ///
    /// Every rectangle has its corners on a common circle, so four-vertex
    /// boxes would otherwise pass the distance test.
    pub circle_min_vertices: usize,
}

impl ClassifierConfig {
    pub const DEFAULT_DEGENERATE_AREA: f64 = 3.0;
    pub const DEFAULT_LINE_TOLERANCE: f64 = 0.01;
    pub const DEFAULT_CIRCLE_STD_THRESHOLD: f64 = 1.0;
    pub const DEFAULT_CIRCLE_MIN_VERTICES: usize = 5;

    /// Reject non-finite or non-positive thresholds.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("degenerate_area", self.degenerate_area),
            ("line_tolerance", self.line_tolerance),
            ("circle_std_threshold", self.circle_std_threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnnotariaError::InvalidConfig(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }
        if self.circle_min_vertices < 3 {
            return Err(AnnotariaError::InvalidConfig(format!(
                "circle_min_vertices must be at least 3, got {}",
                self.circle_min_vertices
            )));
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ToleranceProfile::Default.thresholds()
    }
}

/// Named threshold presets.
///
/// Names map to numbers through this enum only; an unknown name is rejected
/// when the configuration is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceProfile {
    Strict,
    #[default]
    Default,
    Lenient,
}

impl ToleranceProfile {
    pub fn thresholds(self) -> ClassifierConfig {
        let (degenerate_area, line_tolerance, circle_std_threshold) = match self {
            ToleranceProfile::Strict => (1.0, 0.001, 0.5),
            ToleranceProfile::Default => (
                ClassifierConfig::DEFAULT_DEGENERATE_AREA,
                ClassifierConfig::DEFAULT_LINE_TOLERANCE,
                ClassifierConfig::DEFAULT_CIRCLE_STD_THRESHOLD,
            ),
            ToleranceProfile::Lenient => (5.0, 0.05, 2.0),
        };
        ClassifierConfig {
            degenerate_area,
            line_tolerance,
            circle_std_threshold,
            circle_min_vertices: ClassifierConfig::DEFAULT_CIRCLE_MIN_VERTICES,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "annotaria=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// On-disk application configuration.
///
/// When `profile` is set it supplies the classifier thresholds; explicit
/// `classifier` values are used otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub profile: Option<ToleranceProfile>,
    pub classifier: ClassifierConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: AppConfig = serde_json::from_reader(BufReader::new(file))?;
        config.resolved()
    }

    /// Parse and validate a JSON configuration string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.resolved()
    }

    fn resolved(mut self) -> Result<Self> {
        if let Some(profile) = self.profile {
            self.classifier = profile.thresholds();
        }
        self.classifier.validate()?;
        Ok(self)
    }
}
