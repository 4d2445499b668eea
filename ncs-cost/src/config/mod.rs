/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Loop-set configuration loading and saving.
//!
//! The expected YAML structure is:
//! ```yaml
//! n_channels: 1
//! max_cost: 25000.0      # optional
//! period: 4              # optional, episode length
//! loops:
//!   - a: [[0.5]]
//!     b: [[1.0]]
//!     c: [[1.0]]
//!     q: [[1.0]]
//!     r: [[1.0]]
//!     w: [[1.0]]
//!     v: [[1.0]]
//! schedules:             # optional, evaluated by the CLI
//!   - [0, 1]
//! ```
//!
//! Matrices are written row-major, one inner list per row.  Loops are numbered
//! from 1 in file order.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cost::{CostEvaluator, DEFAULT_MAX_COST};
use crate::error::ConstructionError;
use crate::model::{matrix_from_rows, matrix_to_rows, LoopModel};

// ── Data structures ───────────────────────────────────────────────────────────

/// One loop's matrices as they appear in the YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    pub a: Vec<Vec<f64>>,
    pub b: Vec<Vec<f64>>,
    pub c: Vec<Vec<f64>>,
    pub q: Vec<Vec<f64>>,
    pub r: Vec<Vec<f64>>,
    pub w: Vec<Vec<f64>>,
    pub v: Vec<Vec<f64>>,
}

impl LoopConfig {
    /// Convert to a validated [`LoopModel`].
    ///
    /// Errors carry `loop_id == 0`; [`SystemConfig::loop_models`] fills in the
    /// real id.
    pub fn to_model(&self) -> Result<LoopModel, ConstructionError> {
        LoopModel::new(
            matrix_from_rows(&self.a, "A")?,
            matrix_from_rows(&self.b, "B")?,
            matrix_from_rows(&self.c, "C")?,
            matrix_from_rows(&self.q, "Q")?,
            matrix_from_rows(&self.r, "R")?,
            matrix_from_rows(&self.w, "W")?,
            matrix_from_rows(&self.v, "V")?,
        )
    }

    pub fn from_model(model: &LoopModel) -> Self {
        Self {
            a: matrix_to_rows(model.a()),
            b: matrix_to_rows(model.b()),
            c: matrix_to_rows(model.c()),
            q: matrix_to_rows(model.q()),
            r: matrix_to_rows(model.r()),
            w: matrix_to_rows(model.w()),
            v: matrix_to_rows(model.v()),
        }
    }
}

/// Serde default for `max_cost`.
fn default_max_cost() -> f64 {
    DEFAULT_MAX_COST
}

/// A loop set plus the run settings that go with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Channels available per time step.
    pub n_channels: usize,

    /// Cost reported when an unstable loop is never served.
    #[serde(default = "default_max_cost")]
    pub max_cost: f64,

    /// Episode length; `None` when the file only describes loops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<usize>,

    pub loops: Vec<LoopConfig>,

    /// Schedules to evaluate, as allocation indices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedules: Vec<Vec<usize>>,
}

impl SystemConfig {
    /// Wrap existing models (e.g. from the generator) into a config.
    pub fn from_models(models: &[LoopModel], n_channels: usize) -> Self {
        Self {
            n_channels,
            max_cost: DEFAULT_MAX_COST,
            period: None,
            loops: models.iter().map(LoopConfig::from_model).collect(),
            schedules: Vec::new(),
        }
    }

    /// Parse `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or if the YAML is
    /// structurally invalid.  Matrix shapes are checked later, by
    /// [`loop_models`](Self::loop_models).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading loop-set configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config: SystemConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        if config.loops.is_empty() {
            warn!("Configuration file {} defines no loops", path.display());
        }
        info!(
            loops = config.loops.len(),
            channels = config.n_channels,
            schedules = config.schedules.len(),
            max_cost = config.max_cost,
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Write the config as YAML to `path`.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialise configuration")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Cannot write configuration file: {}", path.display()))?;
        info!(loops = self.loops.len(), "Wrote configuration to {}", path.display());
        Ok(())
    }

    /// Validated models, loop 1 first.
    pub fn loop_models(&self) -> Result<Vec<LoopModel>, ConstructionError> {
        self.loops
            .iter()
            .enumerate()
            .map(|(i, lc)| {
                let model = lc.to_model().map_err(|e| e.for_loop(i + 1))?;
                let dims = model.dimensions();
                debug!(loop_id = i + 1, n = dims.n, m = dims.m, p = dims.p, "  Loop");
                Ok(model)
            })
            .collect()
    }

    /// Build the evaluator described by this config.
    pub fn build_evaluator(&self) -> Result<CostEvaluator, ConstructionError> {
        CostEvaluator::with_max_cost(self.loop_models()?, self.n_channels, self.max_cost)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const TWO_SCALAR_LOOPS: &str = r#"
n_channels: 1
period: 2
loops:
  - a: [[0.5]]
    b: [[1.0]]
    c: [[1.0]]
    q: [[1.0]]
    r: [[1.0]]
    w: [[1.0]]
    v: [[1.0]]
  - a: [[1.5]]
    b: [[1.0]]
    c: [[1.0]]
    q: [[1.0]]
    r: [[1.0]]
    w: [[1.0]]
    v: [[1.0]]
schedules:
  - [0, 1]
  - [0, 0]
"#;

    #[test]
    fn load_example_yaml() {
        let f = yaml_tempfile(TWO_SCALAR_LOOPS);
        let config = SystemConfig::load_from_file(f.path()).unwrap();

        assert_eq!(config.n_channels, 1);
        assert_eq!(config.period, Some(2));
        assert_eq!(config.loops.len(), 2);
        assert_eq!(config.schedules, vec![vec![0, 1], vec![0, 0]]);
        // Default applied
        assert_eq!(config.max_cost, DEFAULT_MAX_COST);

        let models = config.loop_models().unwrap();
        assert_eq!(models[1].a()[(0, 0)], 1.5);
    }

    #[test]
    fn evaluator_from_config_applies_max_cost() {
        let yaml = TWO_SCALAR_LOOPS.replace("n_channels: 1", "n_channels: 1\nmax_cost: 99.0");
        let f = yaml_tempfile(&yaml);
        let config = SystemConfig::load_from_file(f.path()).unwrap();
        let evaluator = config.build_evaluator().unwrap();
        // Loop 2 is unstable and never served by [0, 0]
        assert_eq!(evaluator.evaluate(&[0, 0]).unwrap(), 99.0);
    }

    #[test]
    fn mismatched_matrix_reports_loop_id() {
        let yaml = r#"
n_channels: 1
loops:
  - a: [[0.5, 0.0], [0.0, 0.5]]
    b: [[1.0], [0.0]]
    c: [[1.0, 0.0]]
    q: [[1.0]]
    r: [[1.0]]
    w: [[1.0, 0.0], [0.0, 1.0]]
    v: [[1.0]]
"#;
        let f = yaml_tempfile(yaml);
        let config = SystemConfig::load_from_file(f.path()).unwrap();
        assert_eq!(
            config.loop_models().unwrap_err(),
            ConstructionError::DimensionMismatch {
                loop_id: 1,
                matrix: "Q",
                expected: (2, 2),
                actual: (1, 1)
            }
        );
    }

    #[test]
    fn ragged_matrix_reports_loop_id() {
        let yaml = TWO_SCALAR_LOOPS.replace("a: [[1.5]]", "a: [[1.5, 0.0], [1.0]]");
        let f = yaml_tempfile(&yaml);
        let config = SystemConfig::load_from_file(f.path()).unwrap();
        assert_eq!(
            config.loop_models().unwrap_err(),
            ConstructionError::RaggedMatrix {
                loop_id: 2,
                matrix: "A"
            }
        );
    }

    #[test]
    fn missing_file_returns_error() {
        let result = SystemConfig::load_from_file(Path::new("/nonexistent/path/loops.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(SystemConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn missing_channels_field_returns_error() {
        let f = yaml_tempfile("loops: []\n");
        assert!(SystemConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn save_then_load_preserves_models() {
        let models = vec![
            LoopModel::scalar(0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0),
            LoopModel::scalar(0.9, 2.0, 0.5, 1.0, 3.0, 1.0, 0.2),
        ];
        let config = SystemConfig::from_models(&models, 1);

        let f = NamedTempFile::new().unwrap();
        config.save_to_file(f.path()).unwrap();
        let loaded = SystemConfig::load_from_file(f.path()).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.loop_models().unwrap(), models);
    }
}
