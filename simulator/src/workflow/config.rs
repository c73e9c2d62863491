use anyhow::Context;
use cellcore::prelude::{dedupe_selection, parse_selection, CellType, OperatingMode};
use cellcore::{SimError, SimResult};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on cells in a single selection.
pub const MAX_CELLS: usize = 20;

/// Upper bound on time steps sampled per mode in one series.
pub const MAX_STEPS_PER_MODE: usize = 1_000;

pub fn default_cells() -> Vec<String> {
    vec!["lfp".into(), "nmc".into(), "nca".into()]
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkflowConfig {
    pub cells: Vec<String>,
    pub mode: OperatingMode,
    pub dedupe: bool,
    pub max_cells: usize,
    pub seed: Option<u64>,
    pub export: Option<PathBuf>,
    pub series_export: Option<PathBuf>,
    pub realtime: RealtimeConfig,
    pub performance: PerformanceConfig,
    pub task: TaskConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RealtimeConfig {
    pub iterations: usize,
    pub interval_ms: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    pub modes: Vec<OperatingMode>,
    pub steps_per_mode: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaskConfig {
    pub delay_ms: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            cells: default_cells(),
            mode: OperatingMode::Idle,
            dedupe: false,
            max_cells: MAX_CELLS,
            seed: None,
            export: None,
            series_export: None,
            realtime: RealtimeConfig::default(),
            performance: PerformanceConfig::default(),
            task: TaskConfig::default(),
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            iterations: 20,
            interval_ms: 1000,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            modes: OperatingMode::ALL.to_vec(),
            steps_per_mode: 10,
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self { delay_ms: 2000 }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(cells: Vec<String>, mode: OperatingMode) -> Self {
        Self {
            cells,
            mode,
            ..Default::default()
        }
    }

    /// Parsed configured selection, de-duplicated when configured.
    pub fn selection(&self) -> SimResult<Vec<CellType>> {
        self.resolve_selection(self.cells.as_slice())
    }

    /// Applies the configured de-duplication and cell limit to `tags`.
    ///
    /// Every entry point (CLI flows and bridge requests) goes through here.
    pub fn resolve_selection<S: AsRef<str>>(&self, tags: &[S]) -> SimResult<Vec<CellType>> {
        let parsed = parse_selection(tags)?;
        let selection = if self.dedupe {
            dedupe_selection(&parsed)
        } else {
            parsed
        };
        if selection.len() > self.max_cells {
            return Err(SimError::InvalidConfig(format!(
                "{} cells selected, at most {} allowed",
                selection.len(),
                self.max_cells
            )));
        }
        Ok(selection)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.max_cells == 0 {
            return Err(SimError::InvalidConfig("max_cells must be at least 1".into()));
        }
        self.selection()?;
        if self.realtime.iterations == 0 {
            return Err(SimError::InvalidConfig(
                "realtime.iterations must be at least 1".into(),
            ));
        }
        validate_series(&self.performance.modes, self.performance.steps_per_mode)
    }

    /// Seeded generator when a seed is configured, entropy otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Checks a series request: at least one mode and 1..=MAX_STEPS_PER_MODE steps.
pub fn validate_series(modes: &[OperatingMode], steps_per_mode: usize) -> SimResult<()> {
    if modes.is_empty() {
        return Err(SimError::InvalidConfig(
            "performance.modes must name at least one mode".into(),
        ));
    }
    if !(1..=MAX_STEPS_PER_MODE).contains(&steps_per_mode) {
        return Err(SimError::InvalidConfig(format!(
            "performance.steps_per_mode must be within 1..={}, got {}",
            MAX_STEPS_PER_MODE, steps_per_mode
        )));
    }
    Ok(())
}
