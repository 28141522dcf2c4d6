use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{PlotConfig, Preset};
use crate::data::loader::load_file;
use crate::data::model::SampleSet;

/// Relative padding added around the data extent, per side.
const MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Plot window in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded samples (None only if nothing was loaded yet).
    pub samples: Option<SampleSet>,

    /// File the samples came from.
    pub source: Option<PathBuf>,

    /// Presentation options, editable from the side panel.
    pub config: PlotConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Set when the plot should jump back to the configured view.
    pub reset_view: bool,
}

impl AppState {
    pub fn new(config: PlotConfig) -> Self {
        Self {
            samples: None,
            source: None,
            config,
            status_message: None,
            reset_view: true,
        }
    }

    /// Ingest a newly loaded sample set.
    pub fn set_samples(&mut self, samples: SampleSet, source: PathBuf) {
        log::info!("Loaded {} samples from {}", samples.len(), source.display());
        self.samples = Some(samples);
        self.source = Some(source);
        self.status_message = None;
        self.reset_view = true;
    }

    /// Load `path`, keeping the current samples if it fails.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let result = load_file(path).with_context(|| format!("loading {}", path.display()));
        match result {
            Ok(samples) => {
                self.set_samples(samples, path.to_path_buf());
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }

    /// Re-read the current source file.
    pub fn reload(&mut self) -> Result<()> {
        let path = self.source.clone().context("no file loaded")?;
        self.load_path(&path)
    }

    /// Fixed view for the configured limits; `None` means auto-scale.
    ///
    /// An axis without limits takes the padded data extent.
    pub fn view_bounds(&self) -> Option<ViewBounds> {
        if !self.config.has_fixed_limits() {
            return None;
        }
        let extent = self.samples.as_ref().and_then(SampleSet::extent);
        let x = self
            .config
            .x_limits
            .unwrap_or_else(|| padded(extent.map(|e| e.z)));
        let y = self
            .config
            .y_limits
            .unwrap_or_else(|| padded(extent.map(|e| e.v)));
        Some(ViewBounds { x, y })
    }

    /// Turn fixed limits on or off for one axis.
    ///
    /// Enabling starts from the zoomed preset's limits.
    pub fn set_fixed_limits(&mut self, axis: Axis, enabled: bool) {
        let zoomed = Preset::Zoomed.config();
        let (slot, default) = match axis {
            Axis::X => (&mut self.config.x_limits, zoomed.x_limits),
            Axis::Y => (&mut self.config.y_limits, zoomed.y_limits),
        };
        *slot = if enabled { slot.or(default) } else { None };
        self.reset_view = true;
    }

    /// Update one axis' limits; ignored unless `lo < hi`.
    pub fn set_limits(&mut self, axis: Axis, lo: f64, hi: f64) -> bool {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return false;
        }
        match axis {
            Axis::X => self.config.x_limits = Some([lo, hi]),
            Axis::Y => self.config.y_limits = Some([lo, hi]),
        }
        self.reset_view = true;
        true
    }
}

fn padded(range: Option<[f64; 2]>) -> [f64; 2] {
    match range {
        Some([lo, hi]) if hi > lo => {
            let pad = (hi - lo) * MARGIN;
            [lo - pad, hi + pad]
        }
        Some([lo, _]) => [lo - 0.5, lo + 0.5],
        None => [-1.0, 1.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Sample;
    use std::io::Write;

    fn state_with(config: PlotConfig) -> AppState {
        let mut state = AppState::new(config);
        state.set_samples(
            SampleSet::from_samples(vec![Sample::new(0.0, 1.0), Sample::new(1.0, 0.0)]),
            PathBuf::from("portrait.txt"),
        );
        state
    }

    #[test]
    fn auto_limits_have_no_fixed_view() {
        let state = state_with(Preset::Portrait.config());
        assert_eq!(state.view_bounds(), None);
    }

    #[test]
    fn fixed_limits_win() {
        let state = state_with(Preset::Zoomed.config());
        assert_eq!(
            state.view_bounds(),
            Some(ViewBounds {
                x: [-2.5, 2.5],
                y: [-2.0, 2.0]
            })
        );
    }

    #[test]
    fn missing_axis_falls_back_to_padded_extent() {
        let mut config = Preset::Portrait.config();
        config.x_limits = Some([-3.0, 3.0]);
        let bounds = state_with(config).view_bounds().unwrap();
        assert_eq!(bounds.x, [-3.0, 3.0]);
        assert!((bounds.y[0] + 0.05).abs() < 1e-12);
        assert!((bounds.y[1] - 1.05).abs() < 1e-12);
    }

    #[test]
    fn toggling_limits() {
        let mut state = state_with(Preset::Portrait.config());
        state.reset_view = false;
        state.set_fixed_limits(Axis::Y, true);
        assert_eq!(state.config.y_limits, Some([-2.0, 2.0]));
        assert!(state.reset_view);
        state.set_fixed_limits(Axis::Y, false);
        assert_eq!(state.config.y_limits, None);
    }

    #[test]
    fn inverted_limits_are_ignored() {
        let mut state = state_with(Preset::Zoomed.config());
        assert!(!state.set_limits(Axis::X, 1.0, -1.0));
        assert_eq!(state.config.x_limits, Some([-2.5, 2.5]));
        assert!(state.set_limits(Axis::X, -1.0, 1.0));
        assert_eq!(state.config.x_limits, Some([-1.0, 1.0]));
    }

    #[test]
    fn failed_load_keeps_previous_samples() {
        let mut state = state_with(Preset::Portrait.config());
        let dir = tempfile::tempdir().unwrap();
        assert!(state.load_path(&dir.path().join("missing.txt")).is_err());
        assert_eq!(state.samples.as_ref().map(SampleSet::len), Some(2));
        assert!(state.status_message.as_deref().unwrap().contains("not found"));
    }

    #[test]
    fn reload_reads_file_again() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 0.5 0.5").unwrap();
        let mut state = AppState::new(PlotConfig::default());
        state.load_path(file.path()).unwrap();
        assert_eq!(state.samples.as_ref().unwrap().len(), 1);

        writeln!(file, "1 0.6 0.4").unwrap();
        state.reload().unwrap();
        assert_eq!(state.samples.as_ref().unwrap().len(), 2);
    }
}
