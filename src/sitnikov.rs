//! The Sitnikov problem: a massless body moving along the axis through the
//! barycentre of two equal primaries on Keplerian ellipses.
//!
//! Units: total mass 1, semi-major axis of the primaries' relative orbit 1,
//! so one primary period is 2π and the mean anomaly equals `t`.
//!
//! ```text
//! z'' = -z / (z² + r(t)²)^{3/2}        r(t) = (1 - e·cos E(t)) / 2
//!                                      E - e·sin E = t
//! ```

use std::f64::consts::TAU;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use thiserror::Error;

use crate::config::{ConfigError, InitialValues, PortraitGrid, SolverParams};

const KEPLER_TOLERANCE: f64 = 1e-14;
const KEPLER_MAX_ITER: usize = 50;

#[derive(Debug, Error)]
pub enum SitnikovError {
    #[error("invalid solver parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Primaries
// ---------------------------------------------------------------------------

/// Solve Kepler's equation `E - e·sin E = m` for the eccentric anomaly.
pub fn eccentric_anomaly(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let m = mean_anomaly.rem_euclid(TAU);
    let mut e_anom = if eccentricity > 0.8 { std::f64::consts::PI } else { m };
    for _ in 0..KEPLER_MAX_ITER {
        let f = e_anom - eccentricity * e_anom.sin() - m;
        let delta = f / (1.0 - eccentricity * e_anom.cos());
        e_anom -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    e_anom
}

/// Distance of each primary from the barycentre at time `t`.
pub fn primary_distance(t: f64, eccentricity: f64) -> f64 {
    let e_anom = eccentric_anomaly(t, eccentricity);
    (1.0 - eccentricity * e_anom.cos()) / 2.0
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SitnikovParams {
    pub eccentricity: f64,
    pub z_start: f64,
    pub z_dot_start: f64,
    /// Integration length in primary periods.
    pub periods: f64,
    pub time_delta: f64,
}

impl SitnikovParams {
    pub fn validate(&self) -> Result<(), SitnikovError> {
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(SitnikovError::InvalidParams(format!(
                "eccentricity must be in [0, 1), got {}",
                self.eccentricity
            )));
        }
        if !(self.time_delta.is_finite() && self.time_delta > 0.0) {
            return Err(SitnikovError::InvalidParams(format!(
                "time_delta must be positive, got {}",
                self.time_delta
            )));
        }
        if !(self.periods.is_finite() && self.periods > 0.0) {
            return Err(SitnikovError::InvalidParams(format!(
                "periods must be positive, got {}",
                self.periods
            )));
        }
        if !(self.z_start.is_finite() && self.z_dot_start.is_finite()) {
            return Err(SitnikovError::InvalidParams(
                "initial state must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn end_time(&self) -> f64 {
        self.periods * TAU
    }

    /// Number of steps needed to reach `end_time`.
    pub fn total_steps(&self) -> u64 {
        // Tolerance so 2·TAU / (TAU/100) counts as 200, not 201.
        (self.end_time() / self.time_delta - 1e-9).ceil().max(0.0) as u64
    }

    /// Single trajectory parameters from the `initial_values` config section.
    pub fn from_config(initial: &InitialValues, solver: &SolverParams) -> Self {
        Self {
            eccentricity: initial.eccentricity,
            z_start: initial.z_start,
            z_dot_start: initial.z_dot_start,
            periods: initial.periods,
            time_delta: solver.time_delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub t: f64,
    pub z: f64,
    pub z_dot: f64,
}

/// Fixed-step fourth order Runge–Kutta integrator.
#[derive(Debug, Clone)]
pub struct SitnikovSolver {
    params: SitnikovParams,
    step: u64,
    total_steps: u64,
    state: [f64; 2],
}

impl SitnikovSolver {
    pub fn new(params: SitnikovParams) -> Result<Self, SitnikovError> {
        params.validate()?;
        Ok(Self {
            total_steps: params.total_steps(),
            params,
            step: 0,
            state: [params.z_start, params.z_dot_start],
        })
    }

    fn time(&self) -> f64 {
        self.step as f64 * self.params.time_delta
    }

    fn derivative(&self, t: f64, [z, z_dot]: [f64; 2]) -> [f64; 2] {
        let r = primary_distance(t, self.params.eccentricity);
        let denom = (z * z + r * r).powf(1.5);
        [z_dot, -z / denom]
    }

    pub fn step(&mut self) {
        let h = self.params.time_delta;
        let t = self.time();
        let y = self.state;
        let shift = |k: [f64; 2], s: f64| [y[0] + s * k[0], y[1] + s * k[1]];

        let k1 = self.derivative(t, y);
        let k2 = self.derivative(t + h / 2.0, shift(k1, h / 2.0));
        let k3 = self.derivative(t + h / 2.0, shift(k2, h / 2.0));
        let k4 = self.derivative(t + h, shift(k3, h));

        for i in 0..2 {
            self.state[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        self.step += 1;
    }

    pub fn solved(&self) -> bool {
        self.step >= self.total_steps
    }

    pub fn steps_taken(&self) -> u64 {
        self.step
    }

    pub fn current(&self) -> Solution {
        Solution {
            t: self.time(),
            z: self.state[0],
            z_dot: self.state[1],
        }
    }
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// The initial state followed by every `skip_n_outs`-th step.
pub fn trajectory(params: SitnikovParams, skip_n_outs: u64) -> Result<Vec<Solution>, SitnikovError> {
    if skip_n_outs == 0 {
        return Err(SitnikovError::InvalidParams(
            "skip_n_outs must be at least 1".to_string(),
        ));
    }
    let mut solver = SitnikovSolver::new(params)?;
    let mut out = vec![solver.current()];
    while !solver.solved() {
        solver.step();
        if solver.steps_taken() % skip_n_outs == 0 {
            out.push(solver.current());
        }
    }
    Ok(out)
}

/// Stroboscopic samples, one per primary period, for every grid point.
///
/// `time_delta` is adjusted so a whole number of steps fits in a period.
/// Output is in grid order, then time.
pub fn poincare_section(
    grid: &PortraitGrid,
    solver: &SolverParams,
) -> Result<Vec<Solution>, SitnikovError> {
    let template = SitnikovParams {
        eccentricity: grid.eccentricity,
        z_start: 0.0,
        z_dot_start: 0.0,
        periods: grid.periods,
        time_delta: solver.time_delta,
    };
    template.validate()?;

    let steps_per_period = (TAU / solver.time_delta).round().max(1.0) as u64;
    let time_delta = TAU / steps_per_period as f64;
    let initial_conditions = grid.initial_conditions()?;
    let total = initial_conditions.len();
    let done = AtomicUsize::new(0);

    log::info!(
        "integrating {total} initial conditions over {} periods, {steps_per_period} steps per period",
        grid.periods
    );

    let per_ic: Vec<Vec<Solution>> = initial_conditions
        .par_iter()
        .map(|&(z, z_dot)| {
            let params = SitnikovParams {
                z_start: z,
                z_dot_start: z_dot,
                time_delta,
                ..template
            };
            let section = trajectory(params, steps_per_period).map(|mut sols| {
                sols.remove(0);
                sols
            });

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            log::info!("Done {:.4}%", finished as f64 / total as f64 * 100.0);
            section
        })
        .collect::<Result<_, _>>()?;

    Ok(per_ic.into_iter().flatten().collect())
}

/// One line per solution, in the `t z z_dot` layout the viewer reads.
pub fn write_solutions<W: Write>(
    mut out: W,
    header: &[String],
    solutions: &[Solution],
) -> io::Result<()> {
    for line in header {
        writeln!(out, "# {line}")?;
    }
    for s in solutions {
        writeln!(out, "{:.10} {:.10} {:.10}", s.t, s.z, s.z_dot)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_samples;

    fn energy_circular(s: &Solution) -> f64 {
        s.z_dot * s.z_dot / 2.0 - 1.0 / (s.z * s.z + 0.25).sqrt()
    }

    #[test]
    fn kepler_equation_holds() {
        for &e in &[0.0, 0.1, 0.5, 0.9, 0.99] {
            for i in 0..32 {
                let m = i as f64 * 0.37;
                let e_anom = eccentric_anomaly(m, e);
                let residual = e_anom - e * e_anom.sin() - m.rem_euclid(TAU);
                assert!(residual.abs() < 1e-12, "e={e} m={m} residual={residual}");
            }
        }
    }

    #[test]
    fn circular_primaries_stay_at_half() {
        for i in 0..10 {
            assert!((primary_distance(i as f64, 0.0) - 0.5).abs() < 1e-15);
        }
    }

    #[test]
    fn eccentric_primaries_oscillate_between_apsides() {
        let e = 0.3;
        assert!((primary_distance(0.0, e) - (1.0 - e) / 2.0).abs() < 1e-12);
        assert!((primary_distance(std::f64::consts::PI, e) - (1.0 + e) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn energy_is_conserved_for_circular_problem() {
        let params = SitnikovParams {
            eccentricity: 0.0,
            z_start: 0.8,
            z_dot_start: 0.1,
            periods: 3.0,
            time_delta: 0.005,
        };
        let mut solver = SitnikovSolver::new(params).unwrap();
        let e0 = energy_circular(&solver.current());
        while !solver.solved() {
            solver.step();
        }
        let e1 = energy_circular(&solver.current());
        assert!((e1 - e0).abs() < 1e-6, "drift {}", e1 - e0);
    }

    #[test]
    fn rest_at_origin_is_an_equilibrium() {
        let params = SitnikovParams {
            eccentricity: 0.4,
            z_start: 0.0,
            z_dot_start: 0.0,
            periods: 1.0,
            time_delta: 0.01,
        };
        let traj = trajectory(params, 7).unwrap();
        assert!(traj.iter().all(|s| s.z == 0.0 && s.z_dot == 0.0));
    }

    #[test]
    fn trajectory_starts_with_initial_state() {
        let params = SitnikovParams {
            eccentricity: 0.1,
            z_start: 1.0,
            z_dot_start: 0.0,
            periods: 2.0,
            time_delta: TAU / 100.0,
        };
        assert_eq!(params.total_steps(), 200);
        let traj = trajectory(params, 10).unwrap();
        assert_eq!(traj.len(), 21);
        assert_eq!(traj[0].t, 0.0);
        assert_eq!(traj[0].z, 1.0);
        assert!((traj[1].t - 10.0 * TAU / 100.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_params() {
        let base = SitnikovParams {
            eccentricity: 0.1,
            z_start: 1.0,
            z_dot_start: 0.0,
            periods: 1.0,
            time_delta: 0.01,
        };
        for bad in [
            SitnikovParams { eccentricity: 1.0, ..base },
            SitnikovParams { eccentricity: -0.1, ..base },
            SitnikovParams { time_delta: 0.0, ..base },
            SitnikovParams { periods: f64::NAN, ..base },
        ] {
            assert!(SitnikovSolver::new(bad).is_err());
        }
        assert!(trajectory(base, 0).is_err());
    }

    #[test]
    fn section_emits_one_sample_per_period_in_grid_order() {
        let grid = PortraitGrid {
            eccentricity: 0.2,
            periods: 3.0,
            z_min: 0.5,
            z_max: 1.0,
            z_step: 0.25,
            z_dot_min: 0.0,
            z_dot_max: 0.1,
            z_dot_step: 0.1,
        };
        let solver = SolverParams {
            time_delta: 0.01,
            skip_n_outs: 1,
        };
        let section = poincare_section(&grid, &solver).unwrap();
        assert_eq!(section.len(), 2 * 3);
        for (i, s) in section.iter().enumerate() {
            let period = (i % 3 + 1) as f64;
            assert!((s.t - period * TAU).abs() < 1e-9);
        }
    }

    #[test]
    fn section_reports_typed_errors() {
        let grid = PortraitGrid::default();
        let bad_step = SolverParams {
            time_delta: 0.0,
            skip_n_outs: 1,
        };
        assert!(matches!(
            poincare_section(&grid, &bad_step),
            Err(SitnikovError::InvalidParams(msg)) if msg.contains("time_delta")
        ));

        let flat_grid = PortraitGrid {
            z_step: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            poincare_section(&flat_grid, &SolverParams::default()),
            Err(SitnikovError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn written_output_reads_back_as_z_and_z_dot() {
        let sols = vec![
            Solution { t: 0.0, z: 1.0, z_dot: 0.0 },
            Solution { t: TAU, z: 0.95, z_dot: -0.125 },
        ];
        let mut buf = Vec::new();
        write_solutions(&mut buf, &["t z z_dot".to_string()], &sols).unwrap();
        let set = parse_samples(std::io::Cursor::new(buf)).unwrap();
        assert_eq!(set.z(), vec![1.0, 0.95]);
        assert_eq!(set.v(), vec![0.0, -0.125]);
    }
}
