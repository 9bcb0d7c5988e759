//! Mock structural/thermal diagnostic state machine.
//!
//! A run ramps a load counter from 0 to 100 on a fixed step cadence and
//! resolves to a randomized pass/fail outcome — the numbers are mocks, not
//! physics. Stepping is driven by the session's frame advance through a
//! time accumulator, so the driver owns no timer and its cancel handle is
//! simply [`Diagnostic::cancel`], invoked exactly once by spawn, clear, or
//! completion.

use omnilab_math::Color;
use serde::Serialize;

/// Emissive intensity restored to assembly meshes after a passed run.
pub const NOMINAL_EMISSIVE_INTENSITY: f64 = 0.3;

/// Diagnostic state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    /// No run in progress or recorded.
    Idle,
    /// Load is ramping.
    Running,
    /// Last run completed successfully.
    Passed,
    /// Last run detected a (mock) structural compromise.
    Failed,
}

/// Load ramp state for the mock diagnostic.
#[derive(Debug)]
pub struct Diagnostic {
    status: RunStatus,
    load: f64,
    acc_secs: f64,
}

impl Diagnostic {
    /// Create an idle diagnostic.
    pub fn new() -> Self {
        Self {
            status: RunStatus::Idle,
            load: 0.0,
            acc_secs: 0.0,
        }
    }

    /// Current state.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Current load in `0.0..=100.0`.
    pub fn load(&self) -> f64 {
        self.load
    }

    /// Whether a run is ramping.
    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Begin a run: load resets to zero and stepping starts.
    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.load = 0.0;
        self.acc_secs = 0.0;
    }

    /// Abort the run and return to idle with a cold readout.
    pub fn cancel(&mut self) {
        self.status = RunStatus::Idle;
        self.load = 0.0;
        self.acc_secs = 0.0;
    }

    /// Record the outcome of a completed ramp.
    pub fn resolve(&mut self, passed: bool) {
        if passed {
            self.status = RunStatus::Passed;
            self.load = 0.0;
        } else {
            self.status = RunStatus::Failed;
            // Load readout stays hot on failure.
        }
        self.acc_secs = 0.0;
    }

    /// Accumulate frame time and count the whole steps now due.
    ///
    /// Returns 0 when not running. The session applies the steps, so load
    /// mutation and mesh recoloring stay in one place.
    pub fn due_steps(&mut self, dt_secs: f64, interval_secs: f64) -> u32 {
        if self.status != RunStatus::Running || interval_secs <= 0.0 {
            return 0;
        }
        self.acc_secs += dt_secs;
        let mut steps = 0;
        while self.acc_secs >= interval_secs {
            self.acc_secs -= interval_secs;
            steps += 1;
        }
        steps
    }

    /// Add one step of load; returns the clamped new value.
    pub fn apply_step(&mut self, step: f64) -> f64 {
        self.load = (self.load + step).min(100.0);
        self.load
    }

    /// Whether the ramp has reached its terminal load.
    pub fn ramp_complete(&self) -> bool {
        self.load >= 100.0
    }
}

impl Default for Diagnostic {
    fn default() -> Self {
        Self::new()
    }
}

/// Emissive color and intensity for a given load level.
///
/// The tint slides from the nominal cyan toward red as load rises and the
/// intensity follows `load / 50`, clamped.
pub fn heat_emissive(load: f64) -> (Color, f64) {
    let tint = Color::CYAN.lerp(&Color::RED, load / 100.0);
    let intensity = (load / 50.0).clamp(0.0, 2.0);
    (tint, intensity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ramp_counts_whole_steps() {
        let mut diag = Diagnostic::new();
        diag.start();
        assert_eq!(diag.due_steps(0.05, 0.08), 0);
        assert_eq!(diag.due_steps(0.05, 0.08), 1);
        // A long frame releases several steps at once.
        assert_eq!(diag.due_steps(0.25, 0.08), 3);
    }

    #[test]
    fn idle_accumulates_nothing() {
        let mut diag = Diagnostic::new();
        assert_eq!(diag.due_steps(10.0, 0.08), 0);
        diag.start();
        diag.cancel();
        assert_eq!(diag.due_steps(10.0, 0.08), 0);
        assert_relative_eq!(diag.load(), 0.0);
    }

    #[test]
    fn load_clamps_at_terminal() {
        let mut diag = Diagnostic::new();
        diag.start();
        for _ in 0..30 {
            diag.apply_step(4.0);
        }
        assert_relative_eq!(diag.load(), 100.0);
        assert!(diag.ramp_complete());
    }

    #[test]
    fn outcome_resets_load_only_on_pass() {
        let mut diag = Diagnostic::new();
        diag.start();
        diag.apply_step(100.0);
        diag.resolve(true);
        assert_eq!(diag.status(), RunStatus::Passed);
        assert_relative_eq!(diag.load(), 0.0);

        diag.start();
        diag.apply_step(100.0);
        diag.resolve(false);
        assert_eq!(diag.status(), RunStatus::Failed);
        assert_relative_eq!(diag.load(), 100.0);
    }

    #[test]
    fn heat_emissive_tracks_load() {
        let (cold, cold_i) = heat_emissive(0.0);
        assert_eq!(cold, Color::CYAN);
        assert_relative_eq!(cold_i, 0.0);

        let (hot, hot_i) = heat_emissive(100.0);
        assert_eq!(hot, Color::RED);
        assert_relative_eq!(hot_i, 2.0);

        let (_, mid_i) = heat_emissive(50.0);
        assert_relative_eq!(mid_i, 1.0);
    }
}
