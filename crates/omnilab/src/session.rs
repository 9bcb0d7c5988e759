//! The lab session: the single coordinating context.
//!
//! A [`LabSession`] owns all mutable engine state — scene, registry,
//! tweens, diagnostic, interpreter table, observer, and random source —
//! and every operation is a method on it, so multiple independent
//! sessions can coexist in one process. The host drives the session from
//! one logical task: frame ticks go through [`LabSession::advance`] and
//! finalized transcripts through [`LabSession::handle_transcript`]; both
//! run to completion before the next event is processed.

use crate::assembly::{self, AssemblyKind, FACEPLATE_OPEN_ANGLE, PART_FACEPLATE};
use crate::config::LabConfig;
use crate::diagnostic::{heat_emissive, Diagnostic, RunStatus, NOMINAL_EMISSIVE_INTENSITY};
use crate::error::LabError;
use crate::events::{HudUpdate, LabObserver, NullObserver};
use crate::interpret::{Command, CommandTable};
use crate::metrics::MetricsSnapshot;
use crate::tween::{Channel, Easing, Tween, TweenSet};
use omnilab_math::{Color, Vec3};
use omnilab_scene::{Camera, NodeKind, PartRegistry, Scene};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::time::Duration;

fn secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// One interactive lab session.
pub struct LabSession {
    config: LabConfig,
    scene: Scene,
    registry: PartRegistry,
    tweens: TweenSet,
    diagnostic: Diagnostic,
    table: CommandTable,
    observer: Box<dyn LabObserver>,
    rng: Box<dyn RngCore>,
    project_name: Option<String>,
    status_label: String,
}

impl LabSession {
    /// Create a session with entropy-seeded randomness and no observer.
    pub fn new(config: LabConfig) -> Self {
        Self::with_rng(config, Box::new(StdRng::from_entropy()))
    }

    /// Create a session with an injected random source.
    ///
    /// Tests fix the diagnostic outcome by passing a seeded or mock rng.
    pub fn with_rng(config: LabConfig, rng: Box<dyn RngCore>) -> Self {
        let table = CommandTable::new(config.mechanism_policy);
        Self {
            scene: Scene::new(),
            registry: PartRegistry::new(),
            tweens: TweenSet::new(),
            diagnostic: Diagnostic::new(),
            table,
            observer: Box::new(NullObserver),
            rng,
            project_name: None,
            status_label: "STANDBY".to_string(),
            config,
        }
    }

    /// Attach the notification receiver.
    pub fn set_observer(&mut self, observer: Box<dyn LabObserver>) {
        self.observer = observer;
    }

    /// Emit the boot-time status update.
    pub fn announce_boot(&mut self) {
        self.emit("Lab initialized. All systems nominal.");
    }

    // =========================================================================
    // Command surface
    // =========================================================================

    /// Decode a finalized transcript and execute every matching command.
    ///
    /// Unrecognized transcripts are silently ignored.
    pub fn handle_transcript(&mut self, transcript: &str) {
        let commands = self.table.interpret(transcript);
        if commands.is_empty() {
            log::trace!("unrecognized transcript ignored: {transcript:?}");
            return;
        }
        for command in commands {
            self.execute(command);
        }
    }

    /// Execute a single decoded command.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Spawn(kind) => self.spawn(kind),
            Command::OpenMechanism => self.open_mechanism(),
            Command::CloseMechanism => self.close_mechanism(),
            Command::Focus(name) => self.focus(name),
            Command::ResetView => self.reset_view(),
            // Rejection already produced its observer message.
            Command::RunDiagnostics => {
                let _ = self.run_diagnostics();
            }
            Command::Clear => self.clear(),
        }
    }

    /// Fabricate an assembly, replacing the active one.
    ///
    /// A running diagnostic is cancelled first; the registry is reset
    /// before any new geometry is added, so it is never observed mixed.
    /// A kind with no recipe still clears the workspace and builds
    /// nothing (kept quirk).
    pub fn spawn(&mut self, kind: AssemblyKind) {
        self.settle_diagnostic();
        self.detach_active();
        match assembly::build(&mut self.scene, &mut self.registry, kind) {
            Some(root) => {
                self.scene.set_active_assembly(root);
                self.project_name = kind.project_name().map(str::to_string);
                self.status_label = "STABLE".to_string();
                let line = kind.build_line().unwrap_or("Prototype assembled.");
                log::info!("fabricated {:?} ({} nodes)", kind, self.scene.subtree_len(root));
                self.emit(line);
            }
            None => {
                self.project_name = None;
                self.status_label = "STANDBY".to_string();
                log::debug!("spawn request for {kind:?} has no recipe; workspace cleared");
            }
        }
    }

    /// Remove the active assembly and reset the registry.
    pub fn clear(&mut self) {
        self.settle_diagnostic();
        self.detach_active();
        self.project_name = None;
        self.status_label = "STANDBY".to_string();
        self.emit("Workspace cleared.");
    }

    /// Swing the faceplate pivot open. Silent no-op without one.
    pub fn open_mechanism(&mut self) {
        self.articulate(Vec3::new(FACEPLATE_OPEN_ANGLE, 0.0, 0.0), true);
    }

    /// Swing the faceplate pivot shut. Silent no-op without one.
    pub fn close_mechanism(&mut self) {
        self.articulate(Vec3::zeros(), false);
    }

    fn articulate(&mut self, target: Vec3, opening: bool) {
        let Some(pivot) = self.registry.resolve(&self.scene, PART_FACEPLATE) else {
            log::debug!("mechanism request ignored: no faceplate registered");
            return;
        };
        let Some(start) = self.scene.node(pivot).map(|n| n.transform.rotation) else {
            return;
        };
        let (duration_ms, easing, line) = if opening {
            (self.config.open_duration_ms, Easing::QuadOut, "Faceplate open.")
        } else {
            (self.config.close_duration_ms, Easing::BounceOut, "Faceplate sealed.")
        };
        self.tweens.start(Tween::new(
            Channel::NodeRotation(pivot),
            start,
            target,
            secs(duration_ms),
            easing,
        ));
        self.emit(line);
    }

    /// Ease the camera toward the named part, re-aiming at it en route.
    ///
    /// Unknown or unregistered names leave the camera untouched.
    pub fn focus(&mut self, name: &str) {
        let Some(part) = self.registry.resolve(&self.scene, name) else {
            log::debug!("focus request ignored: no part named {name:?}");
            return;
        };
        let Some(target) = self.scene.world_position(part) else {
            return;
        };
        // Tracking drives the aim from here on; a leftover aim tween
        // would fight it.
        self.tweens.cancel(Channel::CameraAim);
        self.tweens.start(
            Tween::new(
                Channel::CameraPosition,
                self.scene.camera.position.coords,
                (target + Vec3::new(0.0, 1.5, 4.0)).coords,
                secs(self.config.focus_duration_ms),
                Easing::CubicInOut,
            )
            .tracking(part),
        );
        self.emit(&format!("Focusing on {name}."));
    }

    /// Ease the camera back to its boot pose and aim.
    pub fn reset_view(&mut self) {
        self.tweens.start(Tween::new(
            Channel::CameraPosition,
            self.scene.camera.position.coords,
            Camera::DEFAULT_POSITION.coords,
            secs(self.config.focus_duration_ms),
            Easing::CubicInOut,
        ));
        self.tweens.start(Tween::new(
            Channel::CameraAim,
            self.scene.camera.target.coords,
            Camera::DEFAULT_TARGET.coords,
            secs(self.config.focus_duration_ms),
            Easing::CubicInOut,
        ));
        self.emit("View reset.");
    }

    /// Start the mock stress diagnostic against the active assembly.
    pub fn run_diagnostics(&mut self) -> Result<(), LabError> {
        if self.scene.active_assembly().is_none() {
            self.emit("No active prototype to test.");
            return Err(LabError::NoActiveAssembly);
        }
        if self.diagnostic.is_running() {
            self.emit("Diagnostic already in progress.");
            return Err(LabError::DiagnosticRunning);
        }
        self.diagnostic.start();
        self.status_label = "TESTING".to_string();
        self.emit("Running structural diagnostics.");
        Ok(())
    }

    // =========================================================================
    // Frame advance
    // =========================================================================

    /// Advance the session by one frame of `dt`.
    ///
    /// Progresses in-flight tweens, steps the diagnostic ramp, and applies
    /// idle auto-rotation to the active assembly when no diagnostic is
    /// running. Never blocks; infallible by construction.
    pub fn advance(&mut self, dt: Duration) {
        let dt_secs = dt.as_secs_f64();
        self.tweens.advance(&mut self.scene, dt_secs);
        self.step_diagnostic(dt_secs);
        if !self.diagnostic.is_running() {
            if let Some(root) = self.scene.active_assembly() {
                if let Some(node) = self.scene.node_mut(root) {
                    node.transform.rotation.y += self.config.idle_spin_rate * dt_secs;
                }
            }
        }
    }

    /// Whether all animations and the diagnostic are quiescent.
    pub fn is_settled(&self) -> bool {
        !self.tweens.any_active() && !self.diagnostic.is_running()
    }

    fn step_diagnostic(&mut self, dt_secs: f64) {
        let interval = secs(self.config.tick_interval_ms);
        let steps = self.diagnostic.due_steps(dt_secs, interval);
        for _ in 0..steps {
            if !self.diagnostic.is_running() {
                break;
            }
            let load = self.diagnostic.apply_step(self.config.load_step);
            self.paint_emissive(heat_emissive(load));
            self.emit(&format!("Thermal load at {load:.0} percent."));
            if self.diagnostic.ramp_complete() {
                self.resolve_diagnostic();
            }
        }
    }

    fn resolve_diagnostic(&mut self) {
        let p = self.config.pass_probability.clamp(0.0, 1.0);
        let passed = self.rng.gen_bool(p);
        self.diagnostic.resolve(passed);
        if passed {
            self.status_label = "PASSED".to_string();
            self.paint_emissive((Color::CYAN, NOMINAL_EMISSIVE_INTENSITY));
            self.emit("Stress test passed. Structural integrity nominal.");
        } else {
            // Failure leaves the overheated look and readout in place.
            self.status_label = "FAILED".to_string();
            self.emit("Stress test failed. Structural compromise detected.");
        }
    }

    fn paint_emissive(&mut self, (tint, intensity): (Color, f64)) {
        let Some(root) = self.scene.active_assembly() else {
            return;
        };
        for id in self.scene.subtree_meshes(root) {
            if let Some(node) = self.scene.node_mut(id) {
                if let NodeKind::Mesh { material, .. } = &mut node.kind {
                    material.emissive = tint;
                    material.emissive_intensity = intensity;
                }
            }
        }
    }

    /// Cancel a running diagnostic (with a notification) or quietly revert
    /// a terminal outcome to idle. Used by spawn and clear.
    fn settle_diagnostic(&mut self) {
        match self.diagnostic.status() {
            RunStatus::Running => {
                self.diagnostic.cancel();
                self.status_label = "STANDBY".to_string();
                self.emit("Diagnostic aborted.");
            }
            RunStatus::Passed | RunStatus::Failed => self.diagnostic.cancel(),
            RunStatus::Idle => {}
        }
    }

    fn detach_active(&mut self) {
        if let Some(active) = self.scene.active_assembly() {
            self.scene.remove_subtree(active);
        }
        self.registry.clear();
    }

    fn emit(&mut self, line: &str) {
        let update = HudUpdate {
            project_name: self
                .project_name
                .clone()
                .unwrap_or_else(|| "NONE".to_string()),
            status: self.status_label.clone(),
            thermal_or_load: self.diagnostic.load(),
            part_count: self
                .scene
                .active_assembly()
                .map(|id| self.scene.subtree_len(id))
                .unwrap_or(0),
            log_line: line.to_string(),
        };
        self.observer.notify(&update);
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// The scene graph.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access, e.g. for viewport resize.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The part registry.
    pub fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    /// The session configuration.
    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    /// Current diagnostic state.
    pub fn diagnostic_status(&self) -> RunStatus {
        self.diagnostic.status()
    }

    /// Current thermal/load readout.
    pub fn load(&self) -> f64 {
        self.diagnostic.load()
    }

    /// Read-only metrics snapshot for the export collaborator.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            project_name: self.project_name.clone(),
            status: self.status_label.clone(),
            load: self.diagnostic.load(),
            outcome: self.diagnostic.status(),
            part_count: self
                .scene
                .active_assembly()
                .map(|id| self.scene.subtree_len(id))
                .unwrap_or(0),
            parts: self.registry.names(),
        }
    }
}
