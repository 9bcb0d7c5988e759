//! Read-only metrics snapshot for the export collaborator.

use crate::diagnostic::RunStatus;
use serde::Serialize;

/// A point-in-time view of session state.
///
/// This is the engine's entire obligation toward the external export
/// tool: a serializable descriptor, not a CAD format.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Active project name, if an assembly is fabricated.
    pub project_name: Option<String>,
    /// HUD status label at snapshot time.
    pub status: String,
    /// Thermal/load readout in `0.0..=100.0`.
    pub load: f64,
    /// Diagnostic state machine state.
    pub outcome: RunStatus,
    /// Number of nodes in the active assembly.
    pub part_count: usize,
    /// Registered part names, sorted.
    pub parts: Vec<String>,
}

impl MetricsSnapshot {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
