#![warn(missing_docs)]

//! omnilab — a voice-driven 3D prototyping lab engine.
//!
//! The engine is headless and single-threaded: a [`LabSession`] owns the
//! scene graph, the part registry, the tween scheduler, the diagnostic
//! driver, and the command interpreter. The host feeds it two event
//! streams — frame ticks ([`LabSession::advance`]) and finalized command
//! transcripts ([`LabSession::handle_transcript`]) — and receives every
//! user-visible state change through a one-way [`LabObserver`] channel.
//!
//! # Example
//!
//! ```rust
//! use omnilab::{LabConfig, LabSession};
//! use std::time::Duration;
//!
//! let mut lab = LabSession::new(LabConfig::default());
//! lab.handle_transcript("fabricate the time band");
//! assert!(lab.scene().active_assembly().is_some());
//! lab.advance(Duration::from_millis(16));
//! ```

pub mod assembly;
pub mod config;
pub mod diagnostic;
mod error;
pub mod events;
pub mod interpret;
pub mod metrics;
pub mod session;
pub mod tween;

pub use assembly::{AssemblyKind, PART_CORE, PART_FACEPLATE, PART_LENS};
pub use config::{LabConfig, MechanismPolicy};
pub use diagnostic::RunStatus;
pub use error::LabError;
pub use events::{HudUpdate, LabObserver, MemoryObserver, NullObserver};
pub use interpret::{Command, CommandTable};
pub use metrics::MetricsSnapshot;
pub use session::LabSession;
pub use tween::Easing;
