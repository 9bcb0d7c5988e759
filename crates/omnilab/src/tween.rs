//! Time-bounded eased interpolation of scene properties.
//!
//! Tweens are advanced exactly once per [`crate::LabSession::advance`]
//! call; the scheduler owns no timer. Each tween animates one channel — a
//! node's rotation, the camera position, or the camera aim point. Starting
//! a tween on a channel already in flight supersedes the old one
//! (last-writer-wins, no queuing); tweens on disjoint channels run
//! concurrently.

use omnilab_math::{lerp_vec3, Point3, Vec3};
use omnilab_scene::{NodeId, Scene};

/// Easing curve applied to normalized tween time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Constant rate.
    Linear,
    /// Quadratic deceleration into the target.
    QuadOut,
    /// Cubic acceleration and deceleration.
    CubicInOut,
    /// Deceleration with a bouncing settle.
    BounceOut,
}

impl Easing {
    /// Map normalized time `t` in `0.0..=1.0` to an eased progress value.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::BounceOut => {
                const N1: f64 = 7.5625;
                const D1: f64 = 2.75;
                if t < 1.0 / D1 {
                    N1 * t * t
                } else if t < 2.0 / D1 {
                    let t = t - 1.5 / D1;
                    N1 * t * t + 0.75
                } else if t < 2.5 / D1 {
                    let t = t - 2.25 / D1;
                    N1 * t * t + 0.9375
                } else {
                    let t = t - 2.625 / D1;
                    N1 * t * t + 0.984375
                }
            }
        }
    }
}

/// The property a tween animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Euler rotation of a scene node.
    NodeRotation(NodeId),
    /// The camera eye position.
    CameraPosition,
    /// The camera aim point.
    CameraAim,
}

/// One in-flight interpolation.
#[derive(Debug, Clone)]
pub struct Tween {
    channel: Channel,
    start: Vec3,
    end: Vec3,
    duration_secs: f64,
    elapsed_secs: f64,
    easing: Easing,
    /// While set on a camera-position tween, the camera re-aims at this
    /// node's world position every tick.
    track: Option<NodeId>,
}

impl Tween {
    /// Create a tween from `start` to `end` over `duration_secs`.
    pub fn new(channel: Channel, start: Vec3, end: Vec3, duration_secs: f64, easing: Easing) -> Self {
        Self {
            channel,
            start,
            end,
            duration_secs,
            elapsed_secs: 0.0,
            easing,
            track: None,
        }
    }

    /// Re-aim the camera at `node` on every tick of this tween.
    pub fn tracking(mut self, node: NodeId) -> Self {
        self.track = Some(node);
        self
    }

    fn value(&self) -> Vec3 {
        let t = if self.duration_secs <= 0.0 {
            1.0
        } else {
            (self.elapsed_secs / self.duration_secs).min(1.0)
        };
        lerp_vec3(&self.start, &self.end, self.easing.apply(t))
    }

    fn finished(&self) -> bool {
        self.elapsed_secs >= self.duration_secs
    }
}

/// The set of in-flight tweens.
#[derive(Debug, Default)]
pub struct TweenSet {
    tweens: Vec<Tween>,
}

impl TweenSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a tween, superseding any in-flight tween on the same channel.
    pub fn start(&mut self, tween: Tween) {
        self.tweens.retain(|t| t.channel != tween.channel);
        self.tweens.push(tween);
    }

    /// Drop any in-flight tween on `channel` without applying its end value.
    pub fn cancel(&mut self, channel: Channel) {
        self.tweens.retain(|t| t.channel != channel);
    }

    /// Whether any tween is in flight.
    pub fn any_active(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Whether a tween is in flight on `channel`.
    pub fn active_on(&self, channel: Channel) -> bool {
        self.tweens.iter().any(|t| t.channel == channel)
    }

    /// Advance all tweens by `dt` seconds and apply their values to the scene.
    ///
    /// Tweens whose target node no longer exists are dropped; finished
    /// tweens land exactly on their end value and are removed.
    pub fn advance(&mut self, scene: &mut Scene, dt: f64) {
        let mut keep = Vec::with_capacity(self.tweens.len());
        for mut tween in self.tweens.drain(..) {
            tween.elapsed_secs += dt;
            let value = tween.value();
            let alive = match tween.channel {
                Channel::NodeRotation(id) => match scene.node_mut(id) {
                    Some(node) => {
                        node.transform.rotation = value;
                        true
                    }
                    None => false,
                },
                Channel::CameraPosition => {
                    scene.camera.position = Point3::from(value);
                    if let Some(id) = tween.track {
                        match scene.world_position(id) {
                            Some(p) => scene.camera.target = p,
                            // Tracked part vanished mid-flight; let the
                            // tween finish without re-aiming.
                            None => tween.track = None,
                        }
                    }
                    true
                }
                Channel::CameraAim => {
                    scene.camera.target = Point3::from(value);
                    true
                }
            };
            if alive && !tween.finished() {
                keep.push(tween);
            }
        }
        self.tweens = keep;
    }
}
