//! Shape-versus-frame collision and scoring rules
//!
//! A shape only interacts with the frame while its vertical span overlaps
//! the frame band and its center lies within the frame's outer bounds.
//! Inside a hole it either passes (type match) or is a harmful contact;
//! anywhere else it hits solid material once it sinks past a small grace.

use super::events::MissCause;
use super::geometry::Frame;
use super::state::FallingShape;
use crate::consts::*;

/// What protects the frame from harmful contacts this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Protection {
    /// Frame transition in progress
    pub invincible: bool,
    /// Shield power-up active
    pub shielded: bool,
}

impl Protection {
    /// Invincibility takes precedence over the shield
    pub fn absorb(&self) -> Option<MissCause> {
        if self.invincible {
            Some(MissCause::Invincible)
        } else if self.shielded {
            Some(MissCause::Shield)
        } else {
            None
        }
    }
}

/// Result of testing one shape against the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionOutcome {
    /// Keep falling
    Falling,
    /// Fell past the bottom edge; remove silently
    Offscreen,
    /// Passed through a matching hole
    Collected { points: u64 },
    /// Harmful contact absorbed by protection; remove with a miss effect
    Absorbed(MissCause),
    /// Unprotected harmful contact; the game ends
    Fatal,
}

/// Points a collected shape is worth. Power-up shapes score nothing.
pub fn points_for(shape: &FallingShape) -> u64 {
    if shape.is_power_up() {
        0
    } else if shape.golden {
        POINTS_GOLDEN
    } else {
        POINTS_NORMAL
    }
}

fn harmful(protection: Protection) -> CollisionOutcome {
    match protection.absorb() {
        Some(cause) => CollisionOutcome::Absorbed(cause),
        None => CollisionOutcome::Fatal,
    }
}

/// Resolve one shape against the frame for this tick
pub fn check_shape(
    shape: &FallingShape,
    frame: &Frame,
    protection: Protection,
    screen_height: f32,
) -> CollisionOutcome {
    let in_band = shape.bottom() >= frame.top() && shape.top() <= frame.bottom();
    let center_x = shape.pos.x;

    if in_band && center_x >= frame.left() && center_x <= frame.right() {
        if let Some(hole) = frame.hole_at(center_x) {
            return if hole.kind == shape.kind {
                CollisionOutcome::Collected {
                    points: points_for(shape),
                }
            } else {
                harmful(protection)
            };
        }

        if shape.bottom() >= frame.top() + SOLID_HIT_GRACE {
            return harmful(protection);
        }
        return CollisionOutcome::Falling;
    }

    if shape.pos.y > screen_height + OFFSCREEN_MARGIN {
        CollisionOutcome::Offscreen
    } else {
        CollisionOutcome::Falling
    }
}
