//! Frame geometry: hole layout, bounding box and drag clamping
//!
//! A frame is always rebuilt from its configuration rather than mutated,
//! so hole offsets depend only on the frame width and hole count.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Shape types, shared by falling shapes and holes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Square,
    Star,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Star];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Star => "star",
        }
    }
}

/// Maximum holes a frame may carry
pub const MAX_HOLES: usize = 3;

/// Ordered hole types of a frame (1-3 holes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameConfig {
    holes: Vec<ShapeKind>,
}

impl FrameConfig {
    /// Build a configuration, rejecting empty or oversized hole lists
    pub fn new(holes: &[ShapeKind]) -> Option<Self> {
        if holes.is_empty() || holes.len() > MAX_HOLES {
            return None;
        }
        Some(Self {
            holes: holes.to_vec(),
        })
    }

    pub fn holes(&self) -> &[ShapeKind] {
        &self.holes
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    /// The built-in configuration rotation. The first entry is the opening frame.
    pub fn templates() -> Vec<FrameConfig> {
        use ShapeKind::*;
        const TEMPLATES: [&[ShapeKind]; 12] = [
            &[Circle, Square, Star],
            &[Circle],
            &[Square],
            &[Star],
            &[Circle, Circle],
            &[Square, Square],
            &[Star, Star],
            &[Circle, Star],
            &[Square, Circle],
            &[Star, Square],
            &[Circle, Circle, Star],
            &[Square, Star, Star],
        ];
        TEMPLATES
            .iter()
            .map(|holes| FrameConfig {
                holes: holes.to_vec(),
            })
            .collect()
    }
}

/// Frame width modifier. Only one applies at a time, so widths never compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeModifier {
    #[default]
    Normal,
    Expanded,
    Shrunk,
}

impl SizeModifier {
    pub fn factor(&self) -> f32 {
        match self {
            SizeModifier::Normal => 1.0,
            SizeModifier::Expanded => EXPAND_FACTOR,
            SizeModifier::Shrunk => SHRINK_FACTOR,
        }
    }
}

/// A typed aperture, positioned relative to the frame's left edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub kind: ShapeKind,
    pub offset_x: f32,
    pub size: f32,
}

/// The player's frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub holes: Vec<Hole>,
    pub config: FrameConfig,
    pub modifier: SizeModifier,
}

impl Frame {
    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Screen-space horizontal span of a hole, as `[left, right)`
    pub fn hole_span(&self, hole: &Hole) -> (f32, f32) {
        let left = self.pos.x + hole.offset_x;
        (left, left + hole.size)
    }

    /// Screen-space center of a hole
    pub fn hole_center_x(&self, hole: &Hole) -> f32 {
        self.pos.x + hole.offset_x + hole.size / 2.0
    }

    /// First hole (in layout order) whose half-open span contains `x`
    pub fn hole_at(&self, x: f32) -> Option<&Hole> {
        self.holes.iter().find(|hole| {
            let (left, right) = self.hole_span(hole);
            x >= left && x < right
        })
    }

    /// Move horizontally by `delta` and re-apply the screen clamp
    pub fn drag(&mut self, delta: f32, screen_width: f32) {
        self.pos.x += delta;
        clamp(self, screen_width);
    }
}

/// Frame width before the screen and modifier are applied
fn base_width(screen_width: f32) -> f32 {
    BASE_FRAME_WIDTH.min(screen_width * FRAME_SCREEN_FRACTION)
}

/// Lay out `config` into a new frame.
///
/// With a `previous` frame the new frame keeps its horizontal center,
/// otherwise it is centered on screen. The result is always clamped.
pub fn build_frame(
    config: &FrameConfig,
    previous: Option<&Frame>,
    screen: Vec2,
    modifier: SizeModifier,
) -> Frame {
    let width = base_width(screen.x) * modifier.factor();
    let count = config.hole_count();
    let spacing = (width - HOLE_SIZE * count as f32) / (count as f32 + 1.0);

    let holes = config
        .holes()
        .iter()
        .enumerate()
        .map(|(index, &kind)| Hole {
            kind,
            offset_x: spacing + (spacing + HOLE_SIZE) * index as f32,
            size: HOLE_SIZE,
        })
        .collect();

    let center_x = previous.map_or(screen.x / 2.0, Frame::center_x);

    let mut frame = Frame {
        pos: Vec2::new(center_x - width / 2.0, screen.y - FRAME_BOTTOM_OFFSET),
        width,
        height: FRAME_HEIGHT,
        holes,
        config: config.clone(),
        modifier,
    };
    clamp(&mut frame, screen.x);
    frame
}

/// Keep `x` within `[-overflow, screen_width - width + overflow]`
pub fn clamp(frame: &mut Frame, screen_width: f32) {
    let min_x = -FRAME_OVERFLOW;
    let max_x = screen_width - frame.width + FRAME_OVERFLOW;
    frame.pos.x = frame.pos.x.max(min_x).min(max_x);
}
