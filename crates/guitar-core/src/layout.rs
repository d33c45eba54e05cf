//! Grid layout: derives the playable string segments from viewport geometry.

use glam::Vec2;

use crate::constants::{
    CORNER_GUIDE_LENGTH_PX, FIRST_BAND_EXTENSION_PX, GRID_DIVISIONS, LAST_BAND_EXTENSION_PX,
    RESERVED_BOTTOM_PX, RESERVED_TOP_PX,
};
use crate::error::{GuitarError, Result};
use crate::sound_bank::{SoundBank, StringSlot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Unit axis along which this line is displaced when it moves (perpendicular to the line).
    #[inline]
    pub fn perpendicular(self) -> Vec2 {
        match self {
            Orientation::Vertical => Vec2::X,
            Orientation::Horizontal => Vec2::Y,
        }
    }
}

/// One playable string. `start` is always the top/left end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start: Vec2,
    pub end: Vec2,
    pub orientation: Orientation,
}

impl Segment {
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }
}

/// Top/bottom bands reserved by the host view; strings live between them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: f32,
    pub bottom: f32,
}

impl Insets {
    /// Bands covered by the black bars above and below the camera area.
    pub fn reserved(safe_top: f32, safe_bottom: f32) -> Self {
        Self {
            top: safe_top + RESERVED_TOP_PX,
            bottom: safe_bottom + RESERVED_BOTTOM_PX,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub insets: Insets,
}

impl Viewport {
    pub fn new(width: f32, height: f32, insets: Insets) -> Self {
        Self {
            width,
            height,
            insets,
        }
    }

    #[inline]
    pub fn playable_top(&self) -> f32 {
        self.insets.top
    }

    #[inline]
    pub fn playable_bottom(&self) -> f32 {
        self.height - self.insets.bottom
    }

    #[inline]
    pub fn playable_extent(&self) -> f32 {
        self.playable_bottom() - self.playable_top()
    }
}

#[derive(Clone, Debug)]
pub struct GridParams {
    /// Applied above and below the first band of the left column.
    pub first_band_extension: f32,
    /// Applied past the end of the last band of both columns.
    pub last_band_extension: f32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            first_band_extension: FIRST_BAND_EXTENSION_PX,
            last_band_extension: LAST_BAND_EXTENSION_PX,
        }
    }
}

/// Build one segment per sound bank entry, in bank order.
pub fn generate_segments(
    viewport: &Viewport,
    bank: &SoundBank,
    params: &GridParams,
) -> Result<Vec<Segment>> {
    let width = viewport.width;
    let extent = viewport.playable_extent();
    // written as negations so NaN dimensions are rejected too
    if !(width > 0.0) || !(extent > 0.0) {
        return Err(GuitarError::DegenerateGeometry { width, extent });
    }

    let divisions = GRID_DIVISIONS as f32;
    let last_band = (GRID_DIVISIONS - 1) as u8;
    let cell_w = width / divisions;
    let band_h = extent / divisions;
    let top = viewport.playable_top();

    let segments = bank
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry.slot {
            StringSlot::Vertical { column, band } => {
                let x = cell_w * (column as f32 + 1.0);
                let mut y0 = top + band_h * band as f32;
                let mut y1 = y0 + band_h;
                // only the left column's first band reaches past its span
                if band == 0 && column == 0 {
                    y0 -= params.first_band_extension;
                    y1 += params.first_band_extension;
                }
                if band == last_band {
                    y1 += params.last_band_extension;
                }
                Segment {
                    index,
                    start: Vec2::new(x, y0),
                    end: Vec2::new(x, y1),
                    orientation: Orientation::Vertical,
                }
            }
            StringSlot::Horizontal { row, band } => {
                let y = top + band_h * (row as f32 + 1.0);
                let x0 = cell_w * band as f32;
                Segment {
                    index,
                    start: Vec2::new(x0, y),
                    end: Vec2::new(x0 + cell_w, y),
                    orientation: Orientation::Horizontal,
                }
            }
        })
        .collect();
    Ok(segments)
}

/// Owns the current segment set and regenerates it on every layout change.
#[derive(Clone, Debug, Default)]
pub struct GridLayout {
    params: GridParams,
    viewport: Option<Viewport>,
    segments: Vec<Segment>,
}

impl GridLayout {
    pub fn new(params: GridParams) -> Self {
        Self {
            params,
            viewport: None,
            segments: Vec::new(),
        }
    }

    /// Replace the segment set for a new viewport. Degenerate geometry leaves
    /// the grid empty (every touch then resolves to no hit).
    pub fn regenerate(&mut self, viewport: Viewport, bank: &SoundBank) -> &[Segment] {
        self.viewport = Some(viewport);
        self.segments = match generate_segments(&viewport, bank, &self.params) {
            Ok(segments) => segments,
            Err(e) => {
                log::warn!("[grid] {}; no strings are playable", e);
                Vec::new()
            }
        };
        &self.segments
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }
}

/// L-shaped guides at the four viewport corners: `(corner, arm_a, arm_b)`.
pub fn corner_guides(width: f32, height: f32) -> [(Vec2, Vec2, Vec2); 4] {
    let l = CORNER_GUIDE_LENGTH_PX;
    [
        (Vec2::ZERO, Vec2::new(l, 0.0), Vec2::new(0.0, l)),
        (
            Vec2::new(width, 0.0),
            Vec2::new(width - l, 0.0),
            Vec2::new(width, l),
        ),
        (
            Vec2::new(0.0, height),
            Vec2::new(l, height),
            Vec2::new(0.0, height - l),
        ),
        (
            Vec2::new(width, height),
            Vec2::new(width - l, height),
            Vec2::new(width, height - l),
        ),
    ]
}
