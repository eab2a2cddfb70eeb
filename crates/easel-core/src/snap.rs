//! Alignment snapping for interactive drags.
//!
//! While an element is being dragged, [`compute_snap`] decides whether its
//! proposed top-left position should be nudged onto a nearby alignment target
//! (canvas edges and center, sibling edges and centers) and reports which
//! guide lines to draw. It is a pure function, called once per pointer-move
//! frame; the guides are ephemeral and discarded when the drag ends.

use crate::element::Element;
use crate::geometry;
use kurbo::{Point, Size};

/// Default snap threshold in canvas pixels.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideOrientation {
    /// A vertical line at an x coordinate.
    Vertical,
    /// A horizontal line at a y coordinate.
    Horizontal,
}

/// What a guide is anchored to. Renderers style the categories differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideKind {
    /// A sibling element's bounding-box edge.
    Edge,
    /// A center line (canvas center or a sibling's rotated center).
    Center,
    /// A canvas edge.
    Canvas,
}

/// A single alignment guide at an absolute canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapGuide {
    /// Target coordinate (x for vertical guides, y for horizontal ones).
    pub position: f64,
    pub orientation: GuideOrientation,
    pub kind: GuideKind,
}

impl SnapGuide {
    fn vertical(position: f64, kind: GuideKind) -> Self {
        Self {
            position,
            orientation: GuideOrientation::Vertical,
            kind,
        }
    }

    fn horizontal(position: f64, kind: GuideKind) -> Self {
        Self {
            position,
            orientation: GuideOrientation::Horizontal,
            kind,
        }
    }
}

/// Options controlling a snap computation.
#[derive(Debug, Clone)]
pub struct SnapOptions {
    /// Maximum distance, in canvas pixels, at which a candidate attracts.
    pub threshold: f64,
    /// Consider sibling elements as targets.
    pub snap_to_elements: bool,
    /// Consider canvas edges and center as targets.
    pub snap_to_canvas: bool,
    /// Canvas dimensions. Required for canvas snapping; when absent that
    /// candidate category is silently disabled.
    pub canvas_size: Option<Size>,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            threshold: SNAP_THRESHOLD,
            snap_to_elements: true,
            snap_to_canvas: true,
            canvas_size: None,
        }
    }
}

/// Result of a snap computation.
///
/// `x`/`y` are the corrected top-left. Each guide list holds at most one
/// guide: only the closest accepted candidate per axis is kept.
#[derive(Debug, Clone)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub vertical_guides: Vec<SnapGuide>,
    pub horizontal_guides: Vec<SnapGuide>,
}

impl SnapResult {
    /// Check if either axis snapped.
    pub fn is_snapped(&self) -> bool {
        !self.vertical_guides.is_empty() || !self.horizontal_guides.is_empty()
    }
}

/// Running best-candidate state for one axis.
struct AxisTracker {
    threshold: f64,
    /// Residual distance of the current winner, seeded at the threshold.
    best: f64,
    offset: f64,
    guide: Option<SnapGuide>,
}

impl AxisTracker {
    fn new(threshold: f64) -> Self {
        Self {
            threshold,
            best: threshold,
            offset: 0.0,
            guide: None,
        }
    }

    /// Accept `offset` when it lands strictly inside the threshold and at
    /// least ties the current best. An exact tie goes to the later candidate,
    /// which replaces the earlier guide.
    fn consider(&mut self, offset: f64, guide: SnapGuide) {
        let dist = offset.abs();
        if dist < self.threshold && dist <= self.best {
            self.best = dist;
            self.offset = offset;
            self.guide = Some(guide);
        }
    }
}

/// Compute the snapped position for an element being dragged.
///
/// `moving` contributes its size and rotation; the proposed coordinates
/// supersede its stored position. Siblings equal to `moving` by id and
/// siblings with `visible == false` are skipped; locked-but-visible siblings
/// remain valid targets. Candidates are evaluated in a fixed order (canvas
/// edges, canvas centers, then per-sibling edges and center in collection
/// order) and each acceptance overwrites the axis, so of equally close
/// candidates the later-evaluated one wins.
pub fn compute_snap(
    moving: &Element,
    proposed_x: f64,
    proposed_y: f64,
    others: &[Element],
    options: &SnapOptions,
) -> SnapResult {
    let proposed = Point::new(proposed_x, proposed_y);
    let bounds = geometry::bounding_box(proposed, moving.size, moving.rotation);
    // Edge checks use the rotation-aware bounding box; center checks use the
    // true rotated center, which stays meaningful at any angle.
    let center = geometry::rotated_center(proposed, moving.size, moving.rotation);

    let mut x_axis = AxisTracker::new(options.threshold);
    let mut y_axis = AxisTracker::new(options.threshold);

    if options.snap_to_canvas {
        if let Some(canvas) = options.canvas_size {
            x_axis.consider(-bounds.x0, SnapGuide::vertical(0.0, GuideKind::Canvas));
            x_axis.consider(
                canvas.width - bounds.x1,
                SnapGuide::vertical(canvas.width, GuideKind::Canvas),
            );
            y_axis.consider(-bounds.y0, SnapGuide::horizontal(0.0, GuideKind::Canvas));
            y_axis.consider(
                canvas.height - bounds.y1,
                SnapGuide::horizontal(canvas.height, GuideKind::Canvas),
            );
            x_axis.consider(
                canvas.width / 2.0 - center.x,
                SnapGuide::vertical(canvas.width / 2.0, GuideKind::Center),
            );
            y_axis.consider(
                canvas.height / 2.0 - center.y,
                SnapGuide::horizontal(canvas.height / 2.0, GuideKind::Center),
            );
        }
    }

    if options.snap_to_elements {
        for other in others {
            // Exclusion is by id, so a sibling with coincidentally identical
            // geometry still attracts.
            if other.id == moving.id || !other.visible {
                continue;
            }
            let sib = geometry::bounding_box(other.position, other.size, other.rotation);
            let sib_center = geometry::rotated_center(other.position, other.size, other.rotation);

            x_axis.consider(sib.x0 - bounds.x0, SnapGuide::vertical(sib.x0, GuideKind::Edge));
            x_axis.consider(sib.x1 - bounds.x1, SnapGuide::vertical(sib.x1, GuideKind::Edge));
            x_axis.consider(sib.x1 - bounds.x0, SnapGuide::vertical(sib.x1, GuideKind::Edge));
            x_axis.consider(sib.x0 - bounds.x1, SnapGuide::vertical(sib.x0, GuideKind::Edge));
            x_axis.consider(
                sib_center.x - center.x,
                SnapGuide::vertical(sib_center.x, GuideKind::Center),
            );

            y_axis.consider(sib.y0 - bounds.y0, SnapGuide::horizontal(sib.y0, GuideKind::Edge));
            y_axis.consider(sib.y1 - bounds.y1, SnapGuide::horizontal(sib.y1, GuideKind::Edge));
            y_axis.consider(sib.y1 - bounds.y0, SnapGuide::horizontal(sib.y1, GuideKind::Edge));
            y_axis.consider(sib.y0 - bounds.y1, SnapGuide::horizontal(sib.y0, GuideKind::Edge));
            y_axis.consider(
                sib_center.y - center.y,
                SnapGuide::horizontal(sib_center.y, GuideKind::Center),
            );
        }
    }

    SnapResult {
        x: proposed_x + x_axis.offset,
        y: proposed_y + y_axis.offset,
        vertical_guides: x_axis.guide.into_iter().collect(),
        horizontal_guides: y_axis.guide.into_iter().collect(),
    }
}
