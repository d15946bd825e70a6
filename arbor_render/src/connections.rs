// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent–child and spouse connection geometry.

use kurbo::{CubicBez, Line, Point, Rect};

use arbor_tree::{TreeLayoutConfig, TreeNode};

use crate::scene::TreeScene;
use crate::surface::{DrawOp, DrawSurface, Painter};
use crate::Theme;

/// Opacity applied to connection colours.
pub const CONNECTION_ALPHA: f32 = 0.6;

/// Connection stroke width at `scale`: `2 / scale` clamped into `[1, 4]`.
///
/// Lines stay visible when zoomed out without becoming heavy when zoomed in.
pub fn stroke_width(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        (2.0 / scale).clamp(1.0, 4.0)
    } else {
        1.0
    }
}

/// Curve from the parent's bottom centre to the child's top centre.
///
/// Both control points sit at the vertical midpoint, so the curve leaves and
/// enters the cards vertically.
pub fn parent_child_curve(parent: Point, child: Point, layout: &TreeLayoutConfig) -> CubicBez {
    let half_h = layout.node_height / 2.0;
    let p0 = Point::new(parent.x, parent.y + half_h);
    let p3 = Point::new(child.x, child.y - half_h);
    let mid_y = (p0.y + p3.y) / 2.0;
    CubicBez::new(
        p0,
        Point::new(p0.x, mid_y),
        Point::new(p3.x, mid_y),
        p3,
    )
}

/// Straight line between the facing edges of two spouse cards.
///
/// The line runs from the right edge of the left card to the left edge of the
/// right card, each at its card's vertical centre.
pub fn spouse_line(a: Point, b: Point, layout: &TreeLayoutConfig) -> Line {
    let half_w = layout.node_width / 2.0;
    let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
    Line::new(
        Point::new(left.x + half_w, left.y),
        Point::new(right.x - half_w, right.y),
    )
}

/// Whether the box spanned by `a` and `b` touches `rect`, borders included.
///
/// Degenerate spans (vertical or horizontal segments) still count.
pub(crate) fn span_touches(a: Point, b: Point, rect: Rect) -> bool {
    a.x.min(b.x) <= rect.x1
        && a.x.max(b.x) >= rect.x0
        && a.y.min(b.y) <= rect.y1
        && a.y.max(b.y) >= rect.y0
}

/// Whether the spouse pair `(node, other)` is drawn from `node`'s side.
///
/// A pair listed on both sides is drawn once, from the smaller id.
fn owns_spouse_pair(node: &TreeNode, other: &TreeNode) -> bool {
    node.id < other.id || !other.spouses.contains(&node.id)
}

/// Outcome of a connection pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ConnectionCounts {
    pub(crate) drawn: usize,
    pub(crate) stale: usize,
}

/// Draws every connection touching `viewport`: parent–child curves first,
/// then spouse lines, one paint per kind.
///
/// References to ids missing from the scene are skipped and counted.
pub(crate) fn draw_connections<S: DrawSurface>(
    painter: &mut Painter<S>,
    scene: &TreeScene,
    viewport: Rect,
    theme: &Theme,
    scale: f64,
) -> ConnectionCounts {
    let layout = scene.layout();
    let mut counts = ConnectionCounts::default();
    let mut painted = false;

    for parent in scene.nodes() {
        for &child_id in &parent.children {
            let Some(child) = scene.node(child_id) else {
                counts.stale += 1;
                continue;
            };
            let curve = parent_child_curve(parent.position(), child.position(), layout);
            if !span_touches(curve.p0, curve.p3, viewport) {
                continue;
            }
            if !painted {
                painter.paint(theme.parent_child.multiply_alpha(CONNECTION_ALPHA));
                painter.stroke_width(stroke_width(scale));
                painted = true;
            }
            painter.draw(DrawOp::StrokeCubic(curve));
            counts.drawn += 1;
        }
    }

    painted = false;
    for node in scene.nodes() {
        for &spouse_id in &node.spouses {
            let Some(spouse) = scene.node(spouse_id) else {
                counts.stale += 1;
                continue;
            };
            if spouse.id == node.id || !owns_spouse_pair(node, spouse) {
                continue;
            }
            let line = spouse_line(node.position(), spouse.position(), layout);
            if !span_touches(line.p0, line.p1, viewport) {
                continue;
            }
            if !painted {
                painter.paint(theme.spouse.multiply_alpha(CONNECTION_ALPHA));
                painter.stroke_width(stroke_width(scale));
                painted = true;
            }
            painter.draw(DrawOp::StrokeLine(line));
            counts.drawn += 1;
        }
    }

    counts
}
