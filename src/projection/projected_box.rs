use super::{Camera, Viewport};
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::shatter::Fragment;
use arrayvec::ArrayVec;
use core::fmt;
use na::Point2;

/// A rectangle in normalized device coordinates, clipped to `[-1, 1]²`.
///
/// The `y` axis points up.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NdcRect {
    /// The bottom-left corner.
    pub mins: Point2<Real>,
    /// The top-right corner.
    pub maxs: Point2<Real>,
}

/// The screen-space box of a fragment.
///
/// Pixel coordinates have their origin at the top-left corner of the image, with `y`
/// pointing down.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedBox {
    /// The left edge, in pixels.
    pub left: Real,
    /// The top edge, in pixels.
    pub top: Real,
    /// The width, in pixels.
    pub width: Real,
    /// The height, in pixels.
    pub height: Real,
    /// The text drawn next to the box.
    pub label: String,
    /// The clipped rectangle this box was computed from.
    pub ndc: NdcRect,
}

impl ProjectedBox {
    /// The right edge, in pixels.
    #[inline]
    pub fn right(&self) -> Real {
        self.left + self.width
    }

    /// The bottom edge, in pixels.
    #[inline]
    pub fn bottom(&self) -> Real {
        self.top + self.height
    }

    /// The detection record of this box.
    ///
    /// It is computed from the normalized rectangle so it does not depend on the image
    /// resolution.
    pub fn yolo(&self, class_id: u32) -> YoloRecord {
        YoloRecord::from_ndc(class_id, &self.ndc)
    }
}

/// A bounding box annotation: class, then center and size relative to the image size.
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct YoloRecord {
    /// The object class.
    pub class_id: u32,
    /// The horizontal center, in `[0, 1]` from the left edge.
    pub cx: Real,
    /// The vertical center, in `[0, 1]` from the top edge.
    pub cy: Real,
    /// The width, in `[0, 1]`.
    pub w: Real,
    /// The height, in `[0, 1]`.
    pub h: Real,
}

impl YoloRecord {
    /// The record of a clipped normalized-device-coordinates rectangle.
    pub fn from_ndc(class_id: u32, rect: &NdcRect) -> Self {
        Self {
            class_id,
            cx: ((rect.mins.x + rect.maxs.x) * 0.5 + 1.0) * 0.5,
            cy: (1.0 - (rect.mins.y + rect.maxs.y) * 0.5) * 0.5,
            w: (rect.maxs.x - rect.mins.x) * 0.5,
            h: (rect.maxs.y - rect.mins.y) * 0.5,
        }
    }

    /// The record of a pixel rectangle given as `[left, top, width, height]`.
    pub fn from_pixel_rect(class_id: u32, rect: [Real; 4], viewport: &Viewport) -> Self {
        let [left, top, width, height] = rect;
        let vw = viewport.width.max(1) as Real;
        let vh = viewport.height.max(1) as Real;

        Self {
            class_id,
            cx: (left + width * 0.5) / vw,
            cy: (top + height * 0.5) / vh,
            w: width / vw,
            h: height / vh,
        }
    }
}

impl fmt::Display for YoloRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.cx, self.cy, self.w, self.h
        )
    }
}

/// The content of a label file: one record per line.
pub fn label_text(records: &[YoloRecord]) -> String {
    records.iter().map(|r| format!("{}\n", r)).collect()
}

/// Projects a world-space AABB on the image plane of `camera`.
///
/// Returns `None` if the box is entirely behind the near plane or entirely outside of the
/// view frustum along the `x` or `y` axis; a box touching the frustum border without
/// overlapping it is outside. Otherwise the projected rectangle is clipped to the image.
pub fn project_aabb(
    aabb: &Aabb,
    camera: &Camera,
    viewport: &Viewport,
    label: impl Into<String>,
) -> Option<ProjectedBox> {
    let view = camera.view();
    let projection = camera.projection();
    let near = -camera.near;

    // The camera looks toward -z: a point is in front of the near plane if z <= -near.
    let corners = aabb.vertices().map(|pt| view * pt);
    let mut visible: ArrayVec<Point<Real>, 20> = ArrayVec::new();

    for pt in &corners {
        if pt.z <= near {
            visible.push(*pt);
        }
    }

    for &(i, j) in Aabb::EDGES_VERTEX_IDS.iter() {
        let (a, b) = (corners[i], corners[j]);

        if (a.z <= near) != (b.z <= near) {
            let t = (near - a.z) / (b.z - a.z);
            visible.push(a + (b - a) * t);
        }
    }

    if visible.is_empty() {
        return None;
    }

    let mut mins = Point2::new(Real::MAX, Real::MAX);
    let mut maxs = Point2::new(-Real::MAX, -Real::MAX);

    for pt in &visible {
        let ndc = projection.project_point(pt);
        mins = mins.inf(&ndc.xy());
        maxs = maxs.sup(&ndc.xy());
    }

    if maxs.x <= -1.0 || mins.x >= 1.0 || maxs.y <= -1.0 || mins.y >= 1.0 {
        return None;
    }

    let ndc = NdcRect {
        mins: mins.map(|e| e.clamp(-1.0, 1.0)),
        maxs: maxs.map(|e| e.clamp(-1.0, 1.0)),
    };

    let vw = viewport.width as Real;
    let vh = viewport.height as Real;
    let left = (ndc.mins.x + 1.0) * 0.5 * vw;
    let right = (ndc.maxs.x + 1.0) * 0.5 * vw;
    let top = (1.0 - ndc.maxs.y) * 0.5 * vh;
    let bottom = (1.0 - ndc.mins.y) * 0.5 * vh;

    Some(ProjectedBox {
        left,
        top,
        width: right - left,
        height: bottom - top,
        label: label.into(),
        ndc,
    })
}

/// The boxes of every visible fragment at the given explosion forces.
///
/// Boxes are labeled `fragment_<index>`; fragments outside the view are omitted.
pub fn project_fragments(
    fragments: &[Fragment],
    force: Real,
    rot_force: Real,
    camera: &Camera,
    viewport: &Viewport,
) -> Vec<ProjectedBox> {
    fragments
        .iter()
        .filter_map(|fragment| {
            project_aabb(
                &fragment.world_aabb(force, rot_force),
                camera,
                viewport,
                format!("fragment_{}", fragment.index()),
            )
        })
        .collect()
}
