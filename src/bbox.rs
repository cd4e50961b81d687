use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Integer pixel box in left-top-right-bottom format
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct BBox([i32; 4]);

impl From<BBox> for [i32; 4] {
    fn from(bbox: BBox) -> Self {
        bbox.0
    }
}

impl BBox {
    #[inline]
    pub fn ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        BBox([left, top, right, bottom])
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32; 4] {
        &self.0
    }

    #[inline(always)]
    pub fn left(&self) -> i32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> i32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> i32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> i32 {
        self.0[3]
    }

    #[inline(always)]
    pub fn width(&self) -> i64 {
        self.0[2] as i64 - self.0[0] as i64
    }

    #[inline(always)]
    pub fn height(&self) -> i64 {
        self.0[3] as i64 - self.0[1] as i64
    }

    /// Half width and half height, measured from the box's own corner.
    ///
    /// The frame offset is discarded, so two equally sized boxes anywhere in
    /// the frame share the same center. See [`BBox::absolute_center`] for the
    /// frame-relative point.
    #[inline]
    pub fn center(&self) -> na::Point2<i32> {
        na::Point2::new(half(self.width()), half(self.height()))
    }

    #[inline]
    pub fn absolute_center(&self) -> na::Point2<i32> {
        na::Point2::new(
            half(self.left() as i64 * 2 + self.width()),
            half(self.top() as i64 * 2 + self.height()),
        )
    }

    /// Per-coordinate truncating average of two boxes.
    #[inline]
    pub fn midpoint(&self, other: &BBox) -> BBox {
        let avg = |i: usize| half(self.0[i] as i64 + other.0[i] as i64);

        BBox([avg(0), avg(1), avg(2), avg(3)])
    }

    pub fn iou(&self, other: &BBox) -> f32 {
        let b1_area = (self.width() + 1) as f64 * (self.height() + 1) as f64;
        let b2_area = (other.width() + 1) as f64 * (other.height() + 1) as f64;

        let i_left = self.left().max(other.left()) as i64;
        let i_right = self.right().min(other.right()) as i64;
        let i_top = self.top().max(other.top()) as i64;
        let i_bottom = self.bottom().min(other.bottom()) as i64;
        let i_area = (i_right - i_left + 1).max(0) as f64 * (i_bottom - i_top + 1).max(0) as f64;

        (i_area / (b1_area + b2_area - i_area)) as f32
    }
}

// Halves of any i32 sum or difference fit back into i32.
#[inline(always)]
fn half(v: i64) -> i32 {
    (v / 2) as i32
}

#[inline]
fn axis_ratio(a: i32, b: i32) -> f32 {
    let lo = a.min(b).max(0);
    let hi = a.max(b).max(0);

    if hi == 0 {
        1.0
    } else {
        lo as f32 / hi as f32
    }
}

/// Product of the min/max ratios along each axis, in [0, 1].
///
/// Non-positive coordinates count as 0; an axis where both points sit at 0
/// contributes 1.0.
pub fn nearness(a: na::Point2<i32>, b: na::Point2<i32>) -> f32 {
    axis_ratio(a.x, b.x) * axis_ratio(a.y, b.y)
}

/// How an observation's box is scored against a remembered blob's box.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum NearnessMetric {
    /// `nearness` over self-relative centers.
    #[default]
    ShapeRatio,
    /// `nearness` over frame-relative centers.
    CenterRatio,
    Iou,
}

impl NearnessMetric {
    pub fn score(self, a: &BBox, b: &BBox) -> f32 {
        match self {
            NearnessMetric::ShapeRatio => nearness(a.center(), b.center()),
            NearnessMetric::CenterRatio => nearness(a.absolute_center(), b.absolute_center()),
            NearnessMetric::Iou => a.iou(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_ignores_frame_offset() {
        let a = BBox::ltrb(0, 0, 100, 50);
        let b = BBox::ltrb(300, 200, 400, 250);

        assert_eq!(a.center(), na::Point2::new(50, 25));
        assert_eq!(a.center(), b.center());
        assert_eq!(b.absolute_center(), na::Point2::new(350, 225));
    }

    #[test]
    fn center_truncates() {
        let b = BBox::ltrb(0, 0, 5, 7);
        assert_eq!(b.center(), na::Point2::new(2, 3));
    }

    #[test]
    fn nearness_identical_is_one() {
        let p = na::Point2::new(40, 60);
        assert_relative_eq!(nearness(p, p), 1.0);
    }

    #[test]
    fn nearness_is_ratio_product() {
        let a = na::Point2::new(50, 50);
        let b = na::Point2::new(25, 100);
        assert_relative_eq!(nearness(a, b), 0.25);
        assert_relative_eq!(nearness(b, a), 0.25);
    }

    #[test]
    fn nearness_zero_axis() {
        let a = na::Point2::new(0, 10);
        let b = na::Point2::new(0, 20);
        assert_relative_eq!(nearness(a, b), 0.5);

        let c = na::Point2::new(4, 10);
        assert_relative_eq!(nearness(a, c), 0.0);
    }

    #[test]
    fn midpoint_truncates_each_coordinate() {
        let a = BBox::ltrb(0, 0, 100, 100);
        let b = BBox::ltrb(5, 5, 105, 105);
        assert_eq!(a.midpoint(&b), BBox::ltrb(2, 2, 102, 102));
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let huge = BBox::ltrb(0, 0, 2_000_000_000, 2_000_000_000);
        assert_eq!(huge.midpoint(&huge), huge);
        assert_eq!(huge.center(), na::Point2::new(1_000_000_000, 1_000_000_000));

        let full = BBox::ltrb(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(full.width(), u32::MAX as i64);
        assert_eq!(full.center(), na::Point2::new(i32::MAX, i32::MAX));
        assert_eq!(full.absolute_center(), na::Point2::new(0, 0));

        let big = BBox::ltrb(0, 0, 60_000, 60_000);
        assert_relative_eq!(NearnessMetric::Iou.score(&big, &big), 1.0);
        assert_relative_eq!(full.iou(&full), 1.0);
    }

    #[test]
    fn iou_disjoint_and_same() {
        let a = BBox::ltrb(0, 0, 9, 9);
        let b = BBox::ltrb(20, 20, 29, 29);
        assert_relative_eq!(a.iou(&b), 0.0);
        assert_relative_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn metrics_disagree_on_far_boxes() {
        let a = BBox::ltrb(0, 0, 100, 100);
        let b = BBox::ltrb(500, 500, 600, 600);

        assert_relative_eq!(NearnessMetric::ShapeRatio.score(&a, &b), 1.0);
        assert!(NearnessMetric::CenterRatio.score(&a, &b) < 0.65);
        assert_relative_eq!(NearnessMetric::Iou.score(&a, &b), 0.0);
    }
}
