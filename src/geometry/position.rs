//! Axis-aligned box position within a container.
//!
//! Kept as a flat struct of six coordinates plus free functions rather than a
//! hierarchy of box types: every operation the planners need (bounds check,
//! overlap, volume) is a cheap comparison over six integers.

use serde::{Deserialize, Serialize};

/// Axis-aligned box `[ws, we) x [ds, de) x [hs, he)` inside a container.
///
/// `w` runs across the open face, `h` runs bottom-to-top, `d` runs from the
/// open face (`d = 0`) into the container (`d = D` at the back wall).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub ws: u32,
    pub ds: u32,
    pub hs: u32,
    pub we: u32,
    pub de: u32,
    pub he: u32,
}

impl Position {
    /// Builds a position from an anchor and the three extents of an orientation.
    ///
    /// # Panics
    ///
    /// Panics if any extent is zero (a box must occupy positive volume).
    pub fn from_anchor(ws: u32, ds: u32, hs: u32, w: u32, d: u32, h: u32) -> Self {
        assert!(w > 0 && d > 0 && h > 0, "item extents must be positive");
        Self {
            ws,
            ds,
            hs,
            we: ws + w,
            de: ds + d,
            he: hs + h,
        }
    }

    pub const fn width(&self) -> u32 {
        self.we - self.ws
    }

    pub const fn depth(&self) -> u32 {
        self.de - self.ds
    }

    pub const fn height(&self) -> u32 {
        self.he - self.hs
    }

    pub fn volume(&self) -> u64 {
        self.width() as u64 * self.depth() as u64 * self.height() as u64
    }

    /// True iff this position fits entirely within `[0, W) x [0, D) x [0, H)`.
    pub const fn within_bounds(&self, w: u32, d: u32, h: u32) -> bool {
        self.we <= w && self.de <= d && self.he <= h
    }

    /// True iff `self` and `other` overlap on all three axes (I2 disjointness test).
    ///
    /// Intervals are half-open; two positions sharing only a face (`a.we == b.ws`)
    /// do not overlap.
    pub fn overlaps(&self, other: &Position) -> bool {
        self.ws < other.we
            && other.ws < self.we
            && self.ds < other.de
            && other.ds < self.de
            && self.hs < other.he
            && other.hs < self.he
    }

    /// The three "growth" anchors this position contributes to a skyline:
    /// its right, back, and top corners.
    pub fn skyline_anchors(&self) -> [(u32, u32, u32); 3] {
        [
            (self.we, self.ds, self.hs),
            (self.ws, self.de, self.hs),
            (self.ws, self.ds, self.he),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_anchor_computes_extents() {
        let p = Position::from_anchor(1, 2, 3, 10, 20, 30);
        assert_eq!(p.we, 11);
        assert_eq!(p.de, 22);
        assert_eq!(p.he, 33);
        assert_eq!(p.volume(), 10 * 20 * 30);
    }

    #[test]
    fn touching_faces_do_not_overlap() {
        let a = Position::from_anchor(0, 0, 0, 10, 10, 10);
        let b = Position::from_anchor(10, 0, 0, 10, 10, 10);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn overlapping_on_all_axes() {
        let a = Position::from_anchor(0, 0, 0, 10, 10, 10);
        let b = Position::from_anchor(5, 5, 5, 10, 10, 10);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn within_bounds_rejects_overflow() {
        let p = Position::from_anchor(90, 0, 0, 20, 10, 10);
        assert!(!p.within_bounds(100, 100, 100));
        assert!(p.within_bounds(110, 100, 100));
    }

    #[test]
    fn skyline_anchors_are_right_back_top() {
        let p = Position::from_anchor(0, 0, 0, 10, 20, 30);
        assert_eq!(
            p.skyline_anchors(),
            [(10, 0, 0), (0, 20, 0), (0, 0, 30)]
        );
    }
}
