#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Point, t: f64) -> Self {
        Self::new(
            crate::anim::lerp(self.x, to.x, t),
            crate::anim::lerp(self.y, to.y, t),
        )
    }
}

/// Cached ring placement for a fixed slot count.
///
/// Slots are spaced evenly on a circle of `radius`; slot 0 sits at `180° + angle_offset` and
/// later slots follow counter-clockwise. When the ring is collapsed every slot shares the
/// anchor at `(0, radius)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RingLayout {
    positions: Vec<Point>,
    anchor: Point,
    step: f64,
    angle_offset: f64,
}

impl RingLayout {
    pub fn new(slot_count: usize, radius: f64, angle_offset: f64) -> Self {
        let count = slot_count.max(1);
        let step = 360.0 / count as f64;

        let positions = (0..count)
            .map(|i| {
                let angle = (angle_offset + step * i as f64 + 180.0).to_radians();
                Point::new(angle.cos() * radius, angle.sin() * radius)
            })
            .collect();

        Self {
            positions,
            anchor: Point::new(0.0, radius),
            step,
            angle_offset,
        }
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<Point> {
        self.positions.get(index).copied()
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Ring rotation that brings `index` onto the anchor.
    pub fn rotation_for(&self, index: usize) -> f64 {
        -(self.step * index as f64) + self.angle_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_ring_positions_are_evenly_spaced() {
        for count in 1..=9 {
            let layout = RingLayout::new(count, 150.0, 15.0);
            assert_eq!(layout.positions().len(), count);

            for (i, p) in layout.positions().iter().enumerate() {
                assert!((p.x.hypot(p.y) - 150.0).abs() < EPS);
                let expected = (15.0 + 360.0 / count as f64 * i as f64 + 180.0_f64).to_radians();
                assert!((p.x - 150.0 * expected.cos()).abs() < EPS);
                assert!((p.y - 150.0 * expected.sin()).abs() < EPS);
            }

            if count >= 2 {
                let (sx, sy) = layout
                    .positions()
                    .iter()
                    .fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
                assert!(sx.abs() < 1e-6 && sy.abs() < 1e-6, "ring of {count} not centred");
            }
        }
    }

    #[test]
    fn test_first_slot_sits_opposite_the_offset() {
        let layout = RingLayout::new(4, 100.0, 0.0);
        let first = layout.position(0).unwrap();
        assert!((first.x + 100.0).abs() < EPS);
        assert!(first.y.abs() < EPS);
    }

    #[test]
    fn test_zero_slots_yield_single_anchor() {
        let layout = RingLayout::new(0, 80.0, 0.0);
        assert_eq!(layout.positions().len(), 1);
        assert_eq!(layout.anchor(), Point::new(0.0, 80.0));
        assert_eq!(layout.rotation_for(0), 0.0);
    }

    #[test]
    fn test_rotation_for_slot() {
        let layout = RingLayout::new(4, 150.0, 10.0);
        assert_eq!(layout.rotation_for(0), 10.0);
        assert_eq!(layout.rotation_for(2), -170.0);
    }
}
