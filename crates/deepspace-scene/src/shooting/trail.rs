//! Fixed-length position history for a shooting star.

use glam::Vec3;

/// The most recent positions of a moving head, newest first.
///
/// The slot array never changes length. Slots that have not yet received a
/// real position repeat the newest one, so the renderer always uploads a full
/// vertex set.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    slots: Vec<Vec3>,
    recorded: usize,
}

impl TrailBuffer {
    /// A trail of `length` slots (at least one), all at the origin.
    pub fn new(length: usize) -> Self {
        Self {
            slots: vec![Vec3::ZERO; length.max(1)],
            recorded: 0,
        }
    }

    /// Forget every recorded position and park all slots at `position`.
    pub fn reset(&mut self, position: Vec3) {
        self.slots.fill(position);
        self.recorded = 0;
    }

    /// Record `position` as the newest entry, evicting the oldest when full.
    pub fn push(&mut self, position: Vec3) {
        let len = self.slots.len();
        self.slots.copy_within(0..len - 1, 1);
        self.slots[0] = position;
        self.recorded = (self.recorded + 1).min(len);
        self.slots[self.recorded..].fill(position);
    }

    /// All slots, newest first. Always exactly [`len`](Self::len) entries.
    pub fn positions(&self) -> &[Vec3] {
        &self.slots
    }

    pub fn newest(&self) -> Vec3 {
        self.slots[0]
    }

    /// Real positions pushed since the last reset, capped at the length.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorded == 0
    }

    pub fn is_full(&self) -> bool {
        self.recorded == self.slots.len()
    }
}

/// Opacity multiplier of trail slot `index`: 1 at the head, falling linearly.
pub fn trail_alpha(index: usize, length: usize) -> f32 {
    1.0 - index as f32 / length.max(1) as f32
}

/// Pixel size of trail slot `index`.
pub fn trail_point_size(index: usize, length: usize) -> f32 {
    4.0 * trail_alpha(index, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32) -> Vec3 {
        Vec3::new(x, 0.0, 0.0)
    }

    #[test]
    fn test_partial_trail_padded_with_newest() {
        let mut trail = TrailBuffer::new(5);
        trail.reset(p(-1.0));
        trail.push(p(1.0));
        trail.push(p(2.0));

        assert_eq!(trail.len(), 5);
        assert_eq!(trail.recorded(), 2);
        assert_eq!(trail.positions(), &[p(2.0), p(1.0), p(2.0), p(2.0), p(2.0)]);
    }

    #[test]
    fn test_full_trail_evicts_oldest() {
        let mut trail = TrailBuffer::new(3);
        for x in 1..=5 {
            trail.push(p(x as f32));
            assert_eq!(trail.positions().len(), 3, "length changed after push {x}");
        }
        assert!(trail.is_full());
        assert_eq!(trail.positions(), &[p(5.0), p(4.0), p(3.0)]);
        assert_eq!(trail.newest(), p(5.0));
    }

    #[test]
    fn test_reset_clears_history() {
        let mut trail = TrailBuffer::new(4);
        trail.push(p(1.0));
        trail.push(p(2.0));
        trail.reset(p(9.0));
        assert!(trail.is_empty());
        assert!(trail.positions().iter().all(|&v| v == p(9.0)));

        trail.push(p(10.0));
        assert_eq!(trail.positions(), &[p(10.0); 4]);
    }

    #[test]
    fn test_zero_length_trail_holds_one_slot() {
        let mut trail = TrailBuffer::new(0);
        trail.push(p(3.0));
        trail.push(p(4.0));
        assert_eq!(trail.positions(), &[p(4.0)]);
    }

    #[test]
    fn test_trail_alpha_tapers() {
        assert_eq!(trail_alpha(0, 40), 1.0);
        assert!((trail_alpha(20, 40) - 0.5).abs() < 1e-6);
        assert!((trail_point_size(39, 40) - 0.1).abs() < 1e-5);
        assert_eq!(trail_point_size(0, 50), 4.0);
    }
}
