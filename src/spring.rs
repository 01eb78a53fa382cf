//! One-sided spring force between adjacent chain nodes.
//!
//! Springs only pull: below the rest length the link behaves like slack rope
//! and contributes nothing. Above it the pull grows linearly with the stretch.

use glam::Vec2;

/// Force pulling a node at `b` toward a neighbour at `a`.
///
/// Returns [`Vec2::ZERO`] when the nodes are no further apart than
/// `rest_length`, including the coincident case where the direction is
/// undefined.
#[inline]
pub fn spring_force(a: Vec2, b: Vec2, rest_length: f32, stiffness: f32) -> Vec2 {
    let d = a - b;
    let len = d.length();
    if len.is_nan() || len <= rest_length || len == 0.0 {
        return Vec2::ZERO;
    }
    let force = stiffness * (len - rest_length);
    d / len * force
}

/// Adds the pull of neighbour `a` on node `b` into `acc`.
#[inline]
pub fn accumulate(acc: &mut Vec2, a: Vec2, b: Vec2, rest_length: f32, stiffness: f32) {
    *acc += spring_force(a, b, rest_length, stiffness);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slack_spring_is_zero() {
        let f = spring_force(Vec2::new(0.0, 0.0), Vec2::new(0.0, 5.0), 10.0, 10.0);
        assert_eq!(f, Vec2::ZERO);
    }

    #[test]
    fn test_exactly_rest_length_is_zero() {
        let f = spring_force(Vec2::new(100.0, 100.0), Vec2::new(100.0, 90.0), 10.0, 10.0);
        assert_eq!(f, Vec2::ZERO);
    }

    #[test]
    fn test_stretched_spring_pulls_toward_neighbour() {
        // 20 apart, rest 10, k 10 -> magnitude 100 pointing from b to a
        let f = spring_force(Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0), 10.0, 10.0);
        assert!((f.x + 100.0).abs() < 1e-4);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn test_coincident_nodes_are_finite() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(spring_force(p, p, 10.0, 10.0), Vec2::ZERO);
        // Zero rest length must not divide by zero either
        let f = spring_force(p, p, 0.0, 10.0);
        assert!(f.is_finite());
        assert_eq!(f, Vec2::ZERO);
    }

    #[test]
    fn test_accumulate_sums_both_neighbours() {
        let mut acc = Vec2::ZERO;
        let node = Vec2::new(0.0, 0.0);
        accumulate(&mut acc, Vec2::new(-20.0, 0.0), node, 10.0, 1.0);
        accumulate(&mut acc, Vec2::new(0.0, 30.0), node, 10.0, 1.0);
        assert!((acc.x + 10.0).abs() < 1e-4);
        assert!((acc.y - 20.0).abs() < 1e-4);
    }
}
