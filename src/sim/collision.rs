//! Circle overlap and proximity queries
//!
//! Everything here is a pure function of positions and radii. The same tests
//! serve player-food, player-bot and bot perception; perception just swaps the
//! sum of radii for a view range.

use glam::Vec2;

use super::world::Body;

/// Euclidean distance between two positions
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Circle overlap with an inclusive boundary: touching counts
#[inline]
pub fn check_collision(ax: f32, ay: f32, a_radius: f32, bx: f32, by: f32, b_radius: f32) -> bool {
    distance(Vec2::new(ax, ay), Vec2::new(bx, by)) <= a_radius + b_radius
}

/// Overlap test between two bodies
#[inline]
pub fn bodies_collide<A: Body + ?Sized, B: Body + ?Sized>(a: &A, b: &B) -> bool {
    let (pa, pb) = (a.pos(), b.pos());
    check_collision(pa.x, pa.y, a.radius(), pb.x, pb.y, b.radius())
}

/// Perception test: strictly inside `range` of `origin`
#[inline]
pub fn within_range(origin: Vec2, other: Vec2, range: f32) -> bool {
    distance(origin, other) < range
}

/// Nearest candidate to `origin`, with its distance. Ties keep the first seen.
pub fn nearest<I, T>(origin: Vec2, candidates: I) -> Option<(T, f32)>
where
    I: IntoIterator<Item = (T, Vec2)>,
{
    let mut best: Option<(T, f32)> = None;
    for (item, pos) in candidates {
        let d = distance(origin, pos);
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((item, d)),
        }
    }
    best
}
