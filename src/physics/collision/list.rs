//! Maintaining the list of collisions handed to a solver.

use super::RigidBodyCollision;
use crate::physics::{BodySet, CollisionError};

/// Add a collision to the list unless it's similar to one already there.
/// The record found first is kept. Returns whether the collision was added.
pub fn add_collision(
    collisions: &mut Vec<RigidBodyCollision>,
    collision: RigidBodyCollision,
) -> bool {
    if let Some(existing) = collisions.iter().find(|c| c.similar_to(&collision)) {
        log::debug!(
            "{} collision at {:?} rejected, similar to {} collision at {:?}",
            collision.creator(),
            collision.impact1(),
            existing.creator(),
            existing.impact1(),
        );
        return false;
    }
    collisions.push(collision);
    true
}

/// Update every collision in the list to the current body poses,
/// dropping the ones whose geometry degenerated. Order of the rest is preserved.
///
/// Geometry for the whole list is computed before any record changes,
/// so on error the list is left exactly as it was.
/// Returns the number of collisions dropped.
pub fn update_collisions(
    collisions: &mut Vec<RigidBodyCollision>,
    bodies: &BodySet,
    time: f64,
) -> Result<usize, CollisionError> {
    let geometry = collisions
        .iter()
        .map(|c| c.contact_geometry(bodies))
        .collect::<Result<Vec<_>, _>>()?;
    let fresh: Vec<bool> = collisions
        .iter_mut()
        .zip(geometry)
        .map(|(c, geometry)| c.apply(geometry, bodies, time))
        .collect();

    let count_before = collisions.len();
    let mut fresh = fresh.into_iter();
    collisions.retain(|_| fresh.next().unwrap_or(true));

    let dropped = count_before - collisions.len();
    if dropped > 0 {
        log::debug!("dropped {} stale collisions at time {}", dropped, time);
    }
    Ok(dropped)
}
