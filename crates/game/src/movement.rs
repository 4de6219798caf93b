//! # Movement Reconciler
//!
//! Remote beings are moved toward the position the server last reported for
//! them. The local player is moved by input, clamped by map collision, and the
//! result is reported to the server without waiting for confirmation.

use crate::being::Being;
use crate::directory::EntityDirectory;
use mana_core::{Position, Vector2};
use mana_protocol::BeingAction;
use mana_resources::CollisionProvider;
use std::time::Duration;

/// Half-size of the player's collision box, below half a tile so narrow
/// passages stay walkable
pub const COLLISION_RADIUS: f32 = 14.0;

/// Drops closer than this to the player are picked up
pub const PICKUP_RADIUS: f32 = 48.0;

/// Minimum time between two rounds of pickup requests
pub const PICKUP_INTERVAL: Duration = Duration::from_secs(1);

/// Advance one remote being toward its server position
///
/// # Process
/// 1. At the target: a walking being stops
/// 2. Closer than one step: snap to the target and stop
/// 3. Otherwise: walk one step of `walk_speed * dt` toward the target
pub fn advance_remote(being: &mut Being, dt: f32) {
    let target = being.server_position;
    if being.position == target {
        if being.action == BeingAction::Walk {
            being.action = BeingAction::Stand;
        }
        return;
    }

    let step = being.walk_speed * dt;
    let remaining = target - being.position;
    if remaining.length_squared() < step * step {
        being.position = target;
        if being.action == BeingAction::Walk {
            being.action = BeingAction::Stand;
        }
        return;
    }

    being.action = BeingAction::Walk;
    let next = being.position + remaining.normalized().scaled(step);
    being.look_at(next);
    being.position = next;
}

/// Advance every living being except the local player
pub fn reconcile_remotes(directory: &mut EntityDirectory, dt: f32) {
    let player = directory.player_id();
    for being in directory.iter_mut() {
        if Some(being.id) == player || being.is_dead() {
            continue;
        }
        advance_remote(being, dt);
    }
}

/// Where the local player ends up after one tick of input
///
/// # Arguments
/// * `pos` - Current position
/// * `direction` - Input direction, any length
/// * `step` - Distance to cover this tick (`speed * dt`)
/// * `collision` - Map collision
///
/// # Returns
/// The new position, equal to `pos` if the player cannot move at all.
///
/// A diagonal move that collision cuts short is retried along one axis at the
/// full step: the axis that still moved, or the dominant axis if neither did.
pub fn player_step(
    pos: Position,
    direction: Vector2,
    step: f32,
    collision: &dyn CollisionProvider,
) -> Position {
    let delta = direction.normalized().scaled(step);
    let moved = collision.adjust_move(pos, delta, COLLISION_RADIUS);
    if !delta.is_diagonal() || moved == pos + delta {
        return moved;
    }

    let moved_x = moved.x != pos.x;
    let moved_y = moved.y != pos.y;
    let straight = match (moved_x, moved_y) {
        (false, true) => Vector2::new(0.0, step.copysign(delta.y)),
        (true, false) => Vector2::new(step.copysign(delta.x), 0.0),
        (false, false) if delta.x.abs() >= delta.y.abs() => Vector2::new(step.copysign(delta.x), 0.0),
        (false, false) => Vector2::new(0.0, step.copysign(delta.y)),
        (true, true) => return moved,
    };

    let retried = collision.adjust_move(pos, straight, COLLISION_RADIUS);
    if retried == pos {
        moved
    } else {
        retried
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::being::{BeingKind, CharacterLooks};
    use mana_core::BeingId;
    use mana_resources::CollisionLayer;

    fn monster_at(x: f32, y: f32) -> Being {
        Being::new(
            BeingId::new(3),
            BeingKind::Monster { species: 1, name: "Maggot".into() },
            Position::new(x, y),
        )
    }

    #[test]
    fn test_interpolation_converges_without_overshoot() {
        let mut being = monster_at(0.0, 0.0);
        being.walk_speed = 100.0;
        being.server_position = Position::new(95.0, 0.0);

        let dt = 0.1;
        let mut last = being.position.distance_to(being.server_position);
        for _ in 0..20 {
            advance_remote(&mut being, dt);
            let distance = being.position.distance_to(being.server_position);
            assert!(distance <= last);
            assert!(being.position.x <= 95.0);
            last = distance;
        }
        assert_eq!(being.position, being.server_position);
        assert_eq!(being.action, BeingAction::Stand);
    }

    #[test]
    fn test_snap_threshold() {
        // step = 10: a remaining distance of exactly 10 is walked, not snapped
        let mut being = monster_at(0.0, 0.0);
        being.walk_speed = 100.0;
        being.server_position = Position::new(10.0, 0.0);
        advance_remote(&mut being, 0.1);
        assert_eq!(being.action, BeingAction::Walk);

        let mut being = monster_at(0.0, 0.0);
        being.walk_speed = 100.0;
        being.server_position = Position::new(9.5, 0.0);
        being.action = BeingAction::Walk;
        advance_remote(&mut being, 0.1);
        assert_eq!(being.position, Position::new(9.5, 0.0));
        assert_eq!(being.action, BeingAction::Stand);
    }

    #[test]
    fn test_player_and_dead_are_skipped() {
        let mut directory = EntityDirectory::new();
        let mut player = Being::new(
            BeingId::new(1),
            BeingKind::Character { name: "me".into(), looks: CharacterLooks::default() },
            Position::default(),
        );
        player.server_position = Position::new(50.0, 0.0);
        directory.insert(player);
        directory.set_player(BeingId::new(1));

        let mut corpse = monster_at(0.0, 0.0);
        corpse.action = BeingAction::Dead;
        corpse.server_position = Position::new(50.0, 0.0);
        directory.insert(corpse);

        reconcile_remotes(&mut directory, 0.1);
        assert_eq!(directory.get(BeingId::new(1)).unwrap().position, Position::default());
        assert_eq!(directory.get(BeingId::new(3)).unwrap().position, Position::default());
    }

    const ROOM: &str = "\
######
#....#
#....#
#....#
######
";

    #[test]
    fn test_free_player_step() {
        let layer = CollisionLayer::from_text(ROOM).unwrap();
        let pos = Position::new(80.0, 80.0);
        let next = player_step(pos, Vector2::new(3.0, 0.0), 5.0, &layer);
        assert_eq!(next, Position::new(85.0, 80.0));
    }

    #[test]
    fn test_diagonal_against_wall_slides_at_full_step() {
        let layer = CollisionLayer::from_text(ROOM).unwrap();
        // Touching the top wall; moving up-right only x is free
        let pos = Position::new(80.0, 46.0);
        let next = player_step(pos, Vector2::new(1.0, -1.0), 4.0, &layer);
        assert_eq!(next, Position::new(84.0, 46.0));
    }

    #[test]
    fn test_corner_blocks_completely() {
        let layer = CollisionLayer::from_text(ROOM).unwrap();
        let pos = Position::new(46.0, 46.0);
        let next = player_step(pos, Vector2::new(-1.0, -1.0), 4.0, &layer);
        assert_eq!(next, pos);
    }
}
