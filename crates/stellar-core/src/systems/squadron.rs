//! Drone squadron - cosmetic drone units and the aggregate volley

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{Asteroid, DroneUnit, Position, Viewport};
use super::effects::spawn_laser;
use super::field::drone_target;

/// Outcome of one drone volley.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolleyOutcome {
    pub target: Entity,
    pub damage: u32,
    /// Set when the volley destroyed the target.
    pub reward: Option<u64>,
    pub at: Position,
}

/// Replace every drone unit with `count` fresh ones laid out above the bottom edge.
pub fn rebuild_drone_units<R: Rng>(world: &mut World, rng: &mut R, count: u32, viewport: Viewport) {
    clear_drone_units(world);
    for index in 0..count {
        let x = viewport.width / 2.0 + rng.gen_range(-50.0..50.0);
        let y = viewport.height - 120.0 - index as f64 * 25.0;
        let unit = DroneUnit {
            index,
            hover_phase: rng.gen_range(0.0..std::f64::consts::TAU),
        };
        world.spawn((Position::new(x, y), unit));
    }
}

pub fn clear_drone_units(world: &mut World) {
    let units: Vec<Entity> = world.query::<&DroneUnit>().iter().map(|(e, _)| e).collect();
    for entity in units {
        let _ = world.despawn(entity);
    }
}

pub fn drone_unit_count(world: &World) -> usize {
    world.query::<&DroneUnit>().iter().count()
}

/// Hit the current target with `damage_per_drone * drone_count` in one blow.
///
/// Draws one laser per drone unit. Returns `None` when there are no drones or
/// nothing to shoot. The target is left in the world even when destroyed; the
/// caller finishes the kill.
pub fn fire_volley(world: &mut World, drone_count: u32, damage_per_drone: u32) -> Option<VolleyOutcome> {
    if drone_count == 0 {
        return None;
    }
    let target = drone_target(world)?;
    let damage = damage_per_drone.saturating_mul(drone_count);

    let (at, reward) = {
        let mut query = world.query_one::<(&Position, &mut Asteroid)>(target).ok()?;
        let (pos, asteroid) = query.get()?;
        let killed = asteroid.apply_damage(damage);
        (*pos, killed.then_some(asteroid.reward))
    };

    let origins: Vec<Position> = world
        .query::<(&Position, &DroneUnit)>()
        .iter()
        .map(|(_, (pos, _))| *pos)
        .collect();
    for from in origins {
        spawn_laser(world, from, at);
    }

    Some(VolleyOutcome {
        target,
        damage,
        reward,
        at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::effects::laser_count;
    use crate::systems::field::{insert_asteroid, AsteroidSpawn};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use stellar_logic::asteroids::AsteroidKind;

    fn viewport() -> Viewport {
        Viewport::new(1200.0, 680.0)
    }

    #[test]
    fn test_units_follow_count() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(4);
        rebuild_drone_units(&mut world, &mut rng, 3, viewport());
        assert_eq!(drone_unit_count(&world), 3);
        for (_, (pos, unit)) in world.query::<(&Position, &DroneUnit)>().iter() {
            assert!((550.0..650.0).contains(&pos.x));
            assert_eq!(pos.y, 560.0 - unit.index as f64 * 25.0);
        }
        rebuild_drone_units(&mut world, &mut rng, 1, viewport());
        assert_eq!(drone_unit_count(&world), 1);
    }

    #[test]
    fn test_volley_scales_with_drone_count() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(4);
        rebuild_drone_units(&mut world, &mut rng, 2, viewport());
        let target = insert_asteroid(
            &mut world,
            &mut rng,
            0,
            AsteroidSpawn {
                kind: AsteroidKind::Iron,
                size: 30.0,
                x: 100.0,
                y: 100.0,
                speed: 1.0,
            },
        );
        let outcome = fire_volley(&mut world, 2, 3).unwrap();
        assert_eq!(outcome.target, target);
        assert_eq!(outcome.damage, 6);
        assert_eq!(outcome.reward, None);
        assert_eq!(world.get::<&Asteroid>(target).unwrap().hp, 84);
        assert_eq!(laser_count(&world), 2);
    }

    #[test]
    fn test_volley_without_drones_or_targets() {
        let mut world = World::new();
        assert!(fire_volley(&mut world, 0, 5).is_none());
        assert!(fire_volley(&mut world, 3, 5).is_none());
    }
}
