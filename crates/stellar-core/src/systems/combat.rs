//! Combat resolution - click hits and kill handling

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{Asteroid, Position};
use super::effects::spawn_explosion;
use super::field::find_hit;

/// Result of a click that landed on an asteroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickOutcome {
    pub target: Entity,
    pub damage: u32,
    /// Set when the click destroyed the target.
    pub reward: Option<u64>,
}

impl ClickOutcome {
    /// Ore earned: the damage dealt plus the reward on a kill.
    pub fn ore(&self) -> u64 {
        self.damage as u64 + self.reward.unwrap_or(0)
    }
}

/// Damage the first asteroid under `point`. A kill is finished in place.
pub fn resolve_click<R: Rng>(world: &mut World, rng: &mut R, point: Position, power: u32) -> Option<ClickOutcome> {
    let target = find_hit(world, point)?;
    let reward = {
        let mut asteroid = world.get::<&mut Asteroid>(target).ok()?;
        asteroid.apply_damage(power).then_some(asteroid.reward)
    };
    if reward.is_some() {
        destroy_asteroid(world, rng, target);
    }
    Some(ClickOutcome {
        target,
        damage: power,
        reward,
    })
}

/// Burst an asteroid into particles and remove it.
pub fn destroy_asteroid<R: Rng>(world: &mut World, rng: &mut R, entity: Entity) {
    let at = world.get::<&Position>(entity).ok().map(|pos| *pos);
    let kind = world.get::<&Asteroid>(entity).ok().map(|a| a.kind);
    if let (Some(at), Some(kind)) = (at, kind) {
        spawn_explosion(world, rng, at, kind);
    }
    let _ = world.despawn(entity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::effects::particle_count;
    use crate::systems::field::{asteroid_count, insert_asteroid, AsteroidSpawn};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use stellar_logic::asteroids::AsteroidKind;

    fn world_with_rock(rng: &mut StdRng) -> (World, Entity) {
        let mut world = World::new();
        let e = insert_asteroid(
            &mut world,
            rng,
            0,
            AsteroidSpawn {
                kind: AsteroidKind::Iron,
                size: 20.0,
                x: 50.0,
                y: 50.0,
                speed: 1.0,
            },
        );
        (world, e)
    }

    #[test]
    fn test_click_credits_damage() {
        let mut rng = StdRng::seed_from_u64(2);
        let (mut world, e) = world_with_rock(&mut rng);
        let outcome = resolve_click(&mut world, &mut rng, Position::new(55.0, 50.0), 4).unwrap();
        assert_eq!(outcome.target, e);
        assert_eq!(outcome.reward, None);
        assert_eq!(outcome.ore(), 4);
        // floor(20 * 1.5) * 2 = 60
        assert_eq!(world.get::<&Asteroid>(e).unwrap().hp, 56);
    }

    #[test]
    fn test_lethal_click_despawns_and_bursts() {
        let mut rng = StdRng::seed_from_u64(2);
        let (mut world, e) = world_with_rock(&mut rng);
        let outcome = resolve_click(&mut world, &mut rng, Position::new(50.0, 50.0), 1000).unwrap();
        assert_eq!(outcome.reward, Some(10));
        assert_eq!(outcome.ore(), 1010);
        assert!(!world.contains(e));
        assert_eq!(asteroid_count(&world), 0);
        assert_eq!(particle_count(&world), 12);
    }

    #[test]
    fn test_miss() {
        let mut rng = StdRng::seed_from_u64(2);
        let (mut world, _) = world_with_rock(&mut rng);
        assert!(resolve_click(&mut world, &mut rng, Position::new(50.0, 70.0), 1).is_none());
    }
}
