//! Cosmetic effects - explosion particles and laser fade-out

use hecs::{Entity, World};
use rand::Rng;
use stellar_logic::asteroids::AsteroidKind;
use stellar_logic::constants::effects;

use crate::components::{Laser, Particle, Position};

pub fn spawn_explosion<R: Rng>(world: &mut World, rng: &mut R, at: Position, kind: AsteroidKind) {
    let speed = effects::PARTICLE_SPEED;
    for _ in 0..effects::EXPLOSION_PARTICLES {
        let particle = Particle {
            vx: rng.gen_range(-speed..speed),
            vy: rng.gen_range(-speed..speed),
            life: 1.0,
            kind,
        };
        world.spawn((at, particle));
    }
}

pub fn spawn_laser(world: &mut World, from: Position, to: Position) -> Entity {
    world.spawn((Laser::new(from, to),))
}

/// Move particles, fade particles and lasers, drop the spent ones.
pub fn decay_effects(world: &mut World, frames: f64) {
    let mut spent = Vec::new();

    for (entity, (pos, particle)) in world.query_mut::<(&mut Position, &mut Particle)>() {
        pos.x += particle.vx * frames;
        pos.y += particle.vy * frames;
        particle.life -= effects::PARTICLE_DECAY * frames;
        if particle.life <= 0.0 {
            spent.push(entity);
        }
    }

    for (entity, laser) in world.query_mut::<&mut Laser>() {
        laser.alpha -= effects::LASER_DECAY * frames;
        if laser.alpha <= 0.0 {
            spent.push(entity);
        }
    }

    for entity in spent {
        let _ = world.despawn(entity);
    }
}

pub fn clear_effects(world: &mut World) {
    let mut doomed: Vec<Entity> = world.query::<&Particle>().iter().map(|(e, _)| e).collect();
    doomed.extend(world.query::<&Laser>().iter().map(|(e, _)| e));
    for entity in doomed {
        let _ = world.despawn(entity);
    }
}

pub fn particle_count(world: &World) -> usize {
    world.query::<&Particle>().iter().count()
}

pub fn laser_count(world: &World) -> usize {
    world.query::<&Laser>().iter().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_explosion_spawns_twelve() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(9);
        spawn_explosion(&mut world, &mut rng, Position::new(5.0, 5.0), AsteroidKind::Titanium);
        assert_eq!(particle_count(&world), 12);
        for (_, p) in world.query::<&Particle>().iter() {
            assert!(p.vx.abs() <= 2.0 && p.vy.abs() <= 2.0);
            assert_eq!(p.kind, AsteroidKind::Titanium);
        }
    }

    #[test]
    fn test_laser_fades_after_twenty_frames() {
        let mut world = World::new();
        spawn_laser(&mut world, Position::new(0.0, 0.0), Position::new(1.0, 1.0));
        decay_effects(&mut world, 19.0);
        assert_eq!(laser_count(&world), 1);
        decay_effects(&mut world, 1.5);
        assert_eq!(laser_count(&world), 0);
    }

    #[test]
    fn test_particles_expire() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(9);
        spawn_explosion(&mut world, &mut rng, Position::default(), AsteroidKind::Iron);
        decay_effects(&mut world, 10.0);
        assert_eq!(particle_count(&world), 12);
        decay_effects(&mut world, 30.0);
        assert_eq!(particle_count(&world), 0);
    }

    #[test]
    fn test_clear_effects() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(9);
        spawn_explosion(&mut world, &mut rng, Position::default(), AsteroidKind::Iron);
        spawn_laser(&mut world, Position::default(), Position::default());
        clear_effects(&mut world);
        assert_eq!(particle_count(&world) + laser_count(&world), 0);
    }
}
