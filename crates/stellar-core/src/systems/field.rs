//! Asteroid field system - spawning, motion, culling and targeting

use std::f64::consts::TAU;

use hecs::{Entity, World};
use rand::Rng;
use stellar_logic::asteroids::{
    asteroid_hp, asteroid_reward, pick_weighted, spawn_delay_bounds, total_weight, AsteroidKind,
};
use stellar_logic::constants::asteroids;
use stellar_logic::sectors::SectorProfile;

use crate::components::{Asteroid, Crack, Cracks, Outline, OutlineVertex, Position, Spin};

/// Spawn parameters resolved before any entity exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidSpawn {
    pub kind: AsteroidKind,
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
}

/// Roll a new asteroid for `profile`. `None` when the sector has no field.
pub fn roll_asteroid<R: Rng>(rng: &mut R, profile: &SectorProfile, width: f64) -> Option<AsteroidSpawn> {
    let total = total_weight(&profile.asteroid_table);
    if total <= 0.0 {
        return None;
    }
    let kind = pick_weighted(&profile.asteroid_table, rng.gen_range(0.0..total))?;
    let size = rng.gen_range(asteroids::SIZE_MIN..asteroids::SIZE_MAX);
    let speed =
        rng.gen_range(asteroids::SPEED_MIN..asteroids::SPEED_MAX) * profile.asteroid_speed_multiplier;
    Some(AsteroidSpawn {
        kind,
        size,
        x: rng.gen_range(0.0..width.max(1.0)),
        y: -size,
        speed,
    })
}

/// Insert an asteroid with derived stats and a freshly generated shape.
pub fn insert_asteroid<R: Rng>(world: &mut World, rng: &mut R, serial: u64, spawn: AsteroidSpawn) -> Entity {
    let stats = spawn.kind.stats();
    let hp = asteroid_hp(spawn.size, &stats);
    let asteroid = Asteroid {
        serial,
        kind: spawn.kind,
        size: spawn.size,
        hp,
        max_hp: hp,
        speed: spawn.speed,
        reward: asteroid_reward(spawn.size, &stats),
    };
    let spin = Spin {
        rotation: rng.gen_range(0.0..TAU),
        speed: rng.gen_range(-asteroids::ROTATION_SPEED_RANGE..asteroids::ROTATION_SPEED_RANGE),
    };
    let outline = generate_outline(rng, spawn.size);
    let cracks = generate_cracks(rng, spawn.size);
    world.spawn((Position::new(spawn.x, spawn.y), asteroid, spin, outline, cracks))
}

fn generate_outline<R: Rng>(rng: &mut R, size: f64) -> Outline {
    let count = rng.gen_range(asteroids::OUTLINE_VERTICES_MIN..=asteroids::OUTLINE_VERTICES_MAX);
    let vertices = (0..count)
        .map(|i| OutlineVertex {
            angle: i as f64 / count as f64 * TAU,
            radius: size * rng.gen_range(0.7..1.1),
        })
        .collect();
    Outline { vertices }
}

fn generate_cracks<R: Rng>(rng: &mut R, size: f64) -> Cracks {
    let count = rng.gen_range(asteroids::CRACKS_MIN..=asteroids::CRACKS_MAX);
    let lines = (0..count)
        .map(|_| Crack {
            angle: rng.gen_range(0.0..TAU),
            length: size * rng.gen_range(0.4..0.8),
        })
        .collect();
    Cracks { lines }
}

/// Delay until the next spawn for the current spawn-rate level.
pub fn next_spawn_delay<R: Rng>(rng: &mut R, profile: &SectorProfile, spawn_rate_level: u32) -> f64 {
    let (min, max) = spawn_delay_bounds(
        profile.spawn_delay_min_ms,
        profile.spawn_delay_max_ms,
        spawn_rate_level,
    );
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Fall and spin by `frames` frame-equivalents.
pub fn advance_asteroids(world: &mut World, frames: f64) {
    for (_, (pos, asteroid, spin)) in world.query_mut::<(&mut Position, &Asteroid, &mut Spin)>() {
        pos.y += asteroid.speed * frames;
        spin.rotation = (spin.rotation + spin.speed * frames).rem_euclid(TAU);
    }
}

/// Despawn destroyed asteroids and those past the bottom edge. Returns the count removed.
pub fn cull_asteroids(world: &mut World, height: f64) -> usize {
    let limit = height + asteroids::OFFSCREEN_MARGIN;
    let doomed: Vec<Entity> = world
        .query::<(&Position, &Asteroid)>()
        .iter()
        .filter(|(_, (pos, a))| a.is_destroyed() || pos.y > limit)
        .map(|(e, _)| e)
        .collect();
    for entity in &doomed {
        let _ = world.despawn(*entity);
    }
    doomed.len()
}

/// First asteroid in spawn order whose disc contains the point.
pub fn find_hit(world: &World, point: Position) -> Option<Entity> {
    let mut query = world.query::<(&Position, &Asteroid)>();
    query
        .iter()
        .filter(|(_, (pos, a))| !a.is_destroyed() && pos.distance(&point) < a.size)
        .min_by_key(|(_, (_, a))| a.serial)
        .map(|(e, _)| e)
}

/// Drone target: the lowest asteroid on screen (greatest y), oldest on ties.
pub fn drone_target(world: &World) -> Option<Entity> {
    let mut query = world.query::<(&Position, &Asteroid)>();
    query
        .iter()
        .filter(|(_, (_, a))| !a.is_destroyed())
        .max_by(|(_, (pa, a)), (_, (pb, b))| {
            pa.y.total_cmp(&pb.y).then(b.serial.cmp(&a.serial))
        })
        .map(|(e, _)| e)
}

pub fn asteroid_count(world: &World) -> usize {
    world.query::<&Asteroid>().iter().count()
}

pub fn clear_asteroids(world: &mut World) {
    let all: Vec<Entity> = world.query::<&Asteroid>().iter().map(|(e, _)| e).collect();
    for entity in all {
        let _ = world.despawn(entity);
    }
}
