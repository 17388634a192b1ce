//! Truck fleet system - per-truck cycle state machine

use hecs::{Entity, World};
use stellar_logic::balance::BalanceConfig;
use stellar_logic::constants::FRAME_MS;
use stellar_logic::logistics::{
    gather_duration_ms, one_way_distance, travel_speed, unload_duration_ms, yield_per_cycle,
    FleetLevels, TruckKind,
};

use crate::components::{Truck, TruckState};

/// Ore delivered by a truck that finished unloading this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub truck: Entity,
    pub kind: TruckKind,
    pub ore: u64,
}

/// Park a new truck in `lane`, departing after `lane * stagger_ms`.
pub fn spawn_truck(world: &mut World, kind: TruckKind, lane: u32, stagger_ms: f64) -> Entity {
    world.spawn((Truck::parked(kind, lane, lane as f64 * stagger_ms),))
}

/// Recreate the whole fleet from owned counts (Small, then Medium, then Large).
pub fn rebuild_trucks<'a>(
    world: &mut World,
    counts: impl IntoIterator<Item = (&'a TruckKind, &'a u32)>,
    stagger_ms: f64,
) {
    clear_trucks(world);
    let mut lane = 0;
    for (kind, count) in counts {
        for _ in 0..*count {
            spawn_truck(world, *kind, lane, stagger_ms);
            lane += 1;
        }
    }
}

pub fn clear_trucks(world: &mut World) {
    let all: Vec<Entity> = world.query::<&Truck>().iter().map(|(e, _)| e).collect();
    for entity in all {
        let _ = world.despawn(entity);
    }
}

pub fn truck_count(world: &World) -> usize {
    world.query::<&Truck>().iter().count()
}

/// Advance every truck by `dt_ms` (already clamped). Each truck makes at most
/// one state transition, so a cycle can only pay out once.
pub fn advance_trucks(
    world: &mut World,
    dt_ms: f64,
    field_width: f64,
    levels: &FleetLevels,
    balance: &BalanceConfig,
) -> Vec<Delivery> {
    let frames = dt_ms / FRAME_MS;
    let far_edge = one_way_distance(field_width);
    let mut deliveries = Vec::new();

    for (entity, truck) in world.query_mut::<&mut Truck>() {
        let spec = balance.truck_spec(truck.kind);
        match truck.state {
            TruckState::IdleLeft => {
                truck.x = 0.0;
                truck.timer_ms -= dt_ms;
                if truck.timer_ms <= 0.0 {
                    truck.timer_ms = 0.0;
                    truck.state = TruckState::MovingOut;
                }
            }
            TruckState::MovingOut => {
                truck.x += travel_speed(spec, levels.travel) * frames;
                if truck.x > far_edge {
                    truck.state = TruckState::OffscreenGather;
                    truck.timer_ms = gather_duration_ms(spec, levels.gather);
                }
            }
            TruckState::OffscreenGather => {
                truck.timer_ms -= dt_ms;
                if truck.timer_ms <= 0.0 {
                    truck.timer_ms = 0.0;
                    truck.state = TruckState::MovingIn;
                }
            }
            TruckState::MovingIn => {
                truck.x -= travel_speed(spec, levels.travel) * frames;
                if truck.x <= 0.0 {
                    truck.x = 0.0;
                    truck.state = TruckState::Unloading;
                    truck.timer_ms = unload_duration_ms(spec, levels.unload);
                }
            }
            TruckState::Unloading => {
                truck.timer_ms -= dt_ms;
                if truck.timer_ms <= 0.0 {
                    deliveries.push(Delivery {
                        truck: entity,
                        kind: truck.kind,
                        ore: yield_per_cycle(spec, levels.gather),
                    });
                    truck.state = TruckState::IdleLeft;
                    truck.timer_ms = balance.truck_rearm_ms;
                }
            }
        }
    }

    deliveries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_delivery(world: &mut World, balance: &BalanceConfig, max_ticks: usize) -> (usize, Vec<Delivery>) {
        let levels = FleetLevels::default();
        for tick in 1..=max_ticks {
            let out = advance_trucks(world, 50.0, 540.0, &levels, balance);
            if !out.is_empty() {
                return (tick, out);
            }
        }
        (max_ticks, Vec::new())
    }

    #[test]
    fn test_idle_with_zero_timer_departs_next_tick() {
        let mut world = World::new();
        let balance = BalanceConfig::default();
        let e = spawn_truck(&mut world, TruckKind::Small, 0, 400.0);
        advance_trucks(&mut world, 16.0, 540.0, &FleetLevels::default(), &balance);
        assert_eq!(world.get::<&Truck>(e).unwrap().state, TruckState::MovingOut);
    }

    #[test]
    fn test_stagger_delays_later_lanes() {
        let mut world = World::new();
        let balance = BalanceConfig::default();
        let e = spawn_truck(&mut world, TruckKind::Small, 2, 400.0);
        assert_eq!(world.get::<&Truck>(e).unwrap().timer_ms, 800.0);
        for _ in 0..15 {
            advance_trucks(&mut world, 50.0, 540.0, &FleetLevels::default(), &balance);
        }
        assert_eq!(world.get::<&Truck>(e).unwrap().state, TruckState::IdleLeft);
        advance_trucks(&mut world, 50.0, 540.0, &FleetLevels::default(), &balance);
        assert_eq!(world.get::<&Truck>(e).unwrap().state, TruckState::MovingOut);
    }

    #[test]
    fn test_full_cycle_pays_once() {
        let mut world = World::new();
        let balance = BalanceConfig::default();
        spawn_truck(&mut world, TruckKind::Small, 0, 400.0);
        let (_, out) = run_until_delivery(&mut world, &balance, 1000);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].ore, 40);

        // Straight after a payout the truck is parked for the re-arm delay.
        let (_, truck) = world.query::<&Truck>().iter().map(|(e, t)| (e, *t)).next().unwrap();
        assert_eq!(truck.state, TruckState::IdleLeft);
        assert_eq!(truck.timer_ms, 1000.0);
    }

    #[test]
    fn test_cycle_visits_every_state_in_order() {
        let mut world = World::new();
        let balance = BalanceConfig::default();
        let e = spawn_truck(&mut world, TruckKind::Medium, 0, 400.0);
        let mut seen = vec![TruckState::IdleLeft];
        for _ in 0..2000 {
            advance_trucks(&mut world, 50.0, 300.0, &FleetLevels::default(), &balance);
            let state = world.get::<&Truck>(e).unwrap().state;
            if seen.last() != Some(&state) {
                seen.push(state);
            }
            if seen.len() == 6 {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                TruckState::IdleLeft,
                TruckState::MovingOut,
                TruckState::OffscreenGather,
                TruckState::MovingIn,
                TruckState::Unloading,
                TruckState::IdleLeft,
            ]
        );
    }

    #[test]
    fn test_inbound_clamps_to_origin() {
        let mut world = World::new();
        let balance = BalanceConfig::default();
        let e = world.spawn((Truck {
            kind: TruckKind::Small,
            state: TruckState::MovingIn,
            x: 1.0,
            timer_ms: 0.0,
            lane: 0,
        },));
        advance_trucks(&mut world, 50.0, 540.0, &FleetLevels::default(), &balance);
        let truck = *world.get::<&Truck>(e).unwrap();
        assert_eq!(truck.x, 0.0);
        assert_eq!(truck.state, TruckState::Unloading);
        assert_eq!(truck.timer_ms, 2500.0);
    }

    #[test]
    fn test_rebuild_assigns_lanes_in_kind_order() {
        let mut world = World::new();
        let counts = [(TruckKind::Small, 2u32), (TruckKind::Large, 1u32)];
        rebuild_trucks(&mut world, counts.iter().map(|(k, c)| (k, c)), 400.0);
        assert_eq!(truck_count(&world), 3);
        let mut lanes: Vec<(u32, TruckKind)> = world
            .query::<&Truck>()
            .iter()
            .map(|(_, t)| (t.lane, t.kind))
            .collect();
        lanes.sort();
        assert_eq!(
            lanes,
            vec![(0, TruckKind::Small), (1, TruckKind::Small), (2, TruckKind::Large)]
        );
    }
}
