//! Integration tests for the balance pipeline.
//!
//! Exercises: BalanceConfig → UpgradeTrack / PurchaseCurve → logistics
//! timing → IncomeBreakdown, the same path the engine takes when it
//! prices a purchase or reports income.

use stellar_logic::asteroids::{asteroid_hp, asteroid_reward, pick_weighted, total_weight};
use stellar_logic::balance::BalanceConfig;
use stellar_logic::income::{
    drone_ore_per_second, offline_credit, truck_ore_per_second, IncomeBreakdown, IncomeCarry,
};
use stellar_logic::logistics::{yield_per_cycle, FleetLevels, TruckKind};
use stellar_logic::sectors::Sector;
use stellar_logic::upgrades::UpgradeKind;

// ── Helpers ────────────────────────────────────────────────────────────

/// Walk a track from its start level buying every level, returning the costs.
fn buy_out(balance: &BalanceConfig, kind: UpgradeKind) -> Vec<u64> {
    let track = balance.track(kind);
    let mut level = track.start_level;
    let mut costs = Vec::new();
    while let Some(cost) = track.next_cost(level) {
        costs.push(cost);
        level += 1;
        if costs.len() > 64 {
            break;
        }
    }
    costs
}

// ── Cost curves ────────────────────────────────────────────────────────

#[test]
fn capped_tracks_sell_exactly_to_their_cap() {
    let balance = BalanceConfig::default();
    assert_eq!(buy_out(&balance, UpgradeKind::Click).len(), 19);
    assert_eq!(buy_out(&balance, UpgradeKind::DroneDamage).len(), 24);
    assert_eq!(buy_out(&balance, UpgradeKind::DroneFireRate).len(), 9);
    assert_eq!(buy_out(&balance, UpgradeKind::TruckGather).len(), 10);
}

#[test]
fn costs_never_decrease_along_a_track() {
    let balance = BalanceConfig::default();
    for kind in UpgradeKind::all() {
        let costs = buy_out(&balance, *kind);
        assert!(
            costs.windows(2).all(|w| w[0] <= w[1]),
            "{kind:?} is not monotonic: {costs:?}"
        );
    }
}

#[test]
fn truck_curves_grow_per_kind() {
    let balance = BalanceConfig::default();
    let small = balance.truck_curve(TruckKind::Small);
    assert_eq!([small.cost(0), small.cost(1), small.cost(2)], [0, 11000, 24200]);

    let large = balance.truck_curve(TruckKind::Large);
    assert_eq!(large.cost(0), 150_000);
    assert_eq!(large.cost(1), 330_000);
}

// ── Spawning ───────────────────────────────────────────────────────────

#[test]
fn outer_table_covers_every_kind() {
    let balance = BalanceConfig::default();
    let table = &balance.profile(Sector::Outer).asteroid_table;
    let total = total_weight(table);
    let mut seen = Vec::new();
    let mut roll = 0.5;
    while roll < total {
        if let Some(kind) = pick_weighted(table, roll) {
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        roll += 1.0;
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn tougher_kinds_pay_more() {
    let balance = BalanceConfig::default();
    let table = &balance.profile(Sector::Outer).asteroid_table;
    let mut last_hp = 0;
    let mut last_reward = 0;
    for row in table {
        let stats = row.kind.stats();
        let hp = asteroid_hp(30.0, &stats);
        let reward = asteroid_reward(30.0, &stats);
        assert!(hp > last_hp && reward > last_reward);
        last_hp = hp;
        last_reward = reward;
    }
}

// ── Income ─────────────────────────────────────────────────────────────

#[test]
fn breakdown_combines_drones_and_trucks() {
    let balance = BalanceConfig::default();
    let levels = FleetLevels::default();
    let drones = drone_ore_per_second(2, 3, 500);
    let trucks = truck_ore_per_second(balance.truck_spec(TruckKind::Small), &levels, 540.0) * 2.0;
    let breakdown = IncomeBreakdown::new(drones, trucks, balance.income_multiplier);

    assert!((breakdown.drones_per_second - 12.0 * 0.65).abs() < 1e-9);
    assert!((breakdown.trucks_per_second - 2.0 * 40.0 / 15.5 * 0.65).abs() < 1e-9);
    assert!(
        (breakdown.total_per_minute() - breakdown.total_per_second() * 60.0).abs() < 1e-9
    );
}

#[test]
fn gather_upgrades_raise_truck_throughput() {
    let balance = BalanceConfig::default();
    let spec = balance.truck_spec(TruckKind::Medium);
    let base = truck_ore_per_second(spec, &FleetLevels::default(), 1200.0);
    let upgraded = truck_ore_per_second(
        spec,
        &FleetLevels {
            gather: 4,
            unload: 0,
            travel: 0,
        },
        1200.0,
    );
    assert!(upgraded > base);
    assert_eq!(yield_per_cycle(spec, 4), 450);
}

#[test]
fn offline_and_online_credit_agree_over_whole_seconds() {
    let rate = 2.5;
    let mut carry = IncomeCarry::new();
    let online: u64 = (0..100).map(|_| carry.accrue(rate)).sum();
    assert_eq!(online as f64, offline_credit(rate, 100.0));
}
