//! Integration tests for the session lifecycle.
//!
//! Exercises: IdentityProvider → SnapshotStore load → offline catch-up →
//! engine loops → save draining, with a manual wall clock.

use std::rc::Rc;

use chrono::{TimeZone, Utc};
use stellar_core::persistence::SnapshotStore;
use stellar_core::prelude::*;
use stellar_logic::logistics::TruckKind;
use stellar_logic::sectors::Sector;

// ── Helpers ────────────────────────────────────────────────────────────

const T0_MS: i64 = 1_700_000_000_000;

fn clock() -> Rc<ManualClock> {
    Rc::new(ManualClock::new(Utc.timestamp_millis_opt(T0_MS).unwrap()))
}

fn engine(clock: &Rc<ManualClock>) -> SimulationEngine {
    SimulationEngine::with_clock(EngineConfig::default().with_seed(3), clock.clone())
}

fn pilot() -> UserId {
    UserId::new("pilot-7")
}

fn session_with(clock: &Rc<ManualClock>, store: MemoryStore) -> Session {
    Session::new(
        engine(clock),
        Box::new(store),
        Box::new(StaticIdentity::signed_in(pilot())),
    )
}

fn saved(session: &Session) -> Snapshot {
    session
        .store()
        .load(&pilot())
        .unwrap()
        .expect("snapshot should exist")
}

// ── Start-up ───────────────────────────────────────────────────────────

#[test]
fn anonymous_session_does_nothing() {
    let clock = clock();
    let mut session = Session::new(
        engine(&clock),
        Box::new(MemoryStore::new()),
        Box::new(StaticIdentity::anonymous()),
    );
    assert_eq!(session.start().unwrap(), None);
    assert!(!session.engine().is_running());
    assert!(session.user().is_none());
}

#[test]
fn first_start_creates_and_saves_default_state() {
    let clock = clock();
    let mut session = session_with(&clock, MemoryStore::new());
    let report = session.start().unwrap().unwrap();
    assert!(!report.restored);
    assert!(report.offline.is_none());
    assert!(session.engine().is_running());

    let snap = saved(&session);
    assert_eq!(snap.ore, 0.0);
    assert_eq!(snap.current_sector, Sector::Outer);
    assert_eq!(snap.last_save_ms, Some(T0_MS));
}

#[test]
fn restart_credits_offline_income_once() {
    let clock = clock();
    let stale = Snapshot {
        ore: 50.0,
        drone_count: 2,
        drone_damage: 5,
        last_save_ms: Some(T0_MS - 100_000),
        ..Snapshot::default()
    };
    let store = MemoryStore::new().with_snapshot(pilot(), stale);
    let mut session = session_with(&clock, store);

    let report = session.start().unwrap().unwrap();
    let offline = report.offline.unwrap();
    assert!(report.restored);
    assert_eq!(offline.elapsed_seconds, 100.0);
    // 2 drones * 5 damage * 1000 / 1000 ms * 0.65 = 6.5 ore/s
    assert!((offline.ore_per_second - 6.5).abs() < 1e-9);
    assert!((session.engine().ore() - (50.0 + 650.0)).abs() < 1e-9);
    assert_eq!(session.engine().drone_unit_count(), 2);

    let snap = saved(&session);
    assert_eq!(snap.last_save_ms, Some(T0_MS));
    assert!((snap.ore - 700.0).abs() < 1e-9);

    // Same instant, fresh session: nothing more to credit.
    let store = MemoryStore::new().with_snapshot(pilot(), snap);
    let mut again = session_with(&clock, store);
    let report = again.start().unwrap().unwrap();
    assert_eq!(report.offline.unwrap().credited, 0.0);
}

#[test]
fn save_without_stamp_credits_nothing_offline() {
    let clock = clock();
    let partial: Snapshot = serde_json::from_str(r#"{"drone_count": 1}"#).unwrap();
    let store = MemoryStore::new().with_snapshot(pilot(), partial);
    let mut session = session_with(&clock, store);

    let report = session.start().unwrap().unwrap();
    let offline = report.offline.unwrap();
    assert!(report.restored);
    assert_eq!(offline.elapsed_seconds, 0.0);
    assert_eq!(offline.credited, 0.0);
    assert_eq!(session.engine().ore(), 0.0);
    assert_eq!(session.engine().state().drone_count, 1);
    assert_eq!(saved(&session).last_save_ms, Some(T0_MS));

    // Time passing after the first load is credited normally.
    clock.advance_ms(10_000);
    let store = MemoryStore::new().with_snapshot(pilot(), saved(&session));
    let mut later = session_with(&clock, store);
    let report = later.start().unwrap().unwrap();
    assert_eq!(report.offline.unwrap().elapsed_seconds, 10.0);
}

#[test]
fn trucks_are_rebuilt_from_counts() {
    let clock = clock();
    let mut snap = Snapshot::default();
    snap.current_sector = Sector::Inner;
    snap.unlocked_sectors = vec![Sector::Outer, Sector::Inner];
    snap.truck_counts.insert(TruckKind::Small, 2);
    snap.truck_counts.insert(TruckKind::Large, 1);
    snap.last_save_ms = Some(T0_MS);
    let mut session = session_with(&clock, MemoryStore::new().with_snapshot(pilot(), snap));
    session.start().unwrap();

    let view = session.view();
    assert_eq!(view.trucks.len(), 3);
    assert_eq!(view.sector.current, Sector::Inner);
    assert!(view.asteroids.is_empty());
}

#[test]
fn newer_snapshot_version_fails_start_without_touching_engine() {
    let clock = clock();
    let future = Snapshot {
        version: 99,
        ore: 1e9,
        ..Snapshot::default()
    };
    let mut session = session_with(&clock, MemoryStore::new().with_snapshot(pilot(), future));
    assert!(session.start().is_err());
    assert_eq!(session.engine().ore(), 0.0);
    assert!(!session.engine().is_running());
}

// ── Running ────────────────────────────────────────────────────────────

#[test]
fn purchases_persist_immediately() {
    let clock = clock();
    let mut session = session_with(&clock, MemoryStore::new());
    session.start().unwrap();
    session.engine_mut().state_mut().ore = 150.0;

    assert!(session.apply(Command::BuyDrone).is_applied());
    let snap = saved(&session);
    assert_eq!(snap.drone_count, 1);
    assert_eq!(snap.ore, 50.0);
}

#[test]
fn sector_unlock_flow() {
    let clock = clock();
    let mut session = session_with(&clock, MemoryStore::new());
    session.start().unwrap();

    session.engine_mut().state_mut().ore = 4000.0;
    assert!(!session
        .apply(Command::GoSector {
            sector: Sector::Inner
        })
        .is_applied());

    session.engine_mut().state_mut().ore = 5200.0;
    assert!(session
        .apply(Command::GoSector {
            sector: Sector::Inner
        })
        .is_applied());
    let snap = saved(&session);
    assert_eq!(snap.current_sector, Sector::Inner);
    assert!(snap.unlocked_sectors.contains(&Sector::Inner));
    assert_eq!(snap.ore, 200.0);

    // Going back and forth again is free.
    session.apply(Command::GoSector {
        sector: Sector::Outer,
    });
    session.apply(Command::GoSector {
        sector: Sector::Inner,
    });
    assert_eq!(session.engine().ore(), 200.0);
}

#[test]
fn autosave_runs_every_fifteen_seconds() {
    let clock = clock();
    let mut session = session_with(&clock, MemoryStore::new());
    session.start().unwrap();
    session.engine_mut().state_mut().ore = 321.0;

    for _ in 0..299 {
        clock.advance_ms(50);
        session.update(50.0);
    }
    assert_eq!(saved(&session).ore, 0.0);

    clock.advance_ms(50);
    session.update(50.0);
    let snap = saved(&session);
    assert!(snap.ore >= 321.0);
    assert_eq!(snap.last_save_ms, Some(T0_MS + 15_000));
}

#[test]
fn failed_saves_are_logged_and_dropped() {
    let clock = clock();
    let mut store = MemoryStore::new();
    store.set_failing(true);
    let mut session = session_with(&clock, store);
    session.start().unwrap();
    assert_eq!(session.failed_saves(), 1);
    assert!(!session.engine().save_queue().is_in_flight());
    assert!(!session.engine().save_queue().is_pending());

    session.engine_mut().state_mut().ore = 500.0;
    session.apply(Command::BuyDrone);
    assert_eq!(session.failed_saves(), 2);
    assert_eq!(session.engine().state().drone_count, 1);
}

#[test]
fn truck_income_reaches_the_ledger() {
    let clock = clock();
    let mut session = session_with(&clock, MemoryStore::new());
    session.start().unwrap();
    session.engine_mut().state_mut().ore = 5000.0;
    session.apply(Command::GoSector {
        sector: Sector::Inner,
    });
    assert!(session
        .apply(Command::BuyTruck {
            kind: TruckKind::Small
        })
        .is_applied());
    assert_eq!(session.engine().ore(), 0.0);

    // A full small-truck cycle at width 1200 is well under a minute.
    for _ in 0..1200 {
        session.update(50.0);
    }
    assert!(session.engine().ore() >= 40.0);
}

#[test]
fn file_store_round_trip_through_session() {
    let dir = std::env::temp_dir().join(format!("stellar-session-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let clock = clock();

    {
        let mut session = Session::new(
            engine(&clock),
            Box::new(FileStore::new(&dir, SnapshotFormat::Json)),
            Box::new(StaticIdentity::signed_in(pilot())),
        );
        session.start().unwrap();
        session.engine_mut().state_mut().ore = 100.0;
        session.apply(Command::BuyDrone);
        session.stop();
    }

    let mut session = Session::new(
        engine(&clock),
        Box::new(FileStore::new(&dir, SnapshotFormat::Json)),
        Box::new(StaticIdentity::signed_in(pilot())),
    );
    let report = session.start().unwrap().unwrap();
    assert!(report.restored);
    assert_eq!(session.engine().state().drone_count, 1);
    let _ = std::fs::remove_dir_all(&dir);
}
