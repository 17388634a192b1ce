//! Read-only view model derived from the ledger and the entity world.
//!
//! Deriving the view never mutates anything; hosts poll it whenever they
//! want to redraw.

use hecs::World;
use serde::{Deserialize, Serialize};
use stellar_logic::asteroids::AsteroidKind;
use stellar_logic::balance::BalanceConfig;
use stellar_logic::income::IncomeBreakdown;
use stellar_logic::logistics::TruckKind;
use stellar_logic::sectors::Sector;
use stellar_logic::upgrades::UpgradeKind;

use crate::components::{
    Asteroid, Cracks, DroneUnit, Laser, Outline, Particle, Position, Spin, Truck, TruckState,
};
use crate::economy::EconomyState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub ore: u64,
    pub sector: SectorView,
    pub upgrades: Vec<UpgradeView>,
    pub drones: DroneShopView,
    pub truck_shop: Vec<TruckShopView>,
    pub income: IncomeView,
    pub asteroids: Vec<AsteroidView>,
    pub drone_units: Vec<DroneUnitView>,
    pub trucks: Vec<TruckView>,
    pub lasers: Vec<LaserView>,
    pub particles: Vec<ParticleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorView {
    pub current: Sector,
    pub number: u8,
    pub name: String,
    pub inner_unlocked: bool,
    pub unlock_cost: u64,
    pub can_unlock: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeView {
    pub kind: UpgradeKind,
    pub label: String,
    pub level: u32,
    pub max_level: Option<u32>,
    /// `None` once maxed.
    pub next_cost: Option<u64>,
    pub affordable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroneShopView {
    pub owned: u32,
    pub damage: u32,
    pub fire_rate_ms: u32,
    pub buy_cost: u64,
    pub affordable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckShopView {
    pub kind: TruckKind,
    pub label: String,
    pub owned: u32,
    pub buy_cost: u64,
    pub affordable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeView {
    pub drones_per_minute: f64,
    pub trucks_per_minute: f64,
    pub total_per_minute: f64,
}

impl From<IncomeBreakdown> for IncomeView {
    fn from(b: IncomeBreakdown) -> Self {
        Self {
            drones_per_minute: b.drones_per_minute(),
            trucks_per_minute: b.trucks_per_minute(),
            total_per_minute: b.total_per_minute(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidView {
    pub serial: u64,
    pub kind: AsteroidKind,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub hp: u32,
    pub max_hp: u32,
    pub rotation: f64,
    pub outline: Vec<(f64, f64)>,
    pub cracks: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroneUnitView {
    pub index: u32,
    pub x: f64,
    pub y: f64,
    pub hover_phase: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruckView {
    pub kind: TruckKind,
    pub state: TruckState,
    pub x: f64,
    pub lane: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaserView {
    pub from: Position,
    pub to: Position,
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub x: f64,
    pub y: f64,
    pub life: f64,
    pub kind: AsteroidKind,
}

impl ViewModel {
    pub fn build(
        world: &World,
        state: &EconomyState,
        balance: &BalanceConfig,
        income: IncomeBreakdown,
    ) -> Self {
        let ore = state.floored_ore();
        let affordable = |cost: u64| state.can_afford(cost);

        let profile = balance.profile(state.current_sector);
        let sector = SectorView {
            current: state.current_sector,
            number: state.current_sector.number(),
            name: profile.name.clone(),
            inner_unlocked: state.is_unlocked(Sector::Inner),
            unlock_cost: balance.sector_unlock_cost,
            can_unlock: !state.is_unlocked(Sector::Inner) && affordable(balance.sector_unlock_cost),
        };

        let upgrades = UpgradeKind::all()
            .iter()
            .map(|kind| {
                let track = balance.track(*kind);
                let level = state.level(*kind);
                let next_cost = track.next_cost(level);
                UpgradeView {
                    kind: *kind,
                    label: kind.label().to_string(),
                    level,
                    max_level: track.max_level,
                    next_cost,
                    affordable: next_cost.is_some_and(affordable),
                }
            })
            .collect();

        let drone_cost = balance.drone_curve.cost(state.drone_count);
        let drones = DroneShopView {
            owned: state.drone_count,
            damage: state.drone_damage,
            fire_rate_ms: state.drone_fire_rate_ms,
            buy_cost: drone_cost,
            affordable: affordable(drone_cost),
        };

        let truck_shop = TruckKind::all()
            .iter()
            .map(|kind| {
                let owned = state.truck_count(*kind);
                let buy_cost = balance.truck_curve(*kind).cost(owned);
                TruckShopView {
                    kind: *kind,
                    label: kind.label().to_string(),
                    owned,
                    buy_cost,
                    affordable: affordable(buy_cost),
                }
            })
            .collect();

        let mut asteroids: Vec<AsteroidView> = world
            .query::<(&Position, &Asteroid, &Spin, &Outline, &Cracks)>()
            .iter()
            .map(|(_, (pos, a, spin, outline, cracks))| AsteroidView {
                serial: a.serial,
                kind: a.kind,
                x: pos.x,
                y: pos.y,
                size: a.size,
                hp: a.hp,
                max_hp: a.max_hp,
                rotation: spin.rotation,
                outline: outline.vertices.iter().map(|v| (v.angle, v.radius)).collect(),
                cracks: cracks.lines.iter().map(|c| (c.angle, c.length)).collect(),
            })
            .collect();
        asteroids.sort_by_key(|a| a.serial);

        let mut drone_units: Vec<DroneUnitView> = world
            .query::<(&Position, &DroneUnit)>()
            .iter()
            .map(|(_, (pos, unit))| DroneUnitView {
                index: unit.index,
                x: pos.x,
                y: pos.y,
                hover_phase: unit.hover_phase,
            })
            .collect();
        drone_units.sort_by_key(|d| d.index);

        let mut trucks: Vec<TruckView> = world
            .query::<&Truck>()
            .iter()
            .map(|(_, t)| TruckView {
                kind: t.kind,
                state: t.state,
                x: t.x,
                lane: t.lane,
            })
            .collect();
        trucks.sort_by_key(|t| t.lane);

        let lasers = world
            .query::<&Laser>()
            .iter()
            .map(|(_, l)| LaserView {
                from: l.from,
                to: l.to,
                alpha: l.alpha,
            })
            .collect();

        let particles = world
            .query::<(&Position, &Particle)>()
            .iter()
            .map(|(_, (pos, p))| ParticleView {
                x: pos.x,
                y: pos.y,
                life: p.life,
                kind: p.kind,
            })
            .collect();

        Self {
            ore,
            sector,
            upgrades,
            drones,
            truck_shop,
            income: income.into(),
            asteroids,
            drone_units,
            trucks,
            lasers,
            particles,
        }
    }

    pub fn upgrade(&self, kind: UpgradeKind) -> Option<&UpgradeView> {
        self.upgrades.iter().find(|u| u.kind == kind)
    }

    pub fn truck_offer(&self, kind: TruckKind) -> Option<&TruckShopView> {
        self.truck_shop.iter().find(|t| t.kind == kind)
    }
}
