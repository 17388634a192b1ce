//! Pure balance logic for Stellar Extractor.
//!
//! This crate contains the game rules that are independent of the entity
//! world, scheduler or persistence: cost curves, catalogs and income
//! formulas. Functions take plain data and return results, so the engine,
//! the headless harness and tests all share one source of truth.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`asteroids`] | Asteroid kinds, weighted spawn roulette, hp/reward formulas |
//! | [`balance`] | `BalanceConfig`, the serde-loadable tuning table |
//! | [`constants`] | Compiled balance defaults and frame timing |
//! | [`income`] | Drone/truck throughput, offline credit, fractional carry |
//! | [`logistics`] | Truck catalog and cycle timing |
//! | [`sectors`] | Outer/Inner sector identities and profiles |
//! | [`upgrades`] | Upgrade tracks and owned-count purchase curves |

pub mod asteroids;
pub mod balance;
pub mod constants;
pub mod income;
pub mod logistics;
pub mod sectors;
pub mod upgrades;
