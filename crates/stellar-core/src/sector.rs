//! Sector transition rules.
//!
//! Deciding a transition is separate from carrying it out: [`plan_transition`]
//! only reads the ledger, the engine then debits, tears down and restarts.

use stellar_logic::sectors::Sector;

use crate::command::IgnoreReason;
use crate::economy::EconomyState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Sector,
    pub to: Sector,
    /// Set when this move unlocks `to` and must debit the cost.
    pub unlock_cost: Option<u64>,
}

/// Check whether the ledger may move to `target`.
pub fn plan_transition(state: &EconomyState, target: Sector, unlock_cost: u64) -> Result<Transition, IgnoreReason> {
    let from = state.current_sector;
    if from == target {
        return Err(IgnoreReason::AlreadyThere);
    }
    if state.is_unlocked(target) {
        return Ok(Transition {
            from,
            to: target,
            unlock_cost: None,
        });
    }
    if !state.can_afford(unlock_cost) {
        return Err(IgnoreReason::Unaffordable);
    }
    Ok(Transition {
        from,
        to: target,
        unlock_cost: Some(unlock_cost),
    })
}

/// Apply the ledger side of a planned transition.
pub fn commit_transition(state: &mut EconomyState, transition: &Transition) -> bool {
    if let Some(cost) = transition.unlock_cost {
        if !state.try_spend(cost) {
            return false;
        }
        state.unlocked_sectors.insert(transition.to);
    }
    state.current_sector = transition.to;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_sector_is_noop() {
        let state = EconomyState::default();
        assert_eq!(
            plan_transition(&state, Sector::Outer, 5000),
            Err(IgnoreReason::AlreadyThere)
        );
    }

    #[test]
    fn test_first_unlock_costs() {
        let mut state = EconomyState::default();
        state.ore = 4999.0;
        assert_eq!(
            plan_transition(&state, Sector::Inner, 5000),
            Err(IgnoreReason::Unaffordable)
        );

        state.ore = 6000.0;
        let t = plan_transition(&state, Sector::Inner, 5000).unwrap();
        assert_eq!(t.unlock_cost, Some(5000));
        assert!(commit_transition(&mut state, &t));
        assert_eq!(state.ore, 1000.0);
        assert_eq!(state.current_sector, Sector::Inner);
        assert!(state.is_unlocked(Sector::Inner));
    }

    #[test]
    fn test_return_trips_are_free() {
        let mut state = EconomyState::default();
        state.unlocked_sectors.insert(Sector::Inner);
        state.current_sector = Sector::Inner;

        let back = plan_transition(&state, Sector::Outer, 5000).unwrap();
        assert_eq!(back.unlock_cost, None);
        commit_transition(&mut state, &back);

        let again = plan_transition(&state, Sector::Inner, 5000).unwrap();
        assert_eq!(again.unlock_cost, None);
    }
}
