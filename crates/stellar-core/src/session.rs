//! Session lifecycle: identity, load, offline catch-up and save draining.
//!
//! The [`Session`] binds a [`SimulationEngine`] to a user and a
//! [`SnapshotStore`]. After every engine call it drains the engine's save
//! requests synchronously, one snapshot at a time through the engine's
//! in-flight guard.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::command::{Command, CommandOutcome};
use crate::engine::{OfflineReport, SimulationEngine};
use crate::persistence::{SnapshotStore, StoreError};
use crate::view::ViewModel;

/// Opaque identity of the signed-in player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplies the current user; `None` means nobody is signed in.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<UserId>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<UserId>);

impl StaticIdentity {
    pub fn signed_in(user: UserId) -> Self {
        Self(Some(user))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.0.clone()
    }
}

/// What happened when a session started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartReport {
    pub user: UserId,
    /// False when no snapshot existed and a fresh save was created.
    pub restored: bool,
    pub offline: Option<OfflineReport>,
}

pub struct Session {
    engine: SimulationEngine,
    store: Box<dyn SnapshotStore>,
    identity: Box<dyn IdentityProvider>,
    user: Option<UserId>,
    failed_saves: usize,
}

impl Session {
    pub fn new(
        engine: SimulationEngine,
        store: Box<dyn SnapshotStore>,
        identity: Box<dyn IdentityProvider>,
    ) -> Self {
        Self {
            engine,
            store,
            identity,
            user: None,
            failed_saves: 0,
        }
    }

    /// Load (or create) the user's save, credit offline time and start the engine.
    ///
    /// Returns `Ok(None)` without touching anything when nobody is signed in.
    /// A load error leaves the engine untouched.
    pub fn start(&mut self) -> Result<Option<StartReport>, StoreError> {
        let Some(user) = self.identity.current_user() else {
            info!("no signed-in user, session not started");
            return Ok(None);
        };

        let loaded = self.store.load(&user)?;
        let restored = loaded.is_some();
        let offline = match loaded {
            Some(snapshot) => {
                self.engine.restore(&snapshot);
                Some(self.engine.reconcile_offline())
            }
            None => {
                self.engine.reset_state();
                None
            }
        };

        info!(user = %user, restored, "session started");
        self.user = Some(user.clone());
        self.engine.start();
        self.flush_saves();

        Ok(Some(StartReport {
            user,
            restored,
            offline,
        }))
    }

    pub fn update(&mut self, delta_ms: f64) {
        self.engine.update(delta_ms);
        self.flush_saves();
    }

    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        let outcome = self.engine.apply(command);
        self.flush_saves();
        outcome
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.flush_saves();
    }

    /// Write every save the engine has asked for. Failures are logged and dropped.
    pub fn flush_saves(&mut self) {
        let Some(user) = self.user.as_ref() else {
            return;
        };
        while let Some(snapshot) = self.engine.take_save_request() {
            match self.store.save(user, &snapshot) {
                Ok(()) => self.engine.finish_save(true),
                Err(e) => {
                    warn!(user = %user, error = %e, "save failed");
                    self.failed_saves += 1;
                    self.engine.finish_save(false);
                }
            }
        }
    }

    pub fn view(&self) -> ViewModel {
        self.engine.view()
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SimulationEngine {
        &mut self.engine
    }

    pub fn store(&self) -> &dyn SnapshotStore {
        self.store.as_ref()
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn failed_saves(&self) -> usize {
        self.failed_saves
    }
}
