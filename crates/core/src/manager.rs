// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock manager: the check, lock, and unlock commands
//!
//! `lock` runs its holder check, count, and insert inside the critical section
//! of the requested application. `check` reads without it; `unlock` is a
//! single delete-by-key and relies on the store's own atomicity.

use crate::clock::Clock;
use crate::config::AppRegistry;
use crate::critical::AppLocks;
use crate::error::{BadRequest, ManagerError};
use crate::identity::{ClientIdentity, Requester};
use crate::record::{LockKey, LockRecord};
use crate::request::{Command, Fields, LockRequest};
use crate::response::{CheckOutcome, LockOutcome, LockResponse, UnlockOutcome};
use crate::store::{LockStore, StoreError};

/// Where one (user, service, application) triple stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripleState {
    /// No record
    None,
    /// Record behind at least one other
    Queued,
    /// Record at position 0
    Held,
}

/// Coordinates lock requests against a store
pub struct LockManager<S: LockStore, C: Clock> {
    store: S,
    clock: C,
    apps: AppRegistry,
    critical: AppLocks,
}

impl<S: LockStore, C: Clock> LockManager<S, C> {
    pub fn new(store: S, clock: C, apps: AppRegistry) -> Self {
        Self {
            store,
            clock,
            apps,
            critical: AppLocks::new(),
        }
    }

    pub fn apps(&self) -> &AppRegistry {
        &self.apps
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn critical_sections(&self) -> &AppLocks {
        &self.critical
    }

    /// Run a raw command from a client.
    ///
    /// Checks run in a fixed order: command name, authorization of mutating
    /// commands, then the sanitized fields. Every BadRequest becomes a 400
    /// response; only store failures are returned as errors.
    pub async fn execute(
        &self,
        command: &str,
        fields: Fields,
        identity: &ClientIdentity,
    ) -> Result<LockResponse, StoreError> {
        match self.dispatch(command, fields, identity).await {
            Ok(response) => Ok(response),
            Err(ManagerError::BadRequest(reason)) => {
                tracing::debug!(
                    command,
                    user_id = %identity.user_id,
                    service_id = %identity.service_id,
                    %reason,
                    "bad request"
                );
                Ok(reason.into())
            }
            Err(ManagerError::Store(e)) => {
                tracing::error!(command, error = %e, "store failure");
                Err(e)
            }
        }
    }

    async fn dispatch(
        &self,
        command: &str,
        fields: Fields,
        identity: &ClientIdentity,
    ) -> Result<LockResponse, ManagerError> {
        let command: Command = command.parse()?;
        if command.is_mutating() && !identity.authorized {
            return Err(BadRequest::NotAuthorized.into());
        }
        let request = LockRequest::sanitize(command, fields)?;

        let response = match request.command {
            Command::Check => self.check(&request.app, identity)?.into(),
            Command::Lock => self.lock(&request.app, identity, request.note).await?.into(),
            Command::Unlock => self.unlock(&request.app, identity)?.into(),
        };
        Ok(response)
    }

    /// Report the current holder of `app`. Open to unauthorized callers.
    pub fn check(
        &self,
        app: &str,
        identity: &ClientIdentity,
    ) -> Result<CheckOutcome, ManagerError> {
        let app = self.apps.resolve(app)?;
        let holder = self.store.holder(app)?;
        tracing::debug!(
            app,
            user_id = %identity.user_id,
            service_id = %identity.service_id,
            locked = holder.is_some(),
            "check"
        );
        Ok(match holder {
            Some(record) => CheckOutcome::Locked(record),
            None => CheckOutcome::Unlocked,
        })
    }

    /// Take or queue for the lock on `app`
    pub async fn lock(
        &self,
        app: &str,
        identity: &ClientIdentity,
        note: Option<String>,
    ) -> Result<LockOutcome, ManagerError> {
        if !identity.authorized {
            return Err(BadRequest::NotAuthorized.into());
        }
        let app = self.apps.resolve(app)?;
        let requester = identity.requester();

        let _section = self.critical.enter(app).await;

        let queue = self.store.queue(app)?;
        if queue.first().is_some_and(|r| r.is_owned_by(&requester)) {
            tracing::info!(
                app,
                user_id = %requester.user_id,
                service_id = %requester.service_id,
                "lock already held"
            );
            return Ok(LockOutcome::AlreadyLocked);
        }

        // Counts the caller's own record too when it is already queued; the
        // insert below is then a no-op.
        let others = queue.len();
        let record = LockRecord::new(app, identity, self.clock.now(), note);
        let inserted = self.store.insert(record)?;

        let outcome = if others == 0 {
            LockOutcome::Locked
        } else {
            LockOutcome::Waiting { others }
        };
        tracing::info!(
            app,
            user_id = %requester.user_id,
            service_id = %requester.service_id,
            inserted,
            ?outcome,
            "lock"
        );
        Ok(outcome)
    }

    /// Release the caller's own record on `app`
    pub fn unlock(
        &self,
        app: &str,
        identity: &ClientIdentity,
    ) -> Result<UnlockOutcome, ManagerError> {
        if !identity.authorized {
            return Err(BadRequest::NotAuthorized.into());
        }
        let app = self.apps.resolve(app)?;
        let requester = identity.requester();

        let removed = self.store.delete(&LockKey::new(app, requester))?;
        tracing::info!(
            app,
            user_id = %requester.user_id,
            service_id = %requester.service_id,
            removed,
            "unlock"
        );
        Ok(if removed {
            UnlockOutcome::Unlocked
        } else {
            UnlockOutcome::AlreadyUnlocked
        })
    }

    /// State of one requester's triple on `app`
    pub fn state_of(&self, app: &str, requester: &Requester) -> Result<TripleState, ManagerError> {
        let app = self.apps.resolve(app)?;
        let queue = self.store.queue(app)?;
        Ok(match queue.iter().position(|r| r.is_owned_by(requester)) {
            Some(0) => TripleState::Held,
            Some(_) => TripleState::Queued,
            None => TripleState::None,
        })
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
