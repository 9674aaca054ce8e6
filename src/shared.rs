/*
 * Shared Parameters Module
 *
 * A cloneable, thread-safe handle to the simulation parameters. A settings
 * panel (possibly on another thread) edits parameters through it between
 * frames; the flock reads one snapshot at the start of every step. Every
 * value stored in the handle has passed validation.
 *
 * The handle also keeps the snapshot of the values the flock last applied,
 * which is the baseline for change detection.
 */

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

use crate::error::ParamsError;
use crate::params::{ParamChanges, ParamSnapshot, SimulationParams};

#[derive(Debug, Clone)]
pub struct SharedParams {
    inner: Arc<RwLock<Slot>>,
}

#[derive(Debug)]
struct Slot {
    params: SimulationParams,
    applied: Option<ParamSnapshot>,
}

impl SharedParams {
    pub fn new(params: SimulationParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Slot {
                params,
                applied: None,
            })),
        })
    }

    // A poisoned lock still holds a validated value, so keep using it
    fn read(&self) -> RwLockReadGuard<'_, Slot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current parameters.
    pub fn get(&self) -> SimulationParams {
        self.read().params.clone()
    }

    /// Current parameters together with what changed since the flock last applied them.
    pub fn poll(&self) -> (SimulationParams, ParamChanges) {
        let slot = self.read();
        let changes = slot.params.detect_changes(slot.applied.as_ref());
        (slot.params.clone(), changes)
    }

    pub fn pending_changes(&self) -> ParamChanges {
        self.poll().1
    }

    /// Replace the parameters wholesale. Rejected values leave the stored ones untouched.
    pub fn set(&self, params: SimulationParams) -> Result<(), ParamsError> {
        if let Err(err) = params.validate() {
            warn!("rejected parameter update: {err}");
            return Err(err);
        }
        self.write().params = params;
        Ok(())
    }

    /// Edit a copy of the parameters and commit it if it validates.
    pub fn update<F>(&self, edit: F) -> Result<(), ParamsError>
    where
        F: FnOnce(&mut SimulationParams),
    {
        let mut slot = self.write();
        let mut candidate = slot.params.clone();
        edit(&mut candidate);
        if let Err(err) = candidate.validate() {
            warn!("rejected parameter update: {err}");
            return Err(err);
        }
        slot.params = candidate;
        Ok(())
    }

    // Record the values the flock applied as the change-detection baseline
    pub(crate) fn mark_applied(&self, applied: &SimulationParams) {
        self.write().applied = Some(applied.take_snapshot());
    }
}
