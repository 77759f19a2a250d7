//! Single-writer estimating session
//!
//! The pricing functions hold no locks and keep no state. This wrapper is the
//! integration layer: it owns one drawing session's objects, the active
//! pricing config and the open bids, and serializes every mutation behind a
//! mutex. Object edits are batched; estimates only change on an explicit
//! [`EstimatingSession::recompute`].

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    Bid, BidContext, GeometricObject, MeasurementSnapshot, PricingConfig, ProjectEstimate,
};
use crate::error::{EstimateError, EstimateResult};
use crate::services::aggregation::compute_project_estimate;
use crate::services::bid_engine::BidEngine;
use crate::services::objects::{GeometryMeasurer, ObjectStore};

struct SessionState<M> {
    store: ObjectStore<M>,
    config: PricingConfig,
    bids: HashMap<Uuid, Bid>,
}

pub struct EstimatingSession<M> {
    state: Mutex<SessionState<M>>,
}

impl<M: GeometryMeasurer> EstimatingSession<M> {
    pub fn new(measurer: M, config: PricingConfig) -> Self {
        Self {
            state: Mutex::new(SessionState {
                store: ObjectStore::new(measurer),
                config,
                bids: HashMap::new(),
            }),
        }
    }

    /// Apply a batch of object edits. Estimates computed before this call are stale.
    pub fn edit_objects<R>(&self, f: impl FnOnce(&mut ObjectStore<M>) -> R) -> R {
        let mut state = self.state.lock();
        f(&mut state.store)
    }

    pub fn objects(&self) -> Vec<GeometricObject> {
        self.state.lock().store.objects().to_vec()
    }

    /// Swap in new pricing configuration after validating it. Open bids are
    /// refreshed so their risk flags reflect the new services.
    pub fn replace_config(&self, config: PricingConfig) -> EstimateResult<()> {
        config.validate()?;

        let mut state = self.state.lock();
        let bids = std::mem::take(&mut state.bids);
        state.config = config;

        let engine = BidEngine::new(&state.config);
        let refreshed: HashMap<_, _> = bids
            .into_iter()
            .map(|(id, bid)| (id, engine.refresh(bid)))
            .collect();
        state.bids = refreshed;

        info!(pricing_config_id = %state.config.id, "Pricing config replaced");
        Ok(())
    }

    /// Price every trade from the current objects and configuration.
    pub fn recompute(&self) -> ProjectEstimate {
        let state = self.state.lock();
        compute_project_estimate(
            state.store.objects(),
            &state.config.trades,
            &state.config.services,
        )
    }

    pub fn open_bid(&self, snapshot: MeasurementSnapshot, context: Option<BidContext>) -> Bid {
        let mut state = self.state.lock();
        let bid = BidEngine::new(&state.config).create_bid(snapshot, context);
        state.bids.insert(bid.id, bid.clone());
        bid
    }

    pub fn bid(&self, id: Uuid) -> Option<Bid> {
        self.state.lock().bids.get(&id).cloned()
    }

    /// Run one bid operation. The stored bid is only replaced when the
    /// operation succeeds.
    pub fn edit_bid(
        &self,
        id: Uuid,
        f: impl FnOnce(&BidEngine, &Bid) -> EstimateResult<Bid>,
    ) -> EstimateResult<Bid> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let current = state.bids.get(&id).ok_or(EstimateError::BidNotFound(id))?;

        let next = match f(&BidEngine::new(&state.config), current) {
            Ok(bid) => bid,
            Err(e) => {
                warn!(bid_id = %id, code = e.error_code(), error = %e, "Bid edit rejected");
                return Err(e);
            }
        };

        state.bids.insert(id, next.clone());
        Ok(next)
    }

    pub fn close_bid(&self, id: Uuid) -> Option<Bid> {
        self.state.lock().bids.remove(&id)
    }
}
