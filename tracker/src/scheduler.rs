//! Periodic position refresh for the active element-set source.
//!
//! Each source selection starts a new session. A session loads element sets
//! through the proxy, then recomputes every position on a fixed period and
//! publishes the result as one snapshot. Switching sources aborts the running
//! session, and every publish is checked against the current session id, so
//! a stale session can never overwrite a newer one.

use crate::{
    config::ConfigError,
    origin::{Origin, OriginFetchError},
    propagator::Propagator,
    proxy::TleProxy,
    store::CacheStore,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tleproto::parse_element_sets;
use tletypes::prelude::*;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, error, info, trace, warn};
use url::Url;

pub type SessionId = u64;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub refresh_period: Duration,
    pub max_records: usize,
}

impl SchedulerConfig {
    pub fn new(refresh_period: Duration, max_records: usize) -> Result<Self, ConfigError> {
        let cfg = SchedulerConfig {
            refresh_period,
            max_records,
        };
        cfg.check()?;
        Ok(cfg)
    }

    /// A zero period cannot drive an interval, zero records leaves nothing to track
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.refresh_period.is_zero() {
            return Err(ConfigError::Zero("scheduler.refresh-period"));
        }
        if self.max_records == 0 {
            return Err(ConfigError::Zero("scheduler.max-records"));
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Tracking {
        #[serde(rename = "elementSets")]
        element_sets: usize,
    },
}

/// Positions computed at a single instant
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// The session that computed this snapshot
    pub session: SessionId,
    pub source: Option<Url>,
    pub computed_at: Option<DateTime<Utc>>,
    pub positions: Arc<[Position]>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            session: 0,
            source: None,
            computed_at: None,
            positions: Vec::new().into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerState {
    /// The current session
    pub session: SessionId,
    pub source: Option<Url>,
    pub phase: Phase,
    /// The last published snapshot, possibly from an earlier session
    pub snapshot: Snapshot,
}

/// Propagate every element set at `at`, dropping the ones the propagator
/// rejects. Input order is preserved.
pub fn compute_positions<P: Propagator + ?Sized>(
    propagator: &P,
    sets: &[ElementSet],
    at: DateTime<Utc>,
) -> Vec<Position> {
    sets.iter()
        .filter_map(
            |set| match propagator.propagate(&set.line1, &set.line2, at) {
                Some(g) => Some(Position::new(set.name.clone(), g)),
                None => {
                    trace!(name = %set.name, "Propagation rejected");
                    None
                }
            },
        )
        .collect()
}

pub struct Scheduler<S, O, P> {
    proxy: Arc<TleProxy<S, O>>,
    propagator: Arc<P>,
    config: SchedulerConfig,
    state: Arc<watch::Sender<TrackerState>>,
    task: Option<JoinHandle<()>>,
}

impl<S: CacheStore, O: Origin, P: Propagator> Scheduler<S, O, P> {
    pub fn new(
        proxy: Arc<TleProxy<S, O>>,
        propagator: Arc<P>,
        config: SchedulerConfig,
    ) -> Result<Self, ConfigError> {
        config.check()?;
        let (state, _) = watch::channel(TrackerState::default());
        Ok(Scheduler {
            proxy,
            propagator,
            config,
            state: Arc::new(state),
            task: None,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> TrackerState {
        self.state.borrow().clone()
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn proxy(&self) -> &Arc<TleProxy<S, O>> {
        &self.proxy
    }

    /// Start tracking `source`, cancelling the current session.
    ///
    /// Must be called from within a tokio runtime.
    pub fn select_source(&mut self, source: Url) -> SessionId {
        self.cancel();

        let mut id = 0;
        self.state.send_modify(|s| {
            s.session += 1;
            s.source = Some(source.clone());
            s.phase = Phase::Loading;
            id = s.session;
        });
        info!(session = id, source = %source, "Loading element sets");

        let session = Session {
            id,
            source,
            proxy: self.proxy.clone(),
            propagator: self.propagator.clone(),
            config: self.config,
            state: self.state.clone(),
        };
        self.task = Some(tokio::spawn(session.run()));
        id
    }

    /// Cancel the current session, keeping the last snapshot
    pub fn stop(&mut self) {
        self.cancel();
        self.state.send_modify(|s| {
            s.session += 1;
            s.source = None;
            s.phase = Phase::Idle;
        });
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<S, O, P> Drop for Scheduler<S, O, P> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Session<S, O, P> {
    id: SessionId,
    source: Url,
    proxy: Arc<TleProxy<S, O>>,
    propagator: Arc<P>,
    config: SchedulerConfig,
    state: Arc<watch::Sender<TrackerState>>,
}

impl<S: CacheStore, O: Origin, P: Propagator> Session<S, O, P> {
    async fn run(self) {
        let sets = match self.load().await {
            Ok(sets) if sets.is_empty() => {
                warn!(session = self.id, source = %self.source, "Source has no element sets");
                self.publish(|s| s.phase = Phase::Idle);
                return;
            }
            Ok(sets) => sets,
            Err(e) => {
                error!(session = self.id, source = %self.source, error = %e, "Failed to load element sets");
                self.publish(|s| s.phase = Phase::Idle);
                return;
            }
        };

        let element_sets = sets.len();
        if !self.publish(|s| s.phase = Phase::Tracking { element_sets }) {
            debug!(session = self.id, "Discarding element sets from stale session");
            return;
        }

        let mut ticker = time::interval(self.config.refresh_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;

            let now = Utc::now();
            let positions = compute_positions(&*self.propagator, &sets, now);
            trace!(
                session = self.id,
                positions = positions.len(),
                element_sets,
                "Computed positions"
            );
            let snapshot = Snapshot {
                session: self.id,
                source: Some(self.source.clone()),
                computed_at: Some(now),
                positions: positions.into(),
            };
            if !self.publish(move |s| s.snapshot = snapshot) {
                break;
            }
        }
    }

    async fn load(&self) -> Result<Vec<ElementSet>, OriginFetchError> {
        let fetched = self.proxy.get_tle_text(self.source.as_str()).await?;
        let mut sets = parse_element_sets(&fetched.text);
        if sets.len() > self.config.max_records {
            debug!(
                parsed = sets.len(),
                max = self.config.max_records,
                "Truncating element sets"
            );
            sets.truncate(self.config.max_records);
        }
        info!(
            session = self.id,
            provenance = %fetched.provenance,
            records = sets.len(),
            "Loaded element sets"
        );
        Ok(sets)
    }

    /// Applies `f` to the shared state if this session is still current
    fn publish(&self, f: impl FnOnce(&mut TrackerState)) -> bool {
        self.state.send_if_modified(|s| {
            if s.session != self.id {
                return false;
            }
            f(s);
            true
        })
    }
}
