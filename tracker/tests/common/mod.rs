#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::watch;
use tracker_lib::{
    origin::{Origin, OriginFetchError, Probe},
    proxy::TleProxy,
    scheduler::TrackerState,
    store::MemoryStore,
};
use url::Url;

pub const ISS: &str = "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
";

pub const NOAA_19: &str = "NOAA 19
1 33591U 09005A   20194.50000000  .00000045  00000-0  49000-4 0  9992
2 33591  99.1900 200.1000 0014000 100.0000 260.2000 14.12400000580005
";

pub const ISS_LINE1: &str =
    "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
pub const NOAA_19_LINE1: &str =
    "1 33591U 09005A   20194.50000000  .00000045  00000-0  49000-4 0  9992";

pub const MIXED_SETS: &str = include_str!("../../../tleproto/test_fixtures/mixed_sets.txt");

pub const TTL: Duration = Duration::from_secs(600);

#[derive(Clone, Debug)]
struct Route {
    body: Result<String, u16>,
    content_type: &'static str,
    delay: Duration,
}

/// In-memory origin keyed by URL. Unknown URLs respond 404.
#[derive(Debug, Default)]
pub struct StubOrigin {
    routes: Mutex<HashMap<String, Route>>,
    fetches: Mutex<Vec<String>>,
}

impl StubOrigin {
    pub fn serve(&self, url: &str, body: &str) -> &Self {
        self.route(url, Ok(body.to_owned()), "text/plain", Duration::ZERO)
    }

    pub fn serve_slowly(&self, url: &str, body: &str, delay: Duration) -> &Self {
        self.route(url, Ok(body.to_owned()), "text/plain", delay)
    }

    pub fn serve_json(&self, url: &str) -> &Self {
        self.route(url, Ok("{}".to_owned()), "application/json", Duration::ZERO)
    }

    pub fn fail(&self, url: &str, status: u16) -> &Self {
        self.route(url, Err(status), "text/plain", Duration::ZERO)
    }

    fn route(&self, url: &str, body: Result<String, u16>, content_type: &'static str, delay: Duration) -> &Self {
        self.routes.lock().unwrap().insert(
            url.to_owned(),
            Route {
                body,
                content_type,
                delay,
            },
        );
        self
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches().iter().filter(|u| *u == url).count()
    }

    fn lookup(&self, url: &str) -> Option<Route> {
        self.routes.lock().unwrap().get(url).cloned()
    }
}

impl Origin for StubOrigin {
    async fn fetch(&self, url: &str) -> Result<String, OriginFetchError> {
        self.fetches.lock().unwrap().push(url.to_owned());
        let route = self.lookup(url).unwrap_or(Route {
            body: Err(404),
            content_type: "text/plain",
            delay: Duration::ZERO,
        });
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        route.body.map_err(|status| OriginFetchError::Status {
            url: url.to_owned(),
            status,
        })
    }

    async fn probe(&self, url: &Url) -> Result<Probe, OriginFetchError> {
        Ok(match self.lookup(url.as_str()) {
            Some(route) => Probe {
                status: route.body.err().unwrap_or(200),
                content_type: Some(route.content_type.to_owned()),
            },
            None => Probe {
                status: 404,
                content_type: None,
            },
        })
    }
}

pub fn proxy(origin: StubOrigin) -> Arc<TleProxy<MemoryStore, StubOrigin>> {
    Arc::new(TleProxy::new(MemoryStore::new(), origin, TTL))
}

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

/// Waits, in virtual time, for the tracker state to satisfy `f`
pub async fn wait_for(
    rx: &mut watch::Receiver<TrackerState>,
    f: impl FnMut(&TrackerState) -> bool,
) -> TrackerState {
    tokio::time::timeout(Duration::from_secs(3600), rx.wait_for(f))
        .await
        .expect("timed out waiting for tracker state")
        .expect("scheduler dropped")
        .clone()
}
