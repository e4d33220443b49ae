use clap::Parser;
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::{Mutex, Notify};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use tracker_lib::{
    api::{tle_routes, tracker_routes, TrackerApi},
    config::{Config, TrackerConfig},
    focus::{FocusBridge, LogMapView},
    origin::HttpOrigin,
    propagator::Sgp4Propagator,
    proxy::TleProxy,
    scheduler::Scheduler,
    source::SourceSelection,
    store::MemoryStore,
};

#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Tracker configuration toml file.
    ///
    /// Built-in defaults are used when not provided.
    #[arg(long)]
    config: Option<PathBuf>,

    /// The address:port to serve the HTTP API on
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Position refresh period, e.g. '2s' or '500ms'
    #[arg(long, value_parser = humantime::parse_duration)]
    refresh_period: Option<Duration>,

    /// How long fetched element-set text is cached, e.g. '10m'
    #[arg(long, value_parser = humantime::parse_duration)]
    cache_ttl: Option<Duration>,

    /// Maximum number of element sets to track
    #[arg(long)]
    max_records: Option<usize>,

    /// The element-set source URL to start tracking
    source: Option<Url>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let opts = Opts::parse();

    let mut cfg = match opts.config.as_ref() {
        Some(path) => {
            info!(config = %path.display(), "Loading tracker config file");
            Config::load(path)?.resolve()?
        }
        None => TrackerConfig::default(),
    };
    if let Some(listen) = opts.listen {
        cfg.listen = listen;
    }
    if let Some(p) = opts.refresh_period {
        cfg.refresh_period = p;
    }
    if let Some(ttl) = opts.cache_ttl {
        cfg.cache_ttl = ttl;
    }
    if let Some(n) = opts.max_records {
        cfg.max_records = n;
    }
    if let Some(source) = opts.source {
        cfg.source = source;
    }
    cfg.check()?;

    let shutdown = Arc::new(Notify::new());
    let intr = interruptor::Interruptor::new();
    let intr_clone = intr.clone();
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        if intr_clone.is_set() {
            let exit_code = if cfg!(target_family = "unix") {
                // 128 (fatal error signal "n") + 2 (control-c is fatal error signal 2)
                130
            } else {
                // Windows code 3221225786
                // -1073741510 == C000013A
                -1073741510
            };
            std::process::exit(exit_code);
        } else {
            intr_clone.set();
            shutdown_clone.notify_one();
        }
    })?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run(cfg, shutdown))
}

async fn run(cfg: TrackerConfig, shutdown: Arc<Notify>) -> Result<(), Box<dyn std::error::Error>> {
    let origin = HttpOrigin::new(cfg.origin_timeout)?;
    let proxy = Arc::new(TleProxy::new(MemoryStore::new(), origin, cfg.cache_ttl));

    let mut scheduler = Scheduler::new(
        proxy.clone(),
        Arc::new(Sgp4Propagator),
        cfg.scheduler_config(),
    )?;
    let tracker = scheduler.subscribe();
    scheduler.select_source(cfg.source.clone());
    let scheduler = Arc::new(Mutex::new(scheduler));

    let api = TrackerApi {
        scheduler: scheduler.clone(),
        selection: Arc::new(Mutex::new(SourceSelection::new(cfg.source.clone()))),
        focus: Arc::new(FocusBridge::new(LogMapView, cfg.focus_zoom)),
        tracker,
    };
    let app = tle_routes(proxy).merge(tracker_routes(api));

    let listener = tokio::net::TcpListener::bind(cfg.listen).await?;
    info!(
        listen = %cfg.listen,
        source = %cfg.source,
        refresh_period = %humantime::format_duration(cfg.refresh_period),
        "Serving"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.notified().await })
        .await?;

    scheduler.lock().await.stop();
    info!("Stopped");
    Ok(())
}

mod interruptor {
    use std::sync::atomic::{AtomicBool, Ordering::SeqCst};
    use std::sync::Arc;

    #[derive(Clone, Debug)]
    #[repr(transparent)]
    pub struct Interruptor(Arc<AtomicBool>);

    impl Interruptor {
        pub fn new() -> Self {
            Interruptor(Arc::new(AtomicBool::new(false)))
        }

        pub fn set(&self) {
            self.0.store(true, SeqCst);
        }

        pub fn is_set(&self) -> bool {
            self.0.load(SeqCst)
        }
    }

    impl Default for Interruptor {
        fn default() -> Self {
            Self::new()
        }
    }
}
