use serde::{Deserialize, Serialize};
use tletypes::prelude::Position;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Center the map view on a coordinate
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct FocusCommand {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
}

/// The rendering layer's side of the focus bridge
pub trait MapView: Send + Sync + 'static {
    fn center_on(&self, cmd: FocusCommand);
}

/// Forwards focus commands to a rendering task
#[derive(Clone, Debug)]
pub struct ChannelMapView(mpsc::UnboundedSender<FocusCommand>);

impl ChannelMapView {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FocusCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelMapView(tx), rx)
    }
}

impl MapView for ChannelMapView {
    fn center_on(&self, cmd: FocusCommand) {
        if self.0.send(cmd).is_err() {
            debug!("Map view receiver is gone, dropping focus command");
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct LogMapView;

impl MapView for LogMapView {
    fn center_on(&self, cmd: FocusCommand) {
        info!(lat = cmd.lat, lon = cmd.lon, zoom = cmd.zoom, "Center view");
    }
}

#[derive(Debug)]
pub struct FocusBridge<M> {
    view: M,
    zoom: u8,
}

impl<M: MapView> FocusBridge<M> {
    pub fn new(view: M, zoom: u8) -> Self {
        FocusBridge { view, zoom }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Issue exactly one centering command for `position`
    pub fn focus(&self, position: &Position) -> FocusCommand {
        let cmd = FocusCommand {
            lat: position.lat,
            lon: position.lon,
            zoom: self.zoom,
        };
        self.view.center_on(cmd);
        cmd
    }

    /// Focus the first position named `name`, if any
    pub fn focus_by_name(&self, positions: &[Position], name: &str) -> Option<FocusCommand> {
        positions
            .iter()
            .find(|p| p.name == name)
            .map(|p| self.focus(p))
    }
}
