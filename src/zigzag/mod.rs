//! Zigbee mesh visualisation: devices (zigs), neighbor observations (zags), and the
//! pluggable data, layout and render stages that turn them into an interactive graph.

pub mod config;
pub mod data;
pub mod datum;
pub mod error;
pub mod grapher;
pub mod layout;
pub mod model;
pub mod plugin;
pub mod render;
pub mod view_state;
pub mod widget;

pub use config::ZigzagConfig;
pub use error::{DataError, GraphError, PluginError, StartError, ViewStateError};
pub use grapher::{Fit, FrameInfo, Grapher, SessionState};
pub use model::{Point, Zag, Zig};
pub use plugin::{PluginConfig, Registry};
pub use view_state::GraphViewState;
