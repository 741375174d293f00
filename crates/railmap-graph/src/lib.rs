pub mod camera;
pub mod filter;
pub mod hit_tester;
pub mod layout;
pub mod render;
pub mod store;
pub mod style;
pub mod viewport;

pub use camera::{Bounds, Camera};
pub use filter::{VisibleGraph, filter, filter_with_state, id_of};
pub use hit_tester::hit_test;
pub use layout::{ForceSimulation, LayoutConfig, LayoutEvent, LayoutStatus};
pub use render::{Canvas, FrameStats, RenderAdapter, RenderConfig, TextShadow, drawn_radius};
pub use store::{
    EnrichReport, EnrichedGraph, Endpoint, GraphDataStore, GraphStatus, NetworkEdge, StationNode,
};
pub use style::Color;
pub use viewport::{CameraPhase, ViewportController};
