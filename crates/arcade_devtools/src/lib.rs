pub mod debug_overlay;

pub use debug_overlay::{stat_lines, DebugOverlay, OverlayActions, OverlayStats};
