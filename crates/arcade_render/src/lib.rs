//! Software canvas plus the wgpu presenter that puts it on screen.

pub mod camera;
pub mod frame;
pub mod gpu_context;
pub mod present;
pub mod sprite;
pub mod vertex;

pub use camera::Camera2D;
pub use frame::{Canvas, FrameBuffer};
pub use gpu_context::GpuContext;
pub use present::{letterbox, window_to_frame, Presenter};
pub use sprite::{load_image, Sprite};
pub use vertex::PresentVertex;
