//! Engine-agnostic building blocks shared by every arcade prototype:
//! input events, the frame clock, keyframe playback, the motion model,
//! rectangles and closed-key arenas.

pub mod animation;
pub mod arena;
pub mod error;
pub mod input;
pub mod motion;
pub mod rect;
pub mod time;

pub use arena::{Arena, ArenaKey};
pub use error::{LoadError, LoadResult};
pub use rect::Rect;
