//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Keyboard input mapped to direction commands
//! - External media requests and where their results are shown

pub mod input;
pub mod media;

pub use input::direction_for_key;
pub use media::{
    FetchError, MediaCallback, MediaFetch, MediaSurface, extract_media_ref, media_request_url,
};
#[cfg(target_arch = "wasm32")]
pub use media::{BrowserFetch, ImageSurface};
