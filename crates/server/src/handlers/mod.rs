//! HTTP request handlers.

pub mod audio;
pub mod bible;
pub mod common;
pub mod files;
pub mod health;
pub mod proxy;

pub use audio::*;
pub use bible::*;
pub use files::*;
pub use health::*;
pub use proxy::*;
