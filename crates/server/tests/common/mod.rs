//! Common test utilities.

pub mod server;
pub mod storage;

#[allow(unused_imports)]
pub use server::*;
#[allow(unused_imports)]
pub use storage::*;
