pub mod conf;
pub mod core;
pub mod extract;
pub mod snapshot;
pub mod source;
pub mod store;

#[cfg(feature = "testutil")]
pub mod testutil;
