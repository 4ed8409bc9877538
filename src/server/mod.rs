//! Listening socket and the sequential accept loop.

pub mod listener;
pub mod shutdown;

pub use listener::{Server, bind};
