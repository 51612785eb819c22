//! Wire protocol pieces: envelope types, stateless message
//! classification and outbound event construction.

pub mod classifier;
pub mod events;
mod message;

pub use message::{response_err, response_ok, Request};
