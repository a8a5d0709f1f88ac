//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry Sweeper: Purges expired cached responses at a fixed interval

mod sweeper;

pub use sweeper::{spawn_sweeper, sweep_once};
