//! Domain events module.
//!
//! Core services emit these after a lifecycle transition has been applied.
//! The front end decides what to do with them (refresh lists, schedule a
//! reminder, write an audit line).

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
