//! Stripe Events Source Connector for Tributary Connect
//!
//! Syncs the account's event stream, paginating with `starting_after` and
//! checkpointing the last-seen event id at every page boundary.

pub mod api;
pub mod config;
pub mod connector;

pub use connector::StripeSourceConnector;
