//! Tool definitions module.
//!
//! Each tool is defined in its own file, grouped by the service it talks to.

pub mod beehiiv;

pub use beehiiv::{BeehiivClient, GetSubscribersParams, GetSubscribersTool};
