//! beehiiv tools module.
//!
//! - `client`: shared HTTP client for the beehiiv REST API
//! - `subscribers`: the `get-subscribers` tool

pub mod client;
pub mod subscribers;

pub use client::{BeehiivClient, BeehiivError};
pub use subscribers::{GetSubscribersParams, GetSubscribersTool, SortDirection};
