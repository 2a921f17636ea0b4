//! Type-safe wrapper around [`DeskHandle`](crate::framework::DeskHandle).

pub mod desk_client;

pub use desk_client::*;
