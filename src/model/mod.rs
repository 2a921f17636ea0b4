//! Pure data structures: the menu catalog, orders and order drafts.

pub mod draft;
pub mod menu;
pub mod order;

pub use draft::*;
pub use menu::*;
pub use order::*;
