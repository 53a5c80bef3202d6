//! Namview signing state.
//!
//! Holds the pieces that sit between raw chunks and the screen:
//! - [`buffer::TxBuffer`]: chunk accumulation.
//! - [`session::SignSession`]: parse lifecycle over one buffer.
//! - [`items`]: display item count and lookup, driven by [`layout::Layout`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod format;
pub mod items;
pub mod layout;
pub mod params;
pub mod session;

pub use buffer::{Region, TxBuffer};
pub use items::{count_items, get_item, DisplayItem, ItemContext};
pub use layout::Layout;
pub use session::{SessionError, SessionState, SignSession};
