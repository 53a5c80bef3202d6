//! Configuration types shared by the decoder, the display engine and the reviewer.

pub mod buffer;
pub mod display;
pub mod network;
pub mod tokens;
