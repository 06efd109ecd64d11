//! Core types shared by the physics and the host interface

pub mod arrays;
pub mod grid;

pub use arrays::*;
pub use grid::{padded_len, UniformGrid};
