//! Core business entities.

mod link;

pub use link::{DeleteMode, Link, NewLink};
