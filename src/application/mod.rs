//! Application layer: business logic on top of the domain traits.

pub mod services;
