//! Application services orchestrating domain operations.

mod link_service;

pub use link_service::LinkService;
