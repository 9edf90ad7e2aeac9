//! Queue ticket handlers

pub mod description_handler;

pub use description_handler::DescriptionHandler;
