//! Vigil Database Layer
//!
//! Connection provider and repositories for users, images and the ticket queue.

pub mod db;
pub mod traits;

pub use db::{
    ConnectionProvider, ImageRepository, TicketRepository, UserRepository, TICKET_NOTIFY_CHANNEL,
};
pub use traits::{ImageStore, TicketPublisher, UserStore};
