//! Database repositories
//!
//! Every repository acquires its own connection from the `ConnectionProvider`
//! per statement; the connection goes back to the pool when the handle drops.

pub mod connection;
pub mod image;
pub mod ticket;
pub mod user;

pub use connection::ConnectionProvider;
pub use image::ImageRepository;
pub use ticket::{TicketRepository, TICKET_NOTIFY_CHANNEL};
pub use user::UserRepository;
