//! Domain models

pub mod analysis;
pub mod image;
pub mod queue;
pub mod ticket;

pub use analysis::{AdultSignals, Caption, ImageAnalysis, ImageDescription};
pub use image::ImageRecord;
pub use queue::{FailureDisposition, QueuedTicket, TicketStatus};
pub use ticket::Ticket;
