pub mod notifier;
pub mod ticket_api;

pub use notifier::{Notification, Notifier};
pub use ticket_api::{Acknowledgement, TicketApi};
