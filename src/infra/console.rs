use tracing::info;

use crate::services::{Notification, Notifier};

/// Prints toasts to the terminal: successes on stdout, errors on stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        info!(?notification, "notification");
        match notification {
            Notification::Success(message) => println!("{message}"),
            Notification::Error(message) => eprintln!("Error: {message}"),
        }
    }
}
