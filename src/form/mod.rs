pub mod controller;
pub mod field;
pub mod project;
pub mod support;

pub use controller::FormController;

use crate::domain::ticket::{TicketKind, TicketRequest};

/// Packages the current form values into the request for its endpoint.
pub fn request_from(form: &FormController) -> TicketRequest {
    match form.kind() {
        TicketKind::Project => TicketRequest::Project(project::project_draft(form).to_payload()),
        TicketKind::Support => TicketRequest::Support(support::support_draft(form).to_payload()),
    }
}
