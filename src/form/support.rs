use crate::domain::ticket::{SupportTicketDraft, TicketKind};
use crate::domain::user::{User, assignee_options};
use crate::form::controller::FormController;
use crate::form::field::FieldSpec;
use crate::form::project::priority_options;

pub struct SupportField;

impl SupportField {
    pub const TITLE: &'static str = "title";
    pub const NAME: &'static str = "name";
    pub const EMAIL: &'static str = "email";
    pub const PHONE: &'static str = "phone";
    pub const ASSIGNEE: &'static str = "assignee";
    pub const PRIORITY: &'static str = "priority";
    pub const OVERVIEW: &'static str = "overview";
}

pub fn support_ticket_form(users: &[User]) -> FormController {
    FormController::new(
        TicketKind::Support,
        vec![
            FieldSpec::text(SupportField::TITLE, "Title"),
            FieldSpec::text(SupportField::NAME, "Reporter's Name"),
            FieldSpec::text(SupportField::EMAIL, "Reporter's Email"),
            FieldSpec::text(SupportField::PHONE, "Reporter's Phone Number"),
            FieldSpec::select(
                SupportField::ASSIGNEE,
                "Who is Responsible?",
                assignee_options(users),
            ),
            FieldSpec::select(SupportField::PRIORITY, "Priority", priority_options()),
            FieldSpec::multi_line(SupportField::OVERVIEW, "Overview"),
        ],
    )
}

pub fn support_draft(form: &FormController) -> SupportTicketDraft {
    SupportTicketDraft {
        title: form.value(SupportField::TITLE).to_string(),
        name: form.value(SupportField::NAME).to_string(),
        email: form.value(SupportField::EMAIL).to_string(),
        phone: form.value(SupportField::PHONE).to_string(),
        assignee: form.value(SupportField::ASSIGNEE).to_string(),
        priority: form.value(SupportField::PRIORITY).to_string(),
        overview: form.value(SupportField::OVERVIEW).to_string(),
    }
}
