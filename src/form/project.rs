use crate::domain::ticket::{IncidentType, Priority, ProjectTicketDraft, TicketKind};
use crate::form::controller::FormController;
use crate::form::field::{FieldSpec, SelectOption};

pub struct ProjectField;

impl ProjectField {
    pub const TITLE: &'static str = "title";
    pub const ASSIGN: &'static str = "assign";
    pub const EMAIL: &'static str = "email";
    pub const INCIDENT: &'static str = "incident";
    pub const START_DATE: &'static str = "startDate";
    pub const END_DATE: &'static str = "endDate";
    pub const PROJECT: &'static str = "project";
    pub const PRIORITY: &'static str = "priority";
    pub const OVERVIEW: &'static str = "overview";
}

/// Coordinators offered when the configuration does not list any.
pub fn default_coordinators() -> Vec<SelectOption> {
    vec![
        SelectOption::new("123er7djd456876", "Sam"),
        SelectOption::new("0987vbjb5678923", "Senetor"),
        SelectOption::new("124898hbd929872", "Steve"),
    ]
}

pub fn priority_options() -> Vec<SelectOption> {
    Priority::ALL
        .iter()
        .map(|priority| SelectOption::new(priority.as_str(), priority.label()))
        .collect()
}

pub fn incident_options() -> Vec<SelectOption> {
    IncidentType::ALL
        .iter()
        .map(|incident| SelectOption::new(incident.as_str(), incident.label()))
        .collect()
}

pub fn project_ticket_form(coordinators: &[SelectOption]) -> FormController {
    FormController::new(
        TicketKind::Project,
        vec![
            FieldSpec::text(ProjectField::TITLE, "Title"),
            FieldSpec::text(ProjectField::ASSIGN, "Who is Responsible?"),
            FieldSpec::text(ProjectField::EMAIL, "Email address"),
            FieldSpec::select(ProjectField::INCIDENT, "Incident Type", incident_options()),
            FieldSpec::date(ProjectField::START_DATE, "Start Date"),
            FieldSpec::date(ProjectField::END_DATE, "End Date"),
            FieldSpec::select(ProjectField::PROJECT, "Project", coordinators.to_vec()),
            FieldSpec::select(ProjectField::PRIORITY, "Priority", priority_options()),
            FieldSpec::multi_line(ProjectField::OVERVIEW, "Overview"),
        ],
    )
}

pub fn project_draft(form: &FormController) -> ProjectTicketDraft {
    ProjectTicketDraft {
        title: form.value(ProjectField::TITLE).to_string(),
        assign: form.value(ProjectField::ASSIGN).to_string(),
        email: form.value(ProjectField::EMAIL).to_string(),
        incident: form.value(ProjectField::INCIDENT).to_string(),
        start_date: form.value(ProjectField::START_DATE).to_string(),
        end_date: form.value(ProjectField::END_DATE).to_string(),
        project: form.value(ProjectField::PROJECT).to_string(),
        priority: form.value(ProjectField::PRIORITY).to_string(),
        overview: form.value(ProjectField::OVERVIEW).to_string(),
    }
}
