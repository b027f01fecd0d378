use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentType {
    Support,
    Projects,
    Architecture,
    Certification,
}

impl IncidentType {
    pub const ALL: [IncidentType; 4] = [
        IncidentType::Support,
        IncidentType::Projects,
        IncidentType::Architecture,
        IncidentType::Certification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Support => "support",
            IncidentType::Projects => "projects",
            IncidentType::Architecture => "architecture",
            IncidentType::Certification => "certification",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncidentType::Support => "Basic Support",
            IncidentType::Projects => "Software Projects",
            IncidentType::Architecture => "Solution Architecture",
            IncidentType::Certification => "Certifications",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    Project,
    Support,
}

impl TicketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketKind::Project => "project",
            TicketKind::Support => "support",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            TicketKind::Project => "/ticket/project/create",
            TicketKind::Support => "/tickets",
        }
    }
}

/// Values of a filled-in project ticket form, one field per input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTicketDraft {
    pub title: String,
    pub assign: String,
    pub email: String,
    pub incident: String,
    pub start_date: String,
    pub end_date: String,
    pub project: String,
    pub priority: String,
    pub overview: String,
}

impl ProjectTicketDraft {
    /// Renames form fields to the keys the create-project endpoint expects.
    /// `assign` is collected by the form but is not part of the request.
    pub fn to_payload(&self) -> ProjectTicketPayload {
        ProjectTicketPayload {
            title: self.title.clone(),
            incident_type: self.incident.clone(),
            client_email: self.email.clone(),
            project_cordinator: self.project.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            priority: self.priority.clone(),
            overview: self.overview.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportTicketDraft {
    pub title: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub assignee: String,
    pub priority: String,
    pub overview: String,
}

impl SupportTicketDraft {
    /// The overview is kept on the form only; the support endpoint has no key for it.
    pub fn to_payload(&self) -> SupportTicketPayload {
        SupportTicketPayload {
            title: self.title.clone(),
            assign_to: self.assignee.clone(),
            ticket_type: TicketKind::Support.as_str().to_string(),
            priority: self.priority.clone(),
            reporters_name: self.name.clone(),
            reporters_email: self.email.clone(),
            reporters_number: self.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTicketPayload {
    pub title: String,
    pub incident_type: String,
    pub client_email: String,
    pub project_cordinator: String,
    pub start_date: String,
    pub end_date: String,
    pub priority: String,
    pub overview: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicketPayload {
    pub title: String,
    pub assign_to: String,
    pub ticket_type: String,
    pub priority: String,
    pub reporters_name: String,
    pub reporters_email: String,
    pub reporters_number: String,
}

/// A create-ticket request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketRequest {
    Project(ProjectTicketPayload),
    Support(SupportTicketPayload),
}

impl TicketRequest {
    pub fn kind(&self) -> TicketKind {
        match self {
            TicketRequest::Project(_) => TicketKind::Project,
            TicketRequest::Support(_) => TicketKind::Support,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.kind().endpoint()
    }

    pub fn title(&self) -> &str {
        match self {
            TicketRequest::Project(payload) => &payload.title,
            TicketRequest::Support(payload) => &payload.title,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            TicketRequest::Project(payload) => {
                serde_json::to_value(payload).unwrap_or(serde_json::Value::Null)
            }
            TicketRequest::Support(payload) => {
                serde_json::to_value(payload).unwrap_or(serde_json::Value::Null)
            }
        }
    }
}
