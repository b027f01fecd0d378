use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::domain::ticket::TicketKind;
use crate::error::{AppError, AppResult};
use crate::form::field::FieldSpec;

/// Local model behind a ticket form: field specs, current values and the
/// loading flag mirrored from the submission in flight.
#[derive(Debug, Clone)]
pub struct FormController {
    kind: TicketKind,
    fields: Vec<FieldSpec>,
    values: BTreeMap<&'static str, String>,
    touched: BTreeSet<&'static str>,
    pending: bool,
}

impl FormController {
    pub fn new(kind: TicketKind, fields: Vec<FieldSpec>) -> Self {
        let values = fields
            .iter()
            .map(|field| (field.name, String::new()))
            .collect();
        Self {
            kind,
            fields,
            values,
            touched: BTreeSet::new(),
            pending: false,
        }
    }

    pub fn kind(&self) -> TicketKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Change handler; validates select fields against their options.
    pub fn change(&mut self, name: &str, value: impl Into<String>) -> AppResult<()> {
        let value = value.into();
        let field = self
            .field(name)
            .ok_or_else(|| AppError::validation(name, "no such field on this form"))?;

        if !field.accepts(&value) {
            let allowed = field
                .options()
                .iter()
                .map(|option| option.value.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::validation(
                name,
                format!("'{value}' is not one of: {allowed}"),
            ));
        }

        let key = field.name;
        debug!(form = self.kind.as_str(), field = key, "field changed");
        self.values.insert(key, value);
        Ok(())
    }

    pub fn blur(&mut self, name: &str) -> AppResult<()> {
        let key = self
            .field(name)
            .map(|field| field.name)
            .ok_or_else(|| AppError::validation(name, "no such field on this form"))?;
        self.touched.insert(key);
        Ok(())
    }

    #[cfg(test)]
    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Restores previously captured values, e.g. a stashed draft. Every value
    /// goes through the same checks as `change`.
    pub fn restore(&mut self, values: &BTreeMap<String, String>) -> AppResult<()> {
        for (name, value) in values {
            self.change(name, value.clone())?;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
        self.touched.clear();
    }

    #[cfg(test)]
    pub fn is_pristine(&self) -> bool {
        self.values.values().all(String::is_empty)
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub fn can_submit(&self) -> bool {
        !self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::project::{self, ProjectField};

    fn form() -> FormController {
        project::project_ticket_form(&project::default_coordinators())
    }

    #[test]
    fn rejects_incident_outside_options() {
        let mut form = form();
        let err = form
            .change(ProjectField::INCIDENT, "billing")
            .expect_err("billing is not offered");
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "incident"));
        assert_eq!(form.value(ProjectField::INCIDENT), "");

        let offered = form
            .field(ProjectField::INCIDENT)
            .expect("incident field")
            .options()
            .to_vec();
        for option in offered {
            form.change(ProjectField::INCIDENT, option.value.clone())
                .expect("offered option");
        }
        assert_eq!(form.value(ProjectField::INCIDENT), "certification");
    }

    #[test]
    fn dates_pass_through_unvalidated() {
        let mut form = form();
        form.change(ProjectField::START_DATE, "not really a date")
            .expect("dates are opaque");
        assert_eq!(form.value(ProjectField::START_DATE), "not really a date");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut form = form();
        assert!(form.change("phone", "555").is_err());
        assert!(form.blur("phone").is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = form();
        form.change(ProjectField::TITLE, "Migrate").expect("title");
        form.blur(ProjectField::TITLE).expect("title");
        assert!(form.is_touched(ProjectField::TITLE));
        assert!(!form.is_pristine());

        form.reset();
        assert!(form.is_pristine());
        assert!(!form.is_touched(ProjectField::TITLE));
    }

    #[test]
    fn submit_gate_follows_pending_flag() {
        let mut form = form();
        assert!(form.can_submit());
        form.set_pending(true);
        assert!(!form.can_submit());
        form.set_pending(false);
        assert!(form.can_submit());
    }
}
