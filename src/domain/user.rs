use serde::Deserialize;

use crate::domain::deserialize_id;
use crate::form::field::SelectOption;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
}

/// Options for an assignee selector: one per user, valued by id and labelled by email.
pub fn assignee_options(users: &[User]) -> Vec<SelectOption> {
    users
        .iter()
        .map(|user| SelectOption::new(user.id.clone(), user.email.clone()))
        .collect()
}
