#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    MultiLine,
    /// Stored as typed; the backend receives the string unchanged.
    Date,
    Select(Vec<SelectOption>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
        }
    }

    pub fn multi_line(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::MultiLine,
        }
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Date,
        }
    }

    pub fn select(name: &'static str, label: &'static str, options: Vec<SelectOption>) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Select(options),
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        match &self.kind {
            FieldKind::Select(options) => options,
            _ => &[],
        }
    }

    /// Checks a candidate value against the field's constraints. Empty always passes.
    pub fn accepts(&self, value: &str) -> bool {
        match &self.kind {
            FieldKind::Select(options) => {
                value.is_empty() || options.iter().any(|option| option.value == value)
            }
            FieldKind::Text | FieldKind::MultiLine | FieldKind::Date => true,
        }
    }
}
