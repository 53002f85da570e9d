use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::answers::store::normalize_question;

/// Kind of form control a question was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    Dropdown,
    Radio,
    Checkbox,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Dropdown => "dropdown",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
        }
    }

    /// Choice fields carry a fixed option list the answer must come from.
    pub fn is_choice(&self) -> bool {
        !matches!(self, FieldType::Text)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field label must not be empty")]
    EmptyLabel,
}

/// A single application form field as detected by the form-filling caller.
///
/// `options` is only kept for choice fields; a text field never carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    label: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
}

impl FormField {
    pub fn new(
        label: impl Into<String>,
        field_type: FieldType,
        options: Vec<String>,
    ) -> Result<Self, FieldError> {
        let label = label.into();
        // A label with nothing left after normalization would match anything
        if normalize_question(&label).is_empty() {
            return Err(FieldError::EmptyLabel);
        }

        let options: Vec<String> = options
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        let options = (field_type.is_choice() && !options.is_empty()).then_some(options);

        Ok(Self {
            label,
            field_type,
            options,
        })
    }

    pub fn text(label: impl Into<String>) -> Result<Self, FieldError> {
        Self::new(label, FieldType::Text, Vec::new())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }
}
