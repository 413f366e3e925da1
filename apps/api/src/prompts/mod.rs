//! Prompt Builder — substitutes collected text into the fixed templates.
//!
//! Substitution is a single left-to-right pass over the template, so text
//! inside a value that looks like `{placeholder}` is never substituted again.
//! Only presence is checked: required slots must be non-blank, optional
//! slots fall back to `N/A`.

use std::collections::HashMap;

use thiserror::Error;

pub mod templates;

use templates::{RESUME_REWRITE_TEMPLATE, STAR_EVALUATION_TEMPLATE, STAR_FORMAT_TEMPLATE};

/// Rendered in place of an optional slot that was not supplied.
pub const NOT_PROVIDED: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub name: &'static str,
    pub required: bool,
}

const fn required(name: &'static str) -> Slot {
    Slot {
        name,
        required: true,
    }
}

const fn optional(name: &'static str) -> Slot {
    Slot {
        name,
        required: false,
    }
}

const RESUME_REWRITE_SLOTS: &[Slot] = &[required("job_description"), required("resume")];
const STAR_FORMAT_SLOTS: &[Slot] = &[
    optional("job_description"),
    optional("resume"),
    required("question"),
    required("answer"),
];
const STAR_EVALUATION_SLOTS: &[Slot] = &[
    optional("job_description"),
    optional("resume"),
    required("answer"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    ResumeRewrite,
    StarFormat,
    StarEvaluation,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Missing required input: {}", .0.replace('_', " "))]
    MissingField(&'static str),
}

/// Named placeholder values. Blank values count as absent.
#[derive(Debug, Clone, Default)]
pub struct PromptValues {
    values: HashMap<String, String>,
}

impl PromptValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn with_opt(self, name: &str, value: Option<String>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

impl PromptTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            PromptTemplate::ResumeRewrite => "resume_rewrite",
            PromptTemplate::StarFormat => "star_format",
            PromptTemplate::StarEvaluation => "star_evaluation",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            PromptTemplate::ResumeRewrite => RESUME_REWRITE_TEMPLATE,
            PromptTemplate::StarFormat => STAR_FORMAT_TEMPLATE,
            PromptTemplate::StarEvaluation => STAR_EVALUATION_TEMPLATE,
        }
    }

    pub fn slots(&self) -> &'static [Slot] {
        match self {
            PromptTemplate::ResumeRewrite => RESUME_REWRITE_SLOTS,
            PromptTemplate::StarFormat => STAR_FORMAT_SLOTS,
            PromptTemplate::StarEvaluation => STAR_EVALUATION_SLOTS,
        }
    }

    fn slot(&self, name: &str) -> Option<&'static Slot> {
        self.slots().iter().find(|s| s.name == name)
    }

    /// Fails on the first missing required slot (in slot order) before
    /// producing any output.
    pub fn build(&self, values: &PromptValues) -> Result<String, PromptError> {
        if let Some(missing) = self
            .slots()
            .iter()
            .find(|s| s.required && values.get(s.name).is_none())
        {
            return Err(PromptError::MissingField(missing.name));
        }

        let body = self.body();
        let mut out = String::with_capacity(body.len());
        let mut rest = body;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let slot = after
                .find('}')
                .and_then(|close| self.slot(&after[..close]));

            match slot {
                Some(slot) => {
                    out.push_str(values.get(slot.name).unwrap_or(NOT_PROVIDED));
                    rest = &after[slot.name.len() + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);

        Ok(out)
    }
}
