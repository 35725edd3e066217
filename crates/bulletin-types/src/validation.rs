/// A single rejected field: which input it belongs to and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Errors collected while validating one form submission, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages attached to one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Implemented by every submitted form.
pub trait Validate {
    fn validate(&self) -> Result<(), FormErrors>;
}

/// Input must contain something other than whitespace.
pub fn required(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(field, format!("{label} is required."));
        return false;
    }
    true
}

/// Input must be at most `max` characters long.
pub fn max_length(
    errors: &mut FormErrors,
    field: &'static str,
    label: &str,
    value: &str,
    max: usize,
) -> bool {
    if value.chars().count() > max {
        errors.push(field, format!("{label} must be at most {max} characters."));
        return false;
    }
    true
}

/// Input must equal the value of another field.
pub fn equal_to(
    errors: &mut FormErrors,
    field: &'static str,
    other_label: &str,
    value: &str,
    other: &str,
) -> bool {
    if value != other {
        errors.push(field, format!("Must match {other_label}."));
        return false;
    }
    true
}
