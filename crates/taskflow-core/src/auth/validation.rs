//! Form validation run before any request leaves the client.
//!
//! Each check reports the first rule that fails.

use chrono::NaiveDate;

use crate::error::ValidationError;

type Check = Result<(), ValidationError>;

/// `local@domain.tld`, no whitespace, exactly one `@`.
pub fn validate_email(email: &str) -> Check {
    if email.is_empty() {
        return Err(ValidationError::invalid("email", "Email is required"));
    }
    if !looks_like_email(email) {
        return Err(ValidationError::invalid(
            "email",
            "Please enter a valid email address",
        ));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Needs a dot with something on both sides somewhere in the domain.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// At least 6 characters with an uppercase letter, a lowercase letter and a digit.
pub fn validate_password(password: &str) -> Check {
    if password.is_empty() {
        return Err(ValidationError::invalid("password", "Password is required"));
    }
    if password.chars().count() < 6 {
        return Err(ValidationError::invalid(
            "password",
            "Password must be at least 6 characters long",
        ));
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(ValidationError::invalid(
            "password",
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Check {
    let len = name.chars().count();
    if len == 0 {
        return Err(ValidationError::invalid("name", "Name is required"));
    }
    if len < 2 {
        return Err(ValidationError::invalid(
            "name",
            "Name must be at least 2 characters long",
        ));
    }
    if len > 50 {
        return Err(ValidationError::invalid(
            "name",
            "Name must be less than 50 characters long",
        ));
    }
    Ok(())
}

pub fn validate_task_title(title: &str) -> Check {
    let len = title.chars().count();
    if len == 0 {
        return Err(ValidationError::invalid("title", "Task title is required"));
    }
    if len < 3 {
        return Err(ValidationError::invalid(
            "title",
            "Task title must be at least 3 characters long",
        ));
    }
    if len > 200 {
        return Err(ValidationError::invalid(
            "title",
            "Task title must be less than 200 characters long",
        ));
    }
    Ok(())
}

/// A due date picked in a form may not lie in the past.
pub fn validate_due_date(due: Option<NaiveDate>, today: NaiveDate) -> Check {
    match due {
        Some(date) if date < today => Err(ValidationError::invalid(
            "due_date",
            "Due date cannot be in the past",
        )),
        _ => Ok(()),
    }
}
