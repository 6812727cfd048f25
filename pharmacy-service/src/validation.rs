//! Request validation.
//!
//! Field rules are declared on the request types with `validator` derives and
//! the custom functions below. Rules that need configuration or compare two
//! fields live in the `check_*` functions.

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};
use validator::{Validate, ValidateEmail, ValidationError};

use crate::config::SearchConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::search::{MemberCriteria, PageRequest, ProviderCriteria};

const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Letters, digits and hyphens (member and provider numbers)
pub fn identifier(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        Ok(())
    } else {
        Err(invalid(
            "identifier",
            "Can only contain alphanumeric characters and hyphens.",
        ))
    }
}

/// Letters and spaces
pub fn person_name(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        Ok(())
    } else {
        Err(invalid("name", "Can only contain letters and spaces."))
    }
}

/// Letters, spaces and `. , ' -` (provider names and specialties)
pub fn title_text(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || ".,'-".contains(c))
    {
        Ok(())
    } else {
        Err(invalid(
            "title",
            "Can only contain letters, spaces, periods, commas, apostrophes and hyphens.",
        ))
    }
}

/// Optional leading `+`, then digits, spaces, hyphens and parentheses
pub fn phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || "-()".contains(c))
    {
        Ok(())
    } else {
        Err(invalid("phone", "Phone number format is invalid."))
    }
}

/// Empty, or a well-formed email address
pub fn email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(invalid("email", "Invalid email format."))
    }
}

/// ASCII digits only
pub fn digits(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid("digits", "Can only contain digits."))
    }
}

/// Exactly ten digits
pub fn npi(value: &str) -> Result<(), ValidationError> {
    if value.len() == 10 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid("npi", "NPI must be exactly 10 digits."))
    }
}

/// Male, Female or Other in any case. Blank passes; it means "no filter".
pub fn gender(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || GENDERS.iter().any(|g| g.eq_ignore_ascii_case(value)) {
        Ok(())
    } else {
        Err(invalid(
            "gender",
            "Gender must be either 'Male', 'Female', or 'Other'.",
        ))
    }
}

/// Like [`gender`], but a value is required
pub fn required_gender(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("gender", "Gender is required."));
    }
    gender(value)
}

/// Whole years between `dob` and `today`
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Date of birth for a new or updated member: age between 1 and 120
pub fn check_member_dob(dob: NaiveDate, today: NaiveDate) -> ServiceResult<()> {
    let age = age_on(dob, today);
    if (1..=120).contains(&age) {
        Ok(())
    } else {
        Err(ServiceError::invalid_request(
            "Date of birth must give an age between 1 and 120 years.",
        ))
    }
}

fn check_page(page: &PageRequest, config: &SearchConfig) -> ServiceResult<()> {
    if let Some(number) = page.page_number
        && number < 1
    {
        return Err(ServiceError::invalid_request(
            "Page number must be greater than 0.",
        ));
    }
    if let Some(size) = page.page_size
        && !(1..=i64::from(config.max_page_size)).contains(&size)
    {
        return Err(ServiceError::invalid_request(format!(
            "Page size must be between 1 and {}.",
            config.max_page_size
        )));
    }
    Ok(())
}

/// Validate member search criteria before they reach the search engine
pub fn check_member_criteria(
    criteria: &MemberCriteria,
    config: &SearchConfig,
    today: NaiveDate,
) -> ServiceResult<()> {
    criteria.validate()?;
    check_page(&criteria.page, config)?;

    for (bound, label) in [
        (criteria.dob_from, "Date of birth from"),
        (criteria.dob_to, "Date of birth to"),
    ] {
        if bound.is_some_and(|date| date > today) {
            return Err(ServiceError::invalid_request(format!(
                "{} cannot be in the future.",
                label
            )));
        }
    }
    if let (Some(from), Some(to)) = (criteria.dob_from, criteria.dob_to)
        && to < from
    {
        return Err(ServiceError::invalid_request(
            "Date of birth to must be greater than or equal to date of birth from.",
        ));
    }
    if let (Some(from), Some(to)) = (criteria.age_from, criteria.age_to)
        && to < from
    {
        return Err(ServiceError::invalid_request(
            "Age to must be greater than or equal to age from.",
        ));
    }

    Ok(())
}

/// Validate provider search criteria before they reach the search engine
pub fn check_provider_criteria(
    criteria: &ProviderCriteria,
    config: &SearchConfig,
) -> ServiceResult<()> {
    criteria.validate()?;
    check_page(&criteria.page, config)
}
