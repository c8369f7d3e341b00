use crate::domain::errors::{VacationError, VacationResult};

/// Validates an address and lowercases it for storage and comparison.
pub fn validate_and_normalize_email(email: &str) -> VacationResult<String> {
    let trimmed = email.trim();

    if !email_address::EmailAddress::is_valid(trimmed) {
        return Err(VacationError::Validation(format!(
            "Invalid email address '{}'",
            trimmed
        )));
    }

    // email_address accepts dotless domains; a deliverable address needs a TLD
    let has_tld = trimmed
        .rsplit_once('@')
        .map(|(_, domain)| domain.contains('.'))
        .unwrap_or(false);
    if !has_tld {
        return Err(VacationError::Validation(format!(
            "Email address '{}' has no top-level domain",
            trimmed
        )));
    }

    Ok(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_is_lowercased_and_trimmed() {
        assert_eq!(
            validate_and_normalize_email("  Ana.Silva@Example.COM ").unwrap(),
            "ana.silva@example.com"
        );
    }

    #[test]
    fn test_invalid_emails() {
        for input in ["anaexample.com", "ana@", "ana@example", ""] {
            let err = validate_and_normalize_email(input).unwrap_err();
            assert_eq!(err.code(), "VALIDATION_ERROR", "input: {:?}", input);
        }
    }
}
