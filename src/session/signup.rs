use serde::Deserialize;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignupError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

/// Client-side checks only. Nothing is sent anywhere.
pub fn validate(form: &SignupForm) -> Result<(), SignupError> {
    let fields = [&form.name, &form.email, &form.password, &form.password2];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(SignupError::MissingFields);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SignupError::PasswordTooShort);
    }
    if form.password != form.password2 {
        return Err(SignupError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, p1: &str, p2: &str) -> SignupForm {
        SignupForm {
            name: name.into(),
            email: email.into(),
            password: p1.into(),
            password2: p2.into(),
        }
    }

    #[test]
    fn checks_run_in_order() {
        assert_eq!(
            validate(&form("", "a@b.c", "secret1", "secret1")),
            Err(SignupError::MissingFields)
        );
        assert_eq!(
            validate(&form("Ann", "a@b.c", "abc", "xyz")),
            Err(SignupError::PasswordTooShort)
        );
        assert_eq!(
            validate(&form("Ann", "a@b.c", "secret1", "secret2")),
            Err(SignupError::PasswordMismatch)
        );
        assert_eq!(validate(&form("Ann", "a@b.c", "secret1", "secret1")), Ok(()));
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        assert_eq!(
            validate(&form("Ann", "   ", "secret1", "secret1")),
            Err(SignupError::MissingFields)
        );
    }
}
