//! Email bodies.

/// Subject and body of the password-reset code email.
pub fn password_reset_otp(first_name: &str, otp: &str, ttl_minutes: i64) -> (String, String) {
    (
        "Verrou - password reset code".to_string(),
        format!(
            "Hello {first_name},\n\n\
             Your password reset code is: {otp}\n\n\
             It expires in {ttl_minutes} minutes. If you did not ask for a reset, \
             you can ignore this email.\n\n\
             The Verrou team"
        ),
    )
}

/// Subject and body of the credentials email sent to admin-created accounts.
pub fn account_created(first_name: &str, email: &str, password: &str) -> (String, String) {
    (
        "Verrou - your account".to_string(),
        format!(
            "Hello {first_name},\n\n\
             An account was created for you on Verrou.\n\n\
             Email: {email}\n\
             Password: {password}\n\n\
             Please change this password after your first login.\n\n\
             The Verrou team"
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_email_contains_code_and_ttl() {
        let (subject, body) = password_reset_otp("Ama", "482913", 10);
        assert!(subject.contains("reset"));
        assert!(body.contains("482913"));
        assert!(body.contains("10 minutes"));
    }

    #[test]
    fn credentials_email_contains_login() {
        let (_, body) = account_created("Kofi", "kofi@verrou.app", "aB3dE5fG");
        assert!(body.contains("kofi@verrou.app"));
        assert!(body.contains("aB3dE5fG"));
    }
}
