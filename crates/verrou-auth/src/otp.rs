//! Password-reset codes.
//!
//! A code is six digits, valid for a configurable number of minutes. A
//! new code can only be emailed once the resend cooldown has elapsed.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use verrou_core::error::AppError;

/// Generate a six-digit code in `100000..=999999`.
pub fn generate_otp() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}

/// Seconds left before another email may be sent, if any.
pub fn resend_wait_seconds(
    last_sent_at: Option<DateTime<Utc>>,
    cooldown_seconds: i64,
    now: DateTime<Utc>,
) -> Option<i64> {
    let last = last_sent_at?;
    let elapsed = (now - last).num_seconds();
    (elapsed < cooldown_seconds).then(|| cooldown_seconds - elapsed)
}

/// Reject the request while the resend cooldown is running.
pub fn ensure_can_resend(
    last_sent_at: Option<DateTime<Utc>>,
    cooldown_seconds: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    match resend_wait_seconds(last_sent_at, cooldown_seconds, now) {
        Some(wait) => Err(AppError::bad_request(format!(
            "Please wait {wait} seconds before requesting a new code"
        ))
        .with_details(serde_json::json!({ "retry_after_seconds": wait }))),
        None => Ok(()),
    }
}

/// Expiry of a code issued at `now`.
pub fn expiry(now: DateTime<Utc>, ttl_minutes: i64) -> DateTime<Utc> {
    now + Duration::minutes(ttl_minutes)
}

/// Compare a submitted code against the stored one.
pub fn verify(
    stored: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
    submitted: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    match stored {
        Some(code) if code == submitted.trim() => {}
        _ => return Err(AppError::bad_request("Invalid OTP")),
    }
    match expires_at {
        Some(expires_at) if expires_at > now => Ok(()),
        _ => Err(AppError::bad_request("Expired OTP")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_otp();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn resend_gate_reports_remaining_seconds() {
        let now = Utc::now();
        assert_eq!(resend_wait_seconds(None, 90, now), None);
        assert_eq!(resend_wait_seconds(Some(now - Duration::seconds(30)), 90, now), Some(60));
        assert_eq!(resend_wait_seconds(Some(now - Duration::seconds(90)), 90, now), None);

        let err = ensure_can_resend(Some(now - Duration::seconds(80)), 90, now).unwrap_err();
        assert!(err.message.contains("10 seconds"));
    }

    #[test]
    fn verify_distinguishes_invalid_and_expired() {
        let now = Utc::now();
        let later = Some(now + Duration::minutes(5));
        assert!(verify(Some("123456"), later, "123456", now).is_ok());
        assert_eq!(verify(Some("123456"), later, "654321", now).unwrap_err().message, "Invalid OTP");
        assert_eq!(verify(None, later, "123456", now).unwrap_err().message, "Invalid OTP");
        let earlier = Some(now - Duration::seconds(1));
        assert_eq!(verify(Some("123456"), earlier, "123456", now).unwrap_err().message, "Expired OTP");
    }
}
