//! The notification collaborator.
//!
//! Delivery is fire-and-forget: a failed send must never roll back the
//! operation that triggered it. Callers log the error and move on.

use std::future::Future;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// What an OTP message is for; picks the wording of the outgoing mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
  Verification,
  PasswordReset,
}

/// Outbound, best-effort messaging. Implementations own templating and
/// transport; the core hands over plain fields only.
pub trait Notifier: Send + Sync {
  /// Deliver a one-time code to `email`.
  fn send_otp(
    &self,
    email: &str,
    code: &str,
    purpose: OtpPurpose,
  ) -> impl Future<Output = Result<(), NotifyError>> + Send;

  /// Tell a publisher that `applicant_name` applied to `job_title`.
  fn new_application(
    &self,
    publisher_email: &str,
    job_title: &str,
    applicant_name: &str,
  ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
