//! [`LogNotifier`] — the shipped [`Notifier`] implementation.
//!
//! Writes every outbound message to the tracing log instead of an SMTP
//! relay. Deployments wanting real mail delivery swap in their own
//! implementation; the handlers only see the trait.

use guild_core::notify::{Notifier, NotifyError, OtpPurpose};

#[derive(Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
  async fn send_otp(
    &self,
    email: &str,
    code: &str,
    purpose: OtpPurpose,
  ) -> Result<(), NotifyError> {
    let subject = match purpose {
      OtpPurpose::Verification => "email verification",
      OtpPurpose::PasswordReset => "password reset",
    };
    tracing::info!(email, code, "otp for {subject}");
    Ok(())
  }

  async fn new_application(
    &self,
    publisher_email: &str,
    job_title: &str,
    applicant_name: &str,
  ) -> Result<(), NotifyError> {
    tracing::info!(
      publisher_email,
      job_title,
      applicant_name,
      "new application received"
    );
    Ok(())
  }
}
