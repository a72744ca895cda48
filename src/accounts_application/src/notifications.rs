//! Outgoing mail: askama templates for every message the service sends and
//! a best-effort delivery helper.

use accounts_core::{Email, EmailClient, OtpPurpose};
use askama::Template;

pub const WELCOME_SUBJECT: &str = "Welcome to our platform!";
pub const REGISTER_CODE_SUBJECT: &str = "Your verification code";
pub const RESET_CODE_SUBJECT: &str = "Your password reset code";

#[derive(Template)]
#[template(
    ext = "txt",
    source = "Hello {{ first_name }},

Thank you for signing up. Your account has been created successfully.

To verify your email address, enter the following code: {{ code }}
This code is valid for {{ valid_for_minutes }} minutes.

Best regards,
The team"
)]
pub struct WelcomeEmail<'a> {
    pub first_name: &'a str,
    pub code: &'a str,
    pub valid_for_minutes: i64,
}

#[derive(Template)]
#[template(
    ext = "txt",
    source = "Hello {{ first_name }},

{{ reason }}: {{ code }}
This code is valid for {{ valid_for_minutes }} minutes. If you did not ask for it, you can ignore this email.

Best regards,
The team"
)]
pub struct OtpEmail<'a> {
    pub first_name: &'a str,
    pub reason: &'a str,
    pub code: &'a str,
    pub valid_for_minutes: i64,
}

impl<'a> OtpEmail<'a> {
    pub fn new(first_name: &'a str, purpose: OtpPurpose, code: &'a str, valid_for_minutes: i64) -> Self {
        let reason = match purpose {
            OtpPurpose::Register => "Your email verification code is",
            OtpPurpose::ResetPassword => "Your password reset code is",
        };
        Self {
            first_name,
            reason,
            code,
            valid_for_minutes,
        }
    }

    pub fn subject(purpose: OtpPurpose) -> &'static str {
        match purpose {
            OtpPurpose::Register => REGISTER_CODE_SUBJECT,
            OtpPurpose::ResetPassword => RESET_CODE_SUBJECT,
        }
    }
}

/// Render `template` and hand it to the email client.
///
/// Failures are logged and swallowed: mail never decides the outcome of the
/// operation that triggered it.
pub async fn deliver<E, T>(email_client: &E, recipient: &Email, subject: &str, template: &T)
where
    E: EmailClient,
    T: Template + Sync,
{
    let content = match template.render() {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(error = %e, subject, "Failed to render email");
            return;
        }
    };

    if let Err(e) = email_client.send_email(recipient, subject, &content).await {
        tracing::error!(error = %e, subject, "Failed to send email");
    }
}
