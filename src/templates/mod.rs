//! Pure HTML rendering for outbound email.
//!
//! No I/O and no shared state: callers pass the render date in, which keeps
//! the Selected onboarding date math deterministic under test. A blank
//! required field is a contract violation; a half-interpolated document is
//! never produced.

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// Named with the wire-level (camelCase) field name.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Hiring-workflow notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Accepted,
    Rejected,
    Selected,
}

impl EmailKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailKind::Accepted => "accepted",
            EmailKind::Rejected => "rejected",
            EmailKind::Selected => "selected",
        }
    }

    /// Parse a wire-level kind string; `None` for anything unknown.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "accepted" => Some(EmailKind::Accepted),
            "rejected" => Some(EmailKind::Rejected),
            "selected" => Some(EmailKind::Selected),
            _ => None,
        }
    }

    /// Fixed per-kind subject line, interpolating the job title.
    pub fn subject(&self, job_title: &str) -> String {
        match self {
            EmailKind::Accepted => {
                format!("Your Application for {} has been Accepted", job_title)
            }
            EmailKind::Rejected => format!("Update on your application for {}", job_title),
            EmailKind::Selected => format!("Congratulations! You're hired for {}", job_title),
        }
    }
}

/// Typed field set shared by the three hiring templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateFields {
    pub applicant_name: String,
    pub job_title: String,
    pub company_name: String,
    pub contact_email: String,
}

const ACCEPTED_NEXT_STEPS: &str = "Please log in to your account to complete a brief assessment \
     quiz. This will help us move forward in the hiring process.";

/// Render the HTML document for one notification kind.
///
/// `today` is the render-time date: it becomes the application date and, for
/// `Selected`, the base of the onboarding start date (today + 7 days).
pub fn render(
    kind: EmailKind,
    fields: &TemplateFields,
    today: NaiveDate,
) -> Result<String, TemplateError> {
    require(&fields.applicant_name, "applicantName")?;
    require(&fields.job_title, "jobTitle")?;
    require(&fields.company_name, "companyName")?;
    require(&fields.contact_email, "contactEmail")?;

    let application_date = format_long_date(today);

    Ok(match kind {
        EmailKind::Accepted => accepted_email(fields, &application_date),
        EmailKind::Rejected => rejection_email(fields, &application_date),
        EmailKind::Selected => {
            let start_date = format_long_date(today + Duration::days(7));
            selection_email(fields, &start_date)
        }
    })
}

fn require(value: &str, name: &'static str) -> Result<(), TemplateError> {
    if value.trim().is_empty() {
        return Err(TemplateError::MissingField(name));
    }
    Ok(())
}

/// Long-form en-US date, e.g. "November 8, 2024".
pub fn format_long_date(date: NaiveDate) -> String {
    format!("{} {}, {}", date.format("%B"), date.day(), date.year())
}

fn accepted_email(fields: &TemplateFields, application_date: &str) -> String {
    format!(
        r###"<html>
    <body style="font-family: Arial, sans-serif; color: #333;">
        <h2>Application Accepted</h2>
        <p>Dear {applicant_name},</p>
        <p>
            Great news! Your application for the <strong>{job_title}</strong> position
            at <strong>{company_name}</strong>, submitted on {application_date}, has been accepted.
        </p>
        <p><strong>Next steps:</strong> {next_steps}</p>
        <p>
            If you have any questions, contact us at
            <a href="mailto:{contact_email}">{contact_email}</a>.
        </p>
        <p>Best regards,<br/>The {company_name} Hiring Team</p>
    </body>
</html>
"###,
        applicant_name = fields.applicant_name,
        job_title = fields.job_title,
        company_name = fields.company_name,
        application_date = application_date,
        next_steps = ACCEPTED_NEXT_STEPS,
        contact_email = fields.contact_email,
    )
}

fn rejection_email(fields: &TemplateFields, application_date: &str) -> String {
    format!(
        r###"<html>
    <body style="font-family: Arial, sans-serif; color: #333;">
        <h2>Application Update</h2>
        <p>Dear {applicant_name},</p>
        <p>
            Thank you for your application for the <strong>{job_title}</strong> position
            at <strong>{company_name}</strong>, submitted on {application_date}.
        </p>
        <p>
            After careful consideration, we have decided to move forward with other
            candidates at this time. We encourage you to apply for future openings
            that match your skills and experience.
        </p>
        <p>
            If you have any questions, contact us at
            <a href="mailto:{contact_email}">{contact_email}</a>.
        </p>
        <p>Best regards,<br/>The {company_name} Hiring Team</p>
    </body>
</html>
"###,
        applicant_name = fields.applicant_name,
        job_title = fields.job_title,
        company_name = fields.company_name,
        application_date = application_date,
        contact_email = fields.contact_email,
    )
}

fn selection_email(fields: &TemplateFields, start_date: &str) -> String {
    format!(
        r###"<html>
    <body style="font-family: Arial, sans-serif; color: #333;">
        <h2>Welcome to {company_name}!</h2>
        <p>Dear {applicant_name},</p>
        <p>
            Congratulations! You have been selected for the
            <strong>{job_title}</strong> position at <strong>{company_name}</strong>.
        </p>
        <p>We're excited to have you on board! Here are the next steps to get you started:</p>
        <ul>
            <li><strong>Start Date</strong>: {start_date}</li>
            <li><strong>Time</strong>: Please arrive by 9:00 AM</li>
        </ul>
        <p><strong>Please bring the following documents:</strong></p>
        <ul>
            <li>A valid government-issued photo ID</li>
            <li>Completed tax and employment eligibility forms (attached to this email)</li>
            <li>Direct deposit information</li>
        </ul>
        <p><strong>Orientation Schedule:</strong></p>
        <p>
            On your first day, you'll attend a brief orientation session to introduce
            you to our company culture, policies, and your new team.
        </p>
        <p>
            If you have any questions before your start date, feel free to reach out to
            our HR department at <a href="mailto:{contact_email}">{contact_email}</a>.
        </p>
        <p>We look forward to working with you!</p>
        <p>Best regards,<br/>The {company_name} Hiring Team</p>
    </body>
</html>
"###,
        applicant_name = fields.applicant_name,
        job_title = fields.job_title,
        company_name = fields.company_name,
        start_date = start_date,
        contact_email = fields.contact_email,
    )
}

/// Password-reset email (html, plain-text) pair.
pub fn password_reset_email(reset_link: &str, ttl_minutes: i64) -> (String, String) {
    let html = format!(
        r###"<html>
    <body style="font-family: Arial, sans-serif; color: #333;">
        <h2>Password Reset Request</h2>
        <p>We received a request to reset your password. Click the link below to set a new password:</p>
        <p>
            <a href="{reset_link}" style="background-color: #2196F3; color: white; padding: 14px 20px; text-decoration: none; border-radius: 4px;">
                Reset Password
            </a>
        </p>
        <p style="color: #666; font-size: 12px;">
            This link will expire in {ttl_minutes} minutes. If you didn't request this, please ignore this email.
        </p>
    </body>
</html>
"###,
    );

    let plain = format!(
        "Password Reset Request\n\n\
         We received a request to reset your password. Please visit the following link to set a new password:\n\n\
         {reset_link}\n\n\
         This link will expire in {ttl_minutes} minutes. If you didn't request this, please ignore this email.",
    );

    (html, plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> TemplateFields {
        TemplateFields {
            applicant_name: "Jordan Reyes".to_string(),
            job_title: "Backend Engineer".to_string(),
            company_name: "Acme Corp".to_string(),
            contact_email: "hr@acme.example".to_string(),
        }
    }

    fn nov_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 1).unwrap()
    }

    #[test]
    fn long_date_formatting() {
        assert_eq!(format_long_date(nov_first()), "November 1, 2024");
        assert_eq!(
            format_long_date(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()),
            "January 31, 2025"
        );
    }

    #[test]
    fn selected_start_date_is_seven_days_out() {
        let html = render(EmailKind::Selected, &fields(), nov_first()).unwrap();
        assert!(html.contains("November 8, 2024"));
        assert!(html.contains("Please arrive by 9:00 AM"));
        assert!(html.contains("hr@acme.example"));
    }

    #[test]
    fn accepted_defaults_application_date_to_render_day() {
        let html = render(EmailKind::Accepted, &fields(), nov_first()).unwrap();
        assert!(html.contains("November 1, 2024"));
        assert!(html.contains("assessment"));
        assert!(html.contains("Jordan Reyes"));
    }

    #[test]
    fn rejected_mentions_job_and_company() {
        let html = render(EmailKind::Rejected, &fields(), nov_first()).unwrap();
        assert!(html.contains("Backend Engineer"));
        assert!(html.contains("Acme Corp"));
    }

    #[test]
    fn blank_required_field_yields_missing_field_for_every_kind() {
        for kind in [EmailKind::Accepted, EmailKind::Rejected, EmailKind::Selected] {
            let mut f = fields();
            f.contact_email = "   ".to_string();
            assert_eq!(
                render(kind, &f, nov_first()),
                Err(TemplateError::MissingField("contactEmail"))
            );

            let mut f = fields();
            f.applicant_name.clear();
            assert_eq!(
                render(kind, &f, nov_first()),
                Err(TemplateError::MissingField("applicantName"))
            );
        }
    }

    #[test]
    fn subject_lines_interpolate_job_title() {
        assert_eq!(
            EmailKind::Accepted.subject("Backend Engineer"),
            "Your Application for Backend Engineer has been Accepted"
        );
        assert_eq!(
            EmailKind::Rejected.subject("Backend Engineer"),
            "Update on your application for Backend Engineer"
        );
        assert_eq!(
            EmailKind::Selected.subject("Backend Engineer"),
            "Congratulations! You're hired for Backend Engineer"
        );
    }

    #[test]
    fn kind_parsing_is_case_insensitive_and_strict() {
        assert_eq!(EmailKind::parse("Accepted"), Some(EmailKind::Accepted));
        assert_eq!(EmailKind::parse("REJECTED"), Some(EmailKind::Rejected));
        assert_eq!(EmailKind::parse("selected"), Some(EmailKind::Selected));
        assert_eq!(EmailKind::parse("newsletter"), None);
    }

    #[test]
    fn reset_email_carries_link_and_ttl() {
        let (html, plain) = password_reset_email("http://localhost:8000/reset-password?token=abc", 15);
        assert!(html.contains("reset-password?token=abc"));
        assert!(html.contains("15 minutes"));
        assert!(plain.contains("reset-password?token=abc"));
    }
}
