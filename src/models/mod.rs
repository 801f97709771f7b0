//! Validated submissions and the notifications rendered from them.

use std::fmt::Write as _;

use crate::dto::{AppointmentRequest, ContactRequest};

const MISSING_VALUE: &str = "N/A";

/// The form a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Appointment,
    Contact,
}

impl Form {
    pub const fn subject(self) -> &'static str {
        match self {
            Self::Appointment => "New Appointment Booked",
            Self::Contact => "New Contact Us Submission",
        }
    }

    /// Prefix put on the subject of the copy sent to the forward address.
    pub const fn forward_tag(self) -> &'static str {
        match self {
            Self::Appointment => "[Appointment]",
            Self::Contact => "[Contact]",
        }
    }

    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Appointment => "✅ Appointment booked successfully",
            Self::Contact => "✅ Contact form submitted successfully",
        }
    }

    const fn missing_fields_message(self) -> &'static str {
        match self {
            Self::Appointment => "All fields except message are required",
            Self::Contact => "All fields are required",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub form: Form,
    pub message: &'static str,
}

impl ValidationError {
    const fn missing_fields(form: Form) -> Self {
        Self {
            form,
            message: form.missing_fields_message(),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub doctor: String,
    pub time_slot: String,
    pub date: String,
    pub message: Option<String>,
}

impl TryFrom<AppointmentRequest> for AppointmentSubmission {
    type Error = ValidationError;

    fn try_from(request: AppointmentRequest) -> Result<Self, Self::Error> {
        let required = |value| {
            present(value).ok_or(ValidationError::missing_fields(Form::Appointment))
        };

        Ok(Self {
            name: required(request.name)?,
            email: required(request.email)?,
            phone: required(request.phone)?,
            doctor: required(request.doctor)?,
            time_slot: required(request.time_slot)?,
            date: required(request.date)?,
            message: present(request.message),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl TryFrom<ContactRequest> for ContactSubmission {
    type Error = ValidationError;

    fn try_from(request: ContactRequest) -> Result<Self, Self::Error> {
        let required = |value| {
            present(value).ok_or(ValidationError::missing_fields(Form::Contact))
        };

        Ok(Self {
            name: required(request.name)?,
            email: required(request.email)?,
            message: required(request.message)?,
        })
    }
}

/// Subject and bodies of one outgoing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl NotificationMessage {
    /// Same content with the form's tag in front of the subject.
    #[must_use]
    pub fn forwarded(&self, form: Form) -> Self {
        Self {
            subject: format!("{} {}", form.forward_tag(), self.subject),
            ..self.clone()
        }
    }
}

fn render_html(heading: &str, fields: &[(&str, &str)]) -> String {
    let mut html = format!("<h2>{heading}</h2>\n");
    for (label, value) in fields {
        let _ = writeln!(
            html,
            "<p><strong>{label}:</strong> {}</p>",
            htmlescape::encode_minimal(value)
        );
    }
    html
}

impl From<&AppointmentSubmission> for NotificationMessage {
    fn from(s: &AppointmentSubmission) -> Self {
        let message = s.message.as_deref().unwrap_or(MISSING_VALUE);
        let subject = Form::Appointment.subject();

        let text = format!(
            "📅 New Appointment Details:\n\n\
             👤 Name: {}\n\
             📧 Email: {}\n\
             📞 Phone: {}\n\
             👨\u{200d}⚕️ Doctor: {}\n\
             🕒 Time Slot: {}\n\
             📆 Date: {}\n\
             📝 Message: {}",
            s.name, s.email, s.phone, s.doctor, s.time_slot, s.date, message
        );

        let html = render_html(
            subject,
            &[
                ("Name", s.name.as_str()),
                ("Email", s.email.as_str()),
                ("Phone", s.phone.as_str()),
                ("Doctor", s.doctor.as_str()),
                ("Time Slot", s.time_slot.as_str()),
                ("Date", s.date.as_str()),
                ("Message", message),
            ],
        );

        Self {
            subject: subject.to_string(),
            text,
            html,
        }
    }
}

impl From<&ContactSubmission> for NotificationMessage {
    fn from(s: &ContactSubmission) -> Self {
        let subject = Form::Contact.subject();

        let text = format!(
            "📩 New Contact Us Form Submitted:\n\n\
             👤 Name: {}\n\
             📧 Email: {}\n\
             📝 Message: {}",
            s.name, s.email, s.message
        );

        let html = render_html(
            subject,
            &[
                ("Name", s.name.as_str()),
                ("Email", s.email.as_str()),
                ("Message", s.message.as_str()),
            ],
        );

        Self {
            subject: subject.to_string(),
            text,
            html,
        }
    }
}
