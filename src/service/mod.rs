use crate::{
    config::{Config, FormConfig},
    dto::{AppointmentRequest, ContactRequest, MessageResponse},
    mailer::{DeliveryError, MailDispatcher, MailTransport, SmtpTransport},
    models::{AppointmentSubmission, ContactSubmission, Form, NotificationMessage, ValidationError},
};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Mail account and primary recipient serving one form.
#[derive(Clone)]
pub struct FormRoute {
    dispatcher: MailDispatcher,
    recipient: String,
}

impl FormRoute {
    pub const fn new(dispatcher: MailDispatcher, recipient: String) -> Self {
        Self {
            dispatcher,
            recipient,
        }
    }
}

#[derive(Clone)]
pub struct RelayService {
    appointment: FormRoute,
    contact: FormRoute,
    forward_email: String,
}

impl RelayService {
    pub const fn new(appointment: FormRoute, contact: FormRoute, forward_email: String) -> Self {
        Self {
            appointment,
            contact,
            forward_email,
        }
    }

    /// Wires both forms to the given transports using the configured accounts.
    pub fn with_transports(
        config: &Config,
        appointment: Arc<dyn MailTransport>,
        contact: Arc<dyn MailTransport>,
    ) -> Self {
        let route = |form: &FormConfig, transport: Arc<dyn MailTransport>| {
            FormRoute::new(
                MailDispatcher::new(transport, config.sender_name.clone(), form.smtp.user.clone()),
                form.recipient.clone(),
            )
        };

        Self::new(
            route(&config.appointment, appointment),
            route(&config.contact, contact),
            config.forward_email.clone(),
        )
    }

    pub fn from_config(config: &Config) -> Result<Self, DeliveryError> {
        let appointment = SmtpTransport::new(&config.appointment.smtp)?;
        let contact = SmtpTransport::new(&config.contact.smtp)?;

        Ok(Self::with_transports(
            config,
            Arc::new(appointment),
            Arc::new(contact),
        ))
    }

    const fn route(&self, form: Form) -> &FormRoute {
        match form {
            Form::Appointment => &self.appointment,
            Form::Contact => &self.contact,
        }
    }

    /// Checks both accounts once. Failures are logged and otherwise ignored.
    pub async fn verify_connections(&self) {
        for (form, label) in [(Form::Appointment, "Appointment"), (Form::Contact, "Contact")] {
            let dispatcher = &self.route(form).dispatcher;
            match dispatcher.verify().await {
                Ok(()) => tracing::info!(
                    account = dispatcher.account(),
                    "{label} SMTP connected successfully"
                ),
                Err(e) => tracing::error!(
                    account = dispatcher.account(),
                    "{label} SMTP connection failed: {e}"
                ),
            }
        }
    }

    /// Sends the notification to the primary recipient, then a tagged copy to
    /// the forward address. A failed primary send skips the copy.
    async fn relay(&self, form: Form, notification: &NotificationMessage) -> Result<(), DeliveryError> {
        let route = self.route(form);

        let receipt = route
            .dispatcher
            .send(&route.recipient, notification)
            .await
            .inspect_err(|e| tracing::error!("Email sending error: {e}"))?;
        tracing::info!("Email sent successfully: {receipt}");

        let receipt = route
            .dispatcher
            .send(&self.forward_email, &notification.forwarded(form))
            .await
            .inspect_err(|e| tracing::error!("Forward email error: {e}"))?;
        tracing::info!("Forward email sent: {receipt}");

        Ok(())
    }

    pub async fn book_appointment(
        &self,
        request: AppointmentRequest,
    ) -> Result<MessageResponse, SubmissionError> {
        let submission = AppointmentSubmission::try_from(request)?;

        self.relay(Form::Appointment, &NotificationMessage::from(&submission))
            .await?;

        Ok(MessageResponse::new(Form::Appointment.success_message()))
    }

    pub async fn contact_us(
        &self,
        request: ContactRequest,
    ) -> Result<MessageResponse, SubmissionError> {
        let submission = ContactSubmission::try_from(request)?;

        self.relay(Form::Contact, &NotificationMessage::from(&submission))
            .await?;

        Ok(MessageResponse::new(Form::Contact.success_message()))
    }
}
