use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{
        Mailbox, MultiPart,
        header::{HeaderName, HeaderValue},
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};

use std::time::Duration;

use super::{DeliveryError, DeliveryReceipt, MailTransport, OutgoingMail};
use crate::config::{SmtpAccount, SmtpSecurity};

/// Mail client bound to a single SMTP account.
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

fn parse_address(address: &str) -> Result<Address, DeliveryError> {
    address
        .parse()
        .map_err(|source| DeliveryError::AddressFormat {
            address: address.to_string(),
            source,
        })
}

impl SmtpTransport {
    pub fn new(account: &SmtpAccount) -> Result<Self, DeliveryError> {
        let tls_parameters = || {
            TlsParameters::builder(account.host.clone())
                .dangerous_accept_invalid_certs(account.accept_invalid_certs)
                .build()
                .map_err(DeliveryError::SmtpRelay)
        };

        let tls = match account.security {
            SmtpSecurity::None => Tls::None,
            SmtpSecurity::Opportunistic => Tls::Opportunistic(tls_parameters()?),
            SmtpSecurity::Starttls => Tls::Required(tls_parameters()?),
            SmtpSecurity::Tls => Tls::Wrapper(tls_parameters()?),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&account.host)
            .port(account.port)
            .tls(tls)
            .credentials(Credentials::new(
                account.user.clone(),
                account.pass.clone(),
            ));

        if let Some(secs) = account.timeout_secs {
            builder = builder.timeout(Some(Duration::from_secs(secs)));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    pub fn build_message(mail: &OutgoingMail) -> Result<Message, DeliveryError> {
        let from = Mailbox::new(Some(mail.from_name.clone()), parse_address(&mail.from)?);
        let reply_to = Mailbox::new(None, parse_address(&mail.reply_to)?);
        let to = Mailbox::new(None, parse_address(&mail.to)?);

        let mut builder = Message::builder()
            .from(from)
            .reply_to(reply_to)
            .to(to)
            .subject(mail.subject.clone());

        for (name, value) in &mail.headers {
            builder = builder.raw_header(HeaderValue::new(
                HeaderName::new_from_ascii_str(*name),
                value.clone(),
            ));
        }

        let message = builder.multipart(MultiPart::alternative_plain_html(
            mail.text.clone(),
            mail.html.clone(),
        ))?;

        Ok(message)
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<DeliveryReceipt, DeliveryError> {
        let message = Self::build_message(mail)?;

        let response = self.transport.send(message).await?;

        tracing::info!("Message to {} sent successfully", mail.to);

        Ok(DeliveryReceipt {
            code: response.code().to_string(),
            message: response.message().map(ToString::to_string).collect(),
        })
    }

    async fn verify(&self) -> Result<(), DeliveryError> {
        if self.transport.test_connection().await? {
            Ok(())
        } else {
            Err(DeliveryError::Transport(
                "server did not accept the connection test".to_string(),
            ))
        }
    }
}
