use anyhow::{Context, Result};
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::Config;
use crate::service::WipReport;

/// SMTP settings for sending reports
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub host: String,
    pub from: String,
    pub credentials: Option<(String, String)>,
}

impl MailSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let host = config
            .smtp_host
            .clone()
            .context("SMTP_HOST must be set to send reports")?;
        let from = config
            .smtp_from
            .clone()
            .context("SMTP_FROM must be set to send reports")?;
        let credentials = match (&config.smtp_username, &config.smtp_password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };

        Ok(Self {
            host,
            from,
            credentials,
        })
    }
}

pub fn default_subject(report: &WipReport) -> String {
    format!("WIP update: {}", report.client_name)
}

/// Plain-text part for clients that do not render HTML
fn plain_summary(report: &WipReport) -> String {
    format!(
        "WIP update for {}\n\n{} active project(s), {} recently completed.\n\nView this email in an HTML-capable client for the full report.",
        report.client_name, report.active_count, report.completed_count
    )
}

/// Build the email carrying `report` as its HTML body
pub fn build_message(
    settings: &MailSettings,
    to: &str,
    subject: &str,
    report: &WipReport,
) -> Result<Message> {
    let html_part = SinglePart::builder()
        .header(header::ContentType::parse(mime::TEXT_HTML_UTF_8.as_ref())?)
        .body(report.html.clone());

    let email = Message::builder()
        .from(settings.from.parse().context("invalid sender address")?)
        .to(to.parse().context("invalid recipient address")?)
        .subject(subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(plain_summary(report)))
                .singlepart(html_part),
        )?;

    Ok(email)
}

/// Send `message` over SMTP. The transport blocks, so it runs off the async runtime.
pub async fn send(settings: &MailSettings, message: Message) -> Result<()> {
    let mut builder = SmtpTransport::relay(&settings.host)?;
    if let Some((user, pass)) = &settings.credentials {
        builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
    }
    let mailer = builder.build();

    tokio::task::spawn_blocking(move || mailer.send(&message))
        .await
        .context("mail task panicked")?
        .context("failed to send email")?;

    Ok(())
}
