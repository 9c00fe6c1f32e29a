use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use contact_core::{
    load_settings, ContactFormClient, FixedTokenWidget, SubmissionsClient,
};
use shared::domain::{FormField, SubmissionId, SubmissionStatus};

#[derive(Parser, Debug)]
struct Cli {
    /// Collection endpoint; overrides contact.toml and CONTACT_API_URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Widget site key; overrides contact.toml and CONTACT_SITE_KEY.
    #[arg(long)]
    site_key: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a submission and send it to the collection endpoint.
    Submit {
        name: String,
        email: String,
        subject: String,
        message: String,
        /// Verification token issued by the bot-deterrence widget.
        #[arg(long)]
        captcha_token: Option<String>,
    },
    /// List stored submissions.
    List,
    /// Show one stored submission in full.
    Show { id: SubmissionId },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let mut config = load_settings();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(site_key) = cli.site_key {
        config.site_key = site_key;
    }
    tracing::debug!(api_url = %config.api_url, "resolved configuration");

    match cli.command {
        Command::Submit {
            name,
            email,
            subject,
            message,
            captcha_token,
        } => {
            let widget = match captcha_token {
                Some(token) => FixedTokenWidget::new(token),
                None => FixedTokenWidget::absent(),
            };
            let mut client = ContactFormClient::new(config, widget);
            client.update_field(FormField::Name, name);
            client.update_field(FormField::Email, email);
            client.update_field(FormField::Subject, subject);
            client.update_field(FormField::Message, message);

            match client.submit().await {
                SubmissionStatus::Success => {
                    println!("submission accepted");
                    Ok(())
                }
                SubmissionStatus::Error => {
                    Err(anyhow!("collection service did not accept the submission"))
                }
                SubmissionStatus::Idle | SubmissionStatus::Loading => {
                    for field in [
                        FormField::Name,
                        FormField::Email,
                        FormField::Subject,
                        FormField::Message,
                        FormField::Recaptcha,
                    ] {
                        if let Some(message) = client.state.errors.get(&field) {
                            eprintln!("{}: {message}", field.as_str());
                        }
                    }
                    Err(anyhow!("submission blocked by validation"))
                }
            }
        }
        Command::List => {
            let client = SubmissionsClient::new(&config);
            let records = client.fetch_all().await?;
            if records.is_empty() {
                println!("no submissions yet");
                return Ok(());
            }
            for record in &records {
                println!(
                    "{}  {}  {}  {}",
                    record.id,
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                    record.name,
                    record.subject
                );
            }
            Ok(())
        }
        Command::Show { id } => {
            let client = SubmissionsClient::new(&config);
            let records = client.fetch_all().await?;
            let record = records
                .into_iter()
                .find(|record| record.id == id)
                .ok_or_else(|| anyhow!("no submission with id {id}"))?;
            println!("Name:    {}", record.name);
            println!("Email:   {}", record.email);
            println!("Subject: {}", record.subject);
            println!("Date:    {}", record.timestamp.format("%d %b %Y, %H:%M"));
            println!("Message: {}", record.message);
            Ok(())
        }
    }
}
