//! Main rx-cli command line entry points
use crate::{
    client::{AccountApi, ApiClient},
    flow::{DeleteAccountFlow, FlowError, ResendOutcome, OTP_FIELD, PHONE_NUMBER_FIELD},
    logging::setup_tracing,
    paths::config_file,
    render::{phone_prompt, render_prescription},
    settings::Settings,
    timer::format_remaining,
    translations::Language,
};
use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use inquire::ui::RenderConfig;
use rx_core::{first_validation_message, phone_number::PhoneNumber};
use url::Url;

const PHONE_PLACEHOLDER: &str = "01012345678";
const RESEND_KEYWORD: &str = "resend";

#[derive(Debug, Parser)]
#[command(name = "rx")]
#[command(about = "View your prescriptions and manage your rx patient account")]
pub struct Cli {
    #[arg(long, help = "Base URL of the backend, overrides the configured one")]
    api_endpoint: Option<Url>,
    #[arg(long, help = "Whether to turn off ansi terminal colors")]
    no_colors: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Account management commands
    Account(AccountCmds),
    /// Show a prescription you received a link to
    Prescription(PrescriptionCommand),
    /// Print file paths used by the application (e.g. the path to config)
    Paths,
}

#[derive(Debug, Parser)]
pub struct AccountCmds {
    #[command(subcommand)]
    command: AccountCommands,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommands {
    /// Delete your account. An OTP is sent to your phone number to confirm.
    Delete(DeleteCommand),
    /// Enter the OTP for a phone number that already received one
    Verify(VerifyCommand),
}

#[derive(Debug, Parser)]
pub struct DeleteCommand {
    /// Phone number of the account. Prompted for if not provided.
    #[arg(long)]
    phone: Option<String>,
    /// The OTP you received. Prompted for if not provided.
    #[arg(long)]
    otp: Option<String>,
}

#[derive(Debug, Parser)]
pub struct VerifyCommand {
    /// Phone number the OTP was sent to
    phone: String,
    /// The OTP you received. Prompted for if not provided.
    #[arg(long)]
    otp: Option<String>,
}

#[derive(Debug, Parser)]
pub struct PrescriptionCommand {
    /// The token from the prescription link
    token: String,
    /// Your phone number. Prompted for if not provided.
    #[arg(long)]
    phone: Option<String>,
}

impl Cli {
    pub async fn run(&self, mut settings: Settings) -> Result<()> {
        let ansi = !self.no_colors;
        setup_tracing(ansi);

        if let Some(api_endpoint) = &self.api_endpoint {
            settings.api_endpoint = api_endpoint.clone();
        }

        match &self.command {
            Commands::Account(account) => {
                let state = CliState::load(&settings, ansi)?;

                match &account.command {
                    AccountCommands::Delete(delete) => {
                        let flow = state
                            .request_otp(
                                DeleteAccountFlow::new(&state.api),
                                delete.phone.clone(),
                            )
                            .await?;
                        state.confirm_deletion(flow, delete.otp.clone()).await?;
                    }
                    AccountCommands::Verify(verify) => {
                        let phone_number: PhoneNumber = verify
                            .phone
                            .parse()
                            .map_err(|e| anyhow!(first_validation_message(&e)))?;
                        let flow = DeleteAccountFlow::resume(&state.api, phone_number);
                        state.confirm_deletion(flow, verify.otp.clone()).await?;
                    }
                }

                println!("Your account has been deleted successfully");
            }
            Commands::Prescription(prescription) => {
                let state = CliState::load(&settings, ansi)?;
                state
                    .show_prescription(&prescription.token, prescription.phone.clone())
                    .await?;
            }
            Commands::Paths => {
                println!("{}", config_file().display());
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct CliState {
    pub(crate) render_config: RenderConfig,
    pub(crate) api: ApiClient,
}

impl CliState {
    fn load(settings: &Settings, colors: bool) -> Result<Self> {
        let render_config = if colors {
            RenderConfig::default_colored()
        } else {
            RenderConfig::empty()
        };

        let api = ApiClient::new(settings)?;
        tracing::info!(api_endpoint = %settings.api_endpoint, "Using backend");

        Ok(Self { render_config, api })
    }

    /// Phone number step. Re-prompts on errors unless the number was given up front.
    async fn request_otp<A: AccountApi>(
        &self,
        mut flow: DeleteAccountFlow<A>,
        mut phone: Option<String>,
    ) -> Result<DeleteAccountFlow<A>> {
        let scripted = phone.is_some();

        loop {
            let input = match phone.take() {
                Some(phone) => phone,
                None => inquire::Text::new("Enter your phone number to delete your account:")
                    .with_placeholder(PHONE_PLACEHOLDER)
                    .with_render_config(self.render_config)
                    .prompt()?,
            };

            println!("Sending OTP...");

            match flow.submit_phone(&input).await {
                Ok(message) => {
                    tracing::info!(?message, "OTP requested");
                    println!("Successfully requested an OTP.");
                    return Ok(flow);
                }
                Err(e) => {
                    print_form_errors(PHONE_NUMBER_FIELD, &e);
                    if scripted || e.form_errors().is_none() {
                        return Err(e.into());
                    }
                }
            }
        }
    }

    /// OTP step. Typing `resend` asks for a new code once the countdown ran out.
    async fn confirm_deletion<A: AccountApi>(
        &self,
        mut flow: DeleteAccountFlow<A>,
        mut otp: Option<String>,
    ) -> Result<()> {
        let scripted = otp.is_some();

        loop {
            let input = match otp.take() {
                Some(otp) => otp,
                None => self.prompt_otp(&mut flow).await?,
            };

            if input.trim().eq_ignore_ascii_case(RESEND_KEYWORD) {
                match flow.resend().await? {
                    ResendOutcome::NotYetAvailable => {
                        let remaining = flow.countdown().map_or(0, |c| c.seconds_remaining());
                        println!("Resend code in {}", format_remaining(remaining));
                    }
                    ResendOutcome::Sent(_) => println!("A new OTP is on its way."),
                    ResendOutcome::Failed(e) => println!("Couldn't resend the OTP: {e}"),
                }
                continue;
            }

            match flow.submit_otp(&input).await {
                Ok(message) => {
                    tracing::info!(?message, "Account deletion confirmed");
                    return Ok(());
                }
                Err(e) => {
                    print_form_errors(OTP_FIELD, &e);
                    if scripted || e.form_errors().is_none() {
                        return Err(e.into());
                    }
                }
            }
        }
    }

    /// Prompt for the OTP while the resend countdown keeps running
    async fn prompt_otp<A: AccountApi>(&self, flow: &mut DeleteAccountFlow<A>) -> Result<String> {
        let help = match flow.countdown() {
            Some(countdown) if countdown.can_resend() => {
                format!("Type \"{RESEND_KEYWORD}\" to get a new code")
            }
            Some(countdown) => format!(
                "Resend code in {}",
                format_remaining(countdown.seconds_remaining())
            ),
            None => String::new(),
        };
        let render_config = self.render_config;

        let mut prompt = tokio::task::spawn_blocking(move || {
            inquire::Text::new("Enter the OTP sent to your phone number:")
                .with_help_message(&help)
                .with_render_config(render_config)
                .prompt()
        });

        loop {
            tokio::select! {
                answer = &mut prompt => return Ok(answer??),
                resend_ready = flow.tick() => {
                    if resend_ready {
                        println!();
                        println!("You can now type \"{RESEND_KEYWORD}\" to get a new code");
                    }
                }
            }
        }
    }

    async fn show_prescription(&self, token: &str, mut phone: Option<String>) -> Result<()> {
        let scripted = phone.is_some();
        let language = Language::default();

        loop {
            let input = match phone.take() {
                Some(phone) => phone,
                None => {
                    let (heading, label, help) = phone_prompt(language);
                    println!("{heading}");
                    inquire::Text::new(&label)
                        .with_help_message(help)
                        .with_placeholder(PHONE_PLACEHOLDER)
                        .with_render_config(self.render_config)
                        .prompt()?
                }
            };

            let phone_number: PhoneNumber = match input.parse() {
                Ok(phone_number) => phone_number,
                Err(e) => {
                    let message = first_validation_message(&e);
                    println!("  {message}");
                    if scripted {
                        bail!(message);
                    }
                    continue;
                }
            };

            println!("{}", language.strings().loading);

            match self.api.get_prescription(&phone_number, token).await {
                Ok(prescription) => {
                    tracing::info!(id = prescription.id, "Fetched prescription");
                    print!("{}", render_prescription(&prescription));
                    return Ok(());
                }
                Err(e) => {
                    println!("  {e}");
                    if scripted {
                        return Err(e.into());
                    }
                }
            }
        }
    }
}

/// Print the message for the prompted field first, then anything else the backend flagged
fn print_form_errors(field: &str, error: &FlowError) {
    let Some(errors) = error.form_errors() else {
        println!("  {error}");
        return;
    };

    if let Some(message) = errors.get(field) {
        println!("  {message}");
    }
    for (other, message) in errors.iter().filter(|(name, _)| *name != field) {
        println!("  {other}: {message}");
    }
}
