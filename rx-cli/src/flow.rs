//! The delete-account flow: phone number, then OTP, then done.
//!
//! ```text
//! EnteringPhone --OTP sent--> AwaitingOtp --account deleted--> Deleted
//!                              |      ^
//!                              +------+ resend (once the countdown ran out)
//! ```
//!
//! There's no way back from `AwaitingOtp` to `EnteringPhone`.
use crate::{
    client::AccountApi,
    timer::{Countdown, OtpTimer},
};
use rx_core::{
    common::{ApiError, ServerMessage},
    first_validation_message,
    otp::OtpCode,
    phone_number::PhoneNumber,
};
use std::collections::BTreeMap;

/// Form field carrying the phone number
pub const PHONE_NUMBER_FIELD: &str = "phone_number";
/// Form field carrying the OTP
pub const OTP_FIELD: &str = "otp";

/// Snapshot of where the flow is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    EnteringPhone,
    AwaitingOtp {
        phone_number: PhoneNumber,
        seconds_remaining: u32,
        can_resend: bool,
    },
    Deleted,
}

#[derive(Debug)]
enum Stage {
    EnteringPhone,
    AwaitingOtp {
        phone_number: PhoneNumber,
        timer: OtpTimer,
    },
    Deleted,
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::EnteringPhone => "entering phone number",
            Stage::AwaitingOtp { .. } => "awaiting OTP",
            Stage::Deleted => "deleted",
        }
    }
}

/// One display message per form field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    fn single(field: &str, message: impl Into<String>) -> Self {
        Self(BTreeMap::from([(field.to_string(), message.into())]))
    }

    /// Spread an API error over the form.
    ///
    /// The field the current step owns always gets a message: its own
    /// field error if the backend sent one, the general message otherwise.
    fn from_api(field: &str, error: &ApiError) -> Self {
        let mut errors = BTreeMap::new();

        if let Some(field_errors) = error.field_errors() {
            for (name, messages) in field_errors.iter() {
                if !messages.is_empty() {
                    errors.insert(name.to_string(), messages.join(", "));
                }
            }
        }

        errors
            .entry(field.to_string())
            .or_insert_with(|| error.to_string());

        Self(errors)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    /// Rejected locally, nothing was sent
    #[error("{0}")]
    Invalid(FormErrors),
    /// The backend said no, or couldn't be reached
    #[error("{errors}")]
    Rejected {
        errors: FormErrors,
        #[source]
        source: ApiError,
    },
    #[error("Can't {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
}

impl FlowError {
    fn rejected(field: &str, source: ApiError) -> Self {
        Self::Rejected {
            errors: FormErrors::from_api(field, &source),
            source,
        }
    }

    /// Per-field messages to show under the inputs
    pub fn form_errors(&self) -> Option<&FormErrors> {
        match self {
            Self::Invalid(errors) | Self::Rejected { errors, .. } => Some(errors),
            Self::InvalidState { .. } => None,
        }
    }
}

/// What happened when the user asked for a new OTP
#[derive(Debug, Clone, PartialEq)]
pub enum ResendOutcome {
    /// The countdown hasn't run out yet, nothing was sent
    NotYetAvailable,
    Sent(ServerMessage),
    /// The request failed. The countdown was restarted anyway.
    Failed(ApiError),
}

/// Drives a single account deletion.
///
/// Every step takes `&mut self` across its request, so only one
/// request can be in flight per flow.
#[derive(Debug)]
pub struct DeleteAccountFlow<A> {
    api: A,
    stage: Stage,
}

impl<A: AccountApi> DeleteAccountFlow<A> {
    /// Start at the phone number step
    pub fn new(api: A) -> Self {
        Self {
            api,
            stage: Stage::EnteringPhone,
        }
    }

    /// Start at the OTP step for a phone number that was already sent an OTP
    pub fn resume(api: A, phone_number: PhoneNumber) -> Self {
        tracing::info!(%phone_number, "Resuming delete-account flow at OTP entry");
        Self {
            api,
            stage: Stage::AwaitingOtp {
                phone_number,
                timer: OtpTimer::start(),
            },
        }
    }

    pub fn state(&self) -> FlowState {
        match &self.stage {
            Stage::EnteringPhone => FlowState::EnteringPhone,
            Stage::AwaitingOtp {
                phone_number,
                timer,
            } => {
                let countdown = timer.countdown();
                FlowState::AwaitingOtp {
                    phone_number: phone_number.clone(),
                    seconds_remaining: countdown.seconds_remaining(),
                    can_resend: countdown.can_resend(),
                }
            }
            Stage::Deleted => FlowState::Deleted,
        }
    }

    /// The resend countdown, while waiting for an OTP
    pub fn countdown(&self) -> Option<Countdown> {
        match &self.stage {
            Stage::AwaitingOtp { timer, .. } => Some(timer.countdown()),
            _ => None,
        }
    }

    /// Validate the phone number and request an OTP for it
    pub async fn submit_phone(&mut self, input: &str) -> Result<ServerMessage, FlowError> {
        if !matches!(self.stage, Stage::EnteringPhone) {
            return Err(self.invalid_state("submit a phone number"));
        }

        let phone_number: PhoneNumber = input.parse().map_err(|e| {
            FlowError::Invalid(FormErrors::single(
                PHONE_NUMBER_FIELD,
                first_validation_message(&e),
            ))
        })?;

        tracing::info!(%phone_number, "Requesting OTP");

        match self.api.request_otp(&phone_number).await {
            Ok(message) => {
                tracing::info!(%phone_number, "OTP requested, awaiting code");
                self.stage = Stage::AwaitingOtp {
                    phone_number,
                    timer: OtpTimer::start(),
                };
                Ok(message)
            }
            Err(e) => {
                tracing::warn!(%e, "OTP request failed");
                Err(FlowError::rejected(PHONE_NUMBER_FIELD, e))
            }
        }
    }

    /// Confirm the deletion with the OTP the user received
    pub async fn submit_otp(&mut self, input: &str) -> Result<ServerMessage, FlowError> {
        let Stage::AwaitingOtp { phone_number, .. } = &self.stage else {
            return Err(self.invalid_state("submit an OTP"));
        };

        let otp: OtpCode = input.parse().map_err(|e| {
            FlowError::Invalid(FormErrors::single(OTP_FIELD, first_validation_message(&e)))
        })?;

        tracing::info!(%phone_number, "Confirming account deletion");

        match self.api.delete_account(phone_number, &otp).await {
            Ok(message) => {
                tracing::info!(%phone_number, "Account deleted");
                // Drops the timer along with the stage
                self.stage = Stage::Deleted;
                Ok(message)
            }
            Err(e) => {
                tracing::warn!(%e, "Account deletion failed");
                Err(FlowError::rejected(OTP_FIELD, e))
            }
        }
    }

    /// Send a new OTP to the stored phone number, if the countdown allows it
    pub async fn resend(&mut self) -> Result<ResendOutcome, FlowError> {
        let Stage::AwaitingOtp {
            phone_number,
            timer,
        } = &mut self.stage
        else {
            return Err(self.invalid_state("resend an OTP"));
        };

        if !timer.countdown().can_resend() {
            tracing::debug!("Resend requested before the countdown ran out");
            return Ok(ResendOutcome::NotYetAvailable);
        }

        tracing::info!(%phone_number, "Resending OTP");
        let result = self.api.request_otp(phone_number).await;
        timer.reset();

        Ok(match result {
            Ok(message) => ResendOutcome::Sent(message),
            Err(e) => {
                tracing::warn!(%e, "Resending OTP failed");
                ResendOutcome::Failed(e)
            }
        })
    }

    /// Wait for the next second of the resend countdown.
    ///
    /// Returns `true` once, for the second resending becomes possible.
    /// Pending forever outside of the OTP step or once the countdown ran out,
    /// so it's safe to `select!` on in an input loop.
    pub async fn tick(&mut self) -> bool {
        match &mut self.stage {
            Stage::AwaitingOtp { timer, .. } => timer.tick().await,
            _ => std::future::pending().await,
        }
    }

    fn invalid_state(&self, action: &'static str) -> FlowError {
        FlowError::InvalidState {
            action,
            state: self.stage.name(),
        }
    }
}
