//! HTTP clients for the portal backend
use crate::{logging::LogRequestsMiddleware, settings::Settings};
use anyhow::Result;
use reqwest::{Client, Method};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use rx_core::{
    common::{
        AccountDeletionRequest, ApiError, OtpRequest, PrescriptionRequest, ServerMessage,
    },
    otp::OtpCode,
    phone_number::PhoneNumber,
    prescription::Prescription,
};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

const OTP_REQUEST_FALLBACK: &str = "An error occurred while sending the OTP. Please try again.";
const DELETION_FALLBACK: &str = "An error occurred during delete account. Please try again.";
const PRESCRIPTION_FALLBACK: &str =
    "An error occurred while fetching the prescription. Please try again.";

/// The account operations the delete-account flow needs from the backend
#[async_trait::async_trait]
pub trait AccountApi {
    /// Ask the backend to send an OTP to the given phone number
    async fn request_otp(&self, phone_number: &PhoneNumber) -> Result<ServerMessage, ApiError>;

    /// Delete the account belonging to the phone number, authorized by the OTP
    async fn delete_account(
        &self,
        phone_number: &PhoneNumber,
        otp: &OtpCode,
    ) -> Result<ServerMessage, ApiError>;
}

#[async_trait::async_trait]
impl<T: AccountApi + Sync + ?Sized> AccountApi for &T {
    async fn request_otp(&self, phone_number: &PhoneNumber) -> Result<ServerMessage, ApiError> {
        (**self).request_otp(phone_number).await
    }

    async fn delete_account(
        &self,
        phone_number: &PhoneNumber,
        otp: &OtpCode,
    ) -> Result<ServerMessage, ApiError> {
        (**self).delete_account(phone_number, otp).await
    }
}

/// Backend URLs, resolved once against the configured base URL
#[derive(Debug, Clone)]
pub struct Endpoints {
    generate_otp: Url,
    delete_account: Url,
    patient_prescription: Url,
}

impl Endpoints {
    pub fn new(base: &Url) -> Result<Self, url::ParseError> {
        let resolve = |path: &str| {
            Url::parse(&format!(
                "{}/{path}",
                base.as_str().trim_end_matches('/')
            ))
        };

        Ok(Self {
            generate_otp: resolve("api/v1/users/generate-otp/")?,
            delete_account: resolve("api/v1/users/delete-account/")?,
            patient_prescription: resolve("api/v1/prescriptions/patient-prescription/")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: ClientWithMiddleware,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = ClientBuilder::new(Client::new())
            .with(LogRequestsMiddleware)
            .build();

        let endpoints = Endpoints::new(&settings.api_endpoint)?;
        tracing::debug!(?endpoints, "Resolved backend endpoints");

        Ok(Self { client, endpoints })
    }

    /// Fetch the prescription the token refers to
    pub async fn get_prescription(
        &self,
        phone_number: &PhoneNumber,
        token: &str,
    ) -> Result<Prescription, ApiError> {
        let body = PrescriptionRequest {
            token: token.to_string(),
            phone_number: phone_number.clone(),
        };

        match self
            .send_json(
                Method::POST,
                &self.endpoints.patient_prescription,
                &body,
                PRESCRIPTION_FALLBACK,
            )
            .await
        {
            // The prescription lookup only ever shows a single message
            Err(ApiError::Validation(errors)) => {
                tracing::debug!(?errors, "Prescription lookup rejected");
                Err(ApiError::Failure(
                    errors
                        .joined("detail")
                        .unwrap_or_else(|| PRESCRIPTION_FALLBACK.to_string()),
                ))
            }
            other => other,
        }
    }

    /// Send a JSON body and hand back the body of a successful response
    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        url: &Url,
        body: &B,
        fallback: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let response = match self
            .client
            .request(method, url.clone())
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%e, %url, "Couldn't reach the backend");
                return Err(ApiError::Failure(fallback.to_string()));
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%e, ?status, "Couldn't read response body");
                return Err(ApiError::Failure(fallback.to_string()));
            }
        };

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &bytes, fallback));
        }

        Ok(bytes.to_vec())
    }

    /// Like [`ApiClient::send`], for endpoints whose answer must decode into `T`
    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &Url,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let bytes = self.send(method, url, body, fallback).await?;

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(%e, "Couldn't decode successful response");
            ApiError::Failure(fallback.to_string())
        })
    }
}

#[async_trait::async_trait]
impl AccountApi for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn request_otp(&self, phone_number: &PhoneNumber) -> Result<ServerMessage, ApiError> {
        let body = OtpRequest {
            phone_number: phone_number.clone(),
        };

        let response = self
            .send(
                Method::POST,
                &self.endpoints.generate_otp,
                &body,
                OTP_REQUEST_FALLBACK,
            )
            .await?;

        Ok(ServerMessage::from_body(&response))
    }

    #[tracing::instrument(skip(self, otp))]
    async fn delete_account(
        &self,
        phone_number: &PhoneNumber,
        otp: &OtpCode,
    ) -> Result<ServerMessage, ApiError> {
        let body = AccountDeletionRequest {
            phone_number: phone_number.clone(),
            otp: otp.clone(),
        };

        let response = self
            .send(
                Method::DELETE,
                &self.endpoints.delete_account,
                &body,
                DELETION_FALLBACK,
            )
            .await?;

        Ok(ServerMessage::from_body(&response))
    }
}
