#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unreachable_pub)]

//! rx-core

pub mod common;
pub mod otp;
pub mod phone_number;
pub mod prescription;

use validator::ValidationErrors;

/// Pick the first human readable message out of a set of validation errors.
///
/// Falls back to the error code when a rule didn't provide a message.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_values()
        .flat_map(|errs| errs.iter())
        .map(|err| {
            err.message
                .as_ref()
                .map_or_else(|| err.code.to_string(), |message| message.to_string())
        })
        .next()
        .unwrap_or_else(|| "invalid input".to_string())
}
