//! Run via `cargo test -p rx-cli --test integration`
use crate::{
    cli::{run, rx, CLI_BIN},
    server::{ok, prescription, status, Backend, DELETE_ACCOUNT, GENERATE_OTP, PATIENT_PRESCRIPTION},
};
use assert_cmd::assert::OutputAssertExt as _;
use pretty_assertions::assert_eq;
use predicates::{boolean::PredicateBooleanExt as _, str::contains};
use serde_json::json;
use std::process::Command;
use testresult::TestResult;
use wiremock::ResponseTemplate;

mod server;

#[test_log::test]
fn test_cli_helptext() -> TestResult {
    Command::new(CLI_BIN.as_os_str())
        .arg("--no-colors")
        .arg("help")
        .assert()
        .try_success()?
        .try_stdout(contains("rx"))?
        .try_stdout(contains("account"))?
        .try_stdout(contains("prescription"))?
        .try_stdout(contains("paths"))?
        .try_stdout(contains("--api-endpoint"))?
        .try_stdout(contains("--no-colors"))?;

    Ok(())
}

#[test_log::test]
fn test_cli_account_helptext() -> TestResult {
    Command::new(CLI_BIN.as_os_str())
        .arg("--no-colors")
        .arg("account")
        .arg("--help")
        .assert()
        .try_success()?
        .try_stdout(contains("delete"))?
        .try_stdout(contains("verify"))?
        .try_stdout(contains("help"))?;

    Ok(())
}

#[test_log::test]
fn test_cli_paths() -> TestResult {
    Command::new(CLI_BIN.as_os_str())
        .arg("--no-colors")
        .arg("paths")
        .assert()
        .try_success()?
        .try_stdout(contains("config.toml"))?;

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn test_account_delete_scripted() -> TestResult {
    let backend = Backend::start().await;
    backend
        .expect(
            "POST",
            GENERATE_OTP,
            json!({ "phone_number": "01012345678" }),
            ok(json!({ "message": "OTP sent" })),
        )
        .await;
    backend
        .expect(
            "DELETE",
            DELETE_ACCOUNT,
            json!({ "phone_number": "01012345678", "otp": "123456" }),
            ok(json!({ "message": "Account deleted", "status": "success", "code": 200 })),
        )
        .await;

    let mut cmd = rx(&backend.uri());
    cmd.args(["account", "delete", "--phone", "01012345678", "--otp", "123456"]);

    run(cmd)
        .await?
        .assert()
        .try_success()?
        .try_stdout(contains("Successfully requested an OTP"))?
        .try_stdout(contains("Your account has been deleted successfully"))?;

    assert_eq!(
        backend.requests().await,
        vec![
            format!("POST {GENERATE_OTP}"),
            format!("DELETE {DELETE_ACCOUNT}"),
        ]
    );
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn test_invalid_phone_sends_nothing() -> TestResult {
    let backend = Backend::start().await;

    let mut cmd = rx(&backend.uri());
    cmd.args(["account", "delete", "--phone", "123", "--otp", "123456"]);

    run(cmd)
        .await?
        .assert()
        .try_failure()?
        .try_stdout(contains("Invalid Egyptian phone number"))?
        .try_stdout(contains("deleted successfully").not())?;

    assert!(backend.requests().await.is_empty());
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn test_short_otp_is_not_sent() -> TestResult {
    let backend = Backend::start().await;
    backend
        .answer("POST", GENERATE_OTP, ok(json!({ "message": "OTP sent" })))
        .await;

    let mut cmd = rx(&backend.uri());
    cmd.args(["account", "delete", "--phone", "01012345678", "--otp", "123"]);

    run(cmd)
        .await?
        .assert()
        .try_failure()?
        .try_stdout(contains("OTP must be 6 digits"))?;

    assert_eq!(backend.requests().await, vec![format!("POST {GENERATE_OTP}")]);
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn test_rejected_otp_shows_field_error() -> TestResult {
    let backend = Backend::start().await;
    backend
        .answer("POST", GENERATE_OTP, ok(json!({ "message": "OTP sent" })))
        .await;
    backend
        .answer(
            "DELETE",
            DELETE_ACCOUNT,
            status(400, json!({ "otp": ["Invalid or expired OTP"] })),
        )
        .await;

    let mut cmd = rx(&backend.uri());
    cmd.args(["account", "delete", "--phone", "01012345678", "--otp", "000000"]);

    run(cmd)
        .await?
        .assert()
        .try_failure()?
        .try_stdout(contains("Invalid or expired OTP"))?
        .try_stdout(contains("deleted successfully").not())?;

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn test_otp_request_server_error_uses_fallback() -> TestResult {
    let backend = Backend::start().await;
    backend
        .answer("POST", GENERATE_OTP, ResponseTemplate::new(500))
        .await;

    let mut cmd = rx(&backend.uri());
    cmd.args(["account", "delete", "--phone", "01012345678", "--otp", "123456"]);

    run(cmd)
        .await?
        .assert()
        .try_failure()?
        .try_stdout(contains(
            "An error occurred while sending the OTP. Please try again.",
        ))?;

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn test_account_verify_skips_otp_request() -> TestResult {
    let backend = Backend::start().await;
    backend
        .expect(
            "DELETE",
            DELETE_ACCOUNT,
            json!({ "phone_number": "01512345678", "otp": "654321" }),
            ok(json!({ "message": "Account deleted" })),
        )
        .await;

    // The backend comes from the environment this time
    let mut cmd = Command::new(CLI_BIN.as_os_str());
    cmd.env("RX_API_ENDPOINT", backend.uri())
        .args(["--no-colors", "account", "verify", "01512345678", "--otp", "654321"]);

    run(cmd)
        .await?
        .assert()
        .try_success()?
        .try_stdout(contains("Your account has been deleted successfully"))?;

    assert_eq!(backend.requests().await, vec![format!("DELETE {DELETE_ACCOUNT}")]);
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn test_prescription_is_rendered() -> TestResult {
    let backend = Backend::start().await;
    backend
        .expect(
            "POST",
            PATIENT_PRESCRIPTION,
            json!({ "token": "abc123", "phone_number": "01012345678" }),
            ok(prescription("en")),
        )
        .await;

    let mut cmd = rx(&backend.uri());
    cmd.args(["prescription", "abc123", "--phone", "01012345678"]);

    run(cmd)
        .await?
        .assert()
        .try_success()?
        .try_stdout(contains("Medical Prescription"))?
        .try_stdout(contains("Issued on 2025-05-10"))?
        .try_stdout(contains("Hypertension"))?
        .try_stdout(contains("#1 Concor 5mg tablets"))?;

    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn test_prescription_not_found() -> TestResult {
    let backend = Backend::start().await;
    backend
        .answer(
            "POST",
            PATIENT_PRESCRIPTION,
            status(404, json!({ "detail": "Prescription not found" })),
        )
        .await;

    let mut cmd = rx(&backend.uri());
    cmd.args(["prescription", "abc123", "--phone", "01012345678"]);

    run(cmd)
        .await?
        .assert()
        .try_failure()?
        .try_stdout(contains("Prescription not found"))?;

    Ok(())
}
