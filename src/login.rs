//! The login request generator.
//!
//! Every Goose user runs [`login_transaction`] in a loop: one POST of the JSON
//! credentials per invocation, checked for a `200 OK`. A failed check marks the
//! request as failed in the Goose metrics and the load test carries on.

use goose::goose::GooseResponse;
use goose::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::LoadTestError;

/// Name of the check applied to every login response.
pub const CHECK_NAME: &str = "status is 200";
/// The only status code that passes the check.
pub const EXPECTED_STATUS: u16 = 200;
/// Content type of every request body sent by this load test.
pub const CONTENT_TYPE_JSON: &str = "application/json";

pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";
pub const DEFAULT_REGISTER_PATH: &str = "/auth/register";
pub const DEFAULT_EMAIL: &str = "test@test.com";
pub const DEFAULT_PASSWORD: &str = "test1234";
pub const DEFAULT_NAME: &str = "test";

/// Body of a login request. Fields serialize in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    /// Serialize to the JSON request body, ie `{"email":"...","password":"..."}`.
    pub fn to_body(&self) -> Result<String, LoadTestError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for LoginRequest {
    fn default() -> Self {
        LoginRequest::new(DEFAULT_EMAIL, DEFAULT_PASSWORD)
    }
}

/// Body of a registration request, sent once before the ramp starts when enabled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Register the account `login` authenticates as.
    pub fn for_login(name: &str, login: &LoginRequest) -> Self {
        RegisterRequest {
            name: name.to_string(),
            email: login.email.clone(),
            password: login.password.clone(),
        }
    }

    pub fn to_body(&self) -> Result<String, LoadTestError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Returns true if a response with this status passes the check.
pub fn check_status(status: u16) -> bool {
    status == EXPECTED_STATUS
}

// A JSON POST serialized once and shared read-only by all Goose users.
#[derive(Debug)]
struct JsonPost {
    path: String,
    body: String,
}

async fn send_json_post(
    user: &mut GooseUser,
    post: &JsonPost,
) -> Result<GooseResponse, Box<TransactionError>> {
    let reqwest_request_builder = user
        .get_request_builder(&GooseMethod::Post, &post.path)?
        .header("Content-Type", CONTENT_TYPE_JSON)
        .body(post.body.clone());

    // Requests are named after their path, otherwise Goose names them after the
    // transaction. Metrics are then recorded as "POST {path}".
    let goose_request = GooseRequest::builder()
        .method(GooseMethod::Post)
        .path(post.path.as_str())
        .name(post.path.as_str())
        .set_request_builder(reqwest_request_builder)
        .build();

    user.request(goose_request).await
}

/// Build the transaction posting `login` to `path` and checking for a 200.
pub fn login_transaction(path: &str, login: &LoginRequest) -> Result<Transaction, LoadTestError> {
    let post = Arc::new(JsonPost {
        path: path.to_string(),
        body: login.to_body()?,
    });

    let closure: TransactionFunction = Arc::new(move |user| {
        let post = Arc::clone(&post);
        Box::pin(async move { attempt_login(user, &post).await })
    });

    Ok(Transaction::new(closure).set_name("login"))
}

async fn attempt_login(user: &mut GooseUser, post: &JsonPost) -> TransactionResult {
    let mut goose = send_json_post(user, post).await?;

    match goose.response {
        Ok(response) => {
            let status = response.status();
            if check_status(status.as_u16()) {
                // Drain the body so the connection can be reused, its content is not checked.
                let _ = response.bytes().await;
                return Ok(());
            }

            debug!("{}: {} returned {}", CHECK_NAME, post.path, status);
            // Goose already recorded anything outside 2xx as a failure.
            if !goose.request.success {
                return Ok(());
            }
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            user.set_failure(
                &format!("{}: received {}", CHECK_NAME, status),
                &mut goose.request,
                Some(&headers),
                Some(&body),
            )
        }
        Err(e) => {
            // Transport errors are recorded as failures by Goose itself.
            debug!("{}: {} failed: {}", CHECK_NAME, post.path, e);
            Ok(())
        }
    }
}

/// Build a one-shot transaction registering the login account.
///
/// Intended for `GooseAttack::test_start`. Both `200 OK` and `409 Conflict` (the
/// account already exists) count as success. Anything else is logged and the load
/// test still starts, logins will then fail their check.
pub fn register_transaction(
    path: &str,
    register: &RegisterRequest,
) -> Result<Transaction, LoadTestError> {
    let post = Arc::new(JsonPost {
        path: path.to_string(),
        body: register.to_body()?,
    });
    let email = Arc::new(register.email.clone());

    let closure: TransactionFunction = Arc::new(move |user| {
        let post = Arc::clone(&post);
        let email = Arc::clone(&email);
        Box::pin(async move { register_account(user, &post, &email).await })
    });

    Ok(Transaction::new(closure).set_name("register"))
}

async fn register_account(
    user: &mut GooseUser,
    post: &JsonPost,
    email: &str,
) -> TransactionResult {
    let mut goose = send_json_post(user, post).await?;

    match goose.response {
        Ok(response) => match response.status().as_u16() {
            200 => {
                info!("registered {}", email);
                Ok(())
            }
            409 => {
                info!("{} is already registered", email);
                user.set_success(&mut goose.request)
            }
            status => {
                warn!(
                    "failed to register {}: {} returned {}",
                    email, post.path, status
                );
                Ok(())
            }
        },
        Err(e) => {
            warn!("failed to register {}: {}", email, e);
            Ok(())
        }
    }
}
