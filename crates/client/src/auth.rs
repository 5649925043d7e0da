use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("rejected with status {0}")]
    Rejected(reqwest::StatusCode),
    #[error("no session cookie in login response")]
    MissingCookie,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Read credentials from the terminal, echoing the email and masking the
/// password.
pub fn prompt_credentials() -> io::Result<Credentials> {
    let mut email = String::new();
    print!("Email: ");
    io::stdout().flush()?;
    io::stdin().read_line(&mut email)?;

    print!("Password: ");
    io::stdout().flush()?;
    let password = rpassword::read_password()?;

    Ok(Credentials {
        email: email.trim().to_owned(),
        password,
    })
}

/// An authenticated session: the cookie the login endpoint set, attached
/// verbatim to the socket handshake and the logout call.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub cookie: String,
}

pub struct AuthClient {
    http: reqwest::Client,
    api_base: String,
}

impl AuthClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .post(format!("{}/api/login", self.api_base))
            .json(&LoginRequest {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Rejected(response.status()));
        }

        let cookie = response
            .headers()
            .get(reqwest::header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or(AuthError::MissingCookie)?;

        log::debug!("login succeeded");
        Ok(AuthSession { cookie })
    }

    pub async fn logout(&self, session: &AuthSession) -> Result<(), AuthError> {
        let response = self
            .http
            .post(format!("{}/api/logout", self.api_base))
            .header(reqwest::header::COOKIE, &session.cookie)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Rejected(response.status()));
        }
        Ok(())
    }
}
