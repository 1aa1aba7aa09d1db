use api_types::{
    Payload,
    user::{AuthResult, LoginRequest, RegisterRequest, User},
};
use reqwest::Method;

use crate::{Client, error::Result};

impl Client {
    /// `POST /User/login`. On success the token is stored in the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult> {
        let req = self.request(Method::POST, "User/login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });
        let auth = self.send::<Payload<AuthResult>>(req).await?.into_inner();
        self.session().set(&auth.token)?;
        tracing::info!(user = %auth.user.user_name, "logged in");
        Ok(auth)
    }

    /// `POST /User/register`.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<()> {
        let req = self.request(Method::POST, "User/register").json(payload);
        self.send_unit(req).await
    }

    /// `GET /User/me`.
    pub async fn me(&self) -> Result<User> {
        let req = self.request(Method::GET, "User/me");
        Ok(self.send::<Payload<User>>(req).await?.into_inner())
    }

    /// Drops the token from the session (and its persisted copy).
    pub fn logout(&self) -> Result<()> {
        tracing::info!("logged out");
        self.session().clear()
    }

    /// Resolves the current user from a saved token.
    ///
    /// Returns `None` without calling the server when there is no token. Any
    /// failure clears the token: the user is then treated as logged out.
    pub async fn prime(&self) -> Option<User> {
        if !self.session().is_authenticated() {
            return None;
        }
        match self.me().await {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!("session priming failed, clearing token: {err}");
                if let Err(err) = self.session().clear() {
                    tracing::warn!("failed to clear stored token: {err}");
                }
                None
            }
        }
    }
}
