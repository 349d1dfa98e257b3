//! Login, registration and logout on top of the gateway and session store

use crate::client::ShopClient;
use crate::client::error::ClientError;
use crate::types::{Credentials, LoginGrant};
use serde_json::Value;
use shop_core::{Session, SessionStore};
use std::sync::Arc;
use tracing::debug;

/// Authentication service
///
/// `client` should be built over the same `session` so that tokens granted
/// here are attached to later requests.
#[derive(Clone, Debug)]
pub struct AuthService {
    client: ShopClient,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub const fn new(client: ShopClient, session: Arc<SessionStore>) -> Self {
        Self { client, session }
    }

    /// Build the client and the service over one session store
    pub fn connect(
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
    ) -> Result<Self, ClientError> {
        let client = ShopClient::new(base_url, session.clone())?;
        Ok(Self::new(client, session))
    }

    pub const fn client(&self) -> &ShopClient {
        &self.client
    }

    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Log in and record the granted token, role and submitted username
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let response = self.client.login(credentials).await?;
        let grant = LoginGrant::from_response(&response)?;
        debug!(username = %credentials.username, role = %grant.role, "Login granted");

        self.session
            .login(&grant.token, grant.role, &credentials.username)?;
        Ok(self.session.snapshot())
    }

    /// Create an account; does not log in
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<Value, ClientError> {
        self.client.register(credentials).await
    }

    pub fn sign_out(&self) {
        self.session.logout();
    }
}
