use std::{marker::PhantomData, sync::Arc};

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::{
    ConfigError, MeasurementConfig, http_transport::HttpTransport, session::SessionController,
    transport::Transport,
};

pub struct ClientRequired;
pub struct ConfigRequired;
pub struct SetupBuilder;

pub struct SessionSetupBuilder<State = SetupBuilder> {
    transport: Option<Arc<dyn Transport>>,
    config: Option<MeasurementConfig>,
    token: Option<CancellationToken>,
    state: PhantomData<State>,
}

impl<State> SessionSetupBuilder<State> {
    fn into_state<Next>(self) -> SessionSetupBuilder<Next> {
        SessionSetupBuilder {
            transport: self.transport,
            config: self.config,
            token: self.token,
            state: PhantomData::<Next>,
        }
    }

    /// Session cancellation follows `token`: cancelling it stops the session early.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }
}

impl SessionSetupBuilder<ClientRequired> {
    pub(super) fn default() -> Self {
        SessionSetupBuilder {
            transport: None,
            config: None,
            token: None,
            state: PhantomData::<ClientRequired>,
        }
    }

    pub fn client(mut self, client: Client) -> SessionSetupBuilder<ConfigRequired> {
        self.transport = Some(Arc::new(HttpTransport::new(client)));
        self.into_state()
    }

    /// Uses a custom [`Transport`] in place of the HTTP one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> SessionSetupBuilder<ConfigRequired> {
        self.transport = Some(transport);
        self.into_state()
    }
}

impl SessionSetupBuilder<ConfigRequired> {
    pub fn config(mut self, config: MeasurementConfig) -> SessionSetupBuilder<SetupBuilder> {
        self.config = Some(config);
        self.into_state()
    }
}

impl SessionSetupBuilder<SetupBuilder> {
    pub fn build(self) -> Result<SessionController, ConfigError> {
        let (Some(transport), Some(config)) = (self.transport, self.config) else {
            unreachable!("typestate guarantees transport and config are set");
        };
        let token = self
            .token
            .map(|parent| parent.child_token())
            .unwrap_or_default();
        SessionController::with_token(config, transport, token)
    }
}
