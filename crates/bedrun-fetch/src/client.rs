use std::time::Duration;

use reqwest::Client;

use crate::error::Result;

/// Builder input for the shared HTTP client.
#[derive(Clone, Debug)]
pub struct ClientSetting {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientSetting {
    fn default() -> Self {
        Self {
            user_agent: concat!("bedrun/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(45),
        }
    }
}

impl ClientSetting {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }

    pub fn build(self) -> Result<Client> {
        let client = Client::builder()
            .user_agent(self.user_agent)
            .connect_timeout(self.timeout)
            // Overall timeout would abort large but healthy downloads, so
            // only reads are bounded.
            .read_timeout(self.timeout)
            .build()?;
        Ok(client)
    }
}
