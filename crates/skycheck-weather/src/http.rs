use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("skycheck/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by both lookup stages.
///
/// The timeout belongs to the network layer; the stages add none of their own.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}
