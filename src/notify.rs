use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Out-of-band delivery of verification codes. Real gateways (Twilio, an
/// SMTP relay) slot in behind this; the verification service only ever sees
/// `send`.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, address: &str, message: &str) -> anyhow::Result<()>;
}

/// Mock SMS gateway: logs the message instead of delivering it. Delivery
/// latency is modeled as a detached sleep so the request path never waits
/// on it.
pub struct MockSmsGateway;

#[async_trait]
impl Notifier for MockSmsGateway {
    async fn send(&self, address: &str, message: &str) -> anyhow::Result<()> {
        info!(channel = "sms", %address, %message, "mock delivery");
        tokio::spawn(tokio::time::sleep(Duration::from_millis(500)));
        Ok(())
    }
}

/// Mock email gateway, same shape as [`MockSmsGateway`].
pub struct MockEmailGateway;

#[async_trait]
impl Notifier for MockEmailGateway {
    async fn send(&self, address: &str, message: &str) -> anyhow::Result<()> {
        info!(channel = "email", %address, %message, "mock delivery");
        tokio::spawn(tokio::time::sleep(Duration::from_millis(500)));
        Ok(())
    }
}

#[cfg(test)]
pub mod doubles {
    use super::*;
    use std::sync::Mutex;

    /// Test double that records every message it is asked to deliver.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, address: &str, message: &str) -> anyhow::Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((address.to_string(), message.to_string()));
            Ok(())
        }
    }

    /// Test double whose deliveries always fail.
    pub struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _address: &str, _message: &str) -> anyhow::Result<()> {
            anyhow::bail!("gateway unreachable")
        }
    }
}
