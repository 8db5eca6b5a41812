//! Outbound link to the store's chat channel.

use serde::{Deserialize, Serialize};

/// The external messaging endpoint that receives finished orders.
///
/// The link format is `endpoint + recipient + "?text=" + encoded message`.
/// Delivery is delegated entirely: the obligation here ends at producing a
/// correctly encoded link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffChannel {
    endpoint: String,
    recipient: String,
}

impl HandoffChannel {
    /// Default endpoint (WhatsApp click-to-chat).
    pub const DEFAULT_ENDPOINT: &'static str = "https://wa.me/";

    /// Create a channel. A trailing `/` is added to the endpoint if missing.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, recipient: impl Into<String>) -> Self {
        let mut endpoint = endpoint.into();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        Self {
            endpoint,
            recipient: recipient.into(),
        }
    }

    /// A channel on the default endpoint.
    #[must_use]
    pub fn whatsapp(recipient: impl Into<String>) -> Self {
        Self::new(Self::DEFAULT_ENDPOINT, recipient)
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Build the hand-off link carrying `message`.
    #[must_use]
    pub fn link(&self, message: &str) -> String {
        format!(
            "{}{}?text={}",
            self.endpoint,
            self.recipient,
            urlencoding::encode(message)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_format() {
        let channel = HandoffChannel::whatsapp("573234923424");
        assert_eq!(
            channel.link("hola mundo"),
            "https://wa.me/573234923424?text=hola%20mundo"
        );
    }

    #[test]
    fn test_link_encodes_reserved_and_non_ascii() {
        let channel = HandoffChannel::whatsapp("573234923424");
        let link = channel.link("*TOTAL*: $10 & café\n#1");
        assert_eq!(
            link,
            "https://wa.me/573234923424?text=%2ATOTAL%2A%3A%20%2410%20%26%20caf%C3%A9%0A%231"
        );
    }

    #[test]
    fn test_endpoint_gets_trailing_slash() {
        let channel = HandoffChannel::new("https://chat.example.com/send", "123");
        assert_eq!(channel.endpoint(), "https://chat.example.com/send/");
        assert!(channel.link("x").starts_with("https://chat.example.com/send/123?text="));
    }
}
