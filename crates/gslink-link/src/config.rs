use std::time::Duration;

/// Link construction parameters.
///
/// Everything the link layer needs is passed here explicitly; there is no
/// ambient or global state, including the shared secret.
#[derive(Clone)]
pub struct LinkConfig {
    /// Shared secret keying the command authentication tag.
    pub key: Vec<u8>,
    /// Inactivity span after which the watchdog declares the link lost.
    pub watchdog_timeout: Duration,
    /// Interval between watchdog checks.
    pub watchdog_interval: Duration,
    /// Read size for stream transports.
    pub read_chunk_size: usize,
    /// Receive buffer size for datagram transports.
    pub datagram_buffer_size: usize,
}

impl LinkConfig {
    /// Default timings with an explicit link key.
    pub fn with_key(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            key: Vec::new(),
            watchdog_timeout: Duration::from_secs(3),
            watchdog_interval: Duration::from_millis(500),
            read_chunk_size: 1024,
            datagram_buffer_size: 2048,
        }
    }
}

impl std::fmt::Debug for LinkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkConfig")
            .field("key", &format_args!("<redacted:{} bytes>", self.key.len()))
            .field("watchdog_timeout", &self.watchdog_timeout)
            .field("watchdog_interval", &self.watchdog_interval)
            .field("read_chunk_size", &self.read_chunk_size)
            .field("datagram_buffer_size", &self.datagram_buffer_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_key_keeps_default_timings() {
        let config = LinkConfig::with_key(b"secret".as_slice());
        assert_eq!(config.key, b"secret");
        assert_eq!(config.watchdog_timeout, LinkConfig::default().watchdog_timeout);
    }

    #[test]
    fn debug_redacts_key() {
        let config = LinkConfig::with_key(b"secret".as_slice());
        let rendered = format!("{config:?}");
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains("secret"));
    }
}
