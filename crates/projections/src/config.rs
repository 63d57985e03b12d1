//! Projector settings.

/// Tunables for the courier order projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectorConfig {
    /// Skip redelivered events and reject out-of-order ones, based on the
    /// sequence number stored with each record. When off, sequence numbers
    /// are recorded but never checked.
    pub enforce_sequence: bool,

    /// Number of pending updates buffered per watched order before slow
    /// subscribers start missing emissions.
    pub subscription_buffer: usize,
}

impl ProjectorConfig {
    pub const DEFAULT_SUBSCRIPTION_BUFFER: usize = 64;

    pub fn lenient() -> Self {
        Self {
            enforce_sequence: false,
            ..Self::default()
        }
    }

    pub fn with_subscription_buffer(mut self, buffer: usize) -> Self {
        self.subscription_buffer = buffer.max(1);
        self
    }
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            enforce_sequence: true,
            subscription_buffer: Self::DEFAULT_SUBSCRIPTION_BUFFER,
        }
    }
}
