use checkpoint_crypto::LimbLayout;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
/// Error raised for circuit shapes which cannot be built
pub enum ConfigError {
    #[error("the committee must have at least one member")]
    EmptyCommittee,
    #[error("messages are carried in 1 or 2 limb groups, got {0}")]
    InvalidMessageGroups(usize),
}

/// Shape of a committee signature circuit. Proving keys are specific to a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CircuitConfig {
    /// Committee size
    pub num_members: usize,
    /// Limb layout of each message group
    pub layout: LimbLayout,
    /// Number of limb groups the message is expanded to
    pub message_groups: usize,
}

impl CircuitConfig {
    /// Committee of `num_members` signing messages expanded to two 512-bit groups
    pub fn new(num_members: usize) -> Self {
        CircuitConfig {
            num_members,
            layout: LimbLayout::Expanded512,
            message_groups: 2,
        }
    }

    pub fn with_layout(mut self, layout: LimbLayout, message_groups: usize) -> Self {
        self.layout = layout;
        self.message_groups = message_groups;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_members == 0 {
            return Err(ConfigError::EmptyCommittee);
        }
        if self.message_groups == 0 || self.message_groups > 2 {
            return Err(ConfigError::InvalidMessageGroups(self.message_groups));
        }
        Ok(())
    }

    /// Limbs carried by the message groups
    pub fn num_message_limbs(&self) -> usize {
        self.message_groups * self.layout.num_limbs()
    }

    /// Message limbs, committee root and signed stake
    pub fn num_public_inputs(&self) -> usize {
        self.num_message_limbs() + 2
    }
}
