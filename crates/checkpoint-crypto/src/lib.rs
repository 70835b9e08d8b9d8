//! # Checkpoint Cryptography
//!
//! Native BLS12-377 primitives used to check that a checkpoint was signed by a
//! quorum of a validator committee. Every operation here has an in-circuit
//! counterpart in `checkpoint-gadgets`; the native versions produce fixtures and
//! act as the reference which the constraints must agree with.

/// BLS signing
pub(crate) mod bls;
pub use bls::{PrivateKey, PublicKey, Signature};

/// Big-endian limb groups <-> field elements
pub mod codec;
pub use codec::LimbLayout;

/// Committee members, stake weights and the committee root
pub mod committee;
pub use committee::{
    has_quorum, select, Committee, CommitteeMember, QUORUM_THRESHOLD, STAKE_BASIS, STAKE_BITS,
};

/// Explicit curve and hash parameters shared by every operation
pub mod context;
pub use context::{CheckpointContext, CHECKPOINT_CONTEXT};

/// Hashing to curve utilities
pub mod hash_to_curve;
pub use hash_to_curve::HashToCurve;

/// Useful hash functions
pub mod hashers;

/// Pedersen hash behind the committee root
pub mod commitment;
pub use commitment::CommitteeHasher;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use thiserror::Error;

/// Convenience result alias
pub type BlsResult<T> = std::result::Result<T, BLSError>;

/// Domain separator for signing checkpoint messages
pub const SIG_DOMAIN: &[u8] = b"CKPTsign";

/// Domain separator for seeding the committee hash generators
pub const COMMITMENT_DOMAIN: &[u8] = b"CKPTroot";

#[derive(Debug, Error)]
/// Error type
pub enum BLSError {
    /// Error
    #[error("signature verification failed")]
    VerificationFailed,
    /// An IO error
    #[error("io error {0}")]
    IoError(#[from] std::io::Error),
    /// Personalization string cannot be larger than 8 bytes
    #[error("domain length is too large: {0}")]
    DomainTooLarge(usize),
    #[error("could not hash to curve")]
    HashToCurveError,
    #[error("expected {expected} limbs, got {got}")]
    LimbCountMismatch { expected: usize, got: usize },
    #[error("limb {index} does not fit in {width} bits")]
    LimbOutOfRange { index: usize, width: usize },
    #[error("malformed committee: {0}")]
    MalformedCommittee(String),
    #[error("committee commitment failed: {0}")]
    CommitmentError(String),
    #[error("{0}")]
    SerializationError(#[from] ark_serialize::SerializationError),
}
