//! # Committee Checkpoint SNARK
//!
//! Proves that a checkpoint message was signed by a quorum of a known validator committee.
//!
//! The statement of the proof is the message (as hash-to-field limb groups), the root
//! committing to the ordered committee and the stake units behind the signers. The circuit
//! checks that:
//!
//! - the committee (public keys and stakes) hashes to the root,
//! - the signer bitmap is well formed and its signers hold at least 6667 of the 10000 stake
//!   units,
//! - the aggregate signature verifies against the sum of the signers' public keys, over the
//!   message point obtained by mapping the limb groups to G1.
//!
//! Signatures are BLS over BLS12-377 and proofs are Groth16 over BW6-761, whose scalar field
//! is the BLS12-377 base field.

/// High level methods for generating public parameters & producing and verifying SNARK proofs
/// for signed checkpoints
mod api;
pub use api::*;

mod checkpoint;
pub use checkpoint::{PublicStatement, SignedCheckpoint};

mod config;
pub use config::{CircuitConfig, ConfigError};

mod encoding;
pub use encoding::EncodingError;

pub mod gadgets;
pub use gadgets::CommitteeSigCircuit;

// Instantiate certain types to avoid confusion
pub type BLSCurve = ark_bls12_377::Bls12_377;
pub type BLSCurveG1 = ark_bls12_377::G1Projective;
pub type BLSCurveG2 = ark_bls12_377::G2Projective;
pub type BWCurve = ark_bw6_761::BW6_761;
pub type BWField = ark_bw6_761::Fr;
