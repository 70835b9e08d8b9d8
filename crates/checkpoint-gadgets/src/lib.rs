//! # Checkpoint Gadgets
//!
//! R1CS gadgets for checking BLS committee signatures over the BLS12-377 curve.
//! The constraint field is the BLS12-377 base field (the BW6-761 scalar field), so all
//! G1 and G2 coordinates are native field elements.

mod bls;
pub use bls::BlsVerifyGadget;

mod commitment;
pub use commitment::CommitteeCommitmentGadget;

mod curve;
pub use curve::{enforce_g1_subgroup, enforce_on_curve, enforce_prime_order, to_affine_coordinates};

mod limbs;
pub use limbs::LimbsGadget;

mod map_to_curve;
pub use map_to_curve::MapToGroupGadget;

mod quorum;
pub use quorum::QuorumGadget;

/// Utility functions which do not involve generating constraints
pub mod utils;
