use crate::{
    codec::LimbLayout,
    hash_to_curve::{map_limb_groups, SvdwMap},
    commitment::{CommitteeHasher, COMMITMENT_SEED},
    BlsResult,
};
use ark_bls12_377::{g1::Parameters as G1Parameters, Fq, G1Affine, Parameters};
use once_cell::sync::Lazy;

/// Shared context, derived once
pub static CHECKPOINT_CONTEXT: Lazy<CheckpointContext> = Lazy::new(|| {
    CheckpointContext::new().expect("map and hash constants exist for BLS12-377")
});

/// Curve and hash parameters used by every verification step. It is passed explicitly to
/// both the native verifier and the circuit so that the two always agree on the constants.
#[derive(Clone, Debug)]
pub struct CheckpointContext {
    /// Map from the base field onto G1
    pub map: SvdwMap<G1Parameters>,
    /// Hash behind the committee root
    pub committee_hasher: CommitteeHasher<Parameters>,
}

impl CheckpointContext {
    pub fn new() -> BlsResult<Self> {
        Ok(CheckpointContext {
            map: SvdwMap::new()?,
            committee_hasher: CommitteeHasher::new(COMMITMENT_SEED)?,
        })
    }

    /// The G1 point carried by the message limb groups
    pub fn message_point(&self, groups: &[Vec<Fq>], layout: LimbLayout) -> BlsResult<G1Affine> {
        map_limb_groups(&self.map, groups, layout)
    }
}
