//! # Committee Signature Circuit
//!
//! Proves that a quorum of the committee behind a public root signed a message.

use super::FrVar;
use crate::config::CircuitConfig;
use ark_bls12_377::{
    constraints::{G1Var, G2Var},
    G1Projective, G2Projective, Parameters as Bls12_377_Parameters,
};
use ark_bw6_761::Fr;
use ark_r1cs_std::{alloc::AllocationMode, prelude::*, Assignment};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use checkpoint_crypto::CheckpointContext;
use checkpoint_gadgets::{
    BlsVerifyGadget, CommitteeCommitmentGadget, MapToGroupGadget, QuorumGadget,
};
use tracing::{debug, info, span, Level};

type BlsGadget = BlsVerifyGadget<Bls12_377_Parameters>;
type CommitmentGadget = CommitteeCommitmentGadget<Bls12_377_Parameters>;

#[derive(Clone, Debug)]
/// A committee, the flags of its signers and their aggregate signature over a message. The
/// message limbs, the committee root and the signed stake are the public inputs, in that
/// order.
pub struct CommitteeSigCircuit {
    pub config: CircuitConfig,
    /// Map and hash constants, shared with the native verifier
    pub context: CheckpointContext,
    /// Hash-to-field output of the message, in limb groups
    pub message_limbs: Vec<Vec<Option<Fr>>>,
    pub committee_root: Option<Fr>,
    /// Stake units claimed for the signers
    pub signed_stake: Option<Fr>,
    pub public_keys: Vec<Option<G2Projective>>,
    pub stakes: Vec<Option<Fr>>,
    /// One flag per member, expected to be 0 or 1
    pub bitmap: Vec<Option<Fr>>,
    pub aggregated_signature: Option<G1Projective>,
}

impl CommitteeSigCircuit {
    /// Initializes an empty circuit of the given shape. This is used when running the
    /// trusted setup.
    #[tracing::instrument(target = "r1cs", skip(context))]
    pub fn empty(config: CircuitConfig, context: &CheckpointContext) -> Self {
        let members = config.num_members;
        CommitteeSigCircuit {
            config,
            context: context.clone(),
            message_limbs: vec![vec![None; config.layout.num_limbs()]; config.message_groups],
            committee_root: None,
            signed_stake: None,
            public_keys: vec![None; members],
            stakes: vec![None; members],
            bitmap: vec![None; members],
            aggregated_signature: None,
        }
    }

    /// Lengths must agree with the configuration before anything is allocated
    fn check_shape(&self) -> Result<(), SynthesisError> {
        let config = &self.config;
        let limbs = config.layout.num_limbs();
        let valid = config.validate().is_ok()
            && self.message_limbs.len() == config.message_groups
            && self.message_limbs.iter().all(|group| group.len() == limbs)
            && self.public_keys.len() == config.num_members
            && self.stakes.len() == config.num_members
            && self.bitmap.len() == config.num_members;
        if valid {
            Ok(())
        } else {
            debug!("circuit does not match its configuration: {:?}", config);
            Err(SynthesisError::Unsatisfiable)
        }
    }

    fn alloc_fr(
        cs: &ConstraintSystemRef<Fr>,
        values: &[Option<Fr>],
        mode: AllocationMode,
    ) -> Result<Vec<FrVar>, SynthesisError> {
        values
            .iter()
            .map(|value| FrVar::new_variable(cs.clone(), || value.get(), mode))
            .collect()
    }
}

impl ConstraintSynthesizer<Fr> for CommitteeSigCircuit {
    /// Enforce that the committee hashes to the root, that its signers hold a quorum of the
    /// stake and that their aggregate signature verifies over the message
    #[tracing::instrument(target = "r1cs", skip(self, cs))]
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let span = span!(Level::TRACE, "CommitteeSigCircuit");
        let _enter = span.enter();
        info!("generating constraints");
        self.check_shape()?;

        // Public inputs
        let message_limbs = self
            .message_limbs
            .iter()
            .map(|group| Self::alloc_fr(&cs, group, AllocationMode::Input))
            .collect::<Result<Vec<_>, _>>()?;
        let committee_root = FrVar::new_input(cs.clone(), || self.committee_root.get())?;
        let signed_stake = FrVar::new_input(cs.clone(), || self.signed_stake.get())?;

        // Witnesses
        let public_keys = self
            .public_keys
            .iter()
            .map(|pk| {
                G2Var::new_variable_omit_prime_order_check(
                    cs.clone(),
                    || pk.ok_or(SynthesisError::AssignmentMissing),
                    AllocationMode::Witness,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let stakes = Self::alloc_fr(&cs, &self.stakes, AllocationMode::Witness)?;
        let flags = Self::alloc_fr(&cs, &self.bitmap, AllocationMode::Witness)?;
        let aggregated_signature = G1Var::new_variable_omit_prime_order_check(
            cs.clone(),
            || {
                self.aggregated_signature
                    .ok_or(SynthesisError::AssignmentMissing)
            },
            AllocationMode::Witness,
        )?;

        debug!("enforcing committee root");
        CommitmentGadget::enforce_root(
            &self.context.committee_hasher,
            &public_keys,
            &stakes,
            &committee_root,
        )?;

        debug!("enforcing quorum");
        let signed_bitmap = QuorumGadget::enforce_flags(&flags)?;
        QuorumGadget::enforce_stake_basis(&stakes)?;
        QuorumGadget::enforce_quorum(&stakes, &signed_bitmap)?.enforce_equal(&signed_stake)?;

        debug!("mapping message to G1");
        let message_hash = MapToGroupGadget::new(&self.context.map)
            .enforce_message_point(&message_limbs, self.config.layout)?;

        debug!("verifying bls signature");
        let aggregated_pk = BlsGadget::enforce_aggregated_pubkeys(&public_keys, &signed_bitmap)?;
        BlsGadget::verify(&aggregated_signature, &message_hash, &aggregated_pk)?;
        info!("constraints generated");

        Ok(())
    }
}
