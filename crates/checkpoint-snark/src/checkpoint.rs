use crate::{
    config::CircuitConfig, encoding::EncodingError, gadgets::CommitteeSigCircuit, BWField,
};
use ark_ec::AffineCurve;
use ark_ff::PrimeField;
use checkpoint_crypto::{
    has_quorum,
    hash_to_curve::{hash_to_limbs, DIRECT_HASH_TO_G1},
    BLSError, BlsResult, CheckpointContext, Committee, LimbLayout, Signature, SIG_DOMAIN,
};
use tracing::debug;

/// The values a proof is verified against
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicStatement {
    /// Limb groups of the signed message, most significant limb first
    pub message_limbs: Vec<Vec<BWField>>,
    /// Root of the ordered committee
    pub committee_root: BWField,
    /// Stake units behind the signers
    pub signed_stake: u64,
}

impl PublicStatement {
    /// The circuit's public input vector: the message limbs group by group, then the
    /// committee root, then the signed stake
    pub fn to_field_elements(&self) -> Vec<BWField> {
        let mut inputs = self
            .message_limbs
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>();
        inputs.push(self.committee_root);
        inputs.push(BWField::from(self.signed_stake));
        inputs
    }

    /// Reads a public input vector laid out for `config`
    pub fn from_field_elements(
        config: &CircuitConfig,
        inputs: &[BWField],
    ) -> Result<Self, EncodingError> {
        config.validate()?;
        if inputs.len() != config.num_public_inputs() {
            return Err(EncodingError::PublicInputLength {
                expected: config.num_public_inputs(),
                got: inputs.len(),
            });
        }

        let (limbs, rest) = inputs.split_at(config.num_message_limbs());
        let message_limbs = limbs
            .chunks(config.layout.num_limbs())
            .map(|group| group.to_vec())
            .collect();

        let stake = rest[1].into_repr();
        let words = stake.as_ref();
        if words[1..].iter().any(|word| *word != 0) {
            return Err(EncodingError::InvalidStake(stake.to_string()));
        }

        Ok(PublicStatement {
            message_limbs,
            committee_root: rest[0],
            signed_stake: words[0],
        })
    }
}

/// A checkpoint message along with the committee that signed it
#[derive(Clone, Debug)]
pub struct SignedCheckpoint {
    /// The committee, in its canonical order
    pub committee: Committee,
    /// Which members signed
    pub bitmap: Vec<bool>,
    /// Hash-to-field output of the message
    pub message_limbs: Vec<Vec<BWField>>,
    pub layout: LimbLayout,
    /// Aggregate signature of the signers
    pub signature: Signature,
}

impl SignedCheckpoint {
    /// Expands `extra_data || message` under the signing domain into limb groups
    pub fn new(
        committee: Committee,
        bitmap: Vec<bool>,
        message: &[u8],
        extra_data: &[u8],
        signature: Signature,
    ) -> Result<Self, EncodingError> {
        let message_limbs = hash_to_limbs(SIG_DOMAIN, message, extra_data)?;
        Self::from_limbs(
            committee,
            bitmap,
            message_limbs,
            DIRECT_HASH_TO_G1.layout(),
            signature,
        )
    }

    /// Builds a checkpoint from already expanded limb groups
    pub fn from_limbs(
        committee: Committee,
        bitmap: Vec<bool>,
        message_limbs: Vec<Vec<BWField>>,
        layout: LimbLayout,
        signature: Signature,
    ) -> Result<Self, EncodingError> {
        if bitmap.len() != committee.len() {
            return Err(BLSError::MalformedCommittee(format!(
                "bitmap has {} flags for {} members",
                bitmap.len(),
                committee.len()
            ))
            .into());
        }
        let checkpoint = SignedCheckpoint {
            committee,
            bitmap,
            message_limbs,
            layout,
            signature,
        };
        checkpoint.config().validate()?;
        Ok(checkpoint)
    }

    /// Shape of the circuit proving this checkpoint
    pub fn config(&self) -> CircuitConfig {
        CircuitConfig::new(self.committee.len())
            .with_layout(self.layout, self.message_limbs.len())
    }

    pub fn statement(&self, context: &CheckpointContext) -> Result<PublicStatement, EncodingError> {
        Ok(PublicStatement {
            message_limbs: self.message_limbs.clone(),
            committee_root: self.committee.root(&context.committee_hasher)?,
            signed_stake: self.committee.signed_stake(&self.bitmap)?,
        })
    }

    pub fn public_inputs(&self, context: &CheckpointContext) -> Result<Vec<BWField>, EncodingError> {
        Ok(self.statement(context)?.to_field_elements())
    }

    /// Checks the quorum and the aggregate signature outside of the circuit.
    ///
    /// Every failure, including malformed limbs, is reported as `VerificationFailed`.
    pub fn verify(&self, context: &CheckpointContext) -> BlsResult<()> {
        self.check(context).map_err(|err| {
            debug!("checkpoint rejected: {}", err);
            BLSError::VerificationFailed
        })
    }

    /// Like `verify`, additionally requiring that the checkpoint produces `statement`
    pub fn verify_statement(
        &self,
        context: &CheckpointContext,
        statement: &PublicStatement,
    ) -> BlsResult<()> {
        match self.statement(context) {
            Ok(ref expected) if expected == statement => self.verify(context),
            _ => Err(BLSError::VerificationFailed),
        }
    }

    /// The fully assigned circuit for this checkpoint
    pub fn to_circuit(&self, context: &CheckpointContext) -> Result<CommitteeSigCircuit, EncodingError> {
        let statement = self.statement(context)?;
        let flag = |signed: bool| Some(BWField::from(signed as u64));
        Ok(CommitteeSigCircuit {
            config: self.config(),
            context: context.clone(),
            message_limbs: statement
                .message_limbs
                .iter()
                .map(|group| group.iter().map(|limb| Some(*limb)).collect())
                .collect(),
            committee_root: Some(statement.committee_root),
            signed_stake: Some(BWField::from(statement.signed_stake)),
            public_keys: self
                .committee
                .members()
                .iter()
                .map(|member| Some(*member.public_key.as_ref()))
                .collect(),
            stakes: self
                .committee
                .stakes()
                .into_iter()
                .map(|stake| Some(BWField::from(stake)))
                .collect(),
            bitmap: self.bitmap.iter().map(|signed| flag(*signed)).collect(),
            aggregated_signature: Some(*self.signature.as_ref()),
        })
    }

    fn check(&self, context: &CheckpointContext) -> BlsResult<()> {
        let signed_stake = self.committee.signed_stake(&self.bitmap)?;
        if !has_quorum(signed_stake) {
            return Err(BLSError::VerificationFailed);
        }
        let message_point = context.message_point(&self.message_limbs, self.layout)?;
        let aggregated_pk = self.committee.aggregate_public_key(&self.bitmap)?;
        aggregated_pk.verify_hash(&message_point.into_projective(), &self.signature)
    }
}
