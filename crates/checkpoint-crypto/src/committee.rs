use crate::{commitment::CommitteeHasher, BLSError, BlsResult, PublicKey};

use ark_bls12_377::{Fq, G2Projective, Parameters};
use ark_ec::ProjectiveCurve;
use ark_ff::Zero;
use log::{debug, trace};

/// Stake units of a whole committee
pub const STAKE_BASIS: u64 = 10_000;

/// Minimum signed stake units for a checkpoint to be accepted
pub const QUORUM_THRESHOLD: u64 = 6_667;

/// Every stake is below `2^STAKE_BITS`
pub const STAKE_BITS: usize = 14;

/// Returns `if_true` when `condition` is set, else `if_false`. Mirrors the arithmetic select
/// used in-circuit, so the native fold visits exactly the same values.
pub fn select<T>(condition: bool, if_true: T, if_false: T) -> T {
    if condition {
        if_true
    } else {
        if_false
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitteeMember {
    pub public_key: PublicKey,
    pub stake_units: u64,
}

impl CommitteeMember {
    pub fn new(public_key: PublicKey, stake_units: u64) -> Self {
        CommitteeMember {
            public_key,
            stake_units,
        }
    }
}

/// An ordered, non-empty validator committee whose stakes sum to `STAKE_BASIS`. Every key
/// is a non-identity point of the G2 prime order subgroup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committee {
    members: Vec<CommitteeMember>,
}

impl Committee {
    pub fn new(members: Vec<CommitteeMember>) -> BlsResult<Self> {
        if members.is_empty() {
            return Err(BLSError::MalformedCommittee("committee is empty".to_owned()));
        }
        for (index, member) in members.iter().enumerate() {
            let pk = member.public_key.as_ref().into_affine();
            if pk.is_zero() {
                return Err(BLSError::MalformedCommittee(format!(
                    "public key of member {} is the identity",
                    index
                )));
            }
            if !pk.is_on_curve() || !pk.is_in_correct_subgroup_assuming_on_curve() {
                return Err(BLSError::MalformedCommittee(format!(
                    "public key of member {} is not in the G2 subgroup",
                    index
                )));
            }
        }
        if let Some(index) = members
            .iter()
            .position(|m| m.stake_units >= 1 << STAKE_BITS)
        {
            return Err(BLSError::MalformedCommittee(format!(
                "stake of member {} does not fit in {} bits",
                index, STAKE_BITS
            )));
        }
        let total: u64 = members.iter().map(|m| m.stake_units).sum();
        if total != STAKE_BASIS {
            return Err(BLSError::MalformedCommittee(format!(
                "stakes sum to {}, expected {}",
                total, STAKE_BASIS
            )));
        }
        Ok(Committee { members })
    }

    pub fn members(&self) -> &[CommitteeMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.members.iter().map(|m| m.public_key.clone()).collect()
    }

    pub fn stakes(&self) -> Vec<u64> {
        self.members.iter().map(|m| m.stake_units).collect()
    }

    /// The values absorbed into the committee root: per member the affine coordinates
    /// `x.c0, x.c1, y.c0, y.c1` of its key followed by its stake.
    pub fn root_inputs(&self) -> Vec<Fq> {
        self.members
            .iter()
            .flat_map(|member| {
                let pk = member.public_key.as_ref().into_affine();
                vec![
                    pk.x.c0,
                    pk.x.c1,
                    pk.y.c0,
                    pk.y.c1,
                    Fq::from(member.stake_units),
                ]
            })
            .collect()
    }

    /// Commitment to the ordered committee
    pub fn root(&self, hasher: &CommitteeHasher<Parameters>) -> BlsResult<Fq> {
        let root = hasher.hash(&self.root_inputs())?;
        trace!("committee root over {} members: {}", self.len(), root);
        Ok(root)
    }

    fn check_bitmap(&self, bitmap: &[bool]) -> BlsResult<()> {
        if bitmap.len() != self.len() {
            return Err(BLSError::MalformedCommittee(format!(
                "bitmap has {} entries for {} members",
                bitmap.len(),
                self.len()
            )));
        }
        Ok(())
    }

    /// Stake units behind the signers in `bitmap`
    pub fn signed_stake(&self, bitmap: &[bool]) -> BlsResult<u64> {
        self.check_bitmap(bitmap)?;
        Ok(self
            .members
            .iter()
            .zip(bitmap)
            .fold(0, |acc, (member, signed)| {
                acc + select(*signed, member.stake_units, 0)
            }))
    }

    /// Sum of the public keys of the signers in `bitmap`, starting from the identity
    pub fn aggregate_public_key(&self, bitmap: &[bool]) -> BlsResult<PublicKey> {
        self.check_bitmap(bitmap)?;
        let apk = self
            .members
            .iter()
            .zip(bitmap)
            .fold(G2Projective::zero(), |acc, (member, signed)| {
                select(*signed, acc + member.public_key.as_ref(), acc)
            });
        Ok(apk.into())
    }
}

/// Whether `signed_stake` reaches the quorum threshold
pub fn has_quorum(signed_stake: u64) -> bool {
    let reached = signed_stake >= QUORUM_THRESHOLD;
    debug!(
        "signed stake {} / {}, quorum reached: {}",
        signed_stake, STAKE_BASIS, reached
    );
    reached
}
