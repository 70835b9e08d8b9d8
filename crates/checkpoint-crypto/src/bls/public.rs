use super::Signature;
use crate::{BLSError, BlsResult, HashToCurve, SIG_DOMAIN};

use ark_bls12_377::{Bls12_377, Fq12, G1Projective, G2Affine, G2Projective};
use ark_ec::{AffineCurve, PairingEngine, ProjectiveCurve};
use ark_ff::One;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use log::trace;

use std::{
    borrow::Borrow,
    io::{Read, Write},
    ops::Neg,
};

/// A BLS public key on G2
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(G2Projective);

impl From<G2Projective> for PublicKey {
    fn from(pk: G2Projective) -> PublicKey {
        PublicKey(pk)
    }
}

impl AsRef<G2Projective> for PublicKey {
    fn as_ref(&self) -> &G2Projective {
        &self.0
    }
}

impl CanonicalSerialize for PublicKey {
    fn serialize<W: Write>(&self, writer: W) -> Result<(), SerializationError> {
        self.0.into_affine().serialize(writer)
    }

    fn serialize_uncompressed<W: Write>(&self, writer: W) -> Result<(), SerializationError> {
        self.0.into_affine().serialize_uncompressed(writer)
    }

    fn serialized_size(&self) -> usize {
        self.0.into_affine().serialized_size()
    }

    fn uncompressed_size(&self) -> usize {
        self.0.into_affine().uncompressed_size()
    }
}

impl CanonicalDeserialize for PublicKey {
    fn deserialize<R: Read>(reader: R) -> Result<Self, SerializationError> {
        Ok(PublicKey::from(
            G2Affine::deserialize(reader)?.into_projective(),
        ))
    }

    fn deserialize_uncompressed<R: Read>(reader: R) -> Result<Self, SerializationError> {
        Ok(PublicKey::from(
            G2Affine::deserialize_uncompressed(reader)?.into_projective(),
        ))
    }
}

impl PublicKey {
    /// Sums the provided public keys to produce the aggregate public key.
    pub fn aggregate<P: Borrow<PublicKey>>(public_keys: impl IntoIterator<Item = P>) -> PublicKey {
        public_keys
            .into_iter()
            .map(|s| s.borrow().0)
            .sum::<G2Projective>()
            .into()
    }

    /// Verifies the signature over the message and extra data, which are hashed to G1 under
    /// the checkpoint signing domain.
    pub fn verify<H: HashToCurve<Output = G1Projective>>(
        &self,
        message: &[u8],
        extra_data: &[u8],
        signature: &Signature,
        hash_to_g1: &H,
    ) -> BlsResult<()> {
        let message_hash = hash_to_g1.hash(SIG_DOMAIN, message, extra_data)?;
        self.verify_hash(&message_hash, signature)
    }

    /// Verifies the signature against an already hashed message.
    ///
    /// Both the signature and the public key must be on their curves and in the prime order
    /// subgroup, then `e(σ, -g_2) * e(H(m), pk) == 1` must hold.
    pub fn verify_hash(&self, message_hash: &G1Projective, signature: &Signature) -> BlsResult<()> {
        let sig = signature.as_ref().into_affine();
        let pk = self.0.into_affine();
        let hash = message_hash.into_affine();
        if !sig.is_on_curve()
            || !sig.is_in_correct_subgroup_assuming_on_curve()
            || !hash.is_on_curve()
            || !pk.is_on_curve()
            || !pk.is_in_correct_subgroup_assuming_on_curve()
        {
            trace!("point not in its group");
            return Err(BLSError::VerificationFailed);
        }

        let pairing = Bls12_377::product_of_pairings(&[
            (sig.into(), G2Affine::prime_subgroup_generator().neg().into()),
            (hash.into(), pk.into()),
        ]);
        if pairing == Fq12::one() {
            Ok(())
        } else {
            Err(BLSError::VerificationFailed)
        }
    }
}
