use super::{PublicKey, Signature};
use crate::{BlsResult, HashToCurve, SIG_DOMAIN};

use ark_bls12_377::{Fr, G1Projective, G2Projective};
use ark_ec::ProjectiveCurve;
use ark_ff::{PrimeField, UniformRand};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Read, SerializationError, Write};
use rand::Rng;

/// A BLS private key
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PrivateKey {
    sk: Fr,
}

impl From<Fr> for PrivateKey {
    fn from(sk: Fr) -> PrivateKey {
        PrivateKey { sk }
    }
}

impl AsRef<Fr> for PrivateKey {
    fn as_ref(&self) -> &Fr {
        &self.sk
    }
}

impl PrivateKey {
    /// Generates a private key from the provided RNG
    pub fn generate<R: Rng>(rng: &mut R) -> PrivateKey {
        PrivateKey { sk: Fr::rand(rng) }
    }

    /// Hashes the message and extra data to G1 and signs the result under the checkpoint
    /// signing domain
    pub fn sign<H: HashToCurve<Output = G1Projective>>(
        &self,
        message: &[u8],
        extra_data: &[u8],
        hash_to_g1: &H,
    ) -> BlsResult<Signature> {
        let message_hash = hash_to_g1.hash(SIG_DOMAIN, message, extra_data)?;
        Ok(self.sign_hash(&message_hash))
    }

    /// Signs an already hashed message
    pub fn sign_hash(&self, message_hash: &G1Projective) -> Signature {
        message_hash.mul(self.sk.into_repr()).into()
    }

    /// Returns the public key corresponding to this private key
    pub fn to_public(&self) -> PublicKey {
        G2Projective::prime_subgroup_generator()
            .mul(self.sk.into_repr())
            .into()
    }
}
