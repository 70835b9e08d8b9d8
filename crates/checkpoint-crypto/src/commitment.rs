use crate::{
    hashers::{DirectHasher, Hasher},
    BLSError, BlsResult, COMMITMENT_DOMAIN,
};
use ark_crypto_primitives::crh::{
    pedersen::{self, Window},
    CRH,
};
use ark_ec::bls12::{Bls12Parameters, G1Projective};
use ark_ff::{to_bytes, ToBytes, Zero};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use std::fmt;

/// Seed of the generators behind the committee root
pub const COMMITMENT_SEED: &[u8] = b"checkpoint committee root";

/// Field elements absorbed next to the running state by every CRH call
pub const COMMITMENT_RATE: usize = 5;

/// Bits per Pedersen window. Must stay below the bit size of the G1 scalar field.
pub const COMMITMENT_WINDOW_SIZE: usize = 192;

/// Enough windows for the state and `COMMITMENT_RATE` elements of 48 bytes
pub const COMMITMENT_NUM_WINDOWS: usize = 12;

#[derive(Clone)]
pub struct CommitmentWindow;

impl Window for CommitmentWindow {
    const WINDOW_SIZE: usize = COMMITMENT_WINDOW_SIZE;
    const NUM_WINDOWS: usize = COMMITMENT_NUM_WINDOWS;
}

/// Pedersen CRH over G1
pub type CommitteeCRH<P> = pedersen::CRH<G1Projective<P>, CommitmentWindow>;

/// Pedersen parameters over G1
pub type CommitteeCRHParameters<P> = pedersen::Parameters<G1Projective<P>>;

/// Chained Pedersen hash over the G1 base field.
///
/// The state starts as the number of inputs. Each step hashes the little-endian bytes of
/// the state followed by up to `COMMITMENT_RATE` inputs and keeps the `x` coordinate of
/// the resulting point. A short final chunk is zero padded by the CRH.
pub struct CommitteeHasher<P: Bls12Parameters> {
    parameters: CommitteeCRHParameters<P>,
}

impl<P: Bls12Parameters> Clone for CommitteeHasher<P> {
    fn clone(&self) -> Self {
        CommitteeHasher {
            parameters: self.parameters.clone(),
        }
    }
}

impl<P: Bls12Parameters> fmt::Debug for CommitteeHasher<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitteeHasher")
            .field("windows", &self.parameters.generators.len())
            .field("window_size", &COMMITMENT_WINDOW_SIZE)
            .finish()
    }
}

impl<P: Bls12Parameters> CommitteeHasher<P> {
    /// Samples the generators from a ChaCha stream keyed by the Blake2s digest of `seed`
    pub fn new(seed: &[u8]) -> BlsResult<Self> {
        let element_bytes = to_bytes![P::Fp::zero()]?.len();
        if (COMMITMENT_RATE + 1) * element_bytes * 8 > COMMITMENT_WINDOW_SIZE * COMMITMENT_NUM_WINDOWS
        {
            return Err(BLSError::CommitmentError(format!(
                "{} byte field elements do not fit in the CRH input",
                element_bytes
            )));
        }

        let digest = DirectHasher.crh(COMMITMENT_DOMAIN, seed, 0)?;
        let mut rng_seed = [0u8; 32];
        if digest.len() != rng_seed.len() {
            return Err(BLSError::CommitmentError(format!(
                "seed digest has {} bytes",
                digest.len()
            )));
        }
        rng_seed.copy_from_slice(&digest);
        let mut rng = ChaChaRng::from_seed(rng_seed);

        let parameters = CommitteeCRH::<P>::setup(&mut rng)
            .map_err(|err| BLSError::CommitmentError(err.to_string()))?;
        Ok(CommitteeHasher { parameters })
    }

    pub fn parameters(&self) -> &CommitteeCRHParameters<P> {
        &self.parameters
    }

    /// One chaining step
    pub fn compress(&self, state: &P::Fp, chunk: &[P::Fp]) -> BlsResult<P::Fp> {
        if chunk.len() > COMMITMENT_RATE {
            return Err(BLSError::CommitmentError(format!(
                "cannot absorb {} elements at once",
                chunk.len()
            )));
        }
        let mut bytes = Vec::new();
        state.write(&mut bytes)?;
        for element in chunk {
            element.write(&mut bytes)?;
        }
        let point = CommitteeCRH::<P>::evaluate(&self.parameters, &bytes)
            .map_err(|err| BLSError::CommitmentError(err.to_string()))?;
        Ok(point.x)
    }

    /// Hashes `inputs` in order
    pub fn hash(&self, inputs: &[P::Fp]) -> BlsResult<P::Fp> {
        inputs
            .chunks(COMMITMENT_RATE)
            .try_fold(P::Fp::from(inputs.len() as u64), |state, chunk| {
                self.compress(&state, chunk)
            })
    }
}
