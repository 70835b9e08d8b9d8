use crate::utils::bool_hint;
use ark_ff::PrimeField;
use ark_r1cs_std::{
    boolean::Boolean,
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
    R1CSVar, ToBitsGadget,
};
use ark_relations::r1cs::SynthesisError;
use checkpoint_crypto::{QUORUM_THRESHOLD, STAKE_BASIS, STAKE_BITS};
use std::cmp::Ordering;
use tracing::trace;

/// Constraints over the signer bitmap and the committee stakes
pub struct QuorumGadget;

impl QuorumGadget {
    /// Enforces that every flag is 0 or 1 and returns the flags as booleans.
    ///
    /// Flags arrive as raw field elements. Each one must satisfy `f * (f - 1) = 0` and equal
    /// the boolean witnessed for it.
    #[tracing::instrument(target = "r1cs", skip(flags))]
    pub fn enforce_flags<F: PrimeField>(
        flags: &[FpVar<F>],
    ) -> Result<Vec<Boolean<F>>, SynthesisError> {
        flags
            .iter()
            .map(|flag| {
                flag.mul_equals(&(flag - F::one()), &FpVar::zero())?;
                let bit = bool_hint(&flag.cs(), || Ok(flag.value()? == F::one()))?;
                FpVar::from(bit.clone()).enforce_equal(flag)?;
                Ok(bit)
            })
            .collect()
    }

    /// Enforces that each stake fits in `STAKE_BITS` bits and that the stakes sum to
    /// `STAKE_BASIS`
    #[tracing::instrument(target = "r1cs", skip(stakes))]
    pub fn enforce_stake_basis<F: PrimeField>(stakes: &[FpVar<F>]) -> Result<(), SynthesisError> {
        for stake in stakes {
            let bits = stake.to_bits_le()?;
            for bit in &bits[STAKE_BITS..] {
                bit.enforce_equal(&Boolean::FALSE)?;
            }
        }
        let total = stakes.iter().fold(FpVar::zero(), |acc, stake| acc + stake);
        total.enforce_equal(&FpVar::constant(F::from(STAKE_BASIS)))
    }

    /// Sums the stakes of the members flagged in `signed_bitmap`, enforces that the sum
    /// reaches `QUORUM_THRESHOLD` and returns it.
    #[tracing::instrument(target = "r1cs", skip(stakes, signed_bitmap))]
    pub fn enforce_quorum<F: PrimeField>(
        stakes: &[FpVar<F>],
        signed_bitmap: &[Boolean<F>],
    ) -> Result<FpVar<F>, SynthesisError> {
        if stakes.len() != signed_bitmap.len() {
            return Err(SynthesisError::Unsatisfiable);
        }

        let mut signed = FpVar::zero();
        for (stake, bit) in stakes.iter().zip(signed_bitmap) {
            signed += bit.select(stake, &FpVar::zero())?;
        }
        trace!("enforcing signed stake >= {}", QUORUM_THRESHOLD);

        let threshold = FpVar::constant(F::from(QUORUM_THRESHOLD));
        signed.enforce_cmp(&threshold, Ordering::Greater, true)?;

        Ok(signed)
    }
}
