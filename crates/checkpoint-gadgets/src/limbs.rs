use ark_ff::{Field, PrimeField};
use ark_r1cs_std::{boolean::Boolean, eq::EqGadget, fields::fp::FpVar, ToBitsGadget};
use ark_relations::r1cs::SynthesisError;
use checkpoint_crypto::{codec::CUTOFF_BYTES, LimbLayout};
use tracing::trace;

/// Rebuilds field elements from big-endian limb groups
pub struct LimbsGadget;

impl LimbsGadget {
    /// Constrains `limbs` to fit their declared widths and returns the field element they
    /// carry, computed as `head * 256^CUTOFF_BYTES + tail` over the little-endian bits.
    ///
    /// A wrong number of limbs is a shape error and fails synthesis.
    #[tracing::instrument(target = "r1cs", skip(limbs))]
    pub fn recompose<F: PrimeField>(
        limbs: &[FpVar<F>],
        layout: LimbLayout,
    ) -> Result<FpVar<F>, SynthesisError> {
        if limbs.len() != layout.num_limbs() {
            return Err(SynthesisError::Unsatisfiable);
        }

        let mut bits = Vec::with_capacity(layout.total_bits());
        for (limb, width) in limbs.iter().zip(layout.widths()).rev() {
            let limb_bits = limb.to_bits_le()?;
            // padding above the declared width must be zero
            for bit in &limb_bits[*width..] {
                bit.enforce_equal(&Boolean::FALSE)?;
            }
            bits.extend_from_slice(&limb_bits[..*width]);
        }
        trace!("recomposing {} bits", bits.len());

        let (tail, head) = bits.split_at(CUTOFF_BYTES * 8);
        let tail = Boolean::le_bits_to_fp_var(tail)?;
        let head = Boolean::le_bits_to_fp_var(head)?;
        let shift = F::from(256u64).pow(&[CUTOFF_BYTES as u64]);

        Ok(head * shift + tail)
    }
}
