use crate::curve::{enforce_g1_subgroup, enforce_on_curve, enforce_prime_order};
use ark_ec::{
    bls12::{Bls12, Bls12Parameters},
    PairingEngine, ProjectiveCurve,
};
use ark_r1cs_std::{
    alloc::AllocationMode,
    boolean::Boolean,
    eq::EqGadget,
    fields::{fp12::Fp12Var, FieldVar},
    groups::{
        bls12::{G1PreparedVar, G1Var, G2PreparedVar, G2Var},
        CurveVar,
    },
    pairing::{bls12::PairingVar, PairingVar as PairingGadget},
    R1CSVar,
};
use ark_relations::r1cs::SynthesisError;
use std::marker::PhantomData;
use tracing::{debug, span, trace, Level};

/// BLS Signature Verification Gadget.
///
/// Implements BLS Verification as written in [BDN18](https://eprint.iacr.org/2018/483.pdf)
/// in a Pairing-based SNARK, with signatures on G1 and public keys on G2.
pub struct BlsVerifyGadget<P> {
    parameters_type: PhantomData<P>,
}

impl<P: Bls12Parameters> BlsVerifyGadget<P> {
    /// Enforces verification of an aggregate signature over `message_hash` against the
    /// aggregate public key of the signers.
    ///
    /// All three points are checked to be on their curves and the signature to be in the
    /// prime order subgroup, then `e(σ, g_2^-1) * e(H(m), apk) == 1_{G_T}` is enforced.
    /// Public keys are checked by `enforce_aggregated_pubkeys`.
    #[tracing::instrument(target = "r1cs", skip(signature, message_hash, aggregated_pk))]
    pub fn verify(
        signature: &G1Var<P>,
        message_hash: &G1Var<P>,
        aggregated_pk: &G2Var<P>,
    ) -> Result<(), SynthesisError> {
        let span = span!(Level::TRACE, "BlsVerifyGadget_verify");
        let _enter = span.enter();

        trace!("checking points are on their curves");
        enforce_on_curve(signature)?;
        enforce_on_curve(message_hash)?;
        enforce_on_curve(aggregated_pk)?;
        enforce_g1_subgroup::<P>(signature)?;

        let prepared_aggregated_pk = PairingVar::<P>::prepare_g2(aggregated_pk)?;
        let prepared_message_hash = PairingVar::<P>::prepare_g1(message_hash)?;

        // Prepare the signature and get the generator
        let (prepared_signature, prepared_g2_neg_generator) =
            Self::prepare_signature_neg_generator(signature)?;

        // e(σ, g_2^-1) * e(H(m), apk) == 1_{G_T}
        Self::enforce_bls_equation(
            &[prepared_signature, prepared_message_hash],
            &[prepared_g2_neg_generator, prepared_aggregated_pk],
        )
    }

    /// Returns the sum of the public keys which had a 1 in the bitmap. Starting from the
    /// identity, each step selects between `acc + pk` and `acc`, with complete addition.
    /// Every key, signer or not, must lie in the prime order subgroup.
    ///
    /// A length mismatch between keys and bitmap fails synthesis.
    #[tracing::instrument(target = "r1cs", skip(pub_keys, signed_bitmap))]
    pub fn enforce_aggregated_pubkeys(
        pub_keys: &[G2Var<P>],
        signed_bitmap: &[Boolean<P::Fp>],
    ) -> Result<G2Var<P>, SynthesisError> {
        if pub_keys.len() != signed_bitmap.len() {
            return Err(SynthesisError::Unsatisfiable);
        }
        debug!("aggregating {} public keys", pub_keys.len());

        let mut aggregated_pk = G2Var::<P>::zero();
        for (pk, bit) in pub_keys.iter().zip(signed_bitmap) {
            enforce_prime_order(pk)?;
            let sum = aggregated_pk.clone() + pk;
            aggregated_pk = bit.select(&sum, &aggregated_pk)?;
        }

        Ok(aggregated_pk)
    }

    /// Verifying BLS signatures requires preparing a G1 Signature and
    /// preparing a negated G2 generator
    fn prepare_signature_neg_generator(
        signature: &G1Var<P>,
    ) -> Result<(G1PreparedVar<P>, G2PreparedVar<P>), SynthesisError> {
        let prepared_signature = PairingVar::<P>::prepare_g1(signature)?;

        // Allocate the generator on G2
        let g2_generator = G2Var::<P>::new_variable_omit_prime_order_check(
            signature.cs(),
            || Ok(<Bls12<P> as PairingEngine>::G2Projective::prime_subgroup_generator()),
            AllocationMode::Constant,
        )?;
        // and negate it for the purpose of verification
        let g2_neg_generator = g2_generator.negate()?;
        let prepared_g2_neg_generator = PairingVar::<P>::prepare_g2(&g2_neg_generator)?;

        Ok((prepared_signature, prepared_g2_neg_generator))
    }

    /// Multiply the pairings together and check that their product == 1 in G_T, which indicates
    /// that the verification has passed.
    fn enforce_bls_equation(
        g1: &[G1PreparedVar<P>],
        g2: &[G2PreparedVar<P>],
    ) -> Result<(), SynthesisError> {
        trace!("enforcing BLS equation");
        let bls_equation = PairingVar::<P>::product_of_pairings(g1, g2)?;
        let gt_one = &Fp12Var::<P::Fp12Params>::one();
        bls_equation.enforce_equal(gt_one)?;
        Ok(())
    }
}
