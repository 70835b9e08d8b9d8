use crate::curve::to_affine_coordinates;
use ark_ec::bls12::Bls12Parameters;
use ark_r1cs_std::{
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
    groups::{
        bls12::{G1Var, G2Var},
        CurveVar,
    },
    ToBitsGadget, ToBytesGadget,
};
use ark_relations::r1cs::SynthesisError;
use checkpoint_crypto::{
    commitment::{COMMITMENT_RATE, COMMITMENT_WINDOW_SIZE},
    CommitteeHasher,
};
use std::marker::PhantomData;
use tracing::debug;

/// Binds the ordered committee (public keys and stakes) to a root
pub struct CommitteeCommitmentGadget<P> {
    parameters_type: PhantomData<P>,
}

impl<P: Bls12Parameters> CommitteeCommitmentGadget<P> {
    /// The values absorbed for the committee, in the same order as
    /// `checkpoint_crypto::Committee::root_inputs`
    pub fn root_inputs(
        pub_keys: &[G2Var<P>],
        stakes: &[FpVar<P::Fp>],
    ) -> Result<Vec<FpVar<P::Fp>>, SynthesisError> {
        if pub_keys.len() != stakes.len() {
            return Err(SynthesisError::Unsatisfiable);
        }

        let mut inputs = Vec::with_capacity(pub_keys.len() * 5);
        for (pk, stake) in pub_keys.iter().zip(stakes) {
            let (x, y) = to_affine_coordinates(pk)?;
            inputs.extend_from_slice(&[x.c0, x.c1, y.c0, y.c1, stake.clone()]);
        }
        Ok(inputs)
    }

    /// In-circuit `CommitteeHasher::hash`
    #[tracing::instrument(target = "r1cs", skip(hasher, inputs))]
    pub fn hash(
        hasher: &CommitteeHasher<P>,
        inputs: &[FpVar<P::Fp>],
    ) -> Result<FpVar<P::Fp>, SynthesisError> {
        let mut state = FpVar::constant(P::Fp::from(inputs.len() as u64));
        for chunk in inputs.chunks(COMMITMENT_RATE) {
            state = Self::compress(hasher, &state, chunk)?;
        }
        Ok(state)
    }

    /// One Pedersen step over the bytes of `state || chunk`. Windows are summed one at a
    /// time since `precomputed_base_multiscalar_mul_le` in r1cs-std 0.3 keeps only the last
    /// window. Missing trailing windows stand for the zero padding of the native CRH.
    fn compress(
        hasher: &CommitteeHasher<P>,
        state: &FpVar<P::Fp>,
        chunk: &[FpVar<P::Fp>],
    ) -> Result<FpVar<P::Fp>, SynthesisError> {
        let mut bytes = state.to_bytes()?;
        for element in chunk {
            bytes.extend(element.to_bytes()?);
        }
        let bits = bytes.to_bits_le()?;

        let mut point = G1Var::<P>::zero();
        for (window, powers) in bits
            .chunks(COMMITMENT_WINDOW_SIZE)
            .zip(&hasher.parameters().generators)
        {
            let mut term = G1Var::<P>::zero();
            term.precomputed_base_scalar_mul_le(window.iter().zip(powers))?;
            point += term;
        }
        Ok(point.to_affine()?.x)
    }

    /// Hashes the committee and enforces equality with `root`
    #[tracing::instrument(target = "r1cs", skip(hasher, pub_keys, stakes, root))]
    pub fn enforce_root(
        hasher: &CommitteeHasher<P>,
        pub_keys: &[G2Var<P>],
        stakes: &[FpVar<P::Fp>],
        root: &FpVar<P::Fp>,
    ) -> Result<(), SynthesisError> {
        debug!("hashing committee of {} members", pub_keys.len());
        let inputs = Self::root_inputs(pub_keys, stakes)?;
        Self::hash(hasher, &inputs)?.enforce_equal(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_helpers::{print_unsatisfied_constraints, run_profile_constraints};
    use ark_bls12_377::{Fq, Parameters};
    use ark_ff::UniformRand;
    use ark_r1cs_std::{alloc::AllocVar, R1CSVar};
    use ark_relations::r1cs::{ConstraintSystem, ConstraintSystemRef};
    use checkpoint_crypto::{test_helpers::committee_with_stakes, Committee, CHECKPOINT_CONTEXT};

    fn cs_enforce_root(committee: &Committee, root: Fq) -> ConstraintSystemRef<Fq> {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let pub_keys = committee
            .members()
            .iter()
            .map(|m| G2Var::<Parameters>::new_witness(cs.clone(), || Ok(*m.public_key.as_ref())).unwrap())
            .collect::<Vec<_>>();
        let stakes = committee
            .members()
            .iter()
            .map(|m| FpVar::new_witness(cs.clone(), || Ok(Fq::from(m.stake_units))).unwrap())
            .collect::<Vec<_>>();
        let root = FpVar::new_input(cs.clone(), || Ok(root)).unwrap();
        CommitteeCommitmentGadget::<Parameters>::enforce_root(
            &CHECKPOINT_CONTEXT.committee_hasher,
            &pub_keys,
            &stakes,
            &root,
        )
        .unwrap();
        cs
    }

    #[test]
    fn root_matches_native() {
        run_profile_constraints(|| {
            let (committee, _) = committee_with_stakes(&[3334, 3333, 3333]).unwrap();
            let root = committee.root(&CHECKPOINT_CONTEXT.committee_hasher).unwrap();
            let cs = cs_enforce_root(&committee, root);
            print_unsatisfied_constraints(cs.clone());
            assert!(cs.is_satisfied().unwrap());
        });
    }

    #[test]
    fn reordered_committee_does_not_match() {
        run_profile_constraints(|| {
            let (committee, _) = committee_with_stakes(&[3334, 3333, 3333]).unwrap();
            let root = committee.root(&CHECKPOINT_CONTEXT.committee_hasher).unwrap();

            let mut members = committee.members().to_vec();
            members.swap(1, 2);
            let reordered = Committee::new(members).unwrap();
            let cs = cs_enforce_root(&reordered, root);
            assert!(!cs.is_satisfied().unwrap());
        });
    }

    #[test]
    fn hash_matches_native() {
        run_profile_constraints(|| {
            let rng = &mut rand::thread_rng();
            let hasher = &CHECKPOINT_CONTEXT.committee_hasher;
            // one full chunk and a short one
            let inputs = (0..COMMITMENT_RATE + 2)
                .map(|_| Fq::rand(rng))
                .collect::<Vec<_>>();

            let cs = ConstraintSystem::<Fq>::new_ref();
            let vars = inputs
                .iter()
                .map(|x| FpVar::new_witness(cs.clone(), || Ok(*x)).unwrap())
                .collect::<Vec<_>>();
            let hash = CommitteeCommitmentGadget::<Parameters>::hash(hasher, &vars).unwrap();

            print_unsatisfied_constraints(cs.clone());
            assert!(cs.is_satisfied().unwrap());
            assert_eq!(hash.value().unwrap(), hasher.hash(&inputs).unwrap());
        });
    }
}
