use ark_ff::PrimeField;
use ark_r1cs_std::{
    alloc::AllocVar,
    boolean::Boolean,
    fields::{fp::FpVar, FieldVar},
};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

/// Allocates a prover hint. Outside of a constraint system (all inputs constant) the hint
/// becomes a constant as well.
pub fn hint<F: PrimeField>(
    cs: &ConstraintSystemRef<F>,
    value: impl FnOnce() -> Result<F, SynthesisError>,
) -> Result<FpVar<F>, SynthesisError> {
    if cs.is_none() {
        Ok(FpVar::constant(value()?))
    } else {
        FpVar::new_witness(cs.clone(), value)
    }
}

/// Boolean counterpart of `hint`
pub fn bool_hint<F: PrimeField>(
    cs: &ConstraintSystemRef<F>,
    value: impl FnOnce() -> Result<bool, SynthesisError>,
) -> Result<Boolean<F>, SynthesisError> {
    if cs.is_none() {
        Ok(Boolean::constant(value()?))
    } else {
        Boolean::new_witness(cs.clone(), value)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use ark_ff::Field;
    use ark_relations::r1cs::{ConstraintLayer, ConstraintSystemRef, TracingMode};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use tracing_subscriber::layer::SubscriberExt;

    /// Deterministic RNG for fixtures
    pub fn test_rng() -> XorShiftRng {
        XorShiftRng::seed_from_u64(0x5eed)
    }

    /// Runs `f` with the constraint tracing layer installed, so that unsatisfied
    /// constraints are reported with the namespace they were created in
    pub fn run_profile_constraints<T>(f: impl FnOnce() -> T) -> T {
        let layer = ConstraintLayer::new(TracingMode::OnlyConstraints);
        let subscriber = tracing_subscriber::Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn print_unsatisfied_constraints<F: Field>(cs: ConstraintSystemRef<F>) {
        if let Ok(Some(name)) = cs.which_is_unsatisfied() {
            println!("unsatisfied constraint: {}", name);
        }
    }
}
