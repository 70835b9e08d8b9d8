//! Prover Verifier Generator
//!
//! Setup: Trusted setup over Groth16 for the committee signature circuit
use crate::{config::CircuitConfig, gadgets::CommitteeSigCircuit, BWCurve};

use ark_ec::PairingEngine;
use ark_groth16::{generate_random_parameters, ProvingKey as Groth16Parameters};
use ark_relations::r1cs::SynthesisError;
use ark_std::{end_timer, start_timer};
use checkpoint_crypto::CheckpointContext;
use rand::Rng;
use tracing::{error, info, span, Level};

type Result<T> = std::result::Result<T, SynthesisError>;

/// Public parameters of the committee signature SNARK
pub type Parameters<CP = BWCurve> = Groth16Parameters<CP>;

/// Initializes the committee signature circuit with random parameters seeded by the
/// provided RNG over BW6_761.
pub fn trusted_setup<R: Rng>(
    config: CircuitConfig,
    context: &CheckpointContext,
    rng: &mut R,
) -> Result<Parameters> {
    setup(config, context, rng, |c, rng| {
        generate_random_parameters(c, rng)
    })
}

/// Performs a Groth16 setup for the committee signature circuit of the given shape. The
/// consumer may provide the setup function, which can be one which performs a
/// private-trusted setup, or one which outputs parameters which were computed via an
/// [MPC](https://eprint.iacr.org/2017/1050)
///
/// If you do not know what this means, use the `trusted_setup` function
pub fn setup<CP, F, R>(
    config: CircuitConfig,
    context: &CheckpointContext,
    rng: &mut R,
    setup_fn: F,
) -> Result<Parameters<CP>>
where
    CP: PairingEngine,
    R: Rng,
    F: FnOnce(CommitteeSigCircuit, &mut R) -> Result<Parameters<CP>>,
{
    if let Err(err) = config.validate() {
        error!("cannot run the setup: {}", err);
        return Err(SynthesisError::Unsatisfiable);
    }
    info!(
        "Generating parameters for {} validators and {} message groups",
        config.num_members, config.message_groups
    );

    let span = span!(Level::TRACE, "setup");
    let _enter = span.enter();

    let setup_time = start_timer!(|| "committee signature setup");
    let parameters = setup_fn(CommitteeSigCircuit::empty(config, context), rng)?;
    end_timer!(setup_time);

    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkpoint_crypto::CHECKPOINT_CONTEXT;

    #[test]
    fn empty_committee_has_no_setup() {
        let rng = &mut rand::thread_rng();
        assert!(trusted_setup(CircuitConfig::new(0), &CHECKPOINT_CONTEXT, rng).is_err());
    }

    #[test]
    #[ignore]
    fn runs_setup() {
        let rng = &mut rand::thread_rng();
        let parameters = trusted_setup(CircuitConfig::new(2), &CHECKPOINT_CONTEXT, rng).unwrap();
        // one extra element for the constant input
        assert_eq!(parameters.vk.gamma_abc_g1.len(), 9);
    }
}
