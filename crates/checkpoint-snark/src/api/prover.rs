use super::setup::Parameters;
use crate::{checkpoint::SignedCheckpoint, BWCurve};

use ark_groth16::{create_random_proof, Proof as Groth16Proof};
use ark_relations::r1cs::SynthesisError;
use ark_std::{end_timer, start_timer};
use checkpoint_crypto::CheckpointContext;
use rand::Rng;
use tracing::{error, info, span, Level};

/// Given the SNARK's Public Parameters and a signed checkpoint, generates a SNARK which proves
/// that a quorum of the committee signed the checkpoint's message. The proof can then be
/// verified with only the message limbs, the committee root and the signed stake.
///
/// A checkpoint which would not pass `SignedCheckpoint::verify` still produces a proof, but
/// one that does not verify.
pub fn prove<R: Rng>(
    parameters: &Parameters<BWCurve>,
    context: &CheckpointContext,
    checkpoint: &SignedCheckpoint,
    rng: &mut R,
) -> Result<Groth16Proof<BWCurve>, SynthesisError> {
    info!(
        "Generating proof for a committee of {} validators ({} signed)",
        checkpoint.committee.len(),
        checkpoint.bitmap.iter().filter(|signed| **signed).count(),
    );

    let span = span!(Level::TRACE, "prove");
    let _enter = span.enter();

    let circuit = checkpoint.to_circuit(context).map_err(|err| {
        error!("could not assign the circuit: {}", err);
        SynthesisError::Unsatisfiable
    })?;

    info!("proving");
    let prover_time = start_timer!(|| "committee signature proof");
    let proof = create_random_proof(circuit, parameters, rng)?;
    end_timer!(prover_time);
    info!("proved");

    Ok(proof)
}
