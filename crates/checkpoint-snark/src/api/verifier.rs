use crate::{checkpoint::PublicStatement, encoding::EncodingError, BWCurve};

use ark_groth16::{prepare_verifying_key, verify_proof, Proof, VerifyingKey};
use ark_relations::r1cs::SynthesisError;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
/// Error raised while verifying the SNARK proof
pub enum VerificationError {
    #[error("Verification failed")]
    VerificationFailed,
    #[error("Synthesis Error: {0}")]
    SynthesisError(#[from] SynthesisError),
    #[error("Encoding Error: {0}")]
    EncodingError(#[from] EncodingError),
}

/// Given the Verifying Key for the circuit, the SNARK proof and the public statement (message
/// limbs, committee root and signed stake), this function ensures that a quorum of the
/// committee signed the message.
pub fn verify(
    vk: &VerifyingKey<BWCurve>,
    statement: &PublicStatement,
    proof: &Proof<BWCurve>,
) -> Result<(), VerificationError> {
    info!("Verifying proof");
    let public_inputs = statement.to_field_elements();
    let expected = vk.gamma_abc_g1.len().saturating_sub(1);
    if public_inputs.len() != expected {
        return Err(EncodingError::PublicInputLength {
            expected,
            got: public_inputs.len(),
        }
        .into());
    }

    if verify_proof(&prepare_verifying_key(vk), proof, &public_inputs)? {
        Ok(())
    } else {
        Err(VerificationError::VerificationFailed)
    }
}
