mod export;
pub use export::{export_proof, ExportedInteger, ExportedProof};

mod prover;
pub use prover::prove;

mod setup;
pub use setup::{setup, trusted_setup, Parameters};

mod verifier;
pub use verifier::{verify, VerificationError};
