mod committee_sig;
pub use committee_sig::CommitteeSigCircuit;

use ark_bw6_761::Fr;
use ark_r1cs_std::fields::fp::FpVar;

type FrVar = FpVar<Fr>;
