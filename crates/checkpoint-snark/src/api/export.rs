use crate::BWCurve;
use ark_bw6_761::Fq;
use ark_ff::{BigInteger, PrimeField};
use ark_groth16::Proof;

/// Integer representation of a BW6-761 base field element
pub type ExportedInteger = <Fq as PrimeField>::BigInt;

/// A Groth16 proof flattened to the affine coordinates of its three points.
///
/// BW6-761's G2 lives over the base field, so `B` is two integers like `A` and `C`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedProof {
    pub a: [ExportedInteger; 2],
    pub b: [ExportedInteger; 2],
    pub c: [ExportedInteger; 2],
}

impl ExportedProof {
    /// `A.x, A.y, B.x, B.y, C.x, C.y`
    pub fn to_integers(&self) -> Vec<ExportedInteger> {
        [self.a, self.b, self.c].concat()
    }

    /// The integers of `to_integers`, each as a fixed width big-endian byte string
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.to_integers()
            .iter()
            .flat_map(|integer| integer.to_bytes_be())
            .collect()
    }
}

/// Flattens `proof` for consumers outside of arkworks, such as an on-chain verifier
pub fn export_proof(proof: &Proof<BWCurve>) -> ExportedProof {
    ExportedProof {
        a: [proof.a.x.into_repr(), proof.a.y.into_repr()],
        b: [proof.b.x.into_repr(), proof.b.y.into_repr()],
        c: [proof.c.x.into_repr(), proof.c.y.into_repr()],
    }
}
