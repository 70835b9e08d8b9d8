use crate::{
    hash_to_curve::DIRECT_HASH_TO_G1, BlsResult, Committee, CommitteeMember, PrivateKey,
    Signature,
};
use ark_ec::{
    short_weierstrass_jacobian::{GroupAffine, GroupProjective},
    AffineCurve, PairingEngine, ProjectiveCurve, SWModelParameters,
};
use ark_ff::{FpParameters, One, PrimeField, UniformRand, Zero};

// Same RNG for all tests
pub fn rng() -> rand::rngs::ThreadRng {
    rand::thread_rng()
}

/// generate a keypair
pub fn keygen<E: PairingEngine>() -> (E::Fr, E::G2Projective) {
    let rng = &mut rng();
    let generator = E::G2Projective::prime_subgroup_generator();

    let secret_key = E::Fr::rand(rng);
    let pubkey = generator.mul(secret_key.into_repr());
    (secret_key, pubkey)
}

/// generate N keypairs
pub fn keygen_mul<E: PairingEngine>(num: usize) -> (Vec<E::Fr>, Vec<E::G2Projective>) {
    (0..num).map(|_| keygen::<E>()).unzip()
}

/// sum the elements in the provided slice
pub fn sum<P: ProjectiveCurve>(elements: &[P]) -> P {
    elements.iter().fold(P::zero(), |acc, key| acc + key)
}

// signs a message with a vector of secret keys and returns the list of sigs + the agg sig
pub fn sign<E: PairingEngine>(
    message_hash: E::G1Projective,
    secret_keys: &[E::Fr],
) -> (Vec<E::G1Projective>, E::G1Projective) {
    let sigs = secret_keys
        .iter()
        .map(|key| message_hash.mul(key.into_repr()))
        .collect::<Vec<_>>();
    let asig = sigs
        .iter()
        .fold(E::G1Projective::zero(), |acc, sig| acc + sig);
    (sigs, asig)
}

/// A point on the curve of `P` outside of its prime order subgroup
pub fn off_subgroup_point<P: SWModelParameters>() -> GroupProjective<P> {
    let mut x = P::BaseField::one();
    loop {
        if let Some(point) = GroupAffine::<P>::get_point_from_x(x, false) {
            if !point.is_in_correct_subgroup_assuming_on_curve() {
                return point.into_projective();
            }
        }
        x += P::BaseField::one();
    }
}

/// A non-zero point whose order divides the cofactor
pub fn torsion_point<P: SWModelParameters>() -> GroupProjective<P> {
    off_subgroup_point::<P>().mul(<P::ScalarField as PrimeField>::Params::MODULUS)
}

/// A committee with fresh keys and the given stakes, along with its private keys
pub fn committee_with_stakes(stakes: &[u64]) -> BlsResult<(Committee, Vec<PrivateKey>)> {
    let rng = &mut rng();
    let secret_keys = stakes
        .iter()
        .map(|_| PrivateKey::generate(rng))
        .collect::<Vec<_>>();
    let members = secret_keys
        .iter()
        .zip(stakes)
        .map(|(sk, stake)| CommitteeMember::new(sk.to_public(), *stake))
        .collect();
    Ok((Committee::new(members)?, secret_keys))
}

/// Aggregate signature of the members flagged in `bitmap` over `message`
pub fn sign_with_bitmap(
    secret_keys: &[PrivateKey],
    bitmap: &[bool],
    message: &[u8],
    extra_data: &[u8],
) -> BlsResult<Signature> {
    let sigs = secret_keys
        .iter()
        .zip(bitmap)
        .filter(|(_, signed)| **signed)
        .map(|(sk, _)| sk.sign(message, extra_data, &*DIRECT_HASH_TO_G1))
        .collect::<BlsResult<Vec<_>>>()?;
    Ok(Signature::aggregate(&sigs))
}
