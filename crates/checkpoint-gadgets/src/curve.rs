use ark_ec::{bls12::Bls12Parameters, ProjectiveCurve, SWModelParameters};
use ark_ff::{BitIteratorBE, Field, One, PrimeField};
use ark_r1cs_std::{
    alloc::AllocVar,
    eq::EqGadget,
    fields::{FieldOpsBounds, FieldVar},
    groups::{bls12::G1Var, curves::short_weierstrass::ProjectiveVar, CurveVar},
    R1CSVar,
};
use ark_relations::r1cs::SynthesisError;

/// Enforces `Y^2 Z = X^3 + a X Z^2 + b Z^3`.
#[tracing::instrument(target = "r1cs", skip(point))]
pub fn enforce_on_curve<C, FV>(point: &ProjectiveVar<C, FV>) -> Result<(), SynthesisError>
where
    C: SWModelParameters,
    FV: FieldVar<C::BaseField, <C::BaseField as Field>::BasePrimeField>,
    for<'a> &'a FV: FieldOpsBounds<'a, C::BaseField, FV>,
{
    let x2 = point.x.square()?;
    let z2 = point.z.square()?;
    let lhs = point.y.square()? * &point.z;
    let rhs = (x2 + &z2 * C::COEFF_A) * &point.x + z2 * &point.z * C::COEFF_B;
    lhs.enforce_equal(&rhs)
}

/// Affine `(x, y)` of a point. Taking the inverse of `Z` leaves the constraint system
/// unsatisfied for the point at infinity.
pub fn to_affine_coordinates<C, FV>(point: &ProjectiveVar<C, FV>) -> Result<(FV, FV), SynthesisError>
where
    C: SWModelParameters,
    FV: FieldVar<C::BaseField, <C::BaseField as Field>::BasePrimeField>,
    for<'a> &'a FV: FieldOpsBounds<'a, C::BaseField, FV>,
{
    let z_inv = point.z.inverse()?;
    Ok((&point.x * &z_inv, &point.y * &z_inv))
}

/// Enforces that a G1 point lies in the prime order subgroup. The point is compared with
/// its cofactor cleared allocation, `h * (h^-1 mod r) * P`, which agrees with `P` only on
/// subgroup points.
#[tracing::instrument(target = "r1cs", skip(point))]
pub fn enforce_g1_subgroup<P: Bls12Parameters>(point: &G1Var<P>) -> Result<(), SynthesisError> {
    let cs = point.cs();
    if cs.is_none() {
        let value = point.value()?.into_affine();
        return if value.is_in_correct_subgroup_assuming_on_curve() {
            Ok(())
        } else {
            Err(SynthesisError::Unsatisfiable)
        };
    }
    let cleared = G1Var::<P>::new_witness(ark_relations::ns!(cs, "cofactor cleared"), || {
        point.value()
    })?;
    point.enforce_equal(&cleared)
}

/// Enforces `[r - 1] P = -P`, which holds exactly on the prime order subgroup. The double
/// and add runs on the complete projective formulas, so the curve order must be odd (the
/// BLS12-377 G2 twist is).
#[tracing::instrument(target = "r1cs", skip(point))]
pub fn enforce_prime_order<C, FV>(point: &ProjectiveVar<C, FV>) -> Result<(), SynthesisError>
where
    C: SWModelParameters,
    FV: FieldVar<C::BaseField, <C::BaseField as Field>::BasePrimeField>,
    for<'a> &'a FV: FieldOpsBounds<'a, C::BaseField, FV>,
{
    let r_minus_one = (-C::ScalarField::one()).into_repr();
    let mut result = ProjectiveVar::<C, FV>::zero();
    for bit in BitIteratorBE::without_leading_zeros(r_minus_one) {
        result.double_in_place()?;
        if bit {
            result += point;
        }
    }
    result.enforce_equal(&point.negate()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_helpers::{print_unsatisfied_constraints, run_profile_constraints};
    use ark_bls12_377::{
        constraints::{G1Var, G2Var},
        g1::Parameters as G1Parameters,
        g2::Parameters as G2Parameters,
        Fq, G1Projective, G2Projective,
    };
    use ark_ff::UniformRand;
    use ark_r1cs_std::{alloc::AllocationMode, fields::fp::FpVar};
    use ark_relations::r1cs::ConstraintSystem;
    use checkpoint_crypto::test_helpers::{off_subgroup_point, torsion_point};

    #[test]
    fn group_elements_are_on_curve() {
        run_profile_constraints(|| {
            let rng = &mut rand::thread_rng();
            let cs = ConstraintSystem::<Fq>::new_ref();
            let p = G1Var::new_witness(cs.clone(), || Ok(G1Projective::rand(rng))).unwrap();
            let q = G2Var::new_witness(cs.clone(), || Ok(G2Projective::rand(rng))).unwrap();
            enforce_on_curve(&p).unwrap();
            enforce_on_curve(&q).unwrap();
            enforce_on_curve(&(p.clone() + &p)).unwrap();
            print_unsatisfied_constraints(cs.clone());
            assert!(cs.is_satisfied().unwrap());
        });
    }

    #[test]
    fn off_curve_point_is_rejected() {
        run_profile_constraints(|| {
            let cs = ConstraintSystem::<Fq>::new_ref();
            let coordinate = |v: u64| FpVar::new_witness(cs.clone(), || Ok(Fq::from(v))).unwrap();
            // (1, 1) is not on y^2 = x^3 + 1
            let point = G1Var::new(coordinate(1), coordinate(1), coordinate(1));
            enforce_on_curve(&point).unwrap();
            assert!(!cs.is_satisfied().unwrap());
        });
    }

    #[test]
    fn affine_coordinates_match_native() {
        run_profile_constraints(|| {
            let rng = &mut rand::thread_rng();
            let cs = ConstraintSystem::<Fq>::new_ref();
            let g = G2Projective::rand(rng);
            // non-normalized Z
            let p = G2Var::new_witness(cs.clone(), || Ok(g.double())).unwrap();
            let (x, y) = to_affine_coordinates(&p).unwrap();
            let expected = g.double().into_affine();
            assert!(cs.is_satisfied().unwrap());
            assert_eq!(x.value().unwrap(), expected.x);
            assert_eq!(y.value().unwrap(), expected.y);
        });
    }

    #[test]
    fn identity_has_no_affine_coordinates() {
        let cs = ConstraintSystem::<Fq>::new_ref();
        let zero = FpVar::new_witness(cs.clone(), || Ok(Fq::from(0u64))).unwrap();
        let one = FpVar::new_witness(cs.clone(), || Ok(Fq::one())).unwrap();
        let identity = G1Var::new(zero.clone(), one, zero);
        to_affine_coordinates(&identity).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn subgroup_points_pass_the_subgroup_checks() {
        run_profile_constraints(|| {
            let rng = &mut rand::thread_rng();
            let cs = ConstraintSystem::<Fq>::new_ref();
            let p = G1Var::new_variable_omit_prime_order_check(
                cs.clone(),
                || Ok(G1Projective::rand(rng)),
                AllocationMode::Witness,
            )
            .unwrap();
            let q = G2Var::new_variable_omit_prime_order_check(
                cs.clone(),
                || Ok(G2Projective::rand(rng)),
                AllocationMode::Witness,
            )
            .unwrap();
            enforce_g1_subgroup::<ark_bls12_377::Parameters>(&p).unwrap();
            enforce_prime_order(&q).unwrap();
            enforce_prime_order(&G2Var::zero()).unwrap();
            print_unsatisfied_constraints(cs.clone());
            assert!(cs.is_satisfied().unwrap());
        });
    }

    #[test]
    fn g1_torsion_component_is_rejected() {
        run_profile_constraints(|| {
            let rng = &mut rand::thread_rng();
            let cs = ConstraintSystem::<Fq>::new_ref();
            let point = G1Projective::rand(rng) + torsion_point::<G1Parameters>();
            let p = G1Var::new_variable_omit_prime_order_check(
                cs.clone(),
                || Ok(point),
                AllocationMode::Witness,
            )
            .unwrap();
            enforce_on_curve(&p).unwrap();
            enforce_g1_subgroup::<ark_bls12_377::Parameters>(&p).unwrap();
            assert!(!cs.is_satisfied().unwrap());
        });
    }

    #[test]
    fn g2_point_outside_subgroup_is_rejected() {
        run_profile_constraints(|| {
            let cs = ConstraintSystem::<Fq>::new_ref();
            let q = G2Var::new_variable_omit_prime_order_check(
                cs.clone(),
                || Ok(off_subgroup_point::<G2Parameters>()),
                AllocationMode::Witness,
            )
            .unwrap();
            enforce_prime_order(&q).unwrap();
            assert!(!cs.is_satisfied().unwrap());
        });
    }
}
