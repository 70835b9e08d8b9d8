use crate::{
    curve::to_affine_coordinates,
    limbs::LimbsGadget,
    utils::{bool_hint, hint},
};
use ark_ec::models::{ModelParameters, SWModelParameters};
use ark_ff::{BitIteratorLE, PrimeField, SquareRootField};
use ark_r1cs_std::{
    boolean::Boolean,
    eq::EqGadget,
    fields::{fp::FpVar, FieldVar},
    groups::{curves::short_weierstrass::ProjectiveVar, CurveVar},
    R1CSVar, ToBitsGadget,
};
use ark_relations::r1cs::SynthesisError;
use checkpoint_crypto::{
    hash_to_curve::{svdw, SvdwMap, SvdwParameters},
    LimbLayout,
};
use tracing::{debug, span, trace, Level};

type PointVar<P> = ProjectiveVar<P, FpVar<<P as ModelParameters>::BaseField>>;

/// Maps base field elements onto the prime order subgroup of a short Weierstrass curve,
/// mirroring `checkpoint_crypto::hash_to_curve::SvdwMap`.
///
/// Square roots, inverses and the quadratic residuosity of the candidate abscissas are
/// supplied by the prover and checked by multiplication. A non-square `g(x)` is shown by a
/// square root of `n * g(x)` for the map's fixed non-residue `n`.
pub struct MapToGroupGadget<P: SWModelParameters> {
    params: SvdwParameters<P::BaseField>,
}

impl<P> MapToGroupGadget<P>
where
    P: SWModelParameters,
    P::BaseField: PrimeField + SquareRootField,
{
    pub fn new(map: &SvdwMap<P>) -> Self {
        MapToGroupGadget {
            params: *map.parameters(),
        }
    }

    /// Maps `u` onto the curve, returning affine coordinates
    #[tracing::instrument(target = "r1cs", skip(self, u))]
    pub fn map_to_curve(
        &self,
        u: &FpVar<P::BaseField>,
    ) -> Result<(FpVar<P::BaseField>, FpVar<P::BaseField>), SynthesisError> {
        let params = &self.params;
        let cs = u.cs();

        let tv1 = u.square()? * params.c1;
        let tv2 = FpVar::one() + &tv1;
        let tv1 = FpVar::one() - &tv1;
        let tv3 = inv0(&(&tv1 * &tv2))?;
        let tv4 = u * &tv1 * &tv3 * params.c3;
        let x1 = FpVar::constant(params.c2) - &tv4;
        let x2 = FpVar::constant(params.c2) + &tv4;
        let x3 = (tv2.square()? * &tv3).square()? * params.c4 + params.z;

        trace!("selecting the first abscissa with a square image");
        let e1 = self.enforce_residuosity(&x1)?;
        let e2 = self.enforce_residuosity(&x2)?;
        let x = e1.select(&x1, &e2.select(&x2, &x3)?)?;

        let gx = curve_rhs::<P>(&x)?;
        let y = hint(&cs, || {
            let u = u.value()?;
            let mut y = svdw::curve_rhs::<P>(&x.value()?)
                .sqrt()
                .ok_or(SynthesisError::AssignmentMissing)?;
            if svdw::sgn0(&y) != svdw::sgn0(&u) {
                y = -y;
            }
            Ok(y)
        })?;
        y.square()?.enforce_equal(&gx)?;

        // sgn0(y) == sgn0(u)
        let y_parity = &y.to_bits_le()?[0];
        let u_parity = &u.to_bits_le()?[0];
        y_parity.enforce_equal(u_parity)?;

        Ok((x, y))
    }

    /// Maps `u` onto the prime order subgroup. The identity has no affine coordinates and
    /// leaves the constraint system unsatisfied.
    #[tracing::instrument(target = "r1cs", skip(self, u))]
    pub fn map_to_group(
        &self,
        u: &FpVar<P::BaseField>,
    ) -> Result<(FpVar<P::BaseField>, FpVar<P::BaseField>), SynthesisError> {
        let (x, y) = self.map_to_curve(u)?;
        let point = PointVar::<P>::new(x, y, FpVar::one());

        trace!("scaling by cofactor");
        let cofactor_bits = BitIteratorLE::new(P::COFACTOR)
            .map(Boolean::constant)
            .collect::<Vec<_>>();
        let scaled = point.scalar_mul_le(cofactor_bits.iter())?;

        to_affine_coordinates(&scaled)
    }

    /// Chord addition of two points with distinct abscissas. Equal abscissas leave the
    /// constraint system unsatisfied.
    pub fn add_affine(
        p: &(FpVar<P::BaseField>, FpVar<P::BaseField>),
        q: &(FpVar<P::BaseField>, FpVar<P::BaseField>),
    ) -> Result<(FpVar<P::BaseField>, FpVar<P::BaseField>), SynthesisError> {
        let (x1, y1) = p;
        let (x2, y2) = q;
        let lambda = (y2 - y1) * (x2 - x1).inverse()?;
        let x3 = lambda.square()? - x1 - x2;
        let y3 = lambda * (x1 - &x3) - y1;
        Ok((x3, y3))
    }

    /// Recomposes each limb group, maps it to the group and sums the points. The result is
    /// the message point of a signed checkpoint.
    #[tracing::instrument(target = "r1cs", skip(self, groups))]
    pub fn enforce_message_point(
        &self,
        groups: &[Vec<FpVar<P::BaseField>>],
        layout: LimbLayout,
    ) -> Result<PointVar<P>, SynthesisError> {
        let span = span!(Level::TRACE, "MapToGroupGadget_message_point");
        let _enter = span.enter();
        debug!("mapping {} limb groups to the curve", groups.len());

        let points = groups
            .iter()
            .map(|limbs| {
                let u = LimbsGadget::recompose(limbs, layout)?;
                self.map_to_group(&u)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (x, y) = match points.as_slice() {
            [point] => point.clone(),
            [first, second] => Self::add_affine(first, second)?,
            _ => return Err(SynthesisError::Unsatisfiable),
        };
        Ok(PointVar::<P>::new(x, y, FpVar::one()))
    }

    /// Returns whether `g(x)` is a square, proven either by a root of `g(x)` or by a root of
    /// `n * g(x)` for a non-zero `g(x)`.
    fn enforce_residuosity(
        &self,
        x: &FpVar<P::BaseField>,
    ) -> Result<Boolean<P::BaseField>, SynthesisError> {
        let cs = x.cs();
        let gx = curve_rhs::<P>(x)?;
        let is_square = bool_hint(&cs, || Ok(svdw::is_square(&gx.value()?)))?;

        let target = is_square.select(&gx, &(&gx * self.params.non_residue))?;
        let root = hint(&cs, || {
            target
                .value()?
                .sqrt()
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        root.square()?.enforce_equal(&target)?;
        // zero is a square, so it cannot be claimed as a non-square
        gx.conditional_enforce_not_equal(&FpVar::zero(), &is_square.not())?;

        Ok(is_square)
    }
}

/// `x^3 + Ax + B`
fn curve_rhs<P>(x: &FpVar<P::BaseField>) -> Result<FpVar<P::BaseField>, SynthesisError>
where
    P: SWModelParameters,
    P::BaseField: PrimeField,
{
    Ok((x.square()? + P::COEFF_A) * x + P::COEFF_B)
}

/// Inverse of `t`, or zero when `t` is zero
fn inv0<F: PrimeField>(t: &FpVar<F>) -> Result<FpVar<F>, SynthesisError> {
    let cs = t.cs();
    let is_zero = t.is_zero()?;
    let inverse = hint(&cs, || Ok(t.value()?.inverse().unwrap_or_else(F::zero)))?;
    t.mul_equals(&inverse, &FpVar::from(is_zero.not()))?;
    inverse.mul_equals(&FpVar::from(is_zero), &FpVar::zero())?;
    Ok(inverse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_helpers::{
        print_unsatisfied_constraints, run_profile_constraints, test_rng,
    };
    use ark_bls12_377::{g1::Parameters, Fq};
    use ark_ec::{short_weierstrass_jacobian::GroupAffine, AffineCurve, ProjectiveCurve};
    use ark_ff::{Field, UniformRand, Zero};
    use ark_r1cs_std::alloc::AllocVar;
    use ark_relations::r1cs::ConstraintSystem;
    use checkpoint_crypto::{
        codec,
        hash_to_curve::{add_affine, DIRECT_HASH_TO_G1},
        CHECKPOINT_CONTEXT, SIG_DOMAIN,
    };

    fn affine_value(point: &(FpVar<Fq>, FpVar<Fq>)) -> Result<GroupAffine<Parameters>, SynthesisError> {
        Ok(GroupAffine::new(point.0.value()?, point.1.value()?, false))
    }

    fn gadget() -> MapToGroupGadget<Parameters> {
        MapToGroupGadget::new(&CHECKPOINT_CONTEXT.map)
    }

    #[test]
    fn map_to_curve_matches_native() {
        run_profile_constraints(|| {
            let rng = &mut test_rng();
            let map = &CHECKPOINT_CONTEXT.map;
            let mut inputs = (0..4).map(|_| Fq::rand(rng)).collect::<Vec<_>>();
            // exceptional inputs
            inputs.push(Fq::zero());
            inputs.push(Fq::from(2u64).inverse().unwrap().sqrt().unwrap());
            for u in inputs {
                let cs = ConstraintSystem::<Fq>::new_ref();
                let u_var = FpVar::new_witness(cs.clone(), || Ok(u)).unwrap();
                let point = gadget().map_to_curve(&u_var).unwrap();
                print_unsatisfied_constraints(cs.clone());
                assert!(cs.is_satisfied().unwrap());
                assert_eq!(
                    affine_value(&point).unwrap(),
                    map.map_to_curve(&u).unwrap()
                );
            }
        });
    }

    #[test]
    fn map_to_group_matches_native() {
        run_profile_constraints(|| {
            let rng = &mut test_rng();
            let u = Fq::rand(rng);
            let cs = ConstraintSystem::<Fq>::new_ref();
            let u_var = FpVar::new_witness(cs.clone(), || Ok(u)).unwrap();
            let point = gadget().map_to_group(&u_var).unwrap();
            assert!(cs.is_satisfied().unwrap());
            assert_eq!(
                affine_value(&point).unwrap(),
                CHECKPOINT_CONTEXT.map.map_to_group(&u).unwrap()
            );
        });
    }

    #[test]
    fn wrong_sign_is_rejected() {
        run_profile_constraints(|| {
            let cs = ConstraintSystem::<Fq>::new_ref();
            let u = FpVar::new_witness(cs.clone(), || Ok(Fq::from(12345u64))).unwrap();
            let (x, y) = gadget().map_to_curve(&u).unwrap();
            assert!(cs.is_satisfied().unwrap());

            // -y is a root as well, but has the wrong parity
            let neg_y = FpVar::new_witness(cs.clone(), || Ok(-y.value()?)).unwrap();
            neg_y
                .square()
                .unwrap()
                .enforce_equal(&curve_rhs::<Parameters>(&x).unwrap())
                .unwrap();
            neg_y.to_bits_le().unwrap()[0]
                .enforce_equal(&u.to_bits_le().unwrap()[0])
                .unwrap();
            assert!(!cs.is_satisfied().unwrap());
        });
    }

    #[test]
    fn chord_addition_matches_native() {
        run_profile_constraints(|| {
            let rng = &mut test_rng();
            let map = &CHECKPOINT_CONTEXT.map;
            let p = map.map_to_group(&Fq::rand(rng)).unwrap();
            let q = map.map_to_group(&Fq::rand(rng)).unwrap();

            let cs = ConstraintSystem::<Fq>::new_ref();
            let alloc = |point: &GroupAffine<Parameters>| {
                (
                    FpVar::new_witness(cs.clone(), || Ok(point.x)).unwrap(),
                    FpVar::new_witness(cs.clone(), || Ok(point.y)).unwrap(),
                )
            };
            let sum = MapToGroupGadget::<Parameters>::add_affine(&alloc(&p), &alloc(&q)).unwrap();
            assert!(cs.is_satisfied().unwrap());
            assert_eq!(affine_value(&sum).unwrap(), add_affine(&p, &q).unwrap());
            assert_eq!(
                affine_value(&sum).unwrap(),
                (p.into_projective() + q.into_projective()).into_affine()
            );
        });
    }

    #[test]
    fn chord_addition_of_equal_x_is_unsatisfiable() {
        run_profile_constraints(|| {
            let p = CHECKPOINT_CONTEXT.map.map_to_group(&Fq::from(7u64)).unwrap();
            let cs = ConstraintSystem::<Fq>::new_ref();
            let x = FpVar::new_witness(cs.clone(), || Ok(p.x)).unwrap();
            let y = FpVar::new_witness(cs.clone(), || Ok(p.y)).unwrap();
            let point = (x, y);
            MapToGroupGadget::<Parameters>::add_affine(&point, &point).unwrap();
            assert!(!cs.is_satisfied().unwrap());
        });
    }

    #[test]
    fn message_point_matches_native_hash() {
        run_profile_constraints(|| {
            let hasher = &*DIRECT_HASH_TO_G1;
            let layout = hasher.layout();
            let groups = hasher.hash_to_limbs(SIG_DOMAIN, b"checkpoint", &[]).unwrap();

            let cs = ConstraintSystem::<Fq>::new_ref();
            let group_vars = groups
                .iter()
                .map(|limbs| {
                    limbs
                        .iter()
                        .map(|limb| FpVar::new_input(cs.clone(), || Ok(*limb)).unwrap())
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();
            let point = gadget().enforce_message_point(&group_vars, layout).unwrap();

            print_unsatisfied_constraints(cs.clone());
            assert!(cs.is_satisfied().unwrap());
            assert_eq!(
                point.value().unwrap(),
                hasher.hash_limbs(&groups).unwrap().into_projective()
            );
            // sanity check on the limbs themselves
            assert!(codec::recompose(&groups[0], layout).is_ok());
        });
    }
}
