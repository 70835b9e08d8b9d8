use crate::{BLSError, BlsResult};

use ark_ec::{
    models::{short_weierstrass_jacobian::GroupAffine, SWModelParameters},
    AffineCurve, ProjectiveCurve,
};
use ark_ff::{BigInteger, Field, One, PrimeField, SquareRootField, Zero};
use log::trace;
use std::{fmt, marker::PhantomData};

/// Candidates tried when searching for `Z` and for a quadratic non-residue
const MAX_SEARCH: u64 = 256;

/// Constants of the Shallue–van de Woestijne map for `y^2 = x^3 + Ax + B`
/// (RFC 9380, section 6.6.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SvdwParameters<F> {
    pub z: F,
    /// `g(Z)`
    pub c1: F,
    /// `-Z / 2`
    pub c2: F,
    /// `sqrt(-g(Z) * (3Z^2 + 4A))`, with `sgn0(c3) = 0`
    pub c3: F,
    /// `-4g(Z) / (3Z^2 + 4A)`
    pub c4: F,
    /// Smallest quadratic non-residue. Non-squares are proven in-circuit by exhibiting a
    /// square root of `non_residue * v`.
    pub non_residue: F,
}

/// Deterministic map from a base field element onto a short Weierstrass curve.
pub struct SvdwMap<P: SWModelParameters> {
    params: SvdwParameters<P::BaseField>,
    curve_params: PhantomData<P>,
}

impl<P: SWModelParameters> Clone for SvdwMap<P> {
    fn clone(&self) -> Self {
        SvdwMap {
            params: self.params,
            curve_params: PhantomData,
        }
    }
}

impl<P: SWModelParameters> fmt::Debug for SvdwMap<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvdwMap")
            .field("params", &self.params)
            .finish()
    }
}

impl<P> SvdwMap<P>
where
    P: SWModelParameters,
    P::BaseField: PrimeField + SquareRootField,
{
    /// Derives the map constants from the curve coefficients
    pub fn new() -> BlsResult<Self> {
        let z = find_z::<P>()?;
        let gz = curve_rhs::<P>(&z);
        let denominator = P::BaseField::from(3u64) * z.square() + P::BaseField::from(4u64) * P::COEFF_A;
        let two_inv = P::BaseField::from(2u64)
            .inverse()
            .ok_or(BLSError::HashToCurveError)?;

        let mut c3 = (-(gz * denominator))
            .sqrt()
            .ok_or(BLSError::HashToCurveError)?;
        if sgn0(&c3) {
            c3 = -c3;
        }
        let c4 = -(gz * P::BaseField::from(4u64))
            * denominator.inverse().ok_or(BLSError::HashToCurveError)?;

        let params = SvdwParameters {
            z,
            c1: gz,
            c2: -(z * two_inv),
            c3,
            c4,
            non_residue: find_non_residue::<P::BaseField>()?,
        };
        trace!("derived svdw parameters: {:?}", params);

        Ok(SvdwMap {
            params,
            curve_params: PhantomData,
        })
    }

    pub fn parameters(&self) -> &SvdwParameters<P::BaseField> {
        &self.params
    }

    /// Maps `u` onto the curve. The result is on the curve but not necessarily in the
    /// prime order subgroup.
    pub fn map_to_curve(&self, u: &P::BaseField) -> BlsResult<GroupAffine<P>> {
        let params = &self.params;
        let one = P::BaseField::one();

        let tv1 = u.square() * params.c1;
        let tv2 = one + tv1;
        let tv1 = one - tv1;
        let tv3 = inv0(tv1 * tv2);
        let tv4 = *u * tv1 * tv3 * params.c3;
        let x1 = params.c2 - tv4;
        let x2 = params.c2 + tv4;
        let x3 = (tv2.square() * tv3).square() * params.c4 + params.z;

        let x = if is_square(&curve_rhs::<P>(&x1)) {
            x1
        } else if is_square(&curve_rhs::<P>(&x2)) {
            x2
        } else {
            x3
        };

        let mut y = curve_rhs::<P>(&x)
            .sqrt()
            .ok_or(BLSError::HashToCurveError)?;
        if sgn0(u) != sgn0(&y) {
            y = -y;
        }

        Ok(GroupAffine::new(x, y, false))
    }

    /// Maps `u` onto the prime order subgroup by clearing the cofactor of `map_to_curve(u)`.
    /// The identity is rejected.
    pub fn map_to_group(&self, u: &P::BaseField) -> BlsResult<GroupAffine<P>> {
        let point = self.map_to_curve(u)?.mul_by_cofactor_to_projective();
        if point.is_zero() {
            return Err(BLSError::HashToCurveError);
        }
        Ok(point.into_affine())
    }
}

/// Adds two distinct affine points with the chord rule.
///
/// Callers must guarantee `p.x != q.x`; equal abscissas (doubling or opposite points) and
/// points at infinity are rejected rather than handled.
pub fn add_affine<P: SWModelParameters>(
    p: &GroupAffine<P>,
    q: &GroupAffine<P>,
) -> BlsResult<GroupAffine<P>> {
    if p.infinity || q.infinity {
        return Err(BLSError::HashToCurveError);
    }
    let dx_inv = (q.x - p.x).inverse().ok_or(BLSError::HashToCurveError)?;
    let lambda = (q.y - p.y) * dx_inv;
    let x3 = lambda.square() - p.x - q.x;
    let y3 = lambda * (p.x - x3) - p.y;
    Ok(GroupAffine::new(x3, y3, false))
}

/// `x^3 + Ax + B`
pub fn curve_rhs<P: SWModelParameters>(x: &P::BaseField) -> P::BaseField {
    (x.square() + P::COEFF_A) * x + P::COEFF_B
}

/// Parity of the canonical integer representative
pub fn sgn0<F: PrimeField>(f: &F) -> bool {
    f.into_repr().is_odd()
}

/// Zero counts as a square
pub fn is_square<F: SquareRootField>(f: &F) -> bool {
    !f.legendre().is_qnr()
}

fn inv0<F: Field>(f: F) -> F {
    f.inverse().unwrap_or_else(F::zero)
}

/// `find_z_svdw` from RFC 9380, appendix H.1
fn find_z<P>() -> BlsResult<P::BaseField>
where
    P: SWModelParameters,
    P::BaseField: PrimeField + SquareRootField,
{
    let two = P::BaseField::from(2u64);
    let three = P::BaseField::from(3u64);
    let four = P::BaseField::from(4u64);
    for ctr in 1..=MAX_SEARCH {
        let ctr = P::BaseField::from(ctr);
        for candidate in &[ctr, -ctr] {
            let gz = curve_rhs::<P>(candidate);
            if gz.is_zero() {
                continue;
            }
            let h = match (four * gz).inverse() {
                Some(inv) => -(three * candidate.square() + four * P::COEFF_A) * inv,
                None => continue,
            };
            if h.is_zero() || !is_square(&h) {
                continue;
            }
            let half = match two.inverse() {
                Some(inv) => -(*candidate * inv),
                None => continue,
            };
            if is_square(&gz) || is_square(&curve_rhs::<P>(&half)) {
                return Ok(*candidate);
            }
        }
    }
    Err(BLSError::HashToCurveError)
}

fn find_non_residue<F: PrimeField + SquareRootField>() -> BlsResult<F> {
    (2..MAX_SEARCH)
        .map(F::from)
        .find(|candidate| candidate.legendre().is_qnr())
        .ok_or(BLSError::HashToCurveError)
}
