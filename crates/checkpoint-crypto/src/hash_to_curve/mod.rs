//! Hashing checkpoint messages to G1.
//!
//! A message is first expanded with an XOF into one or two limb groups (this is what the
//! circuit receives as public input), every group is recomposed into a base field element,
//! each element is mapped to the curve with the Shallue–van de Woestijne map and the cofactor
//! is cleared. Two resulting points are summed with the chord rule.
//!
//! # Examples
//!
//! ```rust
//! use checkpoint_crypto::{SIG_DOMAIN, hash_to_curve::{HashToCurve, DIRECT_HASH_TO_G1}};
//!
//! // Instantiate the lazily evaluated hasher to BLS 12-377.
//! let hasher = &*DIRECT_HASH_TO_G1;
//!
//! // Hash the data. The domain must be at most 8 bytes.
//! let hash = hasher.hash(SIG_DOMAIN, &b"some_data"[..], &b"extra"[..]).expect("should not fail");
//! ```
pub mod svdw;
pub use svdw::{add_affine, SvdwMap, SvdwParameters};

use crate::{
    codec::{self, LimbLayout},
    hashers::{DirectHasher, Hasher},
    BLSError, BlsResult,
};

use ark_bls12_377::{g1::Parameters as G1Parameters, Fq};
use ark_ec::models::{
    short_weierstrass_jacobian::{GroupAffine, GroupProjective},
    SWModelParameters,
};
use ark_ec::AffineCurve;
use ark_ff::{PrimeField, SquareRootField};
use ark_std::{end_timer, start_timer};
use log::trace;
use once_cell::sync::Lazy;

/// Direct (Blake2s CRH, Blake2Xs XOF) SvdW hasher for BLS 12-377 G1, expanding messages into
/// two 512-bit limb groups.
pub static DIRECT_HASH_TO_G1: Lazy<SvdwHashToCurve<DirectHasher, G1Parameters>> = Lazy::new(|| {
    SvdwHashToCurve::new(DirectHasher, LimbLayout::Expanded512, 2)
        .expect("SvdW constants exist for the BLS12-377 G1 curve")
});

/// Trait for hashing arbitrary data to a group element on an elliptic curve
pub trait HashToCurve {
    /// The type of the curve being used.
    type Output;

    /// Given a domain separator, a message and potentially some extra data, produces
    /// a hash of them which is a curve point.
    fn hash(
        &self,
        domain: &[u8],
        message: &[u8],
        extra_data: &[u8],
    ) -> Result<Self::Output, BLSError>;
}

/// Expands messages into limb groups and maps them to the curve
pub struct SvdwHashToCurve<H, P: SWModelParameters> {
    hasher: H,
    map: SvdwMap<P>,
    layout: LimbLayout,
    groups: usize,
}

impl<H, P> SvdwHashToCurve<H, P>
where
    H: Hasher<Error = BLSError>,
    P: SWModelParameters,
    P::BaseField: PrimeField + SquareRootField,
{
    /// `groups` must be 1 or 2
    pub fn new(hasher: H, layout: LimbLayout, groups: usize) -> BlsResult<Self> {
        if groups == 0 || groups > 2 {
            return Err(BLSError::LimbCountMismatch {
                expected: 2,
                got: groups,
            });
        }
        Ok(SvdwHashToCurve {
            hasher,
            map: SvdwMap::new()?,
            layout,
            groups,
        })
    }

    pub fn map(&self) -> &SvdwMap<P> {
        &self.map
    }

    pub fn layout(&self) -> LimbLayout {
        self.layout
    }

    /// Expands `extra_data || message` and splits the output into big-endian limb groups
    pub fn hash_to_limbs(
        &self,
        domain: &[u8],
        message: &[u8],
        extra_data: &[u8],
    ) -> BlsResult<Vec<Vec<P::BaseField>>> {
        let input = [extra_data, message].concat();
        let expanded = self
            .hasher
            .hash(domain, &input, self.groups * self.layout.byte_len())?;
        expanded
            .chunks(self.layout.byte_len())
            .map(|chunk| codec::limbs_from_be_bytes(chunk, self.layout))
            .collect()
    }

    /// Maps already expanded limb groups to the curve
    pub fn hash_limbs(&self, groups: &[Vec<P::BaseField>]) -> BlsResult<GroupAffine<P>> {
        map_limb_groups(&self.map, groups, self.layout)
    }
}

/// Recomposes each limb group, maps it to the prime order subgroup and sums the results with
/// the chord rule. One or two groups are accepted.
pub fn map_limb_groups<P>(
    map: &SvdwMap<P>,
    groups: &[Vec<P::BaseField>],
    layout: LimbLayout,
) -> BlsResult<GroupAffine<P>>
where
    P: SWModelParameters,
    P::BaseField: PrimeField + SquareRootField,
{
    let points = groups
        .iter()
        .map(|limbs| {
            let u = codec::recompose(limbs, layout)?;
            map.map_to_group(&u)
        })
        .collect::<BlsResult<Vec<_>>>()?;

    match points.as_slice() {
        [point] => Ok(*point),
        [first, second] => add_affine(first, second),
        _ => Err(BLSError::LimbCountMismatch {
            expected: 2,
            got: points.len(),
        }),
    }
}

impl<H, P> HashToCurve for SvdwHashToCurve<H, P>
where
    H: Hasher<Error = BLSError>,
    P: SWModelParameters,
    P::BaseField: PrimeField + SquareRootField,
{
    type Output = GroupProjective<P>;

    fn hash(
        &self,
        domain: &[u8],
        message: &[u8],
        extra_data: &[u8],
    ) -> Result<Self::Output, BLSError> {
        let hash_time = start_timer!(|| "svdw::hash");
        let groups = self.hash_to_limbs(domain, message, extra_data)?;
        trace!("hashing {} limb groups to the curve", groups.len());
        let point = self.hash_limbs(&groups)?.into_projective();
        end_timer!(hash_time);
        Ok(point)
    }
}

/// Hashes to the limb groups carried as the circuit's public input
pub fn hash_to_limbs(domain: &[u8], message: &[u8], extra_data: &[u8]) -> BlsResult<Vec<Vec<Fq>>> {
    DIRECT_HASH_TO_G1.hash_to_limbs(domain, message, extra_data)
}
