//! Hash-to-field outputs reach the verifier as groups of big-endian limbs. This module is the
//! single place where those limbs are turned into field elements and back.
//!
//! A limb group is read most significant limb first. Internally the limbs are reversed and their
//! bits concatenated little-endian, after which the element is rebuilt as
//! `head * 256^CUTOFF_BYTES + tail`. Both halves are narrower than the field modulus, so the
//! recombination is exact.
use crate::{BLSError, BlsResult};
use ark_ff::{BigInteger, PrimeField};

/// Number of low-order bytes kept in the tail of a recombined element
pub const CUTOFF_BYTES: usize = 17;

/// Shape of a limb group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LimbLayout {
    /// Three 128-bit limbs carrying a 384-bit value. Each limb spans exactly two of the
    /// field's 64-bit little-endian words.
    Fp384,
    /// A 16-bit head limb followed by two 248-bit limbs, carrying a 512-bit value
    /// (one half of a 128-byte message expansion).
    Expanded512,
}

impl Default for LimbLayout {
    fn default() -> Self {
        LimbLayout::Expanded512
    }
}

impl LimbLayout {
    /// Bit width of each limb, most significant limb first
    pub fn widths(&self) -> &'static [usize] {
        match self {
            LimbLayout::Fp384 => &[128, 128, 128],
            LimbLayout::Expanded512 => &[16, 248, 248],
        }
    }

    pub fn num_limbs(&self) -> usize {
        self.widths().len()
    }

    pub fn total_bits(&self) -> usize {
        self.widths().iter().sum()
    }

    /// Number of big-endian bytes a limb group is read from
    pub fn byte_len(&self) -> usize {
        self.total_bits() / 8
    }
}

/// Splits `bytes`, a big-endian integer of exactly `layout.byte_len()` bytes, into its limbs.
pub fn limbs_from_be_bytes<F: PrimeField>(bytes: &[u8], layout: LimbLayout) -> BlsResult<Vec<F>> {
    if bytes.len() != layout.byte_len() {
        return Err(BLSError::LimbCountMismatch {
            expected: layout.byte_len(),
            got: bytes.len(),
        });
    }

    let mut limbs = Vec::with_capacity(layout.num_limbs());
    let mut offset = 0;
    for width in layout.widths() {
        let len = width / 8;
        limbs.push(F::from_be_bytes_mod_order(&bytes[offset..offset + len]));
        offset += len;
    }
    Ok(limbs)
}

/// Rebuilds the field element carried by a big-endian limb group.
///
/// Fails if the number of limbs does not match the layout or if any limb has a bit set above
/// its declared width.
pub fn recompose<F: PrimeField>(limbs: &[F], layout: LimbLayout) -> BlsResult<F> {
    if limbs.len() != layout.num_limbs() {
        return Err(BLSError::LimbCountMismatch {
            expected: layout.num_limbs(),
            got: limbs.len(),
        });
    }

    let mut bits = Vec::with_capacity(layout.total_bits());
    for (index, (limb, width)) in limbs.iter().zip(layout.widths()).enumerate().rev() {
        let limb_bits = limb.into_repr().to_bits_le();
        if limb_bits.iter().skip(*width).any(|bit| *bit) {
            return Err(BLSError::LimbOutOfRange {
                index,
                width: *width,
            });
        }
        bits.extend_from_slice(&limb_bits[..*width]);
    }

    Ok(combine_le_bits(&bits))
}

/// Splits a field element into the big-endian limbs of `layout`.
pub fn decompose<F: PrimeField>(value: &F, layout: LimbLayout) -> BlsResult<Vec<F>> {
    if F::size_in_bits() > layout.total_bits() {
        return Err(BLSError::LimbCountMismatch {
            expected: layout.total_bits(),
            got: F::size_in_bits(),
        });
    }

    let mut bits = value.into_repr().to_bits_le();
    bits.resize(layout.total_bits(), false);

    let mut limbs = Vec::with_capacity(layout.num_limbs());
    let mut rest = &bits[..];
    for width in layout.widths().iter().rev() {
        let (limb, tail) = rest.split_at(*width);
        limbs.push(F::from_le_bytes_mod_order(&le_bits_to_bytes(limb)));
        rest = tail;
    }
    limbs.reverse();
    Ok(limbs)
}

/// `head * 256^CUTOFF_BYTES + tail` over a little-endian bit vector
fn combine_le_bits<F: PrimeField>(bits: &[bool]) -> F {
    let (tail, head) = bits.split_at(CUTOFF_BYTES * 8);
    let tail = F::from_le_bytes_mod_order(&le_bits_to_bytes(tail));
    let head = F::from_le_bytes_mod_order(&le_bits_to_bytes(head));
    let shift = F::from(256u64).pow(&[CUTOFF_BYTES as u64]);
    head * shift + tail
}

/// Packs little-endian bits into little-endian bytes
fn le_bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, bit)| byte | ((*bit as u8) << i))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_377::Fq;
    use ark_ff::{Field, One, UniformRand, Zero};
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn rng() -> XorShiftRng {
        XorShiftRng::seed_from_u64(17)
    }

    #[test]
    fn round_trip() {
        let rng = &mut rng();
        for layout in &[LimbLayout::Fp384, LimbLayout::Expanded512] {
            for value in &[Fq::zero(), Fq::one(), -Fq::one(), Fq::rand(rng), Fq::rand(rng)] {
                let limbs = decompose(value, *layout).unwrap();
                assert_eq!(limbs.len(), 3);
                assert_eq!(recompose(&limbs, *layout).unwrap(), *value);
            }
        }
    }

    #[test]
    fn bytes_match_big_endian_integer() {
        let rng = &mut rng();
        for layout in &[LimbLayout::Fp384, LimbLayout::Expanded512] {
            let bytes = (0..layout.byte_len()).map(|_| rng.gen()).collect::<Vec<u8>>();
            let limbs = limbs_from_be_bytes::<Fq>(&bytes, *layout).unwrap();
            let expected = Fq::from_be_bytes_mod_order(&bytes);
            assert_eq!(recompose(&limbs, *layout).unwrap(), expected);
        }
    }

    #[test]
    fn expanded_head_limb_holds_two_bytes() {
        let mut bytes = vec![0u8; 64];
        bytes[0] = 0xab;
        bytes[1] = 0xcd;
        let limbs = limbs_from_be_bytes::<Fq>(&bytes, LimbLayout::Expanded512).unwrap();
        assert_eq!(limbs[0], Fq::from(0xabcdu64));
        assert!(limbs[1].is_zero());
        assert!(limbs[2].is_zero());
    }

    #[test]
    fn padding_bits_are_rejected() {
        let mut limbs = decompose(&Fq::from(5u64), LimbLayout::Expanded512).unwrap();
        // first bit above the 16-bit head
        limbs[0] += Fq::from(1u64 << 16);
        match recompose(&limbs, LimbLayout::Expanded512) {
            Err(BLSError::LimbOutOfRange { index, width }) => {
                assert_eq!(index, 0);
                assert_eq!(width, 16);
            }
            other => panic!("unexpected result {:?}", other),
        }

        let mut limbs = decompose(&Fq::from(5u64), LimbLayout::Fp384).unwrap();
        limbs[2] += Fq::from(2u64).pow(&[128u64]);
        assert!(recompose(&limbs, LimbLayout::Fp384).is_err());
    }

    #[test]
    fn wrong_limb_count_is_rejected() {
        let limbs = vec![Fq::one(); 2];
        assert!(matches!(
            recompose(&limbs, LimbLayout::Fp384),
            Err(BLSError::LimbCountMismatch {
                expected: 3,
                got: 2
            })
        ));
        assert!(limbs_from_be_bytes::<Fq>(&[0u8; 48], LimbLayout::Expanded512).is_err());
    }
}
