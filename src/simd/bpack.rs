/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt::Debug;

/// A pack of boolean lanes.
///
/// Each lane is stored as an integer mask (`Self::Mask`) so that the pack
/// has the same layout as the comparison results of the matching
/// numeric pack.
pub trait BoolPack: Copy + Debug + PartialEq {
    /// Integer type of a single lane mask.
    type Mask: Copy + Debug + PartialEq;
    /// `[Self::Mask; Self::WIDTH]`
    type Masks: Copy + Debug + PartialEq + AsRef<[Self::Mask]>;

    const WIDTH: usize;

    fn all_false() -> Self;
    fn all_true() -> Self;
    fn splat(value: bool) -> Self;

    /// Reads `WIDTH` lanes from the front of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than `WIDTH`.
    fn load(src: &[bool]) -> Self;

    /// Writes `WIDTH` lanes to the front of `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is shorter than `WIDTH`.
    fn store(self, dst: &mut [bool]);

    #[inline(always)]
    fn set(&mut self, value: bool) { *self = Self::splat(value); }

    /// Lane `I`, where `I` must be less than `WIDTH`.
    fn extract<const I: usize>(self) -> bool;

    /// The first lane.
    fn to_scalar(self) -> bool;

    /// Whether every lane is true.
    fn all(self) -> bool;
    /// Whether any lane is true.
    fn any(self) -> bool;

    fn and(self, other: Self) -> Self;
    fn or(self, other: Self) -> Self;
    fn not(self) -> Self;

    fn masks(self) -> Self::Masks;
}

#[inline(always)]
fn mask_bit(mask: i64) -> bool { mask != 0 }

macro_rules! impl_bool_pack {
    ($BPack:ident, $Mask:ty, $width:expr, [$($lane:ident),+]) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $BPack([$Mask; $width]);

        impl $BPack {
            #[inline(always)]
            fn mask(value: bool) -> $Mask { -(value as $Mask) }

            /// Construct from individual lanes.
            #[inline(always)]
            pub fn new($($lane: bool),+) -> Self
            { $BPack([$(Self::mask($lane)),+]) }

            /// Overwrite every lane.
            #[inline(always)]
            pub fn set_lanes(&mut self, $($lane: bool),+)
            { *self = Self::new($($lane),+); }

            #[inline(always)]
            pub fn from_masks(masks: [$Mask; $width]) -> Self
            { $BPack(masks) }
        }

        impl Default for $BPack {
            fn default() -> Self { Self::all_false() }
        }

        impl BoolPack for $BPack {
            type Mask = $Mask;
            type Masks = [$Mask; $width];

            const WIDTH: usize = $width;

            #[inline(always)]
            fn all_false() -> Self { $BPack([0; $width]) }

            #[inline(always)]
            fn all_true() -> Self { $BPack([-1; $width]) }

            #[inline(always)]
            fn splat(value: bool) -> Self { $BPack([Self::mask(value); $width]) }

            #[inline(always)]
            fn load(src: &[bool]) -> Self {
                let src = &src[..$width];
                let mut out = [0; $width];
                for (o, &b) in out.iter_mut().zip(src) {
                    *o = Self::mask(b);
                }
                $BPack(out)
            }

            #[inline(always)]
            fn store(self, dst: &mut [bool]) {
                let dst = &mut dst[..$width];
                for (d, &m) in dst.iter_mut().zip(&self.0) {
                    *d = mask_bit(m as i64);
                }
            }

            #[inline(always)]
            fn extract<const I: usize>(self) -> bool { mask_bit(self.0[I] as i64) }

            #[inline(always)]
            fn to_scalar(self) -> bool { mask_bit(self.0[0] as i64) }

            #[inline(always)]
            fn all(self) -> bool { self.0.iter().all(|&m| m != 0) }

            #[inline(always)]
            fn any(self) -> bool { self.0.iter().any(|&m| m != 0) }

            #[inline(always)]
            fn and(self, other: Self) -> Self {
                let mut out = self.0;
                for (o, &m) in out.iter_mut().zip(&other.0) { *o &= m; }
                $BPack(out)
            }

            #[inline(always)]
            fn or(self, other: Self) -> Self {
                let mut out = self.0;
                for (o, &m) in out.iter_mut().zip(&other.0) { *o |= m; }
                $BPack(out)
            }

            #[inline(always)]
            fn not(self) -> Self {
                let mut out = self.0;
                for o in &mut out { *o = !*o; }
                $BPack(out)
            }

            #[inline(always)]
            fn masks(self) -> Self::Masks { self.0 }
        }
    };
}

impl_bool_pack!(B32x4, i32, 4, [a, b, c, d]);
impl_bool_pack!(B64x2, i64, 2, [a, b]);

#[cfg(test)]
mod tests {
    use super::*;

    // lanes alternate, starting with true
    fn alternating(width: usize) -> Vec<bool> { (0..width).map(|i| i % 2 == 0).collect() }
    fn every_third(width: usize) -> Vec<bool> { (0..width).map(|i| i % 3 == 0).collect() }

    fn construct_b32(s: &[bool]) -> B32x4 { B32x4::new(s[0], s[1], s[2], s[3]) }
    fn construct_b64(s: &[bool]) -> B64x2 { B64x2::new(s[0], s[1]) }
    fn set_b32(pk: &mut B32x4, s: &[bool]) { pk.set_lanes(s[0], s[1], s[2], s[3]) }
    fn set_b64(pk: &mut B64x2, s: &[bool]) { pk.set_lanes(s[0], s[1]) }

    macro_rules! bpack_tests {
        ($modname:ident, $BPack:ident, $Mask:ty, $construct:ident, $set:ident) => {
            mod $modname {
                use super::*;

                const W: usize = <$BPack as BoolPack>::WIDTH;

                fn expected_masks(s: &[bool]) -> Vec<$Mask> {
                    s.iter().map(|&b| -(b as $Mask)).collect()
                }

                #[test]
                fn constructs() {
                    assert_eq!($BPack::all_false().masks(), [0; W]);
                    assert_eq!($BPack::all_true().masks(), [-1; W]);
                    assert_eq!($BPack::splat(false).masks(), [0; W]);
                    assert_eq!($BPack::splat(true).masks(), [-1; W]);

                    let s = alternating(W);
                    let pk = $construct(&s);
                    assert_eq!(pk.masks().as_ref(), &expected_masks(&s)[..]);
                }

                #[test]
                fn load_and_store() {
                    let s = alternating(W);
                    let pk = $BPack::load(&s);
                    assert_eq!(pk.masks().as_ref(), &expected_masks(&s)[..]);

                    let mut r = vec![false; W];
                    pk.store(&mut r);
                    assert_eq!(r, s);
                }

                #[test]
                #[should_panic]
                fn load_short_slice() {
                    let s = vec![true; W - 1];
                    let _ = $BPack::load(&s);
                }

                #[test]
                fn set() {
                    let mut pk = $BPack::default();

                    pk.set(true);
                    assert_eq!(pk.masks(), [-1; W]);
                    pk.set(false);
                    assert_eq!(pk.masks(), [0; W]);

                    let s = alternating(W);
                    $set(&mut pk, &s);
                    assert_eq!(pk.masks().as_ref(), &expected_masks(&s)[..]);
                }

                #[test]
                fn to_scalar() {
                    let mut pk = $BPack::default();
                    pk.set(true);
                    assert_eq!(pk.to_scalar(), true);
                    pk.set(false);
                    assert_eq!(pk.to_scalar(), false);

                    $set(&mut pk, &alternating(W));
                    assert_eq!(pk.to_scalar(), true);
                }

                #[test]
                fn reductions() {
                    assert!($BPack::all_true().all());
                    assert!(!$BPack::all_false().any());

                    let pk = $construct(&alternating(W));
                    assert!(!pk.all());
                    assert!(pk.any());
                    assert!(pk.or(pk.not()).all());
                    assert!(!pk.and(pk.not()).any());
                }

                #[test]
                fn extracts() {
                    for s in vec![alternating(W), every_third(W)] {
                        let pk = $construct(&s);
                        assert_eq!(pk.extract::<0>(), s[0]);
                        assert_eq!(pk.extract::<1>(), s[1]);
                    }
                }
            }
        };
    }

    bpack_tests!(b32x4, B32x4, i32, construct_b32, set_b32);
    bpack_tests!(b64x2, B64x2, i64, construct_b64, set_b64);

    #[test]
    fn extracts_upper_b32_lanes() {
        for s in vec![alternating(4), every_third(4)] {
            let pk = construct_b32(&s);
            assert_eq!(pk.extract::<2>(), s[2]);
            assert_eq!(pk.extract::<3>(), s[3]);
        }
    }
}
