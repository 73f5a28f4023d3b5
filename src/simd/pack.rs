/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt::Debug;

use crate::bpack::{BoolPack, B32x4, B64x2};

/// A pack of numeric lanes.
pub trait NumPack: Copy + Debug + PartialEq {
    type Elem: Copy;
    type BPack: BoolPack;

    const WIDTH: usize;

    fn splat(value: Self::Elem) -> Self;

    /// Reads `WIDTH` lanes from the front of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than `WIDTH`.
    fn load(src: &[Self::Elem]) -> Self;

    /// Writes `WIDTH` lanes to the front of `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is shorter than `WIDTH`.
    fn store(self, dst: &mut [Self::Elem]);

    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn mul(self, other: Self) -> Self;
    fn div(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    fn abs(self) -> Self;

    /// Lane-wise `==`.
    fn cmp_eq(self, other: Self) -> Self::BPack;
    /// Lane-wise `<=`.
    fn cmp_le(self, other: Self) -> Self::BPack;
}

macro_rules! impl_num_pack {
    ($Pack:ident, $Elem:ty, $BPack:ident, $Mask:ty, $width:expr) => {
        #[derive(Debug, Copy, Clone, PartialEq)]
        pub struct $Pack([$Elem; $width]);

        impl $Pack {
            #[inline(always)]
            pub fn from_lanes(lanes: [$Elem; $width]) -> Self { $Pack(lanes) }

            #[inline(always)]
            pub fn lanes(self) -> [$Elem; $width] { self.0 }

            #[inline(always)]
            fn zip_with(self, other: Self, f: impl Fn($Elem, $Elem) -> $Elem) -> Self {
                let mut out = self.0;
                for (o, &b) in out.iter_mut().zip(&other.0) {
                    *o = f(*o, b);
                }
                $Pack(out)
            }

            #[inline(always)]
            fn compare(self, other: Self, f: impl Fn($Elem, $Elem) -> bool) -> $BPack {
                let mut masks = [0 as $Mask; $width];
                for ((m, &a), &b) in masks.iter_mut().zip(&self.0).zip(&other.0) {
                    *m = -(f(a, b) as $Mask);
                }
                $BPack::from_masks(masks)
            }
        }

        impl NumPack for $Pack {
            type Elem = $Elem;
            type BPack = $BPack;

            const WIDTH: usize = $width;

            #[inline(always)]
            fn splat(value: $Elem) -> Self { $Pack([value; $width]) }

            #[inline(always)]
            fn load(src: &[$Elem]) -> Self {
                let mut out = [0.0; $width];
                out.copy_from_slice(&src[..$width]);
                $Pack(out)
            }

            #[inline(always)]
            fn store(self, dst: &mut [$Elem]) {
                dst[..$width].copy_from_slice(&self.0);
            }

            #[inline(always)] fn add(self, other: Self) -> Self { self.zip_with(other, |a, b| a + b) }
            #[inline(always)] fn sub(self, other: Self) -> Self { self.zip_with(other, |a, b| a - b) }
            #[inline(always)] fn mul(self, other: Self) -> Self { self.zip_with(other, |a, b| a * b) }
            #[inline(always)] fn div(self, other: Self) -> Self { self.zip_with(other, |a, b| a / b) }
            #[inline(always)] fn max(self, other: Self) -> Self { self.zip_with(other, <$Elem>::max) }

            #[inline(always)]
            fn abs(self) -> Self {
                let mut out = self.0;
                for o in &mut out { *o = o.abs(); }
                $Pack(out)
            }

            #[inline(always)] fn cmp_eq(self, other: Self) -> $BPack { self.compare(other, |a, b| a == b) }
            #[inline(always)] fn cmp_le(self, other: Self) -> $BPack { self.compare(other, |a, b| a <= b) }
        }
    };
}

impl_num_pack!(F32x4, f32, B32x4, i32, 4);
impl_num_pack!(F64x2, f64, B64x2, i64, 2);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_store() {
        let src = [1.0f32, 2.0, 3.0, 4.0, 5.0];
        let pk = F32x4::load(&src);
        assert_eq!(pk.lanes(), [1.0, 2.0, 3.0, 4.0]);

        let mut dst = [0.0; 4];
        pk.store(&mut dst);
        assert_eq!(dst, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn arithmetic() {
        let a = F64x2::from_lanes([1.0, -6.0]);
        let b = F64x2::splat(2.0);
        assert_eq!(a.add(b).lanes(), [3.0, -4.0]);
        assert_eq!(a.sub(b).lanes(), [-1.0, -8.0]);
        assert_eq!(a.mul(b).lanes(), [2.0, -12.0]);
        assert_eq!(a.div(b).lanes(), [0.5, -3.0]);
        assert_eq!(a.abs().lanes(), [1.0, 6.0]);
        assert_eq!(a.max(b).lanes(), [2.0, 2.0]);
    }

    #[test]
    fn comparisons() {
        let a = F32x4::from_lanes([1.0, 2.0, 3.0, ::std::f32::NAN]);
        let b = F32x4::from_lanes([1.0, 1.0, 4.0, ::std::f32::NAN]);
        assert_eq!(a.cmp_eq(b), B32x4::new(true, false, false, false));
        assert_eq!(a.cmp_le(b), B32x4::new(true, false, true, false));
        assert!(!a.cmp_eq(a).all());
    }
}
