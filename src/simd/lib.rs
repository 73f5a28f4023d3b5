/* ************************************************************************ **
** This file is part of lmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Fixed-width lane packs.
//!
//! The widths mirror a 128-bit vector register: `f32` packs hold four
//! lanes and `f64` packs hold two.  The lanes are plain arrays; the
//! element-wise loops over them are short enough that the optimizer turns
//! them into the corresponding vector instructions.
//!
//! Boolean packs store each lane as an integer mask of the element's width,
//! all ones for `true` and all zeros for `false`.

pub use bpack::{BoolPack, B32x4, B64x2};
mod bpack;

pub use pack::{NumPack, F32x4, F64x2};
mod pack;

/// Scalar types with a pack representation.
pub trait SimdElem: Copy + PartialEq + PartialOrd + 'static {
    type Pack: NumPack<Elem = Self, BPack = Self::BPack>;
    type BPack: BoolPack;

    /// Number of lanes in `Self::Pack`.
    const WIDTH: usize;
}

impl SimdElem for f32 {
    type Pack = F32x4;
    type BPack = B32x4;
    const WIDTH: usize = 4;
}

impl SimdElem for f64 {
    type Pack = F64x2;
    type BPack = B64x2;
    const WIDTH: usize = 2;
}
