//! Constants shared by the instruction decoders.

/// Mask for a 5-bit register index field.
pub const REG_MASK: u32 = 0x1F;

/// Width of every supported instruction word in bits.
pub const INSTRUCTION_WIDTH: u32 = 32;

/// Sign extends the low `bits` bits of `val` to a 32-bit signed integer.
///
/// # Arguments
///
/// * `val` - The value to extend.
/// * `bits` - The number of valid bits in `val`.
#[inline]
pub const fn sign_extend(val: u32, bits: u32) -> i32 {
    let shift = INSTRUCTION_WIDTH - bits;
    ((val << shift) as i32) >> shift
}
