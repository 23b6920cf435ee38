//! The rolling CRC-16 variant used by every PUZ checksum.

/// Checksums `data`, continuing from `seed`.
///
/// Per byte: rotate the running value right by one bit (the low bit wraps to
/// bit 15), then add the byte, keeping 16 bits.
pub fn checksum(data: &[u8], seed: u16) -> u16 {
    data.iter().fold(seed, |sum, &byte| {
        sum.rotate_right(1).wrapping_add(u16::from(byte))
    })
}

/// Checksums `length` bytes of `image` starting at `start`.
///
/// # Panics
///
/// Panics if the range runs past the end of `image`.
pub fn checksum_region(image: &[u8], start: usize, length: usize, seed: u16) -> u16 {
    checksum(&image[start..start + length], seed)
}

/// Mask applied to the low bytes of the four component checksums.
pub const MASK_LOW: [u8; 4] = *b"ICHE";
/// Mask applied to the high bytes of the four component checksums.
pub const MASK_HIGH: [u8; 4] = *b"ATED";

/// The four component checksums (CIB, solution, grid, strings) masked against
/// `ICHEATED`, returned as `(low, high)` byte quadruples.
pub fn masked(components: [u16; 4]) -> ([u8; 4], [u8; 4]) {
    let mut low = [0u8; 4];
    let mut high = [0u8; 4];
    for (i, sum) in components.into_iter().enumerate() {
        let [lo, hi] = sum.to_le_bytes();
        low[i] = MASK_LOW[i] ^ lo;
        high[i] = MASK_HIGH[i] ^ hi;
    }
    (low, high)
}
