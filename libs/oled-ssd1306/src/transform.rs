//! Stateless byte and bit helpers shared by the drawing and scrolling code.

/// Complement every byte in place.
pub fn invert(buf: &mut [u8]) {
    for byte in buf {
        *byte = !*byte;
    }
}

/// Reverse the bit order of every byte in place (bit 0 <-> bit 7).
pub fn flip(buf: &mut [u8]) {
    for byte in buf {
        *byte = rotate_byte(*byte);
    }
}

pub const fn rotate_byte(byte: u8) -> u8 {
    byte.reverse_bits()
}

/// Return `dst` with bit `dst_bit` replaced by bit `src_bit` of `src`.
pub fn copy_bit(src: u8, src_bit: u8, dst: u8, dst_bit: u8) -> u8 {
    debug_assert!(src_bit < 8 && dst_bit < 8);
    let dmask = 1u8 << dst_bit;
    if src & (1u8 << src_bit) == 0 {
        dst & !dmask
    } else {
        dst | dmask
    }
}

/// Convert between the stored (wire) byte and the logical byte, where
/// bit 0 is the topmost pixel of the page. The mapping is its own inverse.
pub(crate) const fn orient(byte: u8, flip: bool) -> u8 {
    if flip { rotate_byte(byte) } else { byte }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rotate_byte_is_reversal() {
        assert_eq!(rotate_byte(0b0000_0001), 0b1000_0000);
        assert_eq!(rotate_byte(0b1100_0000), 0b0000_0011);
        assert_eq!(rotate_byte(0b1010_0000), 0b0000_0101);
        // A rotate would give 0x1E here.
        assert_eq!(rotate_byte(0x0F), 0xF0);
    }

    #[test]
    fn test_flip_every_byte_value_twice() {
        let original: Vec<u8> = (0..=255).collect();
        let mut buf = original.clone();
        flip(&mut buf);
        assert_ne!(buf, original);
        flip(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_invert_range() {
        let mut buf = [0x00, 0xFF, 0x0F, 0xA5];
        invert(&mut buf);
        assert_eq!(buf, [0xFF, 0x00, 0xF0, 0x5A]);
    }

    #[test]
    fn test_copy_bit_set_and_clear() {
        assert_eq!(copy_bit(0b0000_0100, 2, 0x00, 7), 0b1000_0000);
        assert_eq!(copy_bit(0b1111_1011, 2, 0xFF, 0), 0b1111_1110);
        assert_eq!(copy_bit(0x80, 7, 0x80, 7), 0x80);
    }

    #[test]
    fn test_orient() {
        assert_eq!(orient(0x01, false), 0x01);
        assert_eq!(orient(0x01, true), 0x80);
    }

    proptest! {
        #[test]
        fn flip_is_involution(buf in prop::collection::vec(any::<u8>(), 0..256)) {
            let mut work = buf.clone();
            flip(&mut work);
            flip(&mut work);
            prop_assert_eq!(work, buf);
        }

        #[test]
        fn invert_is_involution(buf in prop::collection::vec(any::<u8>(), 0..256)) {
            let mut work = buf.clone();
            invert(&mut work);
            invert(&mut work);
            prop_assert_eq!(work, buf);
        }

        #[test]
        fn copy_bit_touches_only_destination_bit(
            src in any::<u8>(),
            dst in any::<u8>(),
            src_bit in 0u8..8,
            dst_bit in 0u8..8,
        ) {
            let out = copy_bit(src, src_bit, dst, dst_bit);
            let dmask = 1u8 << dst_bit;
            prop_assert_eq!(out & !dmask, dst & !dmask);
            prop_assert_eq!((out >> dst_bit) & 1, (src >> src_bit) & 1);
        }
    }
}
