//! One-byte command encoding shared by every transport.
//!
//! ASCII `'1'` drives the actuator on, `'0'` drives it off. There is no
//! framing, checksum or acknowledgment.

pub const SIGNAL_ON: u8 = b'1';
pub const SIGNAL_OFF: u8 = b'0';

#[inline]
pub fn encode(on: bool) -> u8 {
    if on { SIGNAL_ON } else { SIGNAL_OFF }
}

/// Inverse of [`encode`]; any other byte is not a command.
#[inline]
pub fn decode(byte: u8) -> Option<bool> {
    match byte {
        SIGNAL_ON => Some(true),
        SIGNAL_OFF => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_is_ascii_one_off_is_ascii_zero() {
        assert_eq!(encode(true), 0x31);
        assert_eq!(encode(false), 0x30);
    }

    #[test]
    fn decode_rejects_non_commands() {
        assert_eq!(decode(b'1'), Some(true));
        assert_eq!(decode(b'0'), Some(false));
        assert_eq!(decode(b'\n'), None);
        assert_eq!(decode(1), None);
    }
}
