//! Binary message codecs
//!
//! Every message is a frame of `{u16 id}{payload}`. All integers are big-endian.
//! Strings are either length-prefixed (`{u16 length}{bytes}`) or fixed-width and
//! zero-padded (used for credential tokens).
//!
//! Reading past the end of a payload is never answered with a default value:
//! the reader fails with [`ManaError::Truncated`] and the caller decides what to
//! do with the session. Writers refuse values that do not fit the declared field
//! width instead of truncating them.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use mana_core::{ManaError, Result};
use std::fmt;

/// Width of the message id prefix in bytes
pub const MESSAGE_ID_LEN: usize = 2;

#[inline]
fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<()> {
    if value < min || value > max {
        return Err(ManaError::FieldOutOfRange { field, value });
    }
    Ok(())
}

/// Cursor over the payload of one inbound message
///
/// # Invariant
/// `payload` holds only the bytes that have not been read yet.
#[derive(Clone)]
pub struct MessageIn {
    id: u16,
    payload: Bytes,
}

impl MessageIn {
    /// Create a message from an id and its payload
    #[inline]
    pub fn new(id: u16, payload: impl Into<Bytes>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// Split a complete transport frame into id and payload
    ///
    /// # Errors
    /// Returns [`ManaError::Truncated`] if the frame is shorter than the id prefix.
    pub fn from_frame(mut frame: Bytes) -> Result<Self> {
        if frame.remaining() < MESSAGE_ID_LEN {
            return Err(ManaError::Truncated {
                needed: MESSAGE_ID_LEN,
                remaining: frame.remaining(),
            });
        }
        let id = frame.get_u16();
        Ok(Self { id, payload: frame })
    }

    /// Raw message identifier
    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Number of payload bytes not yet read
    #[inline]
    pub fn unread_len(&self) -> usize {
        self.payload.remaining()
    }

    /// Whether there is payload left to read
    #[inline]
    pub fn has_unread(&self) -> bool {
        self.payload.has_remaining()
    }

    #[inline]
    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.payload.remaining();
        if remaining < needed {
            return Err(ManaError::Truncated { needed, remaining });
        }
        Ok(())
    }

    /// Read an 8-bit signed integer
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        Ok(self.payload.get_i8())
    }

    /// Read an 8-bit field as unsigned
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.payload.get_u8())
    }

    /// Read a 16-bit signed integer
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.payload.get_i16())
    }

    /// Read a 16-bit field as unsigned (ids, slots, amounts)
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.payload.get_u16())
    }

    /// Read a 32-bit signed integer
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.payload.get_i32())
    }

    /// Read a length-prefixed string
    ///
    /// # Format
    /// - u16: byte length
    /// - UTF-8 bytes (not null-terminated)
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        self.ensure(len)?;
        let bytes = self.payload.split_to(len);
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ManaError::Malformed(format!("Invalid UTF-8 in string: {}", e)))
    }

    /// Read a fixed-width, zero-padded string
    ///
    /// Everything from the first NUL byte on is padding.
    pub fn read_fixed_string(&mut self, width: usize) -> Result<String> {
        self.ensure(width)?;
        let bytes = self.payload.split_to(width);
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        String::from_utf8(bytes[..end].to_vec())
            .map_err(|e| ManaError::Malformed(format!("Invalid UTF-8 in fixed string: {}", e)))
    }
}

impl fmt::Debug for MessageIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageIn(id=0x{:04x}, unread={})", self.id, self.payload.len())
    }
}

/// Builder for one outbound message
#[derive(Debug, Clone)]
pub struct MessageOut {
    id: u16,
    buf: BytesMut,
}

impl MessageOut {
    /// Start a message with the given id
    pub fn new(id: u16) -> Self {
        let mut buf = BytesMut::with_capacity(16);
        buf.put_u16(id);
        Self { id, buf }
    }

    /// Message identifier
    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Payload length (excluding the id prefix)
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.buf.len() - MESSAGE_ID_LEN
    }

    /// Write an 8-bit signed integer
    pub fn write_i8(&mut self, value: impl Into<i64>) -> Result<()> {
        let value = value.into();
        check_range("int8", value, i8::MIN as i64, i8::MAX as i64)?;
        self.buf.put_i8(value as i8);
        Ok(())
    }

    /// Write an 8-bit unsigned integer
    pub fn write_u8(&mut self, value: impl Into<i64>) -> Result<()> {
        let value = value.into();
        check_range("uint8", value, 0, u8::MAX as i64)?;
        self.buf.put_u8(value as u8);
        Ok(())
    }

    /// Write a 16-bit signed integer
    pub fn write_i16(&mut self, value: impl Into<i64>) -> Result<()> {
        let value = value.into();
        check_range("int16", value, i16::MIN as i64, i16::MAX as i64)?;
        self.buf.put_i16(value as i16);
        Ok(())
    }

    /// Write a 16-bit unsigned integer
    pub fn write_u16(&mut self, value: impl Into<i64>) -> Result<()> {
        let value = value.into();
        check_range("uint16", value, 0, u16::MAX as i64)?;
        self.buf.put_u16(value as u16);
        Ok(())
    }

    /// Write a 32-bit signed integer
    pub fn write_i32(&mut self, value: impl Into<i64>) -> Result<()> {
        let value = value.into();
        check_range("int32", value, i32::MIN as i64, i32::MAX as i64)?;
        self.buf.put_i32(value as i32);
        Ok(())
    }

    /// Write a length-prefixed string
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        check_range("string length", bytes.len() as i64, 0, u16::MAX as i64)?;
        self.buf.put_u16(bytes.len() as u16);
        self.buf.put_slice(bytes);
        Ok(())
    }

    /// Write a fixed-width string, zero-padded to `width`
    pub fn write_fixed_string(&mut self, value: &str, width: usize) -> Result<()> {
        let bytes = value.as_bytes();
        check_range("fixed string length", bytes.len() as i64, 0, width as i64)?;
        self.buf.put_slice(bytes);
        self.buf.put_bytes(0, width - bytes.len());
        Ok(())
    }

    /// Finish the message and return the complete frame
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// View the frame written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reread(msg: MessageOut) -> MessageIn {
        MessageIn::from_frame(msg.into_bytes()).unwrap()
    }

    #[test]
    fn test_integers_are_big_endian() {
        let mut msg = MessageOut::new(0x0102);
        msg.write_i16(0x0304).unwrap();
        msg.write_i32(-2).unwrap();
        assert_eq!(msg.as_bytes(), &[0x01, 0x02, 0x03, 0x04, 0xff, 0xff, 0xff, 0xfe]);
    }

    #[test]
    fn test_mixed_fields() {
        let mut msg = MessageOut::new(0x0200);
        msg.write_i8(-5).unwrap();
        msg.write_u16(65_000).unwrap();
        msg.write_string("Hello").unwrap();
        msg.write_i32(i32::MIN).unwrap();

        let mut input = reread(msg);
        assert_eq!(input.id(), 0x0200);
        assert_eq!(input.read_i8().unwrap(), -5);
        assert_eq!(input.read_u16().unwrap(), 65_000);
        assert_eq!(input.read_string().unwrap(), "Hello");
        assert_eq!(input.read_i32().unwrap(), i32::MIN);
        assert!(!input.has_unread());
    }

    #[test]
    fn test_fixed_string_padding() {
        let mut msg = MessageOut::new(1);
        msg.write_fixed_string("abc", 32).unwrap();
        assert_eq!(msg.payload_len(), 32);

        let mut input = reread(msg);
        assert_eq!(input.read_fixed_string(32).unwrap(), "abc");
        assert_eq!(input.unread_len(), 0);
    }

    #[test]
    fn test_fixed_string_overflow_rejected() {
        let mut msg = MessageOut::new(1);
        let token = "x".repeat(33);
        assert!(matches!(
            msg.write_fixed_string(&token, 32),
            Err(ManaError::FieldOutOfRange { .. })
        ));
        assert_eq!(msg.payload_len(), 0);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut msg = MessageOut::new(1);
        assert!(msg.write_i8(128).is_err());
        assert!(msg.write_i16(-32_769).is_err());
        assert!(msg.write_u16(-1).is_err());
        assert!(msg.write_u8(256).is_err());
        assert!(msg.write_i32(i64::from(i32::MAX) + 1).is_err());
        assert_eq!(msg.payload_len(), 0);

        assert!(msg.write_i8(-128).is_ok());
        assert!(msg.write_i16(32_767).is_ok());
    }

    // Decoding is stricter than a lenient reader that pads missing bytes with
    // zeros: a short payload is a protocol fault.
    #[test]
    fn test_truncated_payload_is_a_fault() {
        let mut input = MessageIn::new(7, vec![0x00]);
        match input.read_i16() {
            Err(ManaError::Truncated { needed, remaining }) => {
                assert_eq!(needed, 2);
                assert_eq!(remaining, 1);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_string_body() {
        // Declares 10 bytes, carries 3
        let mut input = MessageIn::new(7, vec![0x00, 0x0a, b'a', b'b', b'c']);
        assert!(matches!(input.read_string(), Err(ManaError::Truncated { .. })));
    }

    #[test]
    fn test_frame_without_id() {
        let result = MessageIn::from_frame(Bytes::from_static(&[0x01]));
        assert!(matches!(result, Err(ManaError::Truncated { needed: 2, remaining: 1 })));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut input = MessageIn::new(7, vec![0x00, 0x02, 0xff, 0xfe]);
        assert!(matches!(input.read_string(), Err(ManaError::Malformed(_))));
    }
}
