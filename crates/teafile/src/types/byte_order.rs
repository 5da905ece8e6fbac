//! Byte order of a TeaFile.

use std::fmt;

/// Byte order negotiated from the magic value.
///
/// Every multi-byte value after the magic value (header fields, section
/// contents, item fields) uses this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ByteOrder {
    /// Little-endian (default for newly written files).
    #[default]
    Little,
    /// Big-endian.
    Big,
}

/// Generates a `decode_*`/`encode_*` pair on [`ByteOrder`] for each primitive.
macro_rules! impl_primitive_codec {
    ($($decode:ident, $encode:ident => $ty:ty;)*) => {
        impl ByteOrder {
            $(
                #[doc = concat!("Decode a `", stringify!($ty), "` in this byte order.")]
                #[must_use]
                pub fn $decode(self, bytes: [u8; size_of::<$ty>()]) -> $ty {
                    match self {
                        Self::Little => <$ty>::from_le_bytes(bytes),
                        Self::Big => <$ty>::from_be_bytes(bytes),
                    }
                }

                #[doc = concat!("Encode a `", stringify!($ty), "` in this byte order.")]
                #[must_use]
                pub fn $encode(self, value: $ty) -> [u8; size_of::<$ty>()] {
                    match self {
                        Self::Little => value.to_le_bytes(),
                        Self::Big => value.to_be_bytes(),
                    }
                }
            )*
        }
    };
}

impl_primitive_codec! {
    decode_i8, encode_i8 => i8;
    decode_i16, encode_i16 => i16;
    decode_i32, encode_i32 => i32;
    decode_i64, encode_i64 => i64;
    decode_u8, encode_u8 => u8;
    decode_u16, encode_u16 => u16;
    decode_u32, encode_u32 => u32;
    decode_u64, encode_u64 => u64;
    decode_f32, encode_f32 => f32;
    decode_f64, encode_f64 => f64;
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => write!(f, "little-endian"),
            Self::Big => write!(f, "big-endian"),
        }
    }
}
