//! One-way digests of attribute values.

use sha1::{Digest, Sha1};

use crate::types::AttrValue;

/// Hash `value` with SHA-1 and render it as 40 lowercase hex characters.
///
/// The input bytes depend on the value's type: strings hash their UTF-8
/// bytes, integers and doubles their 8-byte little-endian form, booleans a
/// single `1` or `0` byte. The same string and integer therefore never
/// collide by accident of encoding.
pub fn hash_value(value: &AttrValue) -> String {
    let mut hasher = Sha1::new();
    match value {
        AttrValue::Str(s) => hasher.update(s.as_bytes()),
        AttrValue::Int(n) => hasher.update(n.to_le_bytes()),
        AttrValue::Double(d) => hasher.update(d.to_bits().to_le_bytes()),
        AttrValue::Bool(b) => hasher.update([u8::from(*b)]),
    }
    format!("{:x}", hasher.finalize())
}
