//! Content fingerprint for change detection
//!
//! Provides the single canonical fingerprint format
//! (`sha256:<base36 hash><byte length>`) used to detect no-op pushes and for
//! equality checks against the companion editor client. The `sha256:` prefix
//! is a fixed wire tag kept for compatibility; the value is a 32-bit rolling
//! hash, not a cryptographic digest, and must match the companion client
//! bit-for-bit.

/// Prefix for all fingerprints produced by this module
const PREFIX: &str = "sha256:";

/// Compute the content fingerprint of a document.
///
/// Rolls `h = h * 31 + byte` over the UTF-8 bytes with two's-complement
/// 32-bit wrap (the companion client writes this as `(h << 5) - h + c`),
/// takes the absolute value, and appends the decimal byte length.
///
/// Equal content always yields an equal fingerprint; `content_fingerprint("")`
/// is the fixed value `"sha256:00"`.
pub fn content_fingerprint(content: &str) -> String {
    let mut h: i32 = 0;
    for &b in content.as_bytes() {
        h = h.wrapping_mul(31).wrapping_add(i32::from(b));
    }
    // Emitted as non-negative; widening before abs keeps i32::MIN in range.
    let value = i64::from(h).unsigned_abs();
    format!("{}{}{}", PREFIX, base36(value), content.len())
}

/// Lowercase base-36 rendering of a non-negative value.
fn base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = [0u8; 13];
    let mut i = buf.len();
    while value > 0 {
        i -= 1;
        buf[i] = DIGITS[(value % 36) as usize];
        value /= 36;
    }
    String::from_utf8_lossy(&buf[i..]).into_owned()
}
