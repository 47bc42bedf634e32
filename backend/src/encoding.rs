// Source documents arrive as UTF-8 (with or without BOM) or UTF-16 with BOM,
// often with Windows line endings.

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::fs;
use std::path::Path;

use crate::logger;

/// Reads a source document and returns its text as UTF-8 with Unix line endings.
pub fn read_source_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;

    let (text, had_errors) = decode_source_bytes(&bytes);

    if had_errors {
        logger::warn(&format!("Encoding errors detected while decoding {:?}", path));
    }

    Ok(text)
}

/// Decodes by BOM, defaulting to UTF-8. Returns the text and whether
/// malformed sequences were replaced.
pub fn decode_source_bytes(bytes: &[u8]) -> (String, bool) {
    let (encoding, bom_len) = detect_encoding(bytes);
    let (decoded, _encoding_used, had_errors) = encoding.decode(&bytes[bom_len..]);
    (decoded.replace("\r\n", "\n"), had_errors)
}

/// Detects the encoding from the byte order mark, returning it with the BOM length.
fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return (UTF_16LE, 2);
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return (UTF_16BE, 2);
    }
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return (UTF_8, 3);
    }
    (UTF_8, 0)
}
