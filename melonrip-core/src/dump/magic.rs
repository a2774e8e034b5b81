// Dump header: 24 bytes of NUL-padded ASCII "melon ripper v<N>".
use crate::error::{RipError, RipResult};

/// Length of the magic header; records start right after it.
pub const MAGIC_LEN: usize = 24;

pub const MAGIC_PREFIX: &[u8] = b"melon ripper v";

pub const MIN_VERSION: i64 = 1;
pub const MAX_VERSION: i64 = 2;

/// Check the header and return the dump format version.
pub fn check_magic(dump: &[u8]) -> RipResult<i64> {
    let magic = &dump[..dump.len().min(MAGIC_LEN)];

    let end = magic
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    let magic = &magic[..end];

    let version = magic
        .strip_prefix(MAGIC_PREFIX)
        .ok_or(RipError::BadMagic)?;

    let text = std::str::from_utf8(version)
        .map_err(|_| RipError::UnparsableVersion(version.escape_ascii().to_string()))?;
    let version: i64 = text
        .parse()
        .map_err(|_| RipError::UnparsableVersion(text.to_string()))?;

    if version < MIN_VERSION {
        return Err(RipError::VersionTooOld {
            version,
            min: MIN_VERSION,
        });
    }
    if version > MAX_VERSION {
        return Err(RipError::VersionTooNew {
            version,
            max: MAX_VERSION,
        });
    }
    Ok(version)
}

/// Build a header for `version`, NUL-padded to [`MAGIC_LEN`].
pub fn magic_for_version(version: i64) -> [u8; MAGIC_LEN] {
    let text = format!("melon ripper v{}", version);
    let mut out = [0u8; MAGIC_LEN];
    let n = text.len().min(MAGIC_LEN);
    out[..n].copy_from_slice(&text.as_bytes()[..n]);
    out
}
