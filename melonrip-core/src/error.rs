//! Dump Decoding Errors
//!
//! This module provides the error type returned by every fallible operation in
//! the crate, built with `thiserror`.
//!
//! # Error Categories
//! - **Header errors**: missing magic, unreadable or unsupported version
//! - **Stream errors**: unknown record tags, records cut short by end of file
//!
//! Every error is fatal for the import it occurred in. Nothing decoded before
//! the error is handed back to the caller.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type RipResult<T> = Result<T, RipError>;

/// Dump decoding error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RipError {
    /// The first 24 bytes do not start with `melon ripper v`.
    #[error("not a MelonRipper file")]
    BadMagic,

    /// The version suffix of the magic is not a decimal integer.
    #[error("weird magic in MelonRipper file: version {0:?} is not a number")]
    UnparsableVersion(String),

    /// The dump predates the oldest supported format.
    #[error("MelonRipper file too old; version is {version}, must be at least {min}")]
    VersionTooOld { version: i64, min: i64 },

    /// The dump was written by a newer ripper than this decoder understands.
    #[error("MelonRipper file too new; version is {version}, only up to {max} is supported")]
    VersionTooNew { version: i64, max: i64 },

    /// A 4-byte record tag that names no known record.
    #[error("unknown opcode \"{}\" at offset 0x{offset:X} in MelonRipper file", .tag.escape_ascii())]
    UnknownOpcode { tag: [u8; 4], offset: usize },

    /// Fewer bytes remain than the record's fixed payload requires.
    #[error("truncated {record} record at offset 0x{offset:X}: needs {needed} bytes, {remaining} remain")]
    TruncatedRecord {
        record: &'static str,
        offset: usize,
        needed: usize,
        remaining: usize,
    },
}

impl RipError {
    /// Create a truncation error for a read of `needed` bytes at `offset`.
    #[cold]
    pub fn truncated(record: &'static str, offset: usize, needed: usize, remaining: usize) -> Self {
        Self::TruncatedRecord {
            record,
            offset,
            needed,
            remaining,
        }
    }
}
