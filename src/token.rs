// SPDX-License-Identifier: GPL-3.0-only

//! Random handle tokens for portal request paths.
//!
//! A token is embedded as the last element of an object path, so it may only
//! contain `[A-Za-z0-9_]`. Every random byte is split into two nibbles and each
//! nibble is mapped onto `'A'..='P'`, which keeps the alphabet legal without
//! rejection sampling.

use rustix::{
    io::Errno,
    rand::{GetRandomFlags, getrandom},
};

/// Length of a token produced by [`generate`] when entropy is available.
pub const TOKEN_LEN: usize = 64;

const RANDOM_BYTES: usize = TOKEN_LEN / 2;

/// Source of cryptographically strong random bytes.
pub trait EntropySource {
    /// Fill some prefix of `buf`, returning how many bytes were written.
    fn fill(&mut self, buf: &mut [u8]) -> rustix::io::Result<usize>;
}

/// The kernel's `getrandom(2)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> rustix::io::Result<usize> {
        getrandom(buf, GetRandomFlags::empty())
    }
}

/// Generates a fresh token from the OS entropy source.
pub fn generate() -> String {
    generate_with(&mut OsEntropy)
}

/// Generates a token from `source`.
///
/// Interrupted reads are retried. Any other failure stops generation and the
/// characters produced so far are returned, so the result may be shorter than
/// [`TOKEN_LEN`] (or empty) if the source is broken.
pub fn generate_with<S: EntropySource + ?Sized>(source: &mut S) -> String {
    let mut token = String::with_capacity(TOKEN_LEN);
    let mut buf = [0u8; RANDOM_BYTES];
    let mut remaining = RANDOM_BYTES;
    while remaining > 0 {
        let read = match source.fill(&mut buf[..remaining]) {
            Ok(0) => {
                log::warn!("entropy source returned no data, token truncated");
                break;
            }
            Ok(read) => read.min(remaining),
            Err(Errno::INTR) => continue,
            Err(err) => {
                log::warn!("entropy source failed, token truncated: {err}");
                break;
            }
        };
        for byte in &buf[..read] {
            token.push(nibble_char(byte & 0x0f));
            token.push(nibble_char(byte >> 4));
        }
        remaining -= read;
    }
    token
}

fn nibble_char(nibble: u8) -> char {
    char::from(b'A' + nibble)
}
