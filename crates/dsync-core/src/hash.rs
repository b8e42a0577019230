//! Dropbox content hash
//!
//! The provider's published scheme: split the stream into 4 MiB blocks
//! (final block may be short), SHA-256 each block, concatenate the raw
//! block digests in order, SHA-256 the concatenation, hex-encode.
//! <https://www.dropbox.com/developers/reference/content-hash>
//!
//! [`ContentHasher`] owns the block-boundary bookkeeping, so callers may
//! feed `update` with arbitrarily sized slices and still get bit-exact
//! output.

use sha2::{Digest, Sha256};

use crate::domain::newtypes::ContentHash;

/// Block size fixed by the provider's contract. Not tunable, and
/// unrelated to the upload chunk size.
pub const BLOCK_SIZE: usize = 4 * 1024 * 1024;

/// Streaming implementation of the block-chunked content hash
#[derive(Default)]
pub struct ContentHasher {
    /// Running hash of the current (incomplete) block
    block: Sha256,
    /// Bytes fed into the current block so far
    block_len: usize,
    /// Running hash over the concatenated block digests
    overall: Sha256,
}

impl ContentHasher {
    /// Creates a hasher with no data fed yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds bytes, closing 4 MiB blocks internally as they fill
    pub fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let room = BLOCK_SIZE - self.block_len;
            let take = room.min(data.len());
            self.block.update(&data[..take]);
            self.block_len += take;
            data = &data[take..];

            if self.block_len == BLOCK_SIZE {
                self.overall.update(self.block.finalize_reset());
                self.block_len = 0;
            }
        }
    }

    /// Consumes the hasher and returns the hex content digest
    ///
    /// An empty stream contributes no blocks, so the digest of empty
    /// input is the SHA-256 of the empty string.
    #[must_use]
    pub fn finalize(mut self) -> ContentHash {
        if self.block_len > 0 {
            self.overall.update(self.block.finalize());
        }
        ContentHash::from_digest(format!("{:x}", self.overall.finalize()))
    }
}

impl std::fmt::Debug for ContentHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentHasher")
            .field("block_len", &self.block_len)
            .finish()
    }
}
