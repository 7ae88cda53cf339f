//! Hashed bag-of-words encoding for text features. SHA-256 keeps bucket
//! assignment stable across processes and platforms, which the determinism
//! contract on repeated detection depends on.

use sha2::{Digest, Sha256};

pub struct HashedTextEncoder {
    buckets: usize,
}

impl HashedTextEncoder {
    pub fn new(buckets: usize) -> Self {
        Self {
            buckets: buckets.max(1),
        }
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Token counts per bucket over the lower-cased, whitespace-split text.
    pub fn encode(&self, text: &str) -> Vec<f32> {
        let mut counts = vec![0.0f32; self.buckets];
        for token in text.to_lowercase().split_whitespace() {
            counts[self.bucket(token)] += 1.0;
        }
        counts
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        (u64::from_be_bytes(head) % self.buckets as u64) as usize
    }
}
