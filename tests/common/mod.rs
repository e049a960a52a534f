//! Deterministic Lamport keys used to produce corpora. The library itself never generates
//! keys; these exist only so the tests have signatures to forge from.
#![allow(dead_code)]
use lamport_forgery::common::{Block, BITS, BLOCK_SIZE};
use lamport_forgery::traits::HashFunction;
use lamport_forgery::{Digest, KnownPair, PublicKey, Signature};

pub struct TestKey {
    secret: [[Block; BITS]; 2],
}

impl TestKey {
    /// Expand `seed` into 512 preimages with `H`, and commit to each of them.
    pub fn keygen<H: HashFunction>(seed: &[u8]) -> (Self, PublicKey) {
        let mut secret = [[[0u8; BLOCK_SIZE]; BITS]; 2];
        let mut public = [[[0u8; BLOCK_SIZE]; BITS]; 2];
        for (b, row) in secret.iter_mut().enumerate() {
            for (k, block) in row.iter_mut().enumerate() {
                let mut input = seed.to_vec();
                input.push(b as u8);
                input.extend_from_slice(&(k as u16).to_be_bytes());
                *block = H::hash(&input);
                public[b][k] = H::hash(block);
            }
        }
        (TestKey { secret }, PublicKey::from_rows(public))
    }

    pub fn sign(&self, digest: &Digest) -> Signature {
        let mut preimages = [[0u8; BLOCK_SIZE]; BITS];
        for (k, preimage) in preimages.iter_mut().enumerate() {
            *preimage = self.secret[digest.bit(k) as usize][k];
        }
        Signature::from_preimages(preimages)
    }

    pub fn sign_message<H: HashFunction>(&self, message: &[u8]) -> KnownPair {
        let digest = Digest::of::<H>(message);
        KnownPair::new(digest, self.sign(&digest))
    }
}

/// Sign the decimal strings "1" to `size` under a fresh key.
pub fn numbered_corpus<H: HashFunction>(seed: &[u8], size: usize) -> (PublicKey, Vec<KnownPair>) {
    let (skey, pkey) = TestKey::keygen::<H>(seed);
    let corpus = (1..=size)
        .map(|i| skey.sign_message::<H>(i.to_string().as_bytes()))
        .collect();
    (pkey, corpus)
}
