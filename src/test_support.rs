//! Deterministic keys for unit tests. The library never generates keys.
use crate::common::{Block, Digest, BITS, BLOCK_SIZE};
use crate::lamport::{PublicKey, Signature};
use crate::traits::HashFunction;

pub(crate) struct TestKey {
    secret: [[Block; BITS]; 2],
}

impl TestKey {
    pub(crate) fn keygen<H: HashFunction>(seed: &[u8]) -> (Self, PublicKey) {
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

    pub(crate) fn sign(&self, digest: &Digest) -> Signature {
        let mut preimages = [[0u8; BLOCK_SIZE]; BITS];
        for (k, preimage) in preimages.iter_mut().enumerate() {
            *preimage = self.secret[digest.bit(k) as usize][k];
        }
        Signature::from_preimages(preimages)
    }
}
