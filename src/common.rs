//! Structures common to verification and forgery
use crate::errors::Error;
use crate::traits::HashFunction;
use blake2::digest::{Update, VariableOutput};
use blake2::VarBlake2b;
use sha2::Sha256;

#[cfg(feature = "serde_enabled")]
use serde::{Deserialize, Serialize};

/// Output size of the hash function, and size of a signed digest.
pub const HASH_SIZE: usize = 32;
/// Size of a single preimage or commitment block.
pub const BLOCK_SIZE: usize = 32;
/// Number of signed bits, one preimage block per bit.
pub const BITS: usize = HASH_SIZE * 8;

/// A preimage or a commitment.
pub type Block = [u8; BLOCK_SIZE];

/// SHA-256, the hash the reference keys and signatures were produced with.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn hash(data: &[u8]) -> [u8; HASH_SIZE] {
        use sha2::Digest as _;
        let digest = Sha256::digest(data);
        let mut out = [0u8; HASH_SIZE];
        out.copy_from_slice(&digest);
        out
    }
}

/// Blake2b with a 256-bit output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake2bHash;

impl HashFunction for Blake2bHash {
    fn hash(data: &[u8]) -> [u8; HASH_SIZE] {
        let mut out = [0u8; HASH_SIZE];
        let mut h = VarBlake2b::new(HASH_SIZE).expect("valid size");
        h.update(data);
        h.finalize_variable(|res| out.copy_from_slice(res));
        out
    }
}

/// Digest of a message, which is the value actually signed. Bits are read big endian: bit
/// 0 is the most significant bit of byte 0, and bit 255 the least significant bit of
/// byte 31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_enabled", derive(Serialize, Deserialize))]
pub struct Digest(pub(crate) [u8; HASH_SIZE]);

impl Digest {
    /// Byte representation size of a `Digest`.
    pub const SIZE: usize = HASH_SIZE;

    /// Hash `message` with `H`.
    pub fn of<H: HashFunction>(message: &[u8]) -> Self {
        Digest(H::hash(message))
    }

    /// Return the bit at position `k` as 0 or 1.
    ///
    /// # Panics
    /// Function panics when `k >= BITS`.
    #[inline]
    pub fn bit(&self, k: usize) -> u8 {
        (self.0[k / 8] >> (7 - (k % 8))) & 1
    }

    /// Return `Self` as its byte representation.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Tries to convert a slice of `bytes` as `Self`.
    ///
    /// # Errors
    /// This function returns an error if the length of `bytes` is not equal to
    /// `Self::SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidDigestSize(bytes.len()));
        }
        let mut v = [0u8; Self::SIZE];
        v.copy_from_slice(bytes);
        Ok(Digest(v))
    }
}

impl From<[u8; HASH_SIZE]> for Digest {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Digest(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
