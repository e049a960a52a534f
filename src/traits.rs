//! Traits that define the hash function underlying a Lamport instance
use crate::common::HASH_SIZE;

/// Hash function with a 256-bit output. The same function commits preimages in the public
/// key and turns messages into the digests that get signed.
///
/// # Example
/// ```
/// use lamport_forgery::common::{Digest, Sha256Hash};
/// use lamport_forgery::traits::HashFunction;
///
/// let digest = Digest::of::<Sha256Hash>(b"1");
/// assert_eq!(digest.as_bytes(), &Sha256Hash::hash(b"1"));
/// // 0x6b = 0b0110_1011
/// assert_eq!(digest.bit(0), 0);
/// assert_eq!(digest.bit(1), 1);
/// ```
pub trait HashFunction {
    /// Hash `data` into a 32 byte output.
    fn hash(data: &[u8]) -> [u8; HASH_SIZE];
}
