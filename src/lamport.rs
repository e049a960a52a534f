//! Lamport one-time signatures over 256-bit digests. A public key commits to two preimages
//! per digest bit; a signature reveals, for every bit, the preimage selected by the value of
//! that bit. Verification recomputes each commitment from the revealed preimage.
use crate::common::{Block, Digest, BITS, BLOCK_SIZE};
use crate::errors::Error;
use crate::traits::HashFunction;

#[cfg(feature = "serde_enabled")]
use {
    serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer},
    serde_with::{Bytes, DeserializeAs, SerializeAs},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Lamport public key. `rows[b][k]` is the commitment to the preimage revealed when bit `k`
/// of the signed digest equals `b`.
pub struct PublicKey {
    rows: [[Block; BITS]; 2],
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Lamport signature: one revealed preimage per digest bit. It is only meaningful relative
/// to the digest it was produced for.
pub struct Signature {
    preimages: [Block; BITS],
}

// Both serialise as their flat byte encoding, so serde formats see a single byte string.
#[cfg(feature = "serde_enabled")]
impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Bytes::serialize_as(&self.to_bytes().to_vec(), serializer)
    }
}

#[cfg(feature = "serde_enabled")]
impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Vec<u8> = Bytes::deserialize_as(deserializer)?;
        PublicKey::from_bytes(&bytes).map_err(D::Error::custom)
    }
}

#[cfg(feature = "serde_enabled")]
impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Bytes::serialize_as(&self.to_bytes().to_vec(), serializer)
    }
}

#[cfg(feature = "serde_enabled")]
impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Vec<u8> = Bytes::deserialize_as(deserializer)?;
        Signature::from_bytes(&bytes).map_err(D::Error::custom)
    }
}

/// Verify `signature` on `digest` under `pk`. Returns `true` only if every revealed preimage
/// hashes to the commitment selected by the corresponding digest bit.
pub fn verify<H: HashFunction>(digest: &Digest, pk: &PublicKey, signature: &Signature) -> bool {
    (0..BITS).all(|k| H::hash(&signature.preimages[k]) == *pk.commitment(digest.bit(k), k))
}

/// Hash `message` with `H` and verify `signature` on the resulting digest.
pub fn verify_message<H: HashFunction>(
    message: &[u8],
    pk: &PublicKey,
    signature: &Signature,
) -> bool {
    verify::<H>(&Digest::of::<H>(message), pk, signature)
}

impl PublicKey {
    /// Byte size of the public key: 256 commitments of row 0 followed by 256 of row 1.
    pub const SIZE: usize = 2 * BITS * BLOCK_SIZE;

    /// Build a key from its two rows of commitments.
    pub fn from_rows(rows: [[Block; BITS]; 2]) -> Self {
        PublicKey { rows }
    }

    /// Commitment for bit value `bit` at position `k`.
    ///
    /// # Panics
    /// Function panics when `bit > 1` or `k >= BITS`.
    #[inline]
    pub fn commitment(&self, bit: u8, k: usize) -> &Block {
        &self.rows[bit as usize][k]
    }

    /// Convert the slice of bytes into `Self`.
    ///
    /// # Errors
    /// The function fails if `bytes.len()` is not `Self::SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidPublicKeySize(bytes.len()));
        }

        let mut rows = [[[0u8; BLOCK_SIZE]; BITS]; 2];
        for (i, chunk) in bytes.chunks_exact(BLOCK_SIZE).enumerate() {
            rows[i / BITS][i % BITS].copy_from_slice(chunk);
        }
        Ok(PublicKey { rows })
    }

    /// Convert `Self` into its byte representation, ( row 0 || row 1 ), each row in bit order.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut data = [0u8; Self::SIZE];
        let blocks = self.rows.iter().flat_map(|row| row.iter());
        for (chunk, block) in data.chunks_exact_mut(BLOCK_SIZE).zip(blocks) {
            chunk.copy_from_slice(block);
        }
        data
    }
}

impl Signature {
    /// Byte size of the signature: 256 preimages in bit order.
    pub const SIZE: usize = BITS * BLOCK_SIZE;

    /// Build a signature from its revealed preimages.
    pub fn from_preimages(preimages: [Block; BITS]) -> Self {
        Signature { preimages }
    }

    /// Preimage revealed for position `k`.
    ///
    /// # Panics
    /// Function panics when `k >= BITS`.
    #[inline]
    pub fn preimage(&self, k: usize) -> &Block {
        &self.preimages[k]
    }

    /// All revealed preimages, in bit order.
    pub fn preimages(&self) -> &[Block; BITS] {
        &self.preimages
    }

    /// Verify `self` on `digest` under `pk`. See [`verify`].
    pub fn verify<H: HashFunction>(&self, digest: &Digest, pk: &PublicKey) -> bool {
        verify::<H>(digest, pk, self)
    }

    /// Convert the slice of bytes into `Self`.
    ///
    /// # Errors
    /// The function fails if `bytes.len()` is not `Self::SIZE`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidSignatureSize(bytes.len()));
        }

        let mut preimages = [[0u8; BLOCK_SIZE]; BITS];
        for (preimage, chunk) in preimages.iter_mut().zip(bytes.chunks_exact(BLOCK_SIZE)) {
            preimage.copy_from_slice(chunk);
        }
        Ok(Signature { preimages })
    }

    /// Convert `Self` into its byte representation.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut data = [0u8; Self::SIZE];
        for (chunk, preimage) in data.chunks_exact_mut(BLOCK_SIZE).zip(self.preimages.iter()) {
            chunk.copy_from_slice(preimage);
        }
        data
    }
}

/// A digest together with a signature on it, both already checked against the same public
/// key by whoever assembles the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownPair {
    digest: Digest,
    signature: Signature,
}

impl KnownPair {
    /// Pair an already computed `digest` with its `signature`.
    pub fn new(digest: Digest, signature: Signature) -> Self {
        KnownPair { digest, signature }
    }

    /// Hash `message` with `H` and pair the digest with `signature`.
    pub fn from_message<H: HashFunction>(message: &[u8], signature: Signature) -> Self {
        KnownPair::new(Digest::of::<H>(message), signature)
    }

    /// Signed digest.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Signature on [`KnownPair::digest`].
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Check the pair under `pk`.
    pub fn verify<H: HashFunction>(&self, pk: &PublicKey) -> bool {
        verify::<H>(&self.digest, pk, &self.signature)
    }
}
