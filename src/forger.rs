//! Assembly of forged signatures from preimages revealed by a corpus of known signatures.
//!
//! Every preimage of a valid signature is a valid opening of one commitment, independently of
//! the other 255. A candidate digest can therefore be signed whenever, for each position, some
//! known signature was produced on a digest carrying the same bit there.
use crate::analyzer::FixedConstraint;
use crate::common::{Digest, Sha256Hash, BITS, BLOCK_SIZE};
use crate::errors::Error;
use crate::lamport::{verify, KnownPair, PublicKey, Signature};
use crate::traits::HashFunction;
use std::marker::PhantomData;

/// Assemble a signature on `candidate` by scanning `corpus` for each position. The first pair
/// (in corpus order) whose digest has the candidate's bit at that position donates its
/// preimage.
///
/// # Errors
/// Fails with `Error::Unassemblable` at the first position with no donor.
pub fn assemble(candidate: &Digest, corpus: &[KnownPair]) -> Result<Signature, Error> {
    let mut preimages = [[0u8; BLOCK_SIZE]; BITS];
    for (k, preimage) in preimages.iter_mut().enumerate() {
        let bit = candidate.bit(k);
        let donor = corpus
            .iter()
            .find(|pair| pair.digest().bit(k) == bit)
            .ok_or(Error::Unassemblable { position: k, bit })?;
        *preimage = *donor.signature().preimage(k);
    }
    Ok(Signature::from_preimages(preimages))
}

/// Forgery setup for one public key. The corpus is checked once on construction and never
/// changes afterwards, so the fixed positions and the donor of every `(position, bit)` are
/// computed up front.
#[derive(Debug, Clone)]
pub struct Forger<H = Sha256Hash> {
    public_key: PublicKey,
    corpus: Vec<KnownPair>,
    constraint: FixedConstraint,
    // Index in `corpus` of the first pair revealing `bit` at `position`.
    donors: [[Option<usize>; 2]; BITS],
    hash: PhantomData<fn() -> H>,
}

impl<H: HashFunction> Forger<H> {
    /// Check every pair of `corpus` under `public_key` and analyse the corpus.
    ///
    /// # Errors
    /// The function fails if
    /// * `corpus` is empty (`Error::EmptyCorpus`)
    /// * a pair does not verify (`Error::InvalidCorpusSignature` with its index)
    pub fn new(public_key: PublicKey, corpus: Vec<KnownPair>) -> Result<Self, Error> {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        if let Some(index) = corpus.iter().position(|pair| !pair.verify::<H>(&public_key)) {
            return Err(Error::InvalidCorpusSignature(index));
        }

        let digests: Vec<Digest> = corpus.iter().map(|pair| *pair.digest()).collect();
        let constraint = FixedConstraint::from_digests(&digests)?;

        let mut donors = [[None; 2]; BITS];
        for (index, pair) in corpus.iter().enumerate() {
            for (k, slot) in donors.iter_mut().enumerate() {
                let donor = &mut slot[pair.digest().bit(k) as usize];
                if donor.is_none() {
                    *donor = Some(index);
                }
            }
        }

        Ok(Forger {
            public_key,
            corpus,
            constraint,
            donors,
            hash: PhantomData,
        })
    }

    /// Public key the corpus was checked against.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Known pairs, in the order they were given.
    pub fn corpus(&self) -> &[KnownPair] {
        &self.corpus
    }

    /// Fixed positions of the corpus.
    pub fn constraint(&self) -> &FixedConstraint {
        &self.constraint
    }

    /// Whether `digest` was already signed by one of the known pairs.
    pub fn is_known(&self, digest: &Digest) -> bool {
        self.corpus.iter().any(|pair| pair.digest() == digest)
    }

    /// Whether `candidate` agrees with the corpus on every fixed position.
    pub fn is_feasible(&self, candidate: &Digest) -> bool {
        self.constraint.is_feasible(candidate)
    }

    /// Assemble a signature on `candidate` from the cached donors. The result is the one
    /// [`assemble`] returns on the same corpus.
    ///
    /// # Errors
    /// Fails with `Error::Unassemblable` at the first position with no donor.
    pub fn assemble(&self, candidate: &Digest) -> Result<Signature, Error> {
        let mut preimages = [[0u8; BLOCK_SIZE]; BITS];
        for (k, preimage) in preimages.iter_mut().enumerate() {
            let bit = candidate.bit(k);
            let donor = self.donors[k][bit as usize]
                .ok_or(Error::Unassemblable { position: k, bit })?;
            *preimage = *self.corpus[donor].signature().preimage(k);
        }
        Ok(Signature::from_preimages(preimages))
    }

    /// Prune `candidate` against the fixed positions, then assemble.
    ///
    /// # Errors
    /// Fails with `Error::Unassemblable` at the first conflicting fixed position, or at the
    /// first position with no donor.
    pub fn forge(&self, candidate: &Digest) -> Result<Signature, Error> {
        if let Some((position, bit)) = self.constraint.first_conflict(candidate) {
            return Err(Error::Unassemblable { position, bit });
        }
        self.assemble(candidate)
    }

    /// Check `signature` on `digest` under the forger's public key.
    pub fn verify(&self, digest: &Digest, signature: &Signature) -> bool {
        verify::<H>(digest, &self.public_key, signature)
    }
}
