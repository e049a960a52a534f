//! Fixed-position analysis of a corpus of signed digests.
//!
//! A position is fixed when every known digest carries the same bit there. Only that bit's
//! preimage has ever been revealed at a fixed position, so any forgeable candidate must
//! agree with the corpus on all of them. The converse does not hold: feasibility only prunes
//! candidates, assembly decides.
use crate::common::{Digest, BITS};
use crate::errors::Error;

/// Bit positions on which every digest of a corpus agrees, in increasing order, paired with
/// the agreed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedConstraint {
    positions: Vec<usize>,
    values: Vec<u8>,
}

impl FixedConstraint {
    /// Compute the fixed positions of `digests`.
    ///
    /// # Errors
    /// Fails with `Error::EmptyCorpus` when `digests` is empty, since every position would be
    /// vacuously fixed.
    pub fn from_digests(digests: &[Digest]) -> Result<Self, Error> {
        let (first, rest) = digests.split_first().ok_or(Error::EmptyCorpus)?;

        let mut positions = Vec::new();
        let mut values = Vec::new();
        for k in 0..BITS {
            let bit = first.bit(k);
            if rest.iter().all(|d| d.bit(k) == bit) {
                positions.push(k);
                values.push(bit);
            }
        }
        Ok(FixedConstraint { positions, values })
    }

    /// Fixed positions, in increasing order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Agreed bit value for each entry of [`FixedConstraint::positions`].
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Number of fixed positions. A random candidate is feasible with probability
    /// `2^-len`.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no position is fixed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of positions left free by the corpus.
    pub fn free_bits(&self) -> usize {
        BITS - self.len()
    }

    /// First fixed position where `candidate` disagrees with the corpus, together with the
    /// candidate's bit there.
    pub fn first_conflict(&self, candidate: &Digest) -> Option<(usize, u8)> {
        self.positions
            .iter()
            .zip(self.values.iter())
            .find(|&(&k, &value)| candidate.bit(k) != value)
            .map(|(&k, _)| (k, candidate.bit(k)))
    }

    /// Whether `candidate` matches the agreed value on every fixed position.
    pub fn is_feasible(&self, candidate: &Digest) -> bool {
        self.first_conflict(candidate).is_none()
    }
}
