//! Errors specific to Lamport verification and forgery
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enum of errors associated with analysing, assembling and searching for forgeries
pub enum Error {
    /// The corpus of known signatures is empty. Every bit position would be trivially
    /// fixed, so no meaningful analysis can be made.
    #[error("the corpus of known signatures is empty")]
    EmptyCorpus,
    /// The known pair at the given index does not verify under the public key.
    #[error("known signature at index {0} does not verify under the public key")]
    InvalidCorpusSignature(usize),
    /// No signature of the corpus reveals the preimage for `bit` at `position`. This is an
    /// expected outcome for most candidates, not a fault.
    #[error("no known signature reveals bit {bit} at position {position}")]
    Unassemblable {
        /// Bit position, 0 being the most significant bit of the digest.
        position: usize,
        /// Value of the candidate bit at `position`.
        bit: u8,
    },
    /// A bounded search tried `attempts` candidates without success.
    #[error("search exhausted after {attempts} candidates")]
    Exhausted {
        /// Number of candidates evaluated.
        attempts: u64,
    },
    /// The stop signal was raised before any candidate succeeded.
    #[error("search cancelled")]
    Cancelled,
    /// The configured message prefix does not contain the required marker.
    #[error("message prefix does not contain the marker {marker:?}")]
    MissingMarker {
        /// Required marker substring.
        marker: String,
    },
    /// Error occurs when the size of the public key is not the expected.
    #[error("invalid public key size: {0}")]
    InvalidPublicKeySize(usize),
    /// Error occurs when the size of the signature is not the expected.
    #[error("invalid signature size: {0}")]
    InvalidSignatureSize(usize),
    /// Error occurs when the size of the digest is not the expected.
    #[error("invalid digest size: {0}")]
    InvalidDigestSize(usize),
}
