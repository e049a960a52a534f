//! Lamport one-time signatures, and forgery under key reuse.
//!
//! A Lamport key may sign a single digest. Each further signature reveals more preimages, and
//! once several digests have been signed, any digest that agrees with all of them on the
//! positions where they agree with each other can be signed by recombining revealed
//! preimages. This crate verifies signatures, analyses a corpus of signatures made under one
//! key, and searches for a new message it can sign.
//!
//! "Constructing Digital Signatures from a One Way Function"
//! By Leslie Lamport
//!
#![warn(missing_docs, rust_2018_idioms)]

pub mod analyzer;
pub mod common;
mod errors;
pub mod forger;
pub mod lamport;
pub mod search;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use analyzer::FixedConstraint;
pub use common::{Blake2bHash, Digest, Sha256Hash};
pub use errors::Error;
pub use forger::{assemble, Forger};
pub use lamport::{verify, verify_message, KnownPair, PublicKey, Signature};
pub use search::{forge, Candidates, Forgery, Search, SearchConfig, SearchState, StopSignal};
