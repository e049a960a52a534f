//! Brute-force search for a forgeable message.
//!
//! Candidates are rendered from a fixed prefix and a strictly increasing counter, hashed, and
//! handed to the [`Forger`]. The expected number of candidates is `2^n` where `n` is the
//! number of fixed positions of the corpus; there is no upper bound unless one is configured.
use crate::common::{Digest, Sha256Hash};
use crate::errors::Error;
use crate::forger::Forger;
use crate::lamport::{KnownPair, PublicKey, Signature};
use crate::traits::HashFunction;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default message prefix. It carries the default marker.
pub const DEFAULT_PREFIX: &str = "forge ";
/// Default marker every forged message must contain.
pub const DEFAULT_MARKER: &str = "forge";
/// Default number of counters handed to the thread pool at once.
pub const DEFAULT_BATCH_SIZE: usize = 1 << 12;

/// Search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Rendered verbatim in front of the counter.
    pub prefix: String,
    /// Substring required in the prefix, if any.
    pub marker: Option<String>,
    /// First counter to try.
    pub start: u64,
    /// Counters per parallel batch.
    pub batch_size: usize,
    /// Ceiling on the number of candidates, unbounded when `None`.
    pub max_attempts: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            prefix: DEFAULT_PREFIX.to_owned(),
            marker: Some(DEFAULT_MARKER.to_owned()),
            start: 1,
            batch_size: DEFAULT_BATCH_SIZE,
            max_attempts: None,
        }
    }
}

impl SearchConfig {
    /// Default configuration with a custom `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        SearchConfig {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Require `marker` in the prefix.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Accept any prefix.
    pub fn without_marker(mut self) -> Self {
        self.marker = None;
        self
    }

    /// Start counting at `start`.
    pub fn starting_at(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    /// Hand `batch_size` counters to the thread pool at once. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Give up after `max_attempts` candidates.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Check the marker policy.
    ///
    /// # Errors
    /// Fails with `Error::MissingMarker` if a marker is set and the prefix lacks it.
    pub fn validate(&self) -> Result<(), Error> {
        match &self.marker {
            Some(marker) if !self.prefix.contains(marker.as_str()) => Err(Error::MissingMarker {
                marker: marker.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Candidate messages described by `self`.
    pub fn candidates(&self) -> Candidates {
        Candidates::starting_at(self.prefix.clone(), self.start)
    }
}

/// Lazy sequence of `(counter, prefix || counter)` messages. Counters strictly increase, so no
/// message is produced twice; the sequence ends only when the counter space is exhausted.
#[derive(Debug, Clone)]
pub struct Candidates {
    prefix: String,
    next: Option<u64>,
}

impl Candidates {
    /// Candidates from `start` onwards.
    pub fn starting_at(prefix: impl Into<String>, start: u64) -> Self {
        Candidates {
            prefix: prefix.into(),
            next: Some(start),
        }
    }

    /// Counter of the next candidate.
    pub fn next_counter(&self) -> Option<u64> {
        self.next
    }

    /// Render the message for `counter`.
    pub fn render(&self, counter: u64) -> String {
        format!("{}{}", self.prefix, counter)
    }

    /// Skip ahead so that the next candidate is `counter`. Never moves backwards.
    pub fn advance_to(&mut self, counter: u64) {
        if let Some(next) = self.next {
            self.next = Some(next.max(counter));
        }
    }
}

impl Iterator for Candidates {
    type Item = (u64, String);

    fn next(&mut self) -> Option<Self::Item> {
        let counter = self.next?;
        self.next = counter.checked_add(1);
        Some((counter, self.render(counter)))
    }
}

/// A message together with a valid signature assembled for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forgery {
    /// Counter the message was rendered from.
    pub counter: u64,
    /// Forged message.
    pub message: String,
    /// Digest of `message`.
    pub digest: Digest,
    /// Signature on `digest`.
    pub signature: Signature,
}

/// Shared flag stopping every worker of a search. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// A lowered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Returns `true` if this call raised it.
    pub fn stop(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    /// Whether the signal was raised.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// State of a [`Search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    /// No candidate succeeded yet.
    Searching,
    /// Terminal: a candidate succeeded.
    Found(Forgery),
}

/// Search driver over one [`Forger`].
///
/// # Example
/// ```no_run
/// use lamport_forgery::{Forger, KnownPair, PublicKey, Search, SearchConfig};
///
/// fn forge(pk: PublicKey, corpus: Vec<KnownPair>) -> Result<String, lamport_forgery::Error> {
///     let forger: Forger = Forger::new(pk, corpus)?;
///     let mut search = Search::new(&forger, SearchConfig::new("alice forge "))?;
///     let forgery = search.run()?;
///     assert!(forger.verify(&forgery.digest, &forgery.signature));
///     Ok(forgery.message)
/// }
/// ```
#[derive(Debug)]
pub struct Search<'a, H = Sha256Hash> {
    forger: &'a Forger<H>,
    config: SearchConfig,
    candidates: Candidates,
    attempts: u64,
    state: SearchState,
}

fn evaluate<H: HashFunction>(forger: &Forger<H>, counter: u64, message: String) -> Option<Forgery> {
    let digest = Digest::of::<H>(message.as_bytes());
    // A known digest would only replay an existing signature.
    if forger.is_known(&digest) || !forger.is_feasible(&digest) {
        return None;
    }
    let signature = forger.assemble(&digest).ok()?;
    Some(Forgery {
        counter,
        message,
        digest,
        signature,
    })
}

impl<'a, H: HashFunction> Search<'a, H> {
    /// Prepare a search over `forger`.
    ///
    /// # Errors
    /// Fails if `config` does not validate.
    pub fn new(forger: &'a Forger<H>, config: SearchConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Search {
            forger,
            candidates: config.candidates(),
            config,
            attempts: 0,
            state: SearchState::Searching,
        })
    }

    /// Current state.
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Number of candidates evaluated so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Evaluate one candidate. Does nothing once the search is in `Found`.
    ///
    /// # Errors
    /// Fails with `Error::Exhausted` if the counter space is used up.
    pub fn step(&mut self) -> Result<&SearchState, Error> {
        if let SearchState::Searching = self.state {
            let (counter, message) = self.candidates.next().ok_or(Error::Exhausted {
                attempts: self.attempts,
            })?;
            self.attempts += 1;
            if let Some(forgery) = evaluate(self.forger, counter, message) {
                self.state = SearchState::Found(forgery);
            }
        }
        Ok(&self.state)
    }

    /// Step until a candidate succeeds, or until `config.max_attempts` if one is set.
    ///
    /// # Errors
    /// Fails with `Error::Exhausted` when the ceiling is reached.
    pub fn run(&mut self) -> Result<Forgery, Error> {
        self.run_bounded(self.config.max_attempts.unwrap_or(u64::MAX))
    }

    /// Step until a candidate succeeds or `max_attempts` candidates were evaluated in total.
    ///
    /// # Errors
    /// Fails with `Error::Exhausted` when the ceiling is reached.
    pub fn run_bounded(&mut self, max_attempts: u64) -> Result<Forgery, Error> {
        loop {
            if let SearchState::Found(forgery) = &self.state {
                return Ok(forgery.clone());
            }
            if self.attempts >= max_attempts {
                return Err(Error::Exhausted {
                    attempts: self.attempts,
                });
            }
            self.step()?;
        }
    }

    fn check_parallel(
        &self,
        stop: &StopSignal,
        max_attempts: u64,
    ) -> Option<Result<Forgery, Error>> {
        if let SearchState::Found(forgery) = &self.state {
            stop.stop();
            return Some(Ok(forgery.clone()));
        }
        if stop.is_stopped() {
            return Some(Err(Error::Cancelled));
        }
        if self.attempts >= max_attempts || self.candidates.next_counter().is_none() {
            return Some(Err(Error::Exhausted {
                attempts: self.attempts,
            }));
        }
        None
    }

    /// Search on the rayon thread pool. Counters are handed out in consecutive batches and
    /// the lowest successful counter of a batch wins, so the result is the one [`Search::run`]
    /// returns. Within a batch `find_map_first` stops evaluating higher counters once one
    /// succeeds. Every candidate checks `stop` first; it is raised once the winning batch has
    /// joined, and raising it from outside cancels the search.
    ///
    /// # Errors
    /// Fails with `Error::Cancelled` if `stop` was raised from outside, or `Error::Exhausted`
    /// when `config.max_attempts` is reached.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(&mut self, stop: &StopSignal) -> Result<Forgery, Error> {
        use rayon::prelude::*;

        let max_attempts = self.config.max_attempts.unwrap_or(u64::MAX);
        let batch_size = self.config.batch_size.max(1) as u64;
        loop {
            if let Some(outcome) = self.check_parallel(stop, max_attempts) {
                return outcome;
            }
            let start = self.candidates.next_counter().ok_or(Error::Exhausted {
                attempts: self.attempts,
            })?;
            let span = batch_size
                .min(max_attempts - self.attempts)
                .min(u64::MAX - start);
            if span == 0 {
                // Only the last counter is left.
                self.step()?;
                continue;
            }
            let end = start + span;

            let forger = self.forger;
            let candidates = &self.candidates;
            let found = (start..end).into_par_iter().find_map_first(|counter| {
                if stop.is_stopped() {
                    return None;
                }
                evaluate(forger, counter, candidates.render(counter))
            });

            match found {
                Some(forgery) => {
                    self.attempts += forgery.counter - start + 1;
                    self.candidates.advance_to(forgery.counter.saturating_add(1));
                    self.state = SearchState::Found(forgery);
                }
                // A raised signal leaves the batch partially evaluated.
                None if stop.is_stopped() => return Err(Error::Cancelled),
                None => {
                    self.attempts += end - start;
                    self.candidates.advance_to(end);
                }
            }
        }
    }

    /// Sequential fallback when the `parallel` feature is disabled. Honours `stop` between
    /// candidates.
    ///
    /// # Errors
    /// Fails with `Error::Cancelled` if `stop` was raised from outside, or `Error::Exhausted`
    /// when `config.max_attempts` is reached.
    #[cfg(not(feature = "parallel"))]
    pub fn run_parallel(&mut self, stop: &StopSignal) -> Result<Forgery, Error> {
        let max_attempts = self.config.max_attempts.unwrap_or(u64::MAX);
        loop {
            if let Some(outcome) = self.check_parallel(stop, max_attempts) {
                return outcome;
            }
            self.step()?;
        }
    }
}

impl<H: HashFunction> Forger<H> {
    /// Prepare a search over `self`. See [`Search::new`].
    ///
    /// # Errors
    /// Fails if `config` does not validate.
    pub fn search(&self, config: SearchConfig) -> Result<Search<'_, H>, Error> {
        Search::new(self, config)
    }
}

/// Check `corpus` under `public_key`, analyse it, and search with `config` on the thread pool
/// until a forgery is found.
///
/// # Errors
/// Fails if the corpus is empty or invalid, if `config` does not validate, or if the search is
/// exhausted.
pub fn forge<H: HashFunction>(
    public_key: PublicKey,
    corpus: Vec<KnownPair>,
    config: SearchConfig,
) -> Result<Forgery, Error> {
    let forger = Forger::<H>::new(public_key, corpus)?;
    let mut search = forger.search(config)?;
    search.run_parallel(&StopSignal::new())
}
