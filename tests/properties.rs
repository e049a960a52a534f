//! Property tests for fixed-position analysis and signature assembly.
mod common;

use common::TestKey;
use lamport_forgery::common::BITS;
use lamport_forgery::{
    assemble, Digest, Error, FixedConstraint, Forger, KnownPair, Sha256Hash,
};
use proptest::prelude::*;

fn digests(max: usize) -> impl Strategy<Value = Vec<Digest>> {
    prop::collection::vec(prop::array::uniform32(any::<u8>()), 2..max)
        .prop_map(|v| v.into_iter().map(Digest::from).collect())
}

proptest! {
    // Adding digests can only unfix positions.
    #[test]
    fn fixed_positions_shrink_as_corpus_grows(corpus in digests(10)) {
        let mut previous = FixedConstraint::from_digests(&corpus[..1]).unwrap();
        for n in 2..=corpus.len() {
            let current = FixedConstraint::from_digests(&corpus[..n]).unwrap();
            prop_assert!(current.len() <= previous.len());
            prop_assert!(current.positions().iter().all(|k| previous.positions().contains(k)));
            prop_assert!(current.positions().windows(2).all(|w| w[0] < w[1]));
            for (&k, &value) in current.positions().iter().zip(current.values()) {
                prop_assert!(corpus[..n].iter().all(|d| d.bit(k) == value));
            }
            previous = current;
        }
    }
}

// Big-endian bit order, matching `Digest::bit`.
fn set_bit(bytes: &mut [u8; 32], k: usize, bit: u8) {
    let mask = 0x80u8 >> (k % 8);
    if bit == 1 {
        bytes[k / 8] |= mask;
    } else {
        bytes[k / 8] &= !mask;
    }
}

fn signed_corpus(
    seed: &[u8],
    signed: &[Digest],
) -> (TestKey, Forger<Sha256Hash>, Vec<KnownPair>) {
    let (skey, pkey) = TestKey::keygen::<Sha256Hash>(seed);
    let corpus: Vec<KnownPair> = signed
        .iter()
        .map(|d| KnownPair::new(*d, skey.sign(d)))
        .collect();
    let forger = Forger::<Sha256Hash>::new(pkey, corpus.clone()).unwrap();
    (skey, forger, corpus)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Keep the fixed positions of the first signed digest, take every free position from
    // `noise`: the candidate is feasible, and so always assemblable.
    #[test]
    fn assembled_signatures_verify(
        seed in prop::array::uniform4(any::<u8>()),
        signed in digests(6),
        noise in prop::array::uniform32(any::<u8>()),
    ) {
        let (skey, forger, corpus) = signed_corpus(&seed, &signed);
        let noise = Digest::from(noise);
        let mut bytes = *signed[0].as_bytes();
        for k in 0..BITS {
            if !forger.constraint().positions().contains(&k) {
                set_bit(&mut bytes, k, noise.bit(k));
            }
        }
        let candidate = Digest::from(bytes);

        prop_assert!(forger.is_feasible(&candidate));
        let signature = forger.forge(&candidate).unwrap();
        prop_assert_eq!(&signature, &forger.assemble(&candidate).unwrap());
        prop_assert_eq!(&signature, &assemble(&candidate, &corpus).unwrap());
        prop_assert!(forger.verify(&candidate, &signature));
        prop_assert_eq!(signature, skey.sign(&candidate));
    }

    // Flipping a single fixed bit of a signed digest leaves exactly one conflict, and no
    // signature of the corpus reveals the flipped preimage.
    #[test]
    fn flipped_fixed_bit_is_unassemblable(
        seed in prop::array::uniform4(any::<u8>()),
        signed in digests(6),
        index in any::<prop::sample::Index>(),
    ) {
        let (_, forger, corpus) = signed_corpus(&seed, &signed);
        let constraint = forger.constraint();
        prop_assume!(!constraint.is_empty());

        let i = index.index(constraint.len());
        let (k, value) = (constraint.positions()[i], constraint.values()[i]);
        let mut bytes = *signed[0].as_bytes();
        set_bit(&mut bytes, k, 1 - value);
        let candidate = Digest::from(bytes);
        let expected = Error::Unassemblable { position: k, bit: 1 - value };

        prop_assert!(!forger.is_feasible(&candidate));
        prop_assert_eq!(constraint.first_conflict(&candidate), Some((k, 1 - value)));
        prop_assert_eq!(forger.forge(&candidate), Err(expected.clone()));
        prop_assert_eq!(forger.assemble(&candidate), Err(expected.clone()));
        prop_assert_eq!(assemble(&candidate, &corpus), Err(expected));
    }
}
