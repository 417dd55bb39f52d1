use std::collections::{HashMap, HashSet};

use miniblast_core::{align, build_index, KmerMap};
use proptest::prelude::*;

fn dna(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 0..max_len)
}

proptest! {
    #[test]
    fn index_holds_every_distinct_word(genome in dna(300), word_size in 1usize..8) {
        let index = build_index(&genome, word_size).unwrap();

        let mut first: HashMap<&[u8], usize> = HashMap::new();
        if genome.len() >= word_size {
            for (i, word) in genome.windows(word_size).enumerate() {
                first.entry(word).or_insert(i);
            }
        }

        prop_assert_eq!(index.len(), first.len());
        for (word, offset) in first {
            prop_assert_eq!(index.lookup(word), Some(offset as i64 - word_size as i64));
        }
    }

    #[test]
    fn insert_keeps_first_value(words in prop::collection::vec(dna(12), 1..60)) {
        let mut map = KmerMap::with_buckets(1);
        let mut expected: HashMap<Vec<u8>, usize> = HashMap::new();
        for (i, word) in words.iter().enumerate() {
            let (_, inserted) = map.insert(word, i);
            prop_assert_eq!(inserted, !expected.contains_key(word));
            expected.entry(word.clone()).or_insert(i);
        }
        for (word, value) in &expected {
            prop_assert_eq!(map.get(word), Some(value));
        }
    }

    #[test]
    fn rehash_preserves_entries(words in prop::collection::hash_set(dna(10), 0..80), buckets in 1usize..500) {
        let mut map = KmerMap::new();
        for (i, word) in words.iter().enumerate() {
            map.insert(word, i);
        }
        let before: HashMap<Vec<u8>, usize> =
            map.iter().map(|(k, v)| (k.to_vec(), *v)).collect();

        map.rehash(buckets);

        prop_assert_eq!(map.len(), before.len());
        let after: HashSet<Vec<u8>> = map.keys().map(|k| k.to_vec()).collect();
        prop_assert_eq!(after.len(), before.len());
        for (word, value) in &before {
            prop_assert_eq!(map.get(word), Some(value));
        }
    }

    #[test]
    fn score_is_symmetric(a in dna(40), b in dna(40)) {
        let forward = align(&a, &b).unwrap();
        let backward = align(&b, &a).unwrap();
        prop_assert_eq!(forward.score, backward.score);
    }

    #[test]
    fn removing_gaps_restores_inputs(a in dna(40), b in dna(40)) {
        let alignment = align(&a, &b).unwrap();
        prop_assert_eq!(alignment.aligned_seq1.len(), alignment.aligned_seq2.len());
        prop_assert_eq!(alignment.indicator.len(), alignment.aligned_seq1.len());
        prop_assert_eq!(alignment.ungapped_seq1().into_bytes(), a);
        prop_assert_eq!(alignment.ungapped_seq2().into_bytes(), b);
    }
}
