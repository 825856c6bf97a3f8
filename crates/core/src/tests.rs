//! Tests for the selector collider engine

use std::collections::HashSet;
use std::sync::atomic::AtomicU64;

use proptest::prelude::*;

use crate::{
    max_length, partition, scan, selector, space_size, Alphabet, LengthSummary, Partition,
    SearchError, SearchObserver, SearchOutcome, SearchParams, Searcher, Selector, StopFlag,
    Target,
};

/// Records which lengths the coordinator started and finished
#[derive(Default)]
struct Recorder {
    started: Vec<(usize, u128, usize)>,
    finished: Vec<LengthSummary>,
}

impl SearchObserver for Recorder {
    fn on_length_start(&mut self, length: usize, total: u128, workers: usize) {
        self.started.push((length, total, workers));
    }

    fn on_length_finished(&mut self, summary: &LengthSummary) {
        self.finished.push(*summary);
    }
}

fn ab() -> Alphabet {
    Alphabet::new("ab").unwrap()
}

/// Target the selector of `candidate` while pretending the signature is `x()`
fn planted(candidate: &str) -> Target {
    Target::with_excluded(selector(candidate.as_bytes()), "x()")
}

#[test]
fn test_known_selectors() {
    // Well-known ERC-20 selectors pin the hash family to Keccak-256
    assert_eq!(selector(b"transfer(address,uint256)").to_hex(), "a9059cbb");
    assert_eq!(selector(b"balanceOf(address)").to_hex(), "70a08231");
    assert_eq!(selector(b"totalSupply()").to_hex(), "18160ddd");
    assert_eq!(selector(b"approve(address,uint256)").to_hex(), "095ea7b3");
}

#[test]
fn test_selector_is_deterministic() {
    let first = selector(b"solve()");
    for _ in 0..10 {
        assert_eq!(selector(b"solve()"), first);
    }
    assert_ne!(selector(b"solve()"), selector(b"solve2()"));
}

#[test]
fn test_selector_parse_and_display() {
    let sel: Selector = "0xA9059CBB".parse().unwrap();
    assert_eq!(sel, selector(b"transfer(address,uint256)"));
    assert_eq!(sel.to_string(), "a9059cbb");
    assert_eq!(sel.as_bytes(), &[0xa9, 0x05, 0x9c, 0xbb]);

    assert_eq!("a9059cbb".parse::<Selector>().unwrap(), sel);
    assert!(matches!(
        "a9059c".parse::<Selector>(),
        Err(SearchError::InvalidSelector(_))
    ));
    assert!("a9059cbb00".parse::<Selector>().is_err());
    assert!("zz059cbb".parse::<Selector>().is_err());
}

#[test]
fn test_target_self_match() {
    let target = Target::from_signature("solve()");
    assert!(target.is_self(b"solve()"));
    assert!(!target.is_self(b"solve"));
    assert_eq!(target.selector(), selector(b"solve()"));

    let raw = Target::from_selector(selector(b"solve()"));
    assert!(!raw.is_self(b"solve()"));
    assert_eq!(raw.signature(), None);
}

#[test]
fn test_encode_is_base_n_most_significant_first() {
    let ab = ab();
    assert_eq!(ab.encode(0, 3), "aaa");
    assert_eq!(ab.encode(1, 3), "aab");
    assert_eq!(ab.encode(2, 3), "aba");
    assert_eq!(ab.encode(7, 3), "bbb");

    let default = Alphabet::default();
    assert_eq!(default.len(), 62);
    assert_eq!(default.encode(0, 2), "aa");
    assert_eq!(default.encode(25, 1), "z");
    assert_eq!(default.encode(26, 1), "A");
    assert_eq!(default.encode(61, 1), "9");
    assert_eq!(default.encode(62, 2), "ba");
    assert_eq!(default.encode(62 * 62 - 1, 2), "99");
}

#[test]
fn test_encode_is_bijective_on_small_spaces() {
    let abc = Alphabet::new("abc").unwrap();

    for length in 1..=6 {
        let total = abc.space_size(length).unwrap();
        let mut seen = HashSet::new();

        for index in 0..total {
            let candidate = abc.encode(index, length);
            assert_eq!(candidate.len(), length);
            assert!(candidate.bytes().all(|b| abc.symbols().contains(&b)));
            assert_eq!(abc.decode(&candidate), Some(index));
            assert!(seen.insert(candidate), "duplicate at index {}", index);
        }

        assert_eq!(seen.len() as u128, 3u128.pow(length as u32));
    }
}

#[test]
fn test_encode_into_matches_encode() {
    let alphabet = Alphabet::default();
    let mut buf = [0u8; 4];
    for index in [0u128, 1, 61, 62, 3843, 999_999, 14_776_335] {
        alphabet.encode_into(index, &mut buf);
        assert_eq!(&buf[..], alphabet.encode(index, 4).as_bytes());
    }
}

#[test]
fn test_decode_rejects_foreign_symbols() {
    let ab = ab();
    assert_eq!(ab.decode("abc"), None);
    assert_eq!(ab.decode("a b"), None);
    assert_eq!(ab.decode("é"), None);
    assert_eq!(ab.decode(""), Some(0));
}

#[test]
fn test_alphabet_validation() {
    assert_eq!(Alphabet::new(""), Err(SearchError::EmptyAlphabet));
    assert_eq!(Alphabet::new("aba"), Err(SearchError::DuplicateSymbol('a')));
    assert_eq!(Alphabet::new("ab c"), Err(SearchError::InvalidSymbol(' ')));
    assert_eq!(Alphabet::new("aé"), Err(SearchError::InvalidSymbol('é')));

    let default = Alphabet::default();
    assert_eq!(Alphabet::new(default.as_str()).unwrap(), default);
}

#[test]
fn test_space_size_and_overflow_limit() {
    assert_eq!(space_size(62, 1).unwrap(), 62);
    assert_eq!(space_size(62, 3).unwrap(), 238_328);
    assert_eq!(space_size(2, 0).unwrap(), 1);
    assert!(space_size(62, 21).is_ok());

    assert_eq!(
        space_size(62, 22),
        Err(SearchError::SpaceOverflow {
            alphabet: 62,
            length: 22,
            limit: 21,
        })
    );

    assert_eq!(max_length(62), 21);
    assert_eq!(max_length(2), 127);
    assert_eq!(max_length(1), usize::MAX);
    assert_eq!(space_size(1, 1_000).unwrap(), 1);
}

/// Partitions must tile `[0, total)`: start at 0, end at total, no gaps,
/// no overlap and no empty ranges
fn assert_tiles(parts: &[Partition], total: u128) {
    if total == 0 {
        assert!(parts.is_empty());
        return;
    }
    assert_eq!(parts.first().unwrap().start, 0);
    assert_eq!(parts.last().unwrap().end, total);
    for pair in parts.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    assert!(parts.iter().all(|p| !p.is_empty()));
    assert_eq!(parts.iter().map(Partition::len).sum::<u128>(), total);
}

#[test]
fn test_partition_tiles_the_space() {
    for total in [0u128, 1, 2, 7, 100, 1_000, 3_844, 238_328] {
        for workers in [1usize, 2, 3, 8, 16, 64] {
            let parts = partition(total, workers);
            assert_eq!(parts.len() as u128, (workers as u128).min(total));
            assert_tiles(&parts, total);
        }
    }
}

#[test]
fn test_partition_even_division() {
    let parts = partition(100, 4);
    assert!(parts.iter().all(|p| p.len() == 25));
    assert_eq!(parts[2].range(), 50..75);
}

#[test]
fn test_partition_remainder_goes_to_last_worker() {
    let parts = partition(10, 3);
    assert_eq!(
        parts,
        vec![
            Partition { start: 0, end: 3 },
            Partition { start: 3, end: 6 },
            Partition { start: 6, end: 10 },
        ]
    );
}

#[test]
fn test_partition_clamps_small_spaces() {
    // 2 candidates, 8 workers: two single-index ranges, nothing scanned twice
    let parts = partition(2, 8);
    assert_eq!(
        parts,
        vec![Partition { start: 0, end: 1 }, Partition { start: 1, end: 2 }]
    );
}

#[test]
fn test_stop_flag_has_single_winner() {
    let stop = StopFlag::new();
    assert!(!stop.is_set());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let stop = stop.clone();
            std::thread::spawn(move || stop.try_set())
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1);
    assert!(stop.is_set());
}

#[test]
fn test_scan_finds_planted_candidate() {
    let params = SearchParams::new(ab(), planted("bab()"));
    let stop = StopFlag::new();
    let counter = AtomicU64::new(0);

    let report = scan(0, &params, 3, Partition { start: 0, end: 8 }, &stop, &counter);
    let collision = report.collision.unwrap();

    assert_eq!(collision.candidate, "bab()");
    assert_eq!(collision.index, 5);
    assert_eq!(collision.length, 3);
    assert_eq!(collision.selector, selector(b"bab()"));
    assert_eq!(collision.target_signature.as_deref(), Some("x()"));
    // Stops right after the match: aaa..bab is six candidates
    assert_eq!(report.hashed, 6);
    assert_eq!(counter.into_inner(), 6);
    assert!(stop.is_set());
}

#[test]
fn test_scan_skips_target_signature() {
    // "solve" is one of the 5^5 candidates over these symbols
    let params = SearchParams::new(
        Alphabet::new("elosv").unwrap(),
        Target::from_signature("solve()"),
    );
    let stop = StopFlag::new();
    let counter = AtomicU64::new(0);

    let report = scan(0, &params, 5, Partition { start: 0, end: 3125 }, &stop, &counter);

    assert!(report.collision.is_none());
    assert_eq!(report.hashed, 3124);
    assert!(!stop.is_set());
}

#[test]
fn test_scan_honours_stop_flag() {
    let params = SearchParams::new(ab(), planted("bab()"));
    let stop = StopFlag::new();
    assert!(stop.try_set());
    let counter = AtomicU64::new(0);

    let report = scan(0, &params, 3, Partition { start: 0, end: 8 }, &stop, &counter);

    assert_eq!(report.hashed, 0);
    assert!(report.collision.is_none());
}

#[test]
fn test_scan_misses_match_outside_its_range() {
    // "bab" is index 5; this worker only owns [0, 4)
    let params = SearchParams::new(ab(), planted("bab()"));
    let stop = StopFlag::new();
    let counter = AtomicU64::new(0);

    let report = scan(0, &params, 3, Partition { start: 0, end: 4 }, &stop, &counter);

    assert!(report.collision.is_none());
    assert_eq!(report.hashed, 4);
    assert!(!stop.is_set());
}

#[test]
fn test_search_stops_at_length_of_match() {
    let params = SearchParams::new(ab(), planted("b()"))
        .with_lengths(1, 2)
        .with_workers(2);
    let mut recorder = Recorder::default();

    let outcome = Searcher::new(params).unwrap().run(&mut recorder).unwrap();

    let collision = outcome.collision().unwrap();
    assert_eq!(collision.candidate, "b()");
    assert_eq!(collision.target_signature.as_deref(), Some("x()"));
    assert_eq!(outcome.stats().last_length, Some(1));
    assert_eq!(outcome.stats().lengths_searched, 1);
    assert_eq!(recorder.started, vec![(1, 2, 2)]);
    assert!(recorder.finished[0].found);
}

#[test]
fn test_search_exhausts_without_collision() {
    let params = SearchParams::new(ab(), Target::from_signature("solve()"))
        .with_lengths(1, 3)
        .with_workers(4);
    let mut recorder = Recorder::default();

    let outcome = Searcher::new(params).unwrap().run(&mut recorder).unwrap();

    match outcome {
        SearchOutcome::Exhausted { stats } => {
            assert_eq!(stats.lengths_searched, 3);
            assert_eq!(stats.last_length, Some(3));
            assert_eq!(stats.hashed, 2 + 4 + 8);
        }
        SearchOutcome::Found { collision, .. } => panic!("unexpected {:?}", collision),
    }

    let lengths: Vec<usize> = recorder.started.iter().map(|(l, _, _)| *l).collect();
    assert_eq!(lengths, vec![1, 2, 3]);
    let workers: Vec<usize> = recorder.started.iter().map(|(_, _, w)| *w).collect();
    assert_eq!(workers, vec![2, 4, 4]);
    assert!(recorder.finished.iter().all(|s| !s.found));
}

#[test]
fn test_search_never_reports_self_match() {
    let params = SearchParams::new(
        Alphabet::new("elosv").unwrap(),
        Target::from_signature("solve()"),
    )
    .with_lengths(5, 5)
    .with_workers(3);

    let outcome = Searcher::new(params).unwrap().run(&mut ()).unwrap();

    assert!(!outcome.is_found());
    assert_eq!(outcome.stats().hashed, 3124);
}

#[test]
fn test_search_result_independent_of_worker_count() {
    for workers in [1, 2, 8] {
        let params = SearchParams::new(ab(), planted("abba()"))
            .with_lengths(1, 5)
            .with_workers(workers);
        let outcome = Searcher::new(params).unwrap().run(&mut ()).unwrap();

        let collision = outcome.collision().unwrap();
        assert_eq!(collision.candidate, "abba()", "workers = {}", workers);
        assert_eq!(collision.length, 4);
        assert_eq!(collision.index, 0b0110);
        assert_eq!(outcome.stats().last_length, Some(4));
    }

    for workers in [1, 2, 8] {
        let params = SearchParams::new(ab(), Target::from_signature("solve()"))
            .with_lengths(1, 4)
            .with_workers(workers);
        let outcome = Searcher::new(params).unwrap().run(&mut ()).unwrap();

        assert!(!outcome.is_found(), "workers = {}", workers);
        assert_eq!(outcome.stats().hashed, 2 + 4 + 8 + 16);
    }
}

#[test]
fn test_search_with_prefix_and_suffix() {
    let params = SearchParams::new(ab(), planted("f_ab(uint256)"))
        .with_prefix("f_")
        .with_suffix("(uint256)")
        .with_lengths(1, 3)
        .with_workers(2);

    let outcome = Searcher::new(params).unwrap().run(&mut ()).unwrap();

    assert_eq!(outcome.collision().unwrap().candidate, "f_ab(uint256)");
}

#[test]
fn test_search_summaries_add_up() {
    let params = SearchParams::new(Alphabet::new("abc").unwrap(), Target::from_signature("solve()"))
        .with_lengths(1, 6)
        .with_workers(3)
        .with_progress_interval(Some(std::time::Duration::from_millis(1)));
    let mut recorder = Recorder::default();

    let outcome = Searcher::new(params).unwrap().run(&mut recorder).unwrap();

    let summed: u64 = recorder.finished.iter().map(|s| s.hashed).sum();
    assert_eq!(summed, outcome.stats().hashed);
    assert_eq!(recorder.finished.len(), 6);
}

#[test]
fn test_search_params_validation() {
    let base = || SearchParams::new(ab(), Target::from_signature("solve()"));

    assert_eq!(
        Searcher::new(base().with_lengths(0, 3)).unwrap_err(),
        SearchError::ZeroLength
    );
    assert_eq!(
        Searcher::new(base().with_lengths(4, 3)).unwrap_err(),
        SearchError::InvalidLengthRange { min: 4, max: 3 }
    );
    assert_eq!(
        Searcher::new(base().with_workers(0)).unwrap_err(),
        SearchError::NoWorkers
    );

    let too_long = SearchParams::default().with_lengths(1, 22);
    assert!(matches!(
        Searcher::new(too_long),
        Err(SearchError::SpaceOverflow { limit: 21, .. })
    ));
    assert!(Searcher::new(SearchParams::default().with_lengths(1, 21)).is_ok());
}

proptest! {
    #[test]
    fn decode_inverts_encode(length in 1usize..=12, seed in any::<u128>()) {
        let alphabet = Alphabet::default();
        let total = alphabet.space_size(length).unwrap();
        let index = seed % total;

        let candidate = alphabet.encode(index, length);
        prop_assert_eq!(candidate.len(), length);
        prop_assert_eq!(alphabet.decode(&candidate), Some(index));
    }

    #[test]
    fn distinct_indices_give_distinct_candidates(
        length in 1usize..=8,
        a in any::<u64>(),
        b in any::<u64>(),
    ) {
        let alphabet = Alphabet::default();
        let total = alphabet.space_size(length).unwrap();
        let (i, j) = (a as u128 % total, b as u128 % total);
        prop_assume!(i != j);
        prop_assert_ne!(alphabet.encode(i, length), alphabet.encode(j, length));
    }
}
