use dstring::{Budget, DString, capacity::ALIGNMENT, search};

fn assert_invariants(s: &DString) {
    if s.capacity() == 0 {
        assert_eq!(s.len(), 0);
        assert!(s.as_bytes_with_nul().is_none());
        return;
    }
    let with_nul = s.as_bytes_with_nul().unwrap();
    assert_eq!(with_nul.len(), s.len() + 1);
    assert_eq!(with_nul[s.len()], 0);
    assert!(s.len() < s.capacity());
    assert_eq!(s.capacity() % ALIGNMENT, 0);
    assert!(s.capacity() >= s.floor());
}

fn random_text(alphabet: &[u8], max_len: usize) -> Vec<u8> {
    let len = fastrand::usize(..=max_len);
    (0..len)
        .map(|_| alphabet[fastrand::usize(..alphabet.len())])
        .collect()
}

/// Straightforward forward replace used as a reference.
fn model_replace(text: &[u8], old: &[u8], new: &[u8], n: usize) -> (Vec<u8>, usize) {
    let mut out = Vec::new();
    let mut replaced = 0;
    let mut i = 0;
    while i < text.len() {
        if (n == 0 || replaced < n) && text[i..].starts_with(old) {
            out.extend_from_slice(new);
            i += old.len();
            replaced += 1;
        } else {
            out.push(text[i]);
            i += 1;
        }
    }
    (out, replaced)
}

/// Backward replace is the forward replace of the reversed text.
fn model_replace_backward(text: &[u8], old: &[u8], new: &[u8], n: usize) -> (Vec<u8>, usize) {
    let reversed = |bytes: &[u8]| bytes.iter().rev().copied().collect::<Vec<u8>>();
    let (mut out, replaced) = model_replace(&reversed(text), &reversed(old), &reversed(new), n);
    out.reverse();
    (out, replaced)
}

#[test]
fn test_hello_world() {
    let mut s = DString::new();
    s.assign("Hello").unwrap();
    s.append(" World!").unwrap();
    assert_eq!(s.as_c_str().unwrap().to_str().unwrap(), "Hello World!");
    assert_eq!(s.len(), 12);
    assert_invariants(&s);
}

#[test]
fn test_replace_example() {
    let mut s = DString::from_text("Hello World!").unwrap();
    assert_eq!(s.replace("l", "LLL", 0, false).unwrap(), 3);
    assert_eq!(s, "HeLLLLLLo WorLLLd!");
}

#[test]
fn test_append_concatenates() {
    fastrand::seed(81726354);
    for _ in 0..200 {
        let initial = random_text(b"abc", 40);
        let suffix = random_text(b"xyz", 40);
        let mut s = DString::from_text(&initial).unwrap();
        s.append(&suffix).unwrap();

        let expected = [initial.as_slice(), suffix.as_slice()].concat();
        assert_eq!(s.as_bytes(), expected.as_slice());
        assert_eq!(s.len(), initial.len() + suffix.len());
        assert_invariants(&s);
    }
}

#[test]
fn test_insert_then_erase_restores() {
    fastrand::seed(5519023);
    for _ in 0..200 {
        let initial = random_text(b"abcd", 50);
        let text = random_text(b"0123", 20);
        if text.is_empty() {
            continue;
        }
        let mut s = DString::from_text(&initial).unwrap();
        let index = fastrand::usize(..=initial.len());

        s.insert(index, &text).unwrap();
        assert_invariants(&s);
        s.erase(index, text.len()).unwrap();
        assert_eq!(s.as_bytes(), initial.as_slice());
        assert_invariants(&s);
    }
}

#[test]
fn test_clear_keeps_capacity() {
    let mut s = DString::from_text("some content").unwrap();
    let capacity = s.capacity();
    s.clear();
    assert_eq!(s.len(), 0);
    assert_eq!(s.capacity(), capacity);
    assert_eq!(s.as_c_str().unwrap().to_bytes(), b"");
    assert!(!s.contains("some"));
    assert_invariants(&s);
}

#[test]
fn test_reserve_current_capacity_is_noop() {
    fastrand::seed(1234);
    for _ in 0..100 {
        let initial = random_text(b"ab", 60);
        let mut s = DString::from_text(&initial).unwrap();
        let capacity = s.capacity();
        s.reserve(capacity).unwrap();
        assert_eq!(s.as_bytes(), initial.as_slice());
        assert_eq!(s.capacity(), capacity);
    }
}

#[test]
fn test_floor_holds_across_mutations() {
    let mut s = DString::new();
    s.reserve(100).unwrap();
    assert_eq!(s.capacity(), 104);
    s.assign("short").unwrap();
    s.erase(0, 2).unwrap();
    s.replace("o", "", 0, false).unwrap();
    assert_eq!(s, "rt");
    assert_eq!(s.capacity(), 104);

    s.reserve(10).unwrap();
    assert_eq!(s.capacity(), 16);
    assert_eq!(s, "rt");
    assert_invariants(&s);
}

#[test]
fn test_count_and_find_nth_consistency() {
    assert_eq!(DString::from_text("aaaa").unwrap().count("aa"), 2);

    fastrand::seed(97531);
    for _ in 0..300 {
        let text = random_text(b"ab", 60);
        let needle = random_text(b"ab", 3);
        let s = DString::from_text(&text).unwrap();
        let total = s.count(&needle);

        assert_eq!(s.find_nth(&needle, 0), None);
        assert_eq!(s.find_nth(&needle, total + 1), None);
        if total > 0 {
            assert_eq!(s.find_nth(&needle, 1), s.find(&needle));
        }
        for n in 1..=total {
            let at = s.find_nth(&needle, n).unwrap();
            assert!(s.as_bytes()[at..].starts_with(&needle));

            let rest = at + needle.len();
            let next = search::find(&s.as_bytes()[rest..], &needle).map(|i| i + rest);
            assert_eq!(next, s.find_nth(&needle, n + 1));
        }
    }
}

#[test]
fn test_rfind_matches_last_window() {
    fastrand::seed(4242);
    for _ in 0..200 {
        let text = random_text(b"abc", 40);
        let needle = random_text(b"abc", 2);
        let s = DString::from_text(&text).unwrap();
        let expected = if needle.is_empty() || needle.len() > text.len() {
            None
        } else {
            (0..=text.len() - needle.len())
                .rev()
                .find(|&i| text[i..].starts_with(&needle))
        };
        assert_eq!(s.rfind(&needle), expected);
    }
}

#[test]
fn test_replace_against_model() {
    fastrand::seed(20240611);
    for _ in 0..500 {
        let text = random_text(b"ab", 40);
        let old = random_text(b"ab", 3);
        let new = random_text(b"abc", 5);
        let n = fastrand::usize(..4);
        let backward = fastrand::bool();
        if old.is_empty() || old.len() > text.len() {
            continue;
        }

        let (expected, expected_count) = if backward {
            model_replace_backward(&text, &old, &new, n)
        } else {
            model_replace(&text, &old, &new, n)
        };

        let mut s = DString::from_text(&text).unwrap();
        let replaced = s.replace(&old, &new, n, backward).unwrap();
        assert_eq!(replaced, expected_count);
        assert_eq!(s.as_bytes(), expected.as_slice());
        assert_invariants(&s);
    }
}

#[test]
fn test_random_mutations_keep_invariants() {
    fastrand::seed(777);
    let mut s = DString::new();
    let mut model: Vec<u8> = Vec::new();

    for _ in 0..2000 {
        match fastrand::u8(..8) {
            0 => {
                let text = random_text(b"abc", 30);
                s.assign(&text).unwrap();
                model = text;
            }
            1 => {
                let text = random_text(b"abc", 10);
                s.append(&text).unwrap();
                model.extend_from_slice(&text);
            }
            2 => {
                let text = random_text(b"abc", 10);
                let index = fastrand::usize(..=model.len());
                s.insert(index, &text).unwrap();
                model.splice(index..index, text);
            }
            3 if !model.is_empty() => {
                let index = fastrand::usize(..model.len());
                let count = fastrand::usize(..=model.len() - index);
                s.erase(index, count).unwrap();
                let end = if count == 0 { model.len() } else { index + count };
                model.drain(index..end);
            }
            4 => {
                let floor = fastrand::usize(..64);
                s.reserve(floor).unwrap();
                let planned = dstring::capacity::plan(floor, floor);
                model.truncate(planned.saturating_sub(1));
            }
            5 => {
                s.clear();
                model.clear();
            }
            6 if !model.is_empty() => {
                let old = random_text(b"abc", 2);
                if old.is_empty() || old.len() > model.len() {
                    continue;
                }
                let new = random_text(b"abc", 3);
                let (expected, _) = model_replace(&model, &old, &new, 0);
                s.replace(&old, &new, 0, false).unwrap();
                model = expected;
            }
            7 => {
                let value = fastrand::u32(..1000);
                s.append_fmt(format_args!("<{value}>")).unwrap();
                model.extend_from_slice(format!("<{value}>").as_bytes());
            }
            _ => {}
        }
        assert_eq!(s.as_bytes(), model.as_slice());
        assert_invariants(&s);
    }
}

#[test]
fn test_allocation_failure_leaves_string_unchanged() {
    fastrand::seed(31337);
    for _ in 0..100 {
        let initial = random_text(b"ab", 30);
        if initial.is_empty() {
            continue;
        }
        let probe = DString::from_text(&initial).unwrap();
        let budget = Budget::new(probe.capacity());
        let mut s = DString::from_text_in(&initial, &budget).unwrap();
        assert_eq!(budget.remaining(), 0);

        let capacity = s.capacity();
        let grow_by = vec![b'x'; capacity];
        let growing = [
            s.append(&grow_by),
            s.insert(fastrand::usize(..=initial.len()), &grow_by),
            s.assign(&grow_by),
            s.append_fmt(format_args!("{}", "y".repeat(capacity))),
            s.insert_fmt(0, format_args!("{:>width$}", 'z', width = capacity)),
            s.assign_fmt(format_args!("{}", "w".repeat(capacity))),
            s.reserve(capacity + 1),
        ];
        for result in growing {
            let err = result.unwrap_err();
            assert!(err.is_allocation_failure(), "{err}");
        }
        assert_eq!(s.as_bytes(), initial.as_slice());
        assert_eq!(s.capacity(), capacity);
        assert_invariants(&s);

        // Replacing with a longer text only needs to grow when there is a match.
        let result = s.replace("a", "a".repeat(capacity), 0, false);
        if initial.contains(&b'a') {
            assert!(result.unwrap_err().is_allocation_failure());
        } else {
            assert_eq!(result.unwrap(), 0);
        }
        assert_eq!(s.as_bytes(), initial.as_slice());
        assert_eq!(s.capacity(), capacity);
        assert_invariants(&s);

        assert!(s.append(&grow_by).unwrap_err().is_allocation_failure());
        assert!(s.try_clone().unwrap_err().is_allocation_failure());
    }
}

#[test]
fn test_shrinking_never_needs_budget() {
    let budget = Budget::new(48);
    let mut s = DString::from_text_in("x".repeat(40), &budget).unwrap();
    assert_eq!(budget.remaining(), 0);

    s.erase(8, 0).unwrap();
    assert_eq!(s.capacity(), 16);
    assert_eq!(budget.remaining(), 32);

    s.replace("x", "", 4, false).unwrap();
    assert_eq!(s, "xxxx");
    assert_eq!(s.capacity(), 8);

    s.reserve(0).unwrap();
    assert_eq!(s.capacity(), 0);
    assert_eq!(budget.remaining(), 48);
}

#[test]
fn test_strings_share_budget() {
    let budget = Budget::new(32);
    let a = DString::from_text_in("0123456789", &budget).unwrap();
    let mut b = DString::with_budget(&budget);
    b.assign("abcdefghijklmno").unwrap();
    assert_eq!(budget.remaining(), 0);
    assert!(b.append("p").unwrap_err().is_allocation_failure());

    drop(a);
    b.append("p").unwrap();
    assert_eq!(b, "abcdefghijklmnop");
    assert_eq!(b.capacity(), 24);
}
