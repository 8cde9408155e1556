// Work around dead code warnings: rust-lang issue #46379
pub mod common;

// Work around dead code warnings: rust-lang issue #46379
use common::*;

use regvm::{Program, Regex};

fn test_literals_tc(tc: TestConfig) {
    let re = tc.compile("ab");
    re.test_succeeds("ab");
    re.test_fails("a");
    re.test_fails("");
    re.test_fails("ba");
    // Trailing input is not required to be consumed.
    re.test_succeeds("abc");

    tc.compile("x_9").test_succeeds("x_9");
    tc.compile("Q").test_fails("q");
}

#[test]
fn test_literals() {
    test_with_configs(test_literals_tc)
}

fn test_any_tc(tc: TestConfig) {
    let re = tc.compile(".");
    re.test_succeeds("x");
    re.test_succeeds("!");
    re.test_fails("");

    let re = tc.compile("a.c");
    re.test_succeeds("abc");
    re.test_succeeds("a c");
    re.test_fails("ab");
}

#[test]
fn test_any() {
    test_with_configs(test_any_tc)
}

fn test_ranges_tc(tc: TestConfig) {
    let re = tc.compile("[0-9]*");
    re.test_succeeds("");
    re.test_succeeds("123456789");
    re.test_succeeds("12345abcde");
    re.test_succeeds("abcde12345");

    let re = tc.compile("[0-9]+");
    re.test_fails("abcde12345");
    re.test_succeeds("123456789");
    re.test_succeeds("12345abcde");
    re.test_fails("");

    let re = tc.compile("[^0-9]");
    re.test_succeeds("a");
    re.test_fails("5");
    re.test_fails("");

    let re = tc.compile("[A-Z][a-z]+");
    re.test_succeeds("Hello");
    re.test_fails("hello");
    re.test_fails("H");

    let re = tc.compile("[c-f]");
    re.test_succeeds("c");
    re.test_succeeds("f");
    re.test_fails("b");
    re.test_fails("g");
}

#[test]
fn test_ranges() {
    test_with_configs(test_ranges_tc)
}

fn test_alternation_tc(tc: TestConfig) {
    let re = tc.compile("a*b|cd");
    re.test_succeeds("aaaaaacd");
    re.test_succeeds("abd");
    re.test_succeeds("bd");
    re.test_succeeds("cd");
    re.test_succeeds("aaaaaab");
    re.test_fails("aaaacacd");
    re.test_fails("xyz");

    let re = tc.compile("(a|b)c");
    re.test_succeeds("ac");
    re.test_succeeds("bc");
    re.test_fails("cc");
    re.test_fails("ab");
}

#[test]
fn test_alternation() {
    test_with_configs(test_alternation_tc)
}

fn test_quantifiers_tc(tc: TestConfig) {
    for pattern in ["a?[b-e]+", "a?([b-e])+"] {
        let re = tc.compile(pattern);
        re.test_succeeds("abcdebcde");
        re.test_succeeds("bcdebcde");
        re.test_fails("rbcdebcde");
        re.test_fails("a");
    }

    let re = tc.compile("a+");
    re.test_succeeds("a");
    re.test_succeeds("aaa");
    re.test_fails("");
    re.test_fails("b");

    let re = tc.compile("ab?c");
    re.test_succeeds("abc");
    re.test_succeeds("ac");
    re.test_fails("abbc");

    let re = tc.compile("a*b*c*d*e*");
    re.test_succeeds("");
    re.test_succeeds("aabbccddee");
    re.test_succeeds("zzz");
}

#[test]
fn test_quantifiers() {
    test_with_configs(test_quantifiers_tc)
}

fn test_no_backtracking_tc(tc: TestConfig) {
    // Repetition is greedy and never gives characters back.
    tc.compile("a*a").test_fails("aaa");
    tc.compile("[a-z]*[0-9]+").test_succeeds("abc123");
    tc.compile("[a-z]*[0-9]+").test_fails("abc");
}

#[test]
fn test_no_backtracking() {
    test_with_configs(test_no_backtracking_tc)
}

fn test_nullable_loops_tc(tc: TestConfig) {
    let re = tc.compile("(a?)*");
    re.test_succeeds("");
    re.test_succeeds("aaa");
    re.test_succeeds("b");

    let re = tc.compile("(a*)*b");
    re.test_succeeds("b");
    re.test_succeeds("aaab");
    re.test_fails("aaac");

    let re = tc.compile("(a?)+x");
    re.test_succeeds("x");
    re.test_succeeds("aax");
    re.test_fails("aay");
}

#[test]
fn test_nullable_loops() {
    test_with_configs(test_nullable_loops_tc)
}

fn test_empty_pattern_tc(tc: TestConfig) {
    let re = tc.compile("");
    re.test_succeeds("");
    re.test_succeeds("anything");
    re.test_succeeds("\u{1F600}");
}

#[test]
fn test_empty_pattern() {
    test_with_configs(test_empty_pattern_tc)
}

fn test_flags_do_not_change_matching_tc(tc: TestConfig) {
    let plain = tc.compile("a*b|cd");
    let debug = tc.compilef("a*b|cd", "d");
    assert_eq!(plain.regex().program(), debug.regex().program());
    debug.test_succeeds("aab");
    debug.test_fails("xyz");
}

#[test]
fn test_flags_do_not_change_matching() {
    test_with_configs(test_flags_do_not_change_matching_tc)
}

#[test]
fn test_non_ascii_input() {
    let re = Regex::new(".").unwrap();
    // Input is matched byte by byte.
    assert!(re.is_match("\u{00E9}"));
    let re = Regex::new("..").unwrap();
    assert!(re.is_match("\u{00E9}"));
    let re = Regex::new("...").unwrap();
    assert!(!re.is_match("\u{00E9}"));
    assert!(re.is_match_bytes(&[0xFF, 0x00, 0x80]));
}

#[test]
fn test_determinism() {
    for pattern in ["", "ab", "a*b|cd", "a?[b-e]+", "(x|y)+z?", "[^0-9].[A-Z]*"] {
        let re1 = Regex::new(pattern).unwrap();
        let re2 = Regex::new(pattern).unwrap();
        assert_eq!(re1.program().as_bytes(), re2.program().as_bytes());
    }
}

#[test]
fn test_empty_program_rejects() {
    let re: Regex = Program::empty().into();
    assert!(!re.is_match(""));
    assert!(!re.is_match("abc"));
}

#[test]
fn test_compile_never_fails() {
    let re = Regex::compile("(a|b", "");
    assert!(re.program().is_empty());
    assert!(!re.is_match("a"));

    let re = Regex::compile("a|b", "");
    assert!(re.is_match("b"));
}

#[test]
fn test_from_str() {
    let re: Regex = "[0-9]+".parse().unwrap();
    assert!(re.is_match("42"));
    assert!("a|".parse::<Regex>().is_err());
}

#[test]
fn test_shared_across_threads() {
    let re = Regex::new("a*b|cd").unwrap();
    let inputs = ["aaaaaacd", "abd", "bd", "cd", "aaaaaab", "aaaacacd", "xyz"];
    let expected: Vec<bool> = inputs.iter().map(|s| re.is_match(s)).collect();
    let (re, inputs) = (&re, &inputs);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || inputs.iter().map(|s| re.is_match(s)).collect::<Vec<_>>())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
