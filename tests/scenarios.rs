//! The seven worked end-to-end scenarios from spec.md §8, as literal
//! input/output assertions against the public API.

use saferegex::{Error, Regex};

#[test]
fn digit_run_in_mixed_text() {
    let re = Regex::new(r"\d+").unwrap();
    let m = re.find("abc123def").unwrap();
    assert_eq!(m.range(), 3..6);
    assert_eq!(m.as_str(), Some("123"));
}

#[test]
fn alternation_prefers_the_occurring_branch() {
    let re = Regex::new("cat|dog").unwrap();
    let m = re.find("hotdog").unwrap();
    assert_eq!(m.range(), 3..6);
    assert_eq!(m.as_str(), Some("dog"));
}

#[test]
fn nested_quantifier_is_rejected_at_compile_time() {
    assert!(matches!(Regex::new("(a+)+"), Err(Error::PatternTooComplex(_))));
}

#[test]
fn email_like_pattern_captures_both_halves() {
    let re = Regex::new(r"(\w+)@(\w+)").unwrap();
    let caps = re.captures("alice@example").unwrap();
    assert_eq!(caps.get(1).unwrap().as_str(), Some("alice"));
    assert_eq!(caps.get(2).unwrap().as_str(), Some("example"));
}

#[test]
fn lazy_plus_anchored_by_following_literal() {
    let re = Regex::new(r"a+?b").unwrap();
    let m = re.find("aaab").unwrap();
    assert_eq!(m.range(), 0..4);
}

#[test]
fn named_date_captures() {
    let re = Regex::new(r"(?P<y>\d{4})-(?P<m>\d{2})").unwrap();
    let caps = re.captures("2024-03").unwrap();
    assert_eq!(caps.name("y").unwrap().as_str(), Some("2024"));
    assert_eq!(caps.name("m").unwrap().as_str(), Some("03"));
}

#[test]
fn replace_all_single_char() {
    let re = Regex::new("a").unwrap();
    assert_eq!(re.replace_all("banana", "o"), "bonono");
}
