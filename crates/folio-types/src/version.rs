//! Version ordering.
//!
//! Picking "the latest version" of a package is done with [`compare_versions`]
//! rather than plain string comparison, which would rank `"9"` above `"10"`.
//!
//! Every version string maps to one [`VersionKey`] and two versions compare
//! by key, falling back to string order when the keys tie. A comparison built
//! from a single key is a total order, which `sort_by` relies on.
//!
//! The key splits off `+build` metadata (ignored) and a `-pre` suffix, then
//! cuts the release part on `.`. Each segment is a run of numeric and text
//! tokens: numbers compare by value, numbers sort before text within a
//! segment. Trailing zero segments are dropped so `1.0` and `1.0.0` share a
//! key. A release sorts after any of its pre-releases.

use std::cmp::Ordering;

/// Compare two version strings, newest last.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    VersionKey::parse(a)
        .cmp(&VersionKey::parse(b))
        .then_with(|| a.cmp(b))
}

/// The greatest item of `items` by the version extracted with `version_of`.
pub fn latest_by_version<T, F>(items: impl IntoIterator<Item = T>, version_of: F) -> Option<T>
where
    F: Fn(&T) -> &str,
{
    items
        .into_iter()
        .max_by(|a, b| compare_versions(version_of(a), version_of(b)))
}

/// Comparable form of a version string.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionKey {
    release: Vec<Segment>,
    stage: Stage,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Pre(Vec<Segment>),
    Release,
}

type Segment = Vec<Token>;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Token {
    /// Digits without leading zeros, ordered by length first.
    Num { len: usize, digits: String },
    Text(String),
}

impl VersionKey {
    pub fn parse(version: &str) -> Self {
        let version = version.split('+').next().unwrap_or_default();
        let (release, stage) = match version.split_once('-') {
            Some((release, pre)) => (release, Stage::Pre(segments(pre))),
            None => (version, Stage::Release),
        };
        let mut release = segments(release);
        while release.last().is_some_and(|s| is_zero(s)) {
            release.pop();
        }
        VersionKey { release, stage }
    }
}

fn segments(s: &str) -> Vec<Segment> {
    s.split('.').map(tokens).collect()
}

fn tokens(segment: &str) -> Segment {
    let mut out = Vec::new();
    let mut rest = segment;
    while let Some(first) = rest.chars().next() {
        let numeric = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != numeric)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        out.push(if numeric {
            let digits = run.trim_start_matches('0');
            Token::Num { len: digits.len(), digits: digits.to_string() }
        } else {
            Token::Text(run.to_string())
        });
        rest = tail;
    }
    out
}

fn is_zero(segment: &Segment) -> bool {
    matches!(segment.as_slice(), [Token::Num { len: 0, .. }])
}
