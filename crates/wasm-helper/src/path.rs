//! Dotted property paths (`document.someparent.somechild.value`).

use std::fmt;

use crate::error::PathError;

/// A non-empty sequence of segments. There is no escaping: a segment is
/// exactly the text between two dots, so `a..b` has an empty middle segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<'a> {
    segments: Vec<&'a str>,
}

impl<'a> Path<'a> {
    pub fn parse(path: &'a str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::EmptyPath);
        }
        Ok(Self {
            segments: path.split('.').collect(),
        })
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// `(parent segments, last segment)`. The parent is empty for a
    /// single-segment path, meaning the global scope.
    pub fn split_last(&self) -> (&[&'a str], &'a str) {
        match self.segments.split_last() {
            Some((last, parent)) => (parent, last),
            None => (&[], ""),
        }
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_every_dot() {
        let path = Path::parse("document.body.firstChild").unwrap();
        assert_eq!(path.segments(), ["document", "body", "firstChild"]);
        assert_eq!(path.to_string(), "document.body.firstChild");
    }

    #[test]
    fn empty_path_is_rejected() {
        assert_eq!(Path::parse(""), Err(PathError::EmptyPath));
    }

    #[test]
    fn stray_dots_produce_empty_segments() {
        assert_eq!(Path::parse(".a").unwrap().segments(), ["", "a"]);
        assert_eq!(Path::parse("a.").unwrap().segments(), ["a", ""]);
        assert_eq!(Path::parse("a..b").unwrap().segments(), ["a", "", "b"]);
        assert_eq!(Path::parse(".").unwrap().segments(), ["", ""]);
    }

    #[test]
    fn split_last_separates_parent() {
        let path = Path::parse("a.b.f").unwrap();
        assert_eq!(path.split_last(), (&["a", "b"][..], "f"));

        let single = Path::parse("counter").unwrap();
        assert_eq!(single.split_last(), (&[][..], "counter"));
    }
}
