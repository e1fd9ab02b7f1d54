//! Collections of independent failures
//!
//! When an operation fails in more than one way at once, the failures are
//! merged into a single ordered collection. Merging never nests: a collection
//! merged into another contributes its elements, not itself.

use crate::Error;
use std::fmt;

const COLLECTION_PREFIX: &str = "Errors: [";
const COLLECTION_SUFFIX: &str = "]";

/// Separator between element messages
pub const COLLECTION_SEPARATOR: &str = ", ";

/// An ordered list of errors that happened together.
#[derive(Debug)]
pub struct Collection {
    errors: Vec<Error>,
}

impl Collection {
    /// The collected errors, in merge order
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Number of collected errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate the collected errors in order
    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    /// First element (in order) that has an explicit source
    pub fn explicit_source(&self) -> Option<&Error> {
        self.errors.iter().find_map(Error::explicit_source)
    }

    /// The explicit source if any element has one, otherwise the source of
    /// the first element.
    pub fn source(&self) -> Option<&Error> {
        match self.explicit_source() {
            Some(source) => Some(source),
            None => self.errors.first().map(Error::source_of),
        }
    }

    pub(crate) fn set_depth(&mut self, n: usize) {
        for err in &mut self.errors {
            err.set_depth(n);
        }
    }

    fn append(&mut self, err: Error) {
        match err {
            Error::Collection(tail) => self.errors.extend(tail.errors),
            other => self.errors.push(other),
        }
    }

    fn insert_front(&mut self, err: Error) {
        match err {
            Error::Collection(head) => {
                let mut errors = head.errors;
                errors.append(&mut self.errors);
                self.errors = errors;
            }
            other => self.errors.insert(0, other),
        }
    }
}

/// Wrap already rendered element strings in the collection envelope
pub(crate) fn envelope<I>(parts: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let joined = parts.into_iter().collect::<Vec<_>>().join(COLLECTION_SEPARATOR);
    format!("{}{}{}", COLLECTION_PREFIX, joined, COLLECTION_SUFFIX)
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return Ok(());
        }
        f.write_str(&envelope(self.errors.iter().map(|err| err.to_string())))
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl Error {
    /// Combine two failures, keeping `self` first.
    ///
    /// Collections on either side are flattened into the result, so repeated
    /// merges build one ordered list.
    pub fn merge(self, other: Error) -> Error {
        match (self, other) {
            (Error::Collection(mut collection), right) => {
                collection.append(right);
                Error::Collection(collection)
            }
            (left, Error::Collection(mut collection)) => {
                collection.insert_front(left);
                Error::Collection(collection)
            }
            (left, right) => Error::Collection(Collection {
                errors: vec![left, right],
            }),
        }
    }

    /// Merge every error of `errors` in order; `None` when there are none.
    pub fn merge_all<I>(errors: I) -> Option<Error>
    where
        I: IntoIterator<Item = Error>,
    {
        errors.into_iter().fold(None, |merged, err| merge(merged, Some(err)))
    }
}

/// Merge two optional failures; absence on either side is absorbed.
pub fn merge(left: Option<Error>, right: Option<Error>) -> Option<Error> {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(left), Some(right)) => Some(left.merge(right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn messages(err: &Error) -> Vec<String> {
        err.as_collection()
            .unwrap()
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn test_collection_message() {
        let left = Error::new("left");
        let right = Error::from(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "unexpected EOF",
        ));
        let c = left.merge(right);

        assert_eq!(c.kind(), ErrorKind::Collection);
        assert_eq!(c.to_string(), "Errors: [left, unexpected EOF]");
    }

    #[test]
    fn test_merge_absorbs_none() {
        assert!(merge(None, None).is_none());

        let r = merge(None, Some(Error::new("r"))).unwrap();
        assert_eq!(r.kind(), ErrorKind::Node);
        assert_eq!(r.to_string(), "r");

        let l = merge(Some(Error::new("l")), None).unwrap();
        assert_eq!(l.to_string(), "l");
    }

    #[test]
    fn test_merge_flattens() {
        let ab = Error::new("a").merge(Error::new("b"));
        let cd = Error::new("c").merge(Error::new("d"));
        let all = ab.merge(cd);

        assert_eq!(messages(&all), vec!["a", "b", "c", "d"]);
        assert!(all
            .as_collection()
            .unwrap()
            .iter()
            .all(|e| e.kind() != ErrorKind::Collection));
    }

    #[test]
    fn test_merge_inserts_front() {
        let bc = Error::new("b").merge(Error::new("c"));
        let abc = Error::new("a").merge(bc);
        assert_eq!(messages(&abc), vec!["a", "b", "c"]);

        let abcd = abc.merge(Error::new("d"));
        assert_eq!(messages(&abcd), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_merge_all() {
        assert!(Error::merge_all(Vec::new()).is_none());

        let single = Error::merge_all(vec![Error::new("only")]).unwrap();
        assert_eq!(single.kind(), ErrorKind::Node);

        let all = Error::merge_all(["x", "y", "z"].map(Error::new)).unwrap();
        assert_eq!(messages(&all), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_source_of_collection() {
        let lo = Error::new("left inner")
            .wrap("left middle")
            .wrap("left outer");
        let ro = Error::new("right inner")
            .wrap_by_source_msg("right middle")
            .wrap("right outer");
        let c = merge(Some(lo), Some(ro)).unwrap();

        assert!(c.to_string().contains("left outer, right outer"));
        assert_eq!(c.source_of().to_string(), "right middle");
        assert_eq!(c.explicit_source().unwrap().to_string(), "right middle");

        let most_out = c.wrap("most out");
        assert_eq!(most_out.source_of().to_string(), "right middle");
    }

    #[test]
    fn test_source_falls_back_to_first_element() {
        let c = Error::new("first inner")
            .wrap("first")
            .merge(Error::new("second"));

        assert!(c.explicit_source().is_none());
        assert_eq!(c.source_of().to_string(), "first inner");
        assert_eq!(
            c.as_collection().unwrap().source().unwrap().to_string(),
            "first inner"
        );
    }

    #[test]
    fn test_source_of_matches_collection_source() {
        let plain = Error::new("a inner").wrap("a").merge(Error::new("b"));
        let collection = plain.as_collection().unwrap();
        assert!(std::ptr::eq(plain.source_of(), collection.source().unwrap()));

        let designated = Error::new("a").merge(Error::new("b inner").wrap_by_source_msg("b"));
        let collection = designated.as_collection().unwrap();
        assert!(std::ptr::eq(designated.source_of(), collection.source().unwrap()));
        assert_eq!(designated.source_of().to_string(), "b");
    }

    #[test]
    fn test_set_depth_broadcasts() {
        let mut c = Error::new("a")
            .wrap("b")
            .merge(Error::from(std::io::Error::new(std::io::ErrorKind::Other, "io")));
        c.set_depth(0);

        let first = &c.as_collection().unwrap().errors()[0];
        for node in first.chain() {
            assert_eq!(node.callers().unwrap().output_count(), 0);
        }
    }
}
