//! The operation model: components, normalization, and application.
//!
//! An operation is an ordered run of components describing an edit against
//! one specific document revision. Key design decisions:
//!
//! 1. **Characters, not bytes**: all lengths count Unicode scalar values.
//!    Splitting a multi-byte character between two replicas is never
//!    representable.
//!
//! 2. **Compacted form**: an operation does not need to mention the
//!    document past its last edit. `apply` copies the unconsumed tail
//!    verbatim, so "insert at the front" is one component, not two.
//!
//! 3. **Normalized by construction**: the push methods merge adjacent
//!    same-kind components and drop zero-length ones, so every operation
//!    built through the public API is already in merged form. Structural
//!    equality on normalized operations is behavioral equality.

use smallvec::SmallVec;

use crate::error::OtError;

/// The atomic unit of an operation.
///
/// Exactly one of three kinds. A Retain or Delete consumes characters from
/// the base document; an Insert consumes nothing and contributes its text
/// to the output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Component {
    /// Skip over `n` characters of the base document unchanged.
    Retain(usize),
    /// Emit this text verbatim into the output.
    Insert(String),
    /// Remove `n` characters from the base document.
    Delete(usize),
}

impl Component {
    /// The component's own length in characters.
    pub fn len(&self) -> usize {
        return match self {
            Component::Retain(n) => *n,
            Component::Insert(text) => text.chars().count(),
            Component::Delete(n) => *n,
        };
    }

    /// Check if this component has zero length.
    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// Characters of base document this component consumes.
    pub fn base_len(&self) -> usize {
        return match self {
            Component::Retain(n) => *n,
            Component::Insert(_) => 0,
            Component::Delete(n) => *n,
        };
    }

    /// Characters this component contributes to the output document.
    pub fn target_len(&self) -> usize {
        return match self {
            Component::Retain(n) => *n,
            Component::Insert(text) => text.chars().count(),
            Component::Delete(_) => 0,
        };
    }

    /// Strict invariant check: every kind must have a positive length.
    pub fn validate(&self) -> Result<(), OtError> {
        if !self.is_empty() {
            return Ok(());
        }
        let kind = match self {
            Component::Retain(_) => "retain",
            Component::Insert(_) => "insert",
            Component::Delete(_) => "delete",
        };
        return Err(OtError::InvalidComponent { kind, len: 0 });
    }
}

/// An edit against one specific document revision.
///
/// Operations have no identity beyond their component sequence. Two
/// operations that normalize to the same sequence behave identically
/// under [`apply`](Operation::apply), [`compose`](crate::compose()), and
/// [`transform`](crate::transform()).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Operation {
    components: SmallVec<[Component; 4]>,
}

impl Operation {
    /// Create a new empty operation.
    pub fn new() -> Operation {
        return Operation {
            components: SmallVec::new(),
        };
    }

    /// An operation that leaves a document of `len` characters untouched.
    pub fn noop(len: usize) -> Operation {
        let mut op = Operation::new();
        op.retain(len);
        return op;
    }

    /// An operation inserting `text` at character offset `pos`.
    pub fn insert_at(pos: usize, text: &str) -> Operation {
        let mut op = Operation::new();
        op.retain(pos).insert(text);
        return op;
    }

    /// An operation deleting `n` characters starting at offset `pos`.
    pub fn delete_at(pos: usize, n: usize) -> Operation {
        let mut op = Operation::new();
        op.retain(pos).delete(n);
        return op;
    }

    /// Strict construction: fails on any component violating its
    /// invariant, instead of silently dropping it.
    pub fn try_from_components<I>(components: I) -> Result<Operation, OtError>
    where
        I: IntoIterator<Item = Component>,
    {
        let mut op = Operation::new();
        for component in components {
            component.validate()?;
            op.push(component);
        }
        op.trim();
        return Ok(op);
    }

    /// Append a retain, merging with a trailing retain. Zero is dropped.
    pub fn retain(&mut self, n: usize) -> &mut Operation {
        if n == 0 {
            return self;
        }
        if let Some(Component::Retain(last)) = self.components.last_mut() {
            *last += n;
        } else {
            self.components.push(Component::Retain(n));
        }
        return self;
    }

    /// Append an insert, merging with a trailing insert. Empty is dropped.
    pub fn insert(&mut self, text: &str) -> &mut Operation {
        if text.is_empty() {
            return self;
        }
        if let Some(Component::Insert(last)) = self.components.last_mut() {
            last.push_str(text);
        } else {
            self.components.push(Component::Insert(text.to_string()));
        }
        return self;
    }

    /// Append a delete, merging with a trailing delete. Zero is dropped.
    pub fn delete(&mut self, n: usize) -> &mut Operation {
        if n == 0 {
            return self;
        }
        if let Some(Component::Delete(last)) = self.components.last_mut() {
            *last += n;
        } else {
            self.components.push(Component::Delete(n));
        }
        return self;
    }

    /// The component sequence.
    pub fn components(&self) -> &[Component] {
        return &self.components;
    }

    /// Check if the operation has no components at all.
    pub fn is_empty(&self) -> bool {
        return self.components.is_empty();
    }

    /// Check if the operation changes nothing (retains only).
    pub fn is_noop(&self) -> bool {
        return self
            .components
            .iter()
            .all(|c| matches!(c, Component::Retain(_)));
    }

    /// Characters of base document the operation consumes.
    ///
    /// An operation is valid for any document at least this long; the
    /// remainder is the implicitly retained tail.
    pub fn base_len(&self) -> usize {
        return self.components.iter().map(Component::base_len).sum();
    }

    /// Characters the explicit components produce. The applied result is
    /// this plus whatever tail the base document still had.
    pub fn target_len(&self) -> usize {
        return self.components.iter().map(Component::target_len).sum();
    }

    /// Apply this operation to a document, producing the edited text.
    ///
    /// Walks the components left to right over the document's characters:
    /// retained spans are copied, inserts are appended, deleted spans are
    /// skipped. The tail past the last component is copied verbatim.
    ///
    /// Fails with [`OtError::LengthMismatch`] if the operation consumes
    /// more characters than the document has. This is never clamped: an
    /// oversized operation means the caller paired it with the wrong
    /// document revision.
    pub fn apply(&self, doc: &str) -> Result<String, OtError> {
        let available = doc.chars().count();
        let consumed = self.base_len();
        if consumed > available {
            return Err(OtError::LengthMismatch {
                consumed,
                available,
            });
        }

        let mut out = String::with_capacity(doc.len());
        let mut chars = doc.chars();
        for component in &self.components {
            match component {
                Component::Retain(n) => {
                    out.extend(chars.by_ref().take(*n));
                }
                Component::Insert(text) => {
                    out.push_str(text);
                }
                Component::Delete(n) => {
                    for _ in 0..*n {
                        chars.next();
                    }
                }
            }
        }
        out.extend(chars);
        return Ok(out);
    }

    /// Push a component, merging with the tail. Zero-length is dropped.
    pub(crate) fn push(&mut self, component: Component) {
        match component {
            Component::Retain(n) => self.retain(n),
            Component::Insert(ref text) => self.insert(text),
            Component::Delete(n) => self.delete(n),
        };
    }

    /// Drop a trailing retain: the tail is implicit in the applied form,
    /// and canonical operations are compacted.
    pub(crate) fn trim(&mut self) {
        if let Some(Component::Retain(_)) = self.components.last() {
            self.components.pop();
        }
    }
}

impl FromIterator<Component> for Operation {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Operation {
        return normalize(iter);
    }
}

/// Canonicalize an arbitrary component sequence.
///
/// Zero-length components are dropped (never an error - callers may build
/// operations incrementally and leave empty fragments behind), adjacent
/// components of the same kind are merged, and a trailing retain is
/// stripped. Idempotent.
pub fn normalize<I>(components: I) -> Operation
where
    I: IntoIterator<Item = Component>,
{
    let mut op = Operation::new();
    for component in components {
        op.push(component);
    }
    op.trim();
    return op;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_lengths() {
        assert_eq!(Component::Retain(3).base_len(), 3);
        assert_eq!(Component::Retain(3).target_len(), 3);
        assert_eq!(Component::Insert("héllo".to_string()).base_len(), 0);
        assert_eq!(Component::Insert("héllo".to_string()).target_len(), 5);
        assert_eq!(Component::Delete(2).base_len(), 2);
        assert_eq!(Component::Delete(2).target_len(), 0);
    }

    #[test]
    fn pushes_merge_adjacent() {
        let mut op = Operation::new();
        op.retain(1).retain(2).insert("ab").insert("cd").delete(1).delete(1);

        assert_eq!(
            op.components(),
            &[
                Component::Retain(3),
                Component::Insert("abcd".to_string()),
                Component::Delete(2),
            ]
        );
    }

    #[test]
    fn pushes_drop_empty() {
        let mut op = Operation::new();
        op.retain(0).insert("").delete(0);

        assert!(op.is_empty());
    }

    #[test]
    fn normalize_merges_and_trims() {
        let op = normalize([
            Component::Retain(1),
            Component::Retain(0),
            Component::Retain(2),
            Component::Insert(String::new()),
            Component::Delete(1),
            Component::Delete(2),
            Component::Retain(4),
        ]);

        assert_eq!(
            op.components(),
            &[Component::Retain(3), Component::Delete(3)]
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let op = normalize([
            Component::Insert("ab".to_string()),
            Component::Insert("c".to_string()),
            Component::Retain(0),
            Component::Delete(2),
        ]);
        let again = normalize(op.components().iter().cloned());

        assert_eq!(op, again);
    }

    #[test]
    fn strict_construction_rejects_invalid() {
        let err = Operation::try_from_components([Component::Delete(0)]);

        assert_eq!(
            err,
            Err(OtError::InvalidComponent { kind: "delete", len: 0 })
        );
    }

    #[test]
    fn apply_insert_and_delete() {
        let mut op = Operation::new();
        op.retain(1).insert("XY").delete(1);

        assert_eq!(op.apply("abc").unwrap(), "aXYc");
    }

    #[test]
    fn apply_copies_unconsumed_tail() {
        let op = Operation::insert_at(0, "x");

        assert_eq!(op.apply("abc").unwrap(), "xabc");
    }

    #[test]
    fn apply_counts_characters_not_bytes() {
        let op = Operation::delete_at(1, 1);

        assert_eq!(op.apply("aé日").unwrap(), "a日");
    }

    #[test]
    fn apply_rejects_overconsumption() {
        let op = Operation::delete_at(2, 5);

        assert_eq!(
            op.apply("abc"),
            Err(OtError::LengthMismatch { consumed: 7, available: 3 })
        );
    }

    #[test]
    fn apply_is_deterministic() {
        let op = Operation::insert_at(2, "zz");

        assert_eq!(op.apply("abcd").unwrap(), op.apply("abcd").unwrap());
    }

    #[test]
    fn noop_retains_everything() {
        let op = Operation::noop(5);

        assert!(op.is_noop());
        assert_eq!(op.apply("hello").unwrap(), "hello");
    }

    #[test]
    fn base_and_target_lengths() {
        let mut op = Operation::new();
        op.retain(2).insert("xyz").delete(1);

        assert_eq!(op.base_len(), 3);
        assert_eq!(op.target_len(), 5);
    }
}
