//! Concurrent rewrite of one operation against another.

use crate::cursor::Cursor;
use crate::op::Component;
use crate::op::Operation;

/// Which operand of a concurrent pair wins coincident-insert ties.
///
/// Two concurrent inserts at the same offset have no inherent order; the
/// pair only converges if the two transform calls agree on one. The
/// convention here is that the `Left` operand's text lands first in the
/// merged document. A concurrent pair must be transformed with opposite
/// sides - [`transform_pair`] packages that.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// This operand's inserts take priority at coincident positions.
    Left,
    /// The other operand's inserts take priority at coincident positions.
    Right,
}

/// Rewrite `a` so it applies to a document that already has `b` applied.
///
/// `a` and `b` are concurrent: both were produced against the same base
/// document. The result `a'` expresses `a`'s effect in the coordinates of
/// `b`'s output, such that for `a' = transform(a, b, Left)` and
/// `b' = transform(b, a, Right)`:
///
/// ```text
/// b.apply(doc) then a'  ==  a.apply(doc) then b'
/// ```
///
/// The walk pairs the two operations over the shared base document:
///
/// - an Insert in `a` is text the base never had; it survives anything
///   `b` did and is emitted verbatim, consuming nothing of `b`;
/// - an Insert in `b` is a span that did not exist when `a` was authored;
///   `a'` retains over it, consuming nothing of `a`;
/// - when both cursors sit on an Insert, `side` breaks the tie (see
///   [`Side`]);
/// - Retain/Retain keeps the span; Delete/Retain keeps `a`'s delete;
/// - a Delete in `b` under `a`'s Retain means the span is already gone -
///   nothing is emitted; under `a`'s Delete, both deleted the same span
///   and it must not be deleted twice - nothing is emitted.
///
/// Trailing components of `a` flush verbatim once `b` is exhausted;
/// trailing Retain/Delete of `b` fall into `a`'s implicitly retained
/// tail. The result is normalized.
pub fn transform(a: &Operation, b: &Operation, side: Side) -> Operation {
    let mut out = Operation::new();
    let mut ca = Cursor::new(a);
    let mut cb = Cursor::new(b);

    loop {
        match (ca.peek(), cb.peek()) {
            (None, None) => break,

            // Coincident inserts: the left operand's text lands first.
            (Some(Component::Insert(_)), Some(Component::Insert(_))) => {
                if side == Side::Left {
                    let n = ca.remaining();
                    let text = ca.take_text(n);
                    out.insert(&text);
                } else {
                    let n = cb.remaining();
                    cb.advance(n);
                    out.retain(n);
                }
            }

            // `a`'s insert survives anything concurrent.
            (Some(Component::Insert(_)), _) => {
                let n = ca.remaining();
                let text = ca.take_text(n);
                out.insert(&text);
            }

            // `b` inserted a span `a` has never seen; skip past it.
            (_, Some(Component::Insert(_))) => {
                let n = cb.remaining();
                cb.advance(n);
                out.retain(n);
            }

            (Some(Component::Retain(_)), Some(Component::Retain(_))) => {
                let n = ca.remaining().min(cb.remaining());
                ca.advance(n);
                cb.advance(n);
                out.retain(n);
            }

            // `b` already deleted the span `a` wanted to keep.
            (Some(Component::Retain(_)), Some(Component::Delete(_))) => {
                let n = ca.remaining().min(cb.remaining());
                ca.advance(n);
                cb.advance(n);
            }

            (Some(Component::Delete(_)), Some(Component::Retain(_))) => {
                let n = ca.remaining().min(cb.remaining());
                ca.advance(n);
                cb.advance(n);
                out.delete(n);
            }

            // Both deleted the same span; it is only deleted once.
            (Some(Component::Delete(_)), Some(Component::Delete(_))) => {
                let n = ca.remaining().min(cb.remaining());
                ca.advance(n);
                cb.advance(n);
            }

            // `b` is exhausted: nothing left to transform against.
            (Some(Component::Retain(_)), None) => {
                let n = ca.remaining();
                ca.advance(n);
                out.retain(n);
            }
            (Some(Component::Delete(_)), None) => {
                let n = ca.remaining();
                ca.advance(n);
                out.delete(n);
            }

            // `a` is exhausted: `b`'s trailing edits hit the tail `a`
            // implicitly retains, which needs no explicit component.
            (None, Some(Component::Retain(_))) => {
                let n = cb.remaining();
                cb.advance(n);
            }
            (None, Some(Component::Delete(_))) => {
                let n = cb.remaining();
                cb.advance(n);
            }
        }
    }

    out.trim();
    return out;
}

/// Transform both members of a concurrent pair with the documented
/// tie-break: the first operand is the left one.
///
/// Returns `(a', b')` where `a'` applies after `b` and `b'` applies
/// after `a`.
pub fn transform_pair(a: &Operation, b: &Operation) -> (Operation, Operation) {
    return (
        transform(a, b, Side::Left),
        transform(b, a, Side::Right),
    );
}
