//! Sequential merge of two operations.

use crate::cursor::Cursor;
use crate::op::Component;
use crate::op::Operation;

/// Merge two sequential operations into one equivalent operation.
///
/// `a` edits some document and `b` edits `a`'s output; the result edits
/// the original document directly, without materializing the intermediate
/// text: `compose(a, b).apply(doc) == b.apply(&a.apply(doc)?)`.
///
/// The walk pairs `b`'s components against `a`'s output stream, consuming
/// the matched length from both sides at each step:
///
/// - a Delete in `a` removed text `b` never saw, so it is flushed to the
///   output as soon as it is reached, consuming nothing of `b`;
/// - an Insert in `b` is new text layered on top of `a`'s output and
///   passes straight through, consuming nothing of `a`;
/// - a Retain in `b` keeps whatever `a` put there (retained text stays a
///   Retain, inserted text stays an Insert);
/// - a Delete in `b` over text `a` retained reaches through to the base
///   document as a Delete, while a Delete over text `a` inserted cancels
///   against the insert and emits nothing.
///
/// Components of `b` past the end of `a` consume the implicitly retained
/// document tail and are emitted verbatim, as are trailing components of
/// `a` once `b` is exhausted. The result is normalized.
pub fn compose(a: &Operation, b: &Operation) -> Operation {
    let mut out = Operation::new();
    let mut ca = Cursor::new(a);
    let mut cb = Cursor::new(b);

    loop {
        match (ca.peek(), cb.peek()) {
            (None, None) => break,

            // Deletes in `a` happen below anything `b` does; flush.
            (Some(Component::Delete(_)), _) => {
                let n = ca.remaining();
                ca.advance(n);
                out.delete(n);
            }

            // Inserts in `b` land on top of anything `a` did; flush.
            (_, Some(Component::Insert(_))) => {
                let n = cb.remaining();
                let text = cb.take_text(n);
                out.insert(&text);
            }

            (Some(Component::Retain(_)), Some(Component::Retain(_))) => {
                let n = ca.remaining().min(cb.remaining());
                ca.advance(n);
                cb.advance(n);
                out.retain(n);
            }

            (Some(Component::Retain(_)), Some(Component::Delete(_))) => {
                let n = ca.remaining().min(cb.remaining());
                ca.advance(n);
                cb.advance(n);
                out.delete(n);
            }

            (Some(Component::Insert(_)), Some(Component::Retain(_))) => {
                let n = ca.remaining().min(cb.remaining());
                let text = ca.take_text(n);
                cb.advance(n);
                out.insert(&text);
            }

            // `b` deletes text `a` itself inserted: the two cancel.
            (Some(Component::Insert(_)), Some(Component::Delete(_))) => {
                let n = ca.remaining().min(cb.remaining());
                ca.advance(n);
                cb.advance(n);
            }

            // `b` is exhausted: the rest of `a` is a change with no
            // further edit on top.
            (Some(Component::Retain(_)), None) => {
                let n = ca.remaining();
                ca.advance(n);
                out.retain(n);
            }
            (Some(Component::Insert(_)), None) => {
                let n = ca.remaining();
                let text = ca.take_text(n);
                out.insert(&text);
            }

            // `a` is exhausted: `b` consumes the implicitly retained tail.
            (None, Some(Component::Retain(_))) => {
                let n = cb.remaining();
                cb.advance(n);
                out.retain(n);
            }
            (None, Some(Component::Delete(_))) => {
                let n = cb.remaining();
                cb.advance(n);
                out.delete(n);
            }
        }
    }

    out.trim();
    return out;
}
