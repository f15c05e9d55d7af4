//! Unison - an operational transformation engine for plain text.
//!
//! Multiple editors change the same document concurrently; each edit is
//! an [`Operation`] built against one revision of the text. The engine
//! rewrites concurrent operations against each other so that every
//! replica, applying them in whatever order they arrive, converges on an
//! identical final string. It is a pure function library: no transport,
//! no storage, no sequencing - those live in the session layer that
//! calls it.
//!
//! # Quick Start
//!
//! ```
//! use unison::{transform_pair, Operation};
//!
//! // Two replicas edit "abc" at the same time.
//! let a = Operation::insert_at(0, "x");
//! let b = Operation::delete_at(2, 1);
//!
//! // Rewrite each against the other; either order converges.
//! let (a2, b2) = transform_pair(&a, &b);
//! let via_b = a2.apply(&b.apply("abc").unwrap()).unwrap();
//! let via_a = b2.apply(&a.apply("abc").unwrap()).unwrap();
//! assert_eq!(via_b, "xab");
//! assert_eq!(via_a, "xab");
//! ```
//!
//! Sequential edits collapse with [`compose()`], remote carets are carried
//! across an edit with [`cursor::map_offset`], and operations travel as
//! a JSON-friendly list shape (a positive integer retains, a string
//! inserts, `{"d": n}` deletes) through their serde implementations.

pub mod compose;
pub mod cursor;
pub mod error;
pub mod op;
pub mod transform;

mod wire;

pub use compose::compose;
pub use cursor::map_offset;
pub use cursor::map_range;
pub use error::OtError;
pub use op::normalize;
pub use op::Component;
pub use op::Operation;
pub use transform::transform;
pub use transform::transform_pair;
pub use transform::Side;
