//! Debug-mode validation.
//!
//! [`lint`] re-reads raw translation files and flags structurally suspicious
//! lines independently of the parser used for merging, so a file can merge
//! successfully while still scoring as defective. [`markup`] decorates lookup
//! results so resolved and missing strings stand out in rendered output.

pub mod lint;
pub mod markup;
