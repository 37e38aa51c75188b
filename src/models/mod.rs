//! Domain models for directive tracking.
//!
//! - [`Directive`]: an action item issued in a meeting, carrying its
//!   classification, owner, due date and lifecycle [`DirectiveStatus`].
//! - [`HistoryEntry`]: an append-only progress update or reviewer comment.
//! - [`Actor`]: who is acting, and in which [`Role`].
//!
//! All types serialize to the persisted JSON format (camelCase keys,
//! `YYYY-MM-DD` dates).

mod actor;
mod directive;
mod history;

pub use actor::*;
pub use directive::*;
pub use history::*;
