//! Keyboard hint engine
//!
//! Enumerates actionable elements of a document, labels them with short
//! hints, narrows the set as the user types, and resolves the final choice
//! into an action descriptor:
//! - label generation over numeric or letter alphabets
//! - visibility probing and frame-recursive traversal
//! - incremental matching with escape and deletion handling
//! - element classification and synthetic click dispatch

pub mod api;
pub mod builder;
pub mod errors;
pub mod geometry;
pub mod labels;
pub mod matcher;
pub mod model;
pub mod paste;
pub mod policy;
pub mod resolver;
pub mod session;
pub mod tracker;

pub use api::HintEngine;
pub use errors::{HintError, HintResult};
pub use model::{
    ActionDescriptor, ActionKind, Category, ElementClass, HintNode, HintOutcome, MatchState,
    OpenMode, Resource, Variant,
};
pub use policy::{HintPolicyView, HintStyle, HintTheme};
pub use session::HintSession;
