//! Test and demo double for a live document.
//!
//! Pages are plain HTML. Layout comes from `data-rect="left top width height"`
//! attributes, styles from inline `style` and the `hidden` attribute, and
//! frames from `data-frame="<name>"` entries resolved against the page's
//! `frames` table (`data-frame-blocked` simulates a cross-origin frame).

pub mod document;
pub mod errors;
pub mod page;
pub mod render;

pub use document::{DispatchedEvent, FixtureDocument};
pub use errors::FixtureError;
pub use page::PageFixture;
pub use render::{RecordingRenderer, RenderedHint, RenderedNotifier, RenderedOverlay};
