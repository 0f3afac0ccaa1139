//! Render projection
//!
//! Turns a `TargetClassification` into plain data a renderer can draw.
//! Nothing here touches pixels.

mod projection;

pub use projection::{Highlight, RenderDescription, project};
