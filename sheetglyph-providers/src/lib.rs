//! Sheetglyph Providers - editor-facing features on top of the atlas engine.
//!
//! - Hover details for rendered glyphs
//! - Hex code resolution (direct insert or sheet picker)
//! - [`Session`], which routes host events and commands to a [`GlyphEngine`]
//!
//! [`GlyphEngine`]: sheetglyph_atlas::GlyphEngine

pub mod hex;
mod hover;
mod session;

pub use hex::{HexToken, Picker, Resolution, ResolveError};
pub use hover::hover;
pub use session::{Command, Host, Session};
