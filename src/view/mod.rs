//! View Layer
//!
//! Structured view trees and the static assets embedded in the served page.

mod assets;
mod node;

pub use assets::{CLIENT_SCRIPT, STYLES};
pub use node::{escape_attr, escape_text, Element, Node};
