//! Stateless navigation dialogs for telegram bots.
//!
//! A [`Dialog`] is a graph of [`Node`]s (text + inline keyboard). Users walk
//! it by pressing buttons; where to go next is encoded in the callback data
//! of each button, so no per-user session is stored.

pub mod callback_data;
pub mod config;
pub mod dialog;
pub mod node;
pub mod result;
pub mod transport;

pub use dialog::{Dialog, ErrorSink, RenderMode};
pub use node::{Button, ButtonTarget, Node, NodeGraph};
pub use result::{DialogError, DialogResult};
