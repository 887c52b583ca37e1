//! Inventory assistant - rule-based answers to stock and price questions
//!
//! The assistant never fetches anything itself. Callers hand it a message and
//! a catalog snapshot they already hold; it classifies the message and renders
//! a reply from that snapshot alone.
//!
//! # Components
//!
//! 1. **Intent resolution** (`resolver`) - keyword classification in fixed
//!    priority order (stock, price, low stock, greeting, fallback) and reply
//!    rendering.
//! 2. **Transcript** (`conversation`) - the ordered chat history shown to the
//!    operator, one reply per non-blank message.
//!
//! Resolution is total: every input, including an empty message or an empty
//! catalog, produces a reply string.

pub mod conversation;
pub mod resolver;

pub use conversation::{ChatMessage, Conversation, Sender};
pub use resolver::{resolve, Intent, IntentResolver};
