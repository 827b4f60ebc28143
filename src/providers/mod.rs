//! Providers Module - External Risk Detection
//!
//! The detection capability trait, the chat-completion implementation and
//! the parsing of its replies.

pub mod detector;
pub mod openai;
pub mod response;

pub use detector::*;
pub use openai::*;
pub use response::*;
