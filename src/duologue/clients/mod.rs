//! Provider specific [`BackendAdapter`](crate::backend_adapter::BackendAdapter) implementations.
//!
//! Each submodule speaks one vendor's wire protocol and normalizes its response into plain
//! text. The three use three different auth placements: a bearer header (OpenAI), a custom
//! API-key header (Anthropic) and a query-string key (Gemini).

pub mod common;

pub mod claude;
pub mod gemini;
pub mod openai;
