//! gptwiki: command wiki lookup with LLM generated pages
//!
//! The `wiki` binary looks up command pages in a local clone of the page repository,
//! asking a chat-completion provider when no page exists. The `wiki-tool` binary
//! generates pages in bulk from the tldr reference corpus with a bounded pool of
//! async workers.

pub mod batch;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod git;
pub mod logging;
pub mod pages;
pub mod provider;
pub mod render;
