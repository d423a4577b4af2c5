//! The Agent-Coordinator Protocol client (ACPC): spawns and supervises an
//! external agent process, issues `initialize`/`sendUserMessage`/
//! `cancelSendMessage` over the shared stdio peer, and routes the agent's
//! own inbound requests to an embedder-supplied delegate.

mod client;

pub use client::AgentClient;
