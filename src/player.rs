//! Player control channel: the VLC subprocess and its rc text protocol.
//!
//! `transport` moves lines in and out of the process, `parse` reads numbers
//! out of noisy responses and `client` implements the command vocabulary.

mod client;
mod parse;
mod transport;
mod types;

pub use client::PlayerClient;
pub use parse::parse_leading_number;
pub use transport::{LineChannel, LineRead, PipeChannel};
pub use types::TimeRemaining;

#[cfg(test)]
pub(crate) mod testing;
