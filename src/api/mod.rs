mod client;
mod envelope;
mod error;
#[cfg(test)]
pub mod testing;
mod transport;

pub use client::ApiClient;
pub use envelope::{DropdownOption, LoginOutcome, MutationOutcome};
pub use transport::{HttpOptions, HttpTransport};
