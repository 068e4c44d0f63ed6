mod client;
mod project;

pub use client::ClientInfo;
pub use project::ProjectRecord;
