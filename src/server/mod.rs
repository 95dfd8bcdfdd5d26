//! The document-store server: accounts, word and album collections,
//! JSON-file persistence, and live snapshot delivery over WebSocket.

mod server;
mod store;

pub use server::run;
pub use store::{AuthError, Store, StoreError, WriteError};
