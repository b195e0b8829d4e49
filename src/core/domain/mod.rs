//! Domain types.

mod change;
mod secret;
mod secret_id;
mod version;

pub use change::{ChangeEvent, ChangeType};
pub use secret::{RawSecret, Secret, SecretMetadata};
pub use secret_id::SecretId;
pub use version::Version;
