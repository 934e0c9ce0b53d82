//! src/domain/mod.rs
mod email_address;
pub use email_address::{EmailAddress, Error as EmailAddressError};

mod entry;
pub use entry::EmailEntry;
