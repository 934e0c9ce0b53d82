//! src/routes/mod.rs
mod health_check;
pub use health_check::*;

pub mod mailing_list;
pub use mailing_list::{
    create_email, delete_email, get_email, get_email_batch, update_email, MailingListError,
};

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
