//! Helpers for staging environment files inside a `figment::Jail`.
//!
//! The jail switches into a fresh temporary directory and restores process
//! environment variables once the closure returns, so tests that write
//! `<name>.yml` files or set `TAGBIND_*` variables do not leak state.

use anyhow::{Result, anyhow};

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// # Errors
///
/// Returns an error if the jail cannot be created or the closure fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Converts any displayable error into a [`figment::Error`] so it can be
/// returned from a jail closure with `?`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a map_err adaptor, which hands over the error by value"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
