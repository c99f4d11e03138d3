//! Profile command implementation.

use super::CliError;
use gridwar::strategy::{Doctrine, StrategyConfig};

/// Print the built-in profile for `doctrine` as pretty JSON.
///
/// # Errors
///
/// Returns an error for an unknown doctrine.
pub(crate) fn execute(doctrine: &str) -> Result<(), CliError> {
    let doctrine: Doctrine = doctrine.parse()?;
    println!("{}", StrategyConfig::preset(doctrine).to_json()?);
    Ok(())
}
