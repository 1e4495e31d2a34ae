//! `itemvault generate` — print a random password.
//!
//! The password goes to stdout on its own so it can be piped.

use zeroize::Zeroizing;

use crate::cli::load_settings;
use crate::errors::Result;
use crate::generator::generate_password;

/// Execute the `generate` command.
pub fn execute(length: Option<usize>) -> Result<()> {
    let settings = load_settings()?;
    let password = Zeroizing::new(generate_password(
        length.unwrap_or(settings.generator_length),
    )?);
    println!("{}", password.as_str());
    Ok(())
}
