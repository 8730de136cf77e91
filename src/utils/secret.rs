use std::{fs, io};

use secrecy::SecretString;

/// Reads a secret from the file named by `{name}_FILE`, falling back to the
/// `{name}` variable itself. `lookup` resolves variable names.
///
/// A `*_FILE` variable pointing at an unreadable file is an error, not a
/// missing secret.
pub fn get_secret<F>(name: &str, lookup: F) -> io::Result<Option<SecretString>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(&format!("{name}_FILE")) {
        Some(secret_file_path) => {
            let content = fs::read_to_string(secret_file_path)?;
            Ok(Some(SecretString::from(content.trim().to_string())))
        }
        None => Ok(lookup(name).map(SecretString::from)),
    }
}
