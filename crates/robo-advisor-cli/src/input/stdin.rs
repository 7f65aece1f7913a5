use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read piped stdin as text. Returns None if stdin is a TTY or empty.
fn read_piped() -> Result<Option<String>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

/// Deserialise piped JSON straight into `T`, keeping map key order as written.
pub fn read_stdin_as<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    match read_piped()? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}
