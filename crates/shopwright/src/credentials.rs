//! Login credentials and the CSV table they are read from.

use std::fmt;
use std::path::Path;

use crate::result::{ShopError, ShopResult};

/// Immutable username/password pair for one login attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Read row `row` (0-based, no header) of a `username,password` CSV file.
pub fn read_credentials_row(path: impl AsRef<Path>, row: usize) -> ShopResult<Credentials> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let record = reader
        .records()
        .nth(row)
        .transpose()?
        .ok_or_else(|| ShopError::RowNotFound {
            row,
            path: path.to_path_buf(),
        })?;

    match (record.get(0), record.get(1)) {
        (Some(username), Some(password)) => Ok(Credentials::new(username, password)),
        _ => Err(ShopError::test_data(format!(
            "row {row} of {} needs username and password columns",
            path.display()
        ))),
    }
}
