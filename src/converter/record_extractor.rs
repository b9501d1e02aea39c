use crate::export::Item;
use serde::Serialize;

/// One line of Mooltipass CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub uri: String,
    pub username: String,
    pub password: String,
}

impl OutputRecord {
    pub fn new<U, N, P>(uri: U, username: N, password: P) -> Self
    where
        U: Into<String>,
        N: Into<String>,
        P: Into<String>,
    {
        Self {
            uri: uri.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// `uri,username,password` with no quoting.
    pub fn to_raw_line(&self) -> String {
        format!("{},{},{}", self.uri, self.username, self.password)
    }

    pub fn needs_quoting(&self) -> bool {
        [&self.uri, &self.username, &self.password]
            .iter()
            .any(|field| field.contains([',', '"', '\n', '\r']))
    }
}

/// One record per URI, in URI order. Absent values become empty strings.
pub fn extract_records(item: &Item) -> Vec<OutputRecord> {
    let Some(ref login) = item.login else {
        return Vec::new();
    };

    let username = login.username.as_deref().unwrap_or_default();
    let password = login.password.as_deref().unwrap_or_default();

    login
        .uris
        .iter()
        .map(|entry| {
            OutputRecord::new(
                entry.uri.as_deref().unwrap_or_default(),
                username,
                password,
            )
        })
        .collect()
}
