use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use crate::errors::AuthError;
use crate::sources::renewing::TokenSource;

/// Config body with every acquisition field populated.
pub fn sample_config_json(token_url: &str, access_token_path: &Path) -> serde_json::Value {
    json!({
        "client_id": "record-manager",
        "client_secret": "s3cr3t",
        "username": "svc-dns",
        "password": "hunter2",
        "scope": ["records.read", "records.write"],
        "token_url": token_url,
        "access_token_path": access_token_path,
    })
}

pub fn write_config(dir: &Path, name: &str, body: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(body).expect("serialize config"))
        .expect("write config file");
    path
}

/// Token source replaying a fixed sequence of values; the last value repeats
/// once the script runs out.
pub struct ScriptedSource {
    values: Vec<String>,
    cursor: AtomicUsize,
}

impl ScriptedSource {
    pub fn new<const N: usize>(values: [&str; N]) -> Self {
        Self {
            values: values.iter().map(|v| v.to_string()).collect(),
            cursor: AtomicUsize::new(0),
        }
    }
}

impl TokenSource for ScriptedSource {
    async fn token(&self) -> Result<String, AuthError> {
        let i = self.cursor.fetch_add(1, Ordering::SeqCst);
        Ok(self.values[i.min(self.values.len() - 1)].clone())
    }
}
