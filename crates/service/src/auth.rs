//! API-key roles.
//!
//! Keys are a small JSON map `{ "<key>": "<role>" }` loaded once at startup.
//! When the file does not exist it is seeded with the demo keys so a fresh
//! checkout is immediately usable.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::warn;

/// Privilege tiers, lowest to highest. The derived `Ord` gives the ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Editor,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }
}

#[derive(Clone)]
pub struct ApiKeyStore {
    keys: HashMap<String, Role>,
}

fn default_keys() -> HashMap<String, Role> {
    HashMap::from([
        ("demo-view".to_string(), Role::Viewer),
        ("demo-edit".to_string(), Role::Editor),
        ("demo-admin".to_string(), Role::Admin),
    ])
}

impl ApiKeyStore {
    pub async fn load<P: Into<PathBuf>>(path: P) -> anyhow::Result<Arc<Self>> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let keys: HashMap<String, Role> = match fs::read(&file_path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %file_path.display(), error = %e, "unreadable key file, using demo keys");
                    default_keys()
                }
            },
            Err(_) => {
                // initialize the file so operators can edit it
                let defaults = default_keys();
                let _ = fs::write(&file_path, serde_json::to_vec_pretty(&defaults)?).await;
                defaults
            }
        };

        Ok(Arc::new(Self { keys }))
    }

    pub fn from_keys(keys: HashMap<String, Role>) -> Arc<Self> {
        Arc::new(Self { keys })
    }

    pub fn role_for(&self, key: &str) -> Option<Role> {
        self.keys.get(key).copied()
    }
}
