use anyhow::Context;
use clap::Subcommand;

use crate::config::{Profile, ProfileStore};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Register a server profile
    Add {
        /// Profile name
        name: String,
        /// Server base URL, e.g. https://logs.example.com
        #[arg(long)]
        url: String,
        /// Basic-auth username
        #[arg(long)]
        username: String,
        /// Basic-auth password
        #[arg(long, env = "LOGLENS_PASSWORD")]
        password: String,
        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },
    /// Delete a profile
    Remove {
        /// Profile name
        name: String,
    },
    /// List configured profiles
    List,
    /// Set the default profile
    Default {
        /// Profile name
        name: String,
    },
}

impl ProfileAction {
    pub fn run(self, mut store: ProfileStore) -> anyhow::Result<()> {
        match self {
            ProfileAction::Add {
                name,
                url,
                username,
                password,
                default,
            } => {
                let parsed = url::Url::parse(&url)
                    .with_context(|| format!("'{url}' is not a valid URL"))?;
                anyhow::ensure!(
                    matches!(parsed.scheme(), "http" | "https"),
                    "profile URL must be http or https, got '{}'",
                    parsed.scheme()
                );
                let profile = Profile {
                    url: url.trim_end_matches('/').to_string(),
                    username,
                    password,
                };
                store.upsert(&name, profile, default);
                store.save()?;
                println!("Profile '{name}' saved.");
            }
            ProfileAction::Remove { name } => {
                anyhow::ensure!(store.remove(&name), "unknown profile '{name}'");
                store.save()?;
                println!("Profile '{name}' removed.");
            }
            ProfileAction::List => {
                if store.profiles.is_empty() {
                    println!("No profiles configured. Add one with `loglens profile add`.");
                }
                for (name, profile) in &store.profiles {
                    let marker = if store.default.as_deref() == Some(name.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!("{marker} {name}  {}  ({})", profile.url, profile.username);
                }
            }
            ProfileAction::Default { name } => {
                anyhow::ensure!(
                    store.profiles.contains_key(&name),
                    "unknown profile '{name}'"
                );
                store.default = Some(name.clone());
                store.save()?;
                println!("Default profile set to '{name}'.");
            }
        }
        Ok(())
    }
}
