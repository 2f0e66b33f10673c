//! `profile`: load, validate, and echo a site profile.

use std::path::Path;

use menucrawl_core::{resolve_site_profile, AppConfig};

pub fn run(path: Option<&Path>, config: &AppConfig) -> anyhow::Result<()> {
    let path = path.or(config.site_profile_path.as_deref());
    let profile = resolve_site_profile(path)?;
    match path {
        Some(p) => tracing::info!(path = %p.display(), "site profile is valid"),
        None => tracing::info!("no profile path set, showing built-in default"),
    }
    print!("{}", serde_yaml::to_string(&profile)?);
    Ok(())
}
