use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DockPaths {
    pub dock_home: PathBuf,
    pub conversations_dir: PathBuf,
    pub summaries_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub config_file: PathBuf,
    pub profiles_file: PathBuf,
}

impl DockPaths {
    /// Standard layout under a single root, no env consulted. This is what
    /// `resolve_paths` starts from and what tests point at a temp dir.
    pub fn rooted(dock_home: impl Into<PathBuf>) -> Self {
        let dock_home = dock_home.into();
        let conversations_dir = dock_home.join("conversations");
        Self {
            summaries_dir: conversations_dir.join("summaries"),
            logs_dir: dock_home.join("logs"),
            config_file: dock_home.join("config.toml"),
            profiles_file: dock_home.join("profiles.json5"),
            conversations_dir,
            dock_home,
        }
    }

    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.conversations_dir.join(category)
    }

    pub fn summary_file(&self, category: &str) -> PathBuf {
        self.summaries_dir.join(category).join("history_summary.json")
    }
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<DockPaths> {
    let home = required_home_dir()?;
    let dock_home = env_or_default_path("PROMPTDOCK_HOME", home.join(".promptdock"));

    let mut paths = DockPaths::rooted(dock_home);
    paths.conversations_dir = env_or_default_path(
        "PROMPTDOCK_CONVERSATIONS_DIR",
        paths.conversations_dir.clone(),
    );
    paths.summaries_dir = paths.conversations_dir.join("summaries");
    paths.logs_dir = env_or_default_path("PROMPTDOCK_LOGS_DIR", paths.logs_dir.clone());
    paths.config_file = env_or_default_path("PROMPTDOCK_CONFIG_PATH", paths.config_file.clone());
    paths.profiles_file =
        env_or_default_path("PROMPTDOCK_PROFILES_PATH", paths.profiles_file.clone());

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::DockPaths;
    use std::path::PathBuf;

    #[test]
    fn rooted_layout_keeps_summaries_under_conversations() {
        let paths = DockPaths::rooted("/data/dock");
        assert_eq!(
            paths.conversations_dir,
            PathBuf::from("/data/dock/conversations")
        );
        assert_eq!(
            paths.summary_file("gpt-4.1-mini"),
            PathBuf::from("/data/dock/conversations/summaries/gpt-4.1-mini/history_summary.json")
        );
        assert_eq!(
            paths.category_dir("research"),
            PathBuf::from("/data/dock/conversations/research")
        );
    }
}
