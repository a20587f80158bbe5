use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::input::{KeyMap, KeySeq, parse_seq};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub log: Option<PathBuf>,
    /// Extra bindings in `SEQ=command` form, applied in order.
    pub bindings: Vec<String>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            log: other.log.clone().or_else(|| self.log.clone()),
            bindings: self
                .bindings
                .iter()
                .chain(&other.bindings)
                .cloned()
                .collect(),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("quire").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("quire")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("quire").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("quire").join("config");
        }
    }

    PathBuf::from(".quirerc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".quirerc")
}

/// Read flags from an rc file, one flag per line.
///
/// A flag's value is the rest of its line, so bindings may contain spaces.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| match line.split_once(char::is_whitespace) {
            Some((flag, value)) if !flag.contains('=') => {
                vec![flag.to_owned(), value.trim().to_owned()]
            }
            _ => vec![line.to_owned()],
        })
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# quire defaults (saved with --save)".to_string());
    if let Some(log) = &flags.log {
        lines.push(format!("--log {}", log.display()));
    }
    for binding in &flags.bindings {
        lines.push(format!("--bind {binding}"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--log" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log=") {
            flags.log = Some(PathBuf::from(value));
        } else if token == "--bind" {
            if let Some(next) = tokens.get(i + 1) {
                flags.bindings.push(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--bind=") {
            flags.bindings.push(value.to_string());
        }
        i += 1;
    }
    flags
}

/// Split `"C-x C-s=save-buffer"` into a key sequence and a command name.
pub fn parse_binding(binding: &str) -> Result<(KeySeq, String)> {
    let Some((seq, command)) = binding.rsplit_once('=') else {
        bail!("binding {binding:?} is missing '=command'");
    };
    let command = command.trim();
    if command.is_empty() {
        bail!("binding {binding:?} names no command");
    }
    let seq = parse_seq(seq).with_context(|| format!("invalid key sequence in {binding:?}"))?;
    Ok((seq, command.to_string()))
}

/// Layer `bindings` over `keys`; later entries win.
pub fn apply_bindings(keys: KeyMap, bindings: &[String]) -> Result<KeyMap> {
    bindings.iter().try_fold(keys, |keys, binding| {
        let (seq, command) = parse_binding(binding)?;
        Ok(keys.bind(seq, &command))
    })
}
