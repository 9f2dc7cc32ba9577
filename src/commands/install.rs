//! Install command: copy a category list into the system hosts file.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::error::HostsmithError;
use crate::merger::read_domain_lines;
use crate::sources::Category;
use crate::writer::write_hosts_format;

/// OS-level hosts file location. Unknown platforms are a hard error:
/// guessing a path here would corrupt system state.
pub fn system_hosts_path() -> Result<PathBuf, HostsmithError> {
    if cfg!(target_os = "windows") {
        Ok(PathBuf::from(r"C:\Windows\System32\drivers\etc\hosts"))
    } else if cfg!(target_os = "macos") || cfg!(target_os = "linux") {
        Ok(PathBuf::from("/etc/hosts"))
    } else {
        Err(HostsmithError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}

/// Run the install command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    let stdin = io::stdin();
    let mut input = String::new();
    let category = {
        let mut handle = stdin.lock();
        prompt_category(&mut handle, &mut input)?
    };
    let Some(category) = category else {
        // Anything but a listed number is a silent no-op, matching the
        // batch-tool exit behavior.
        return Ok(());
    };

    install_category(&config, category, &system_hosts_path()?)
}

fn prompt_category<R: BufRead>(input: &mut R, buf: &mut String) -> Result<Option<Category>> {
    println!("Which list would you like to add to your system?");
    println!("1. Advertisement");
    println!("2. Malicious");
    println!("3. Social-Engineering");
    println!("4. Explicit");
    io::stdout().flush()?;

    buf.clear();
    input.read_line(buf)?;
    Ok(parse_choice(buf))
}

fn parse_choice(input: &str) -> Option<Category> {
    match input.trim() {
        "1" => Some(Category::Advertisement),
        "2" => Some(Category::Malicious),
        "3" => Some(Category::SocialEngineering),
        "4" => Some(Category::Explicit),
        _ => None,
    }
}

/// Render `category`'s list in hosts format at `target`.
///
/// Refuses to touch an existing target: silently replacing a hosts file the
/// user (or a previous install) put there would corrupt system state.
fn install_category(config: &Config, category: Category, target: &Path) -> Result<()> {
    if target.exists() {
        return Err(HostsmithError::AlreadyInstalled(target.to_path_buf()).into());
    }
    let domains = read_domain_lines(&config.category_file(category));
    write_hosts_format(&domains, target)?;
    info!(
        "Installed {} {} domains to {:?}",
        domains.len(),
        category,
        target
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1\n"), Some(Category::Advertisement));
        assert_eq!(parse_choice(" 3 "), Some(Category::SocialEngineering));
        assert_eq!(parse_choice("4"), Some(Category::Explicit));
        assert_eq!(parse_choice("5"), None);
        assert_eq!(parse_choice("advertisement"), None);
        assert_eq!(parse_choice(""), None);
    }

    #[test]
    fn test_install_refuses_existing_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("hosts");
        std::fs::write(&target, "127.0.0.1 localhost\n").unwrap();

        let mut config = Config::default();
        config.output_dir = dir.path().to_path_buf();

        let result = install_category(&config, Category::Advertisement, &target);
        assert!(result.is_err());
        // The original content is untouched.
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "127.0.0.1 localhost\n"
        );
    }

    #[test]
    fn test_install_writes_hosts_format() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output_dir = dir.path().to_path_buf();
        std::fs::write(
            config.category_file(Category::Malicious),
            "bad.example.com\nworse.example.org\n",
        )
        .unwrap();

        let target = dir.path().join("hosts");
        install_category(&config, Category::Malicious, &target).unwrap();

        let content = std::fs::read_to_string(&target).unwrap();
        assert_eq!(content, "0.0.0.0 bad.example.com\n0.0.0.0 worse.example.org\n");
    }

    #[test]
    fn test_prompt_category_reads_choice() {
        let mut input = std::io::Cursor::new(b"2\n".to_vec());
        let mut buf = String::new();
        let choice = prompt_category(&mut input, &mut buf).unwrap();
        assert_eq!(choice, Some(Category::Malicious));
    }

    #[test]
    fn test_system_hosts_path_known_platform() {
        // The test suite only runs on supported platforms.
        assert!(system_hosts_path().is_ok());
    }
}
