pub mod content;
pub mod extract;
pub mod init;
pub mod patch;
pub mod scaffold;

pub use content::{get, save, GetArgs, SaveArgs};
pub use extract::{extract, ExtractArgs};
pub use init::{init, InitArgs};
pub use patch::{patch, PatchArgs};
pub use scaffold::{scaffold, ScaffoldArgs};

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use pagesmith_editor::DocumentKind;
use std::path::{Path, PathBuf};

/// Fallback chain to use on a local file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Home,
    Page,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Home => DocumentKind::Home,
            KindArg::Page => DocumentKind::Page,
        }
    }
}

/// Resolve `path` against the working directory
pub(crate) fn resolve(cwd: &str, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        PathBuf::from(cwd).join(path)
    }
}

/// New content from `--content` or `--content-file`
pub(crate) fn read_content(
    content: Option<String>,
    content_file: Option<&Path>,
    cwd: &str,
) -> Result<String> {
    match (content, content_file) {
        (Some(text), _) => Ok(text),
        (None, Some(file)) => Ok(std::fs::read_to_string(resolve(cwd, file))?),
        (None, None) => Err(anyhow!("Provide --content or --content-file")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_content_sources() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        std::fs::write(dir.path().join("hero.html"), "<h1>Hi</h1>").unwrap();

        assert_eq!(
            read_content(Some("inline".into()), None, &cwd).unwrap(),
            "inline"
        );
        assert_eq!(
            read_content(None, Some(Path::new("hero.html")), &cwd).unwrap(),
            "<h1>Hi</h1>"
        );
        assert!(read_content(None, None, &cwd).is_err());
    }
}
