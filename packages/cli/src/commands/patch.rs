use super::{read_content, resolve, KindArg};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_editor::{patch as patch_source, DocumentKind};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct PatchArgs {
    /// Component source file
    pub file: PathBuf,

    /// Replacement content
    #[arg(short, long)]
    pub content: Option<String>,

    /// Read replacement content from a file
    #[arg(long, conflicts_with = "content")]
    pub content_file: Option<PathBuf>,

    /// Fallback chain to apply
    #[arg(short, long, value_enum, default_value = "page")]
    pub kind: KindArg,

    /// Rewrite the file in place instead of printing it
    #[arg(short, long)]
    pub write: bool,
}

pub fn patch(args: PatchArgs, cwd: &str) -> Result<()> {
    let content = read_content(args.content, args.content_file.as_deref(), cwd)?;
    let path = resolve(cwd, &args.file);
    let patched = patch_file(&path, &content, args.kind.into())?;

    if args.write {
        fs::write(&path, &patched)?;
        eprintln!("{} Patched {}", "✓".green(), args.file.display());
    } else {
        print!("{}", patched);
    }
    Ok(())
}

/// Patched contents of `path`; a missing region is an error
fn patch_file(path: &Path, content: &str, kind: DocumentKind) -> Result<String> {
    let source = fs::read_to_string(path)?;
    patch_source(&source, content, kind)
        .into_result(kind)
        .map_err(|e| anyhow!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        std::fs::write(
            dir.path().join("page.tsx"),
            r#"function Home() { return (<div className="hero">OLD</div>); }"#,
        )
        .unwrap();

        patch(
            PatchArgs {
                file: PathBuf::from("page.tsx"),
                content: Some(r#"<div className="hero">NEW</div>"#.to_string()),
                content_file: None,
                kind: KindArg::Home,
                write: true,
            },
            &cwd,
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("page.tsx")).unwrap(),
            r#"function Home() { return (<div className="hero">NEW</div>); }"#
        );
    }

    #[test]
    fn test_no_region_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ts");
        std::fs::write(&path, "export const revalidate = 60;\n").unwrap();

        let err = patch_file(&path, "<p>x</p>", DocumentKind::Page).unwrap_err();
        assert!(err.to_string().contains("No editable region"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "export const revalidate = 60;\n"
        );
    }
}
