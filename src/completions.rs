use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap_complete::{generate, Shell};

use crate::app::AppError;

/// Shells the `completions` command supports. clap_complete can emit more,
/// but these are the ones `hab` documents and has install paths for.
const SUPPORTED_SHELLS: [(&str, Shell); 3] = [
    ("bash", Shell::Bash),
    ("zsh", Shell::Zsh),
    ("fish", Shell::Fish),
];

/// Resolves a shell by name. Accepts either a bare name ("zsh") or a full
/// interpreter path ("/usr/bin/zsh"), so it serves both the CLI argument
/// and $SHELL detection.
fn resolve_shell(raw: &str) -> Option<Shell> {
    let name = raw.trim().rsplit('/').next()?.to_ascii_lowercase();
    SUPPORTED_SHELLS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, shell)| *shell)
}

pub fn generate_completions(shell: Shell, buf: &mut dyn Write) {
    let mut cmd = crate::cli::styled_command();
    generate(shell, &mut cmd, "hab", buf);
}

fn install_path_for_home(shell: Shell, home: &Path) -> PathBuf {
    match shell {
        Shell::Zsh => home.join(".config/habits/completions/_hab"),
        Shell::Fish => home.join(".config/fish/completions/hab.fish"),
        // bash-completion looks the file up by command name, no extension
        _ => home.join(".local/share/bash-completion/completions/hab"),
    }
}

pub fn install_completions(shell: Shell) -> io::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|err| io::Error::new(io::ErrorKind::NotFound, err))?;
    let path = install_path_for_home(shell, Path::new(&home));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut buf = Vec::new();
    generate_completions(shell, &mut buf);
    std::fs::write(&path, buf)?;
    Ok(path)
}

pub fn run_completions_command(
    shell_arg: Option<&str>,
    install: bool,
) -> Result<(), AppError> {
    let shell = match shell_arg {
        Some(name) => resolve_shell(name).ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "unknown shell '{name}': expected bash, zsh, or fish"
            ))
        })?,
        None => std::env::var("SHELL")
            .ok()
            .and_then(|var| resolve_shell(&var))
            .ok_or_else(|| {
                AppError::InvalidArgument(
                    "unable to detect shell from $SHELL; pass bash, zsh, or fish".to_string(),
                )
            })?,
    };

    if install {
        let path = install_completions(shell)?;
        println!("completions installed to {}", path.display());
        if shell == Shell::Zsh {
            println!("add the directory to your fpath to activate them");
        }
    } else {
        let mut stdout = io::stdout().lock();
        generate_completions(shell, &mut stdout);
    }

    Ok(())
}
