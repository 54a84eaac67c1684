//! # Shell Completion Module
//!
//! Completion scripts for the moodtune command line, plus the hidden
//! `complete-songs` helper that prints catalog ids. The fish script calls the
//! helper to offer song ids for `suggest --play` and `profile remove|play`;
//! the other shells get clap's generated script only.
//!
//! ```bash
//! moodtune completion bash > ~/.local/share/bash-completion/completions/moodtune
//! moodtune completion zsh > ~/.config/zsh/completions/_moodtune
//! ```

use clap::Command;
use clap_complete::{generate, Shell as CompletionShell};
use std::io::{self, Write};

use crate::catalog::Catalog;
use crate::cli::Shell;

/// Write the completion script for `shell` to `out`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_completions<W: Write>(shell: Shell, cmd: &mut Command, out: &mut W) -> anyhow::Result<()> {
    let name = cmd.get_name().to_string();
    generate(shell_to_completion_shell(shell), cmd, name.clone(), out);
    if shell == Shell::Fish {
        out.write_all(fish_song_completions(&name).as_bytes())?;
    }
    Ok(())
}

/// Fish rules that complete song ids through `complete-songs`.
fn fish_song_completions(bin: &str) -> String {
    let songs = format!("({bin} complete-songs 2>/dev/null)");
    format!(
        "\n# Song ids from the built-in catalog\n\
         complete -c {bin} -f -n '__fish_seen_subcommand_from suggest' -l play -r -a '{songs}'\n\
         complete -c {bin} -f -n '__fish_seen_subcommand_from profile; and __fish_seen_subcommand_from remove play' -a '{songs}'\n"
    )
}

#[must_use]
pub fn shell_to_completion_shell(shell: Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}

/// One `id<TAB>title - artist` line per catalog song.
#[must_use]
pub fn song_completion_lines(catalog: &Catalog) -> Vec<String> {
    catalog
        .songs()
        .iter()
        .map(|song| format!("{}\t{} - {}", song.id, song.title, song.artist))
        .collect()
}

/// Print catalog ids for completion scripts.
///
/// # Errors
///
/// Returns an error if stdout is closed.
pub fn print_song_completions(catalog: &Catalog) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in song_completion_lines(catalog) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
