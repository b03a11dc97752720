//! System clipboard access for the terminal host.
//!
//! There is no clipboard API to call from a terminal, so writes go through
//! whichever copy utility the desktop provides (`pbcopy`, `wl-copy`,
//! `xclip`, `xsel` or a tmux buffer), fed on stdin.

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("No clipboard provider available")]
    Unavailable,

    #[error("Failed to run clipboard command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Clipboard command `{program}` exited unsuccessfully")]
    CommandFailed { program: String },
}

type CopyCommand = (&'static str, &'static [&'static str]);

const PASTEBOARD: CopyCommand = ("pbcopy", &[]);
const WL_CLIPBOARD: CopyCommand = ("wl-copy", &["--type", "text/plain"]);
const XCLIP: CopyCommand = ("xclip", &["-i", "-selection", "clipboard"]);
const XSEL: CopyCommand = ("xsel", &["-i", "-b"]);
const TMUX: CopyCommand = ("tmux", &["load-buffer", "-w", "-"]);

/// Where clipboard writes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardProvider {
    Pasteboard,
    Wayland,
    XClip,
    XSel,
    Tmux,
    /// Any program that takes the text on stdin.
    Custom { program: String, args: Vec<String> },
    None,
}

fn binary_exists(name: &str) -> bool {
    which::which(name).is_ok()
}

fn env_var_is_set(name: &str) -> bool {
    std::env::var_os(name).is_some()
}

impl ClipboardProvider {
    /// Pick the first copy utility usable in this session.
    #[cfg(target_os = "macos")]
    pub fn detect() -> Self {
        if env_var_is_set("TMUX") && binary_exists("tmux") {
            Self::Tmux
        } else if binary_exists("pbcopy") {
            Self::Pasteboard
        } else {
            Self::None
        }
    }

    /// Pick the first copy utility usable in this session.
    #[cfg(not(target_os = "macos"))]
    pub fn detect() -> Self {
        if env_var_is_set("WAYLAND_DISPLAY") && binary_exists("wl-copy") {
            Self::Wayland
        } else if env_var_is_set("DISPLAY") && binary_exists("xclip") {
            Self::XClip
        } else if env_var_is_set("DISPLAY") && binary_exists("xsel") {
            Self::XSel
        } else if env_var_is_set("TMUX") && binary_exists("tmux") {
            Self::Tmux
        } else {
            Self::None
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Pasteboard => "pasteboard",
            Self::Wayland => "wayland",
            Self::XClip => "x-clip",
            Self::XSel => "x-sel",
            Self::Tmux => "tmux",
            Self::Custom { program, .. } => program,
            Self::None => "none",
        }
    }

    /// Replace the clipboard contents with `text`.
    pub fn set_contents(&self, text: &str) -> Result<(), ClipboardError> {
        let builtin = |(program, args): CopyCommand| {
            run_with_input(program, args.iter().copied(), text)
        };
        match self {
            Self::Pasteboard => builtin(PASTEBOARD),
            Self::Wayland => builtin(WL_CLIPBOARD),
            Self::XClip => builtin(XCLIP),
            Self::XSel => builtin(XSEL),
            Self::Tmux => builtin(TMUX),
            Self::Custom { program, args } => {
                run_with_input(program, args.iter().map(String::as_str), text)
            }
            Self::None => Err(ClipboardError::Unavailable),
        }
    }
}

fn run_with_input<'a>(
    program: &str,
    args: impl IntoIterator<Item = &'a str>,
    input: &str,
) -> Result<(), ClipboardError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // stdin is dropped at the end of this expression so the child sees EOF
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(input.as_bytes()),
        None => Ok(()),
    };

    let status = child.wait()?;
    if !status.success() {
        return Err(ClipboardError::CommandFailed {
            program: program.to_string(),
        });
    }
    written?;

    tracing::debug!(program, bytes = input.len(), "Clipboard updated");
    Ok(())
}
