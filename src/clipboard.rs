// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{anyhow, Context, Result};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const COPY_SUCCESS: &str = "PIX key copied!";
pub const COPY_FAILURE: &str = "Could not copy the PIX key";

#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<()>;
}

type ClipboardTool = (&'static str, &'static [&'static str]);

const CLIPBOARD_TOOLS: &[ClipboardTool] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

/// Hands text to whichever clipboard tool the platform provides.
pub struct SystemClipboard {
    candidates: &'static [ClipboardTool],
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self {
            candidates: CLIPBOARD_TOOLS,
        }
    }
}

impl SystemClipboard {
    async fn pipe_into(program: &str, args: &[&str], text: &str) -> Result<()> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", program))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("{} has no stdin", program))?;
        stdin.write_all(text.as_bytes()).await?;
        drop(stdin);

        let status = child.wait().await?;
        if !status.success() {
            return Err(anyhow!("{} exited with {}", program, status));
        }
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        for (program, args) in self.candidates {
            match Self::pipe_into(program, args, text).await {
                Ok(()) => {
                    debug!(program, "copied to clipboard");
                    return Ok(());
                }
                Err(e) => debug!(program, error = %e, "clipboard tool unavailable"),
            }
        }
        Err(anyhow!("no working clipboard tool found"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Failure(text) => text,
        }
    }
}

/// The message slot under the copy button. Cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    current: Arc<Mutex<Option<Notice>>>,
}

impl NoticeBoard {
    pub fn show(&self, notice: Notice) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(notice);
        }
    }

    pub fn hide(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }

    pub fn current(&self) -> Option<Notice> {
        self.current.lock().ok().and_then(|current| current.clone())
    }
}

/// Copy `text`, show the outcome on `board`, and hide it again after
/// `duration`. The returned handle completes once the notice is hidden.
pub async fn copy_with_notice<C: Clipboard>(
    clipboard: &C,
    text: &str,
    board: &NoticeBoard,
    duration: Duration,
) -> JoinHandle<()> {
    let notice = match clipboard.write_text(text).await {
        Ok(()) => Notice::Success(COPY_SUCCESS.to_string()),
        Err(e) => {
            warn!(error = %e, "clipboard copy failed");
            Notice::Failure(COPY_FAILURE.to_string())
        }
    };
    board.show(notice);

    let board = board.clone();
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        board.hide();
    })
}
