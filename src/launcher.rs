//! Carrying out the action attached to a selected result.

use crate::error::{LaunchError, LaunchResult};
use crate::models::ResultAction;
use async_trait::async_trait;
use std::io;
use tokio::process::Command;

/// Performs a [`ResultAction`].
#[async_trait]
pub trait ActionLauncher: Send + Sync {
    async fn launch(&self, action: &ResultAction) -> LaunchResult<()>;
}

/// Launcher that spawns detached processes on the host.
///
/// URIs and contact links go through the desktop opener; applications and
/// commands are started directly. The child is reaped in the background
/// and never awaited by the caller.
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    opener: String,
    terminal: String,
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self {
            opener: "xdg-open".to_string(),
            terminal: "x-terminal-emulator".to_string(),
        }
    }
}

impl SystemLauncher {
    pub fn new(opener: impl Into<String>, terminal: impl Into<String>) -> Self {
        Self {
            opener: opener.into(),
            terminal: terminal.into(),
        }
    }

    fn command_for(&self, action: &ResultAction) -> LaunchResult<(Command, String)> {
        match action {
            ResultAction::OpenUri { uri, .. } => {
                let mut cmd = Command::new(&self.opener);
                cmd.arg(uri);
                Ok((cmd, uri.clone()))
            }
            ResultAction::OpenContact { phone, email } => {
                let target = contact_uri(phone.as_deref(), email.as_deref()).ok_or_else(|| {
                    LaunchError::Spawn {
                        target: "contact".to_string(),
                        reason: "no phone number or email address".to_string(),
                    }
                })?;
                let mut cmd = Command::new(&self.opener);
                cmd.arg(&target);
                Ok((cmd, target))
            }
            ResultAction::LaunchApp { exec, terminal } => {
                let cmd = if *terminal {
                    let mut cmd = Command::new(&self.terminal);
                    cmd.arg("-e").arg("sh").arg("-c").arg(exec);
                    cmd
                } else {
                    let mut cmd = Command::new("sh");
                    cmd.arg("-c").arg(exec);
                    cmd
                };
                Ok((cmd, exec.clone()))
            }
            ResultAction::RunCommand { path } => Ok((Command::new(path), path.clone())),
        }
    }
}

/// `tel:` for a phone number, otherwise `mailto:` for an email address.
pub fn contact_uri(phone: Option<&str>, email: Option<&str>) -> Option<String> {
    match (phone, email) {
        (Some(phone), _) if !phone.trim().is_empty() => {
            let digits: String = phone
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .collect();
            Some(format!("tel:{}", digits))
        }
        (_, Some(email)) if !email.trim().is_empty() => Some(format!("mailto:{}", email.trim())),
        _ => None,
    }
}

fn spawn_error(target: &str, e: io::Error) -> LaunchError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        LaunchError::PermissionDenied(target.to_string())
    } else {
        LaunchError::Spawn {
            target: target.to_string(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl ActionLauncher for SystemLauncher {
    async fn launch(&self, action: &ResultAction) -> LaunchResult<()> {
        let (mut cmd, target) = self.command_for(action)?;
        let mut child = cmd.spawn().map_err(|e| spawn_error(&target, e))?;
        tracing::info!(launched = %target, "Launched");

        tokio::spawn(async move {
            if let Err(e) = child.wait().await {
                tracing::debug!("Failed to reap launched process: {}", e);
            }
        });
        Ok(())
    }
}
