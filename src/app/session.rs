use crate::app::command::{Command, HELP_TEXT};
use crate::core::codec::UNKNOWN_GROUP;
use crate::core::store::RosterStore;
use crate::core::sync::SyncEngine;
use crate::core::{ConfigProvider, Member, MemberSource, Roster, Storage};
use crate::utils::error::{Result, RosterError};
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Continue(String),
    Exit(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Continue(text) | Reply::Exit(text) => text,
        }
    }
}

/// Interactive session around a single in-memory roster.
pub struct Session<S: Storage, F: MemberSource, C: ConfigProvider> {
    roster: Roster,
    store: RosterStore<S>,
    sync: Option<SyncEngine<F>>,
    config: C,
    unsaved: bool,
}

impl<S: Storage, F: MemberSource, C: ConfigProvider> Session<S, F, C> {
    /// Loads the configured roster file, or starts an empty roster named after the group.
    pub async fn start(store: RosterStore<S>, sync: Option<SyncEngine<F>>, config: C) -> Self {
        let roster = match store.load(config.roster_path()).await {
            Some(mut roster) => {
                if roster.name() == UNKNOWN_GROUP {
                    roster.set_name(config.group_name());
                }
                roster
            }
            None => {
                tracing::info!(
                    "Starting with an empty roster for '{}'",
                    config.group_name()
                );
                Roster::empty(config.group_name())
            }
        };

        Self {
            roster,
            store,
            sync,
            config,
            unsaved: false,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub async fn handle_line(&mut self, line: &str) -> Reply {
        let result = match line.parse::<Command>() {
            Ok(command) => self.execute(command).await,
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            tracing::debug!("Command '{}' failed: {}", line.trim(), e);
            Reply::Continue(format!(
                "Error: {}\nHint: {}",
                e.user_friendly_message(),
                e.recovery_suggestion()
            ))
        })
    }

    pub async fn execute(&mut self, command: Command) -> Result<Reply> {
        let reply = match command {
            Command::ViewAll => Reply::Continue(self.view_all()),
            Command::ViewBelow(threshold) => {
                let threshold = threshold.unwrap_or_else(|| self.config.goal_hours());
                Reply::Continue(self.view_below(threshold))
            }
            Command::Reset => {
                let count = self.roster.reset_all_hours();
                self.unsaved |= count > 0;
                Reply::Continue(format!("Reset hours for {} members.", count))
            }
            Command::Populate => {
                let engine = self.sync.as_ref().ok_or_else(missing_group)?;
                let report = engine.sync(&mut self.roster).await?;
                self.unsaved |= report.added > 0;
                let mut text = format!(
                    "Fetched {} members, added {} new.",
                    report.fetched, report.added
                );
                if report.skipped > 0 {
                    let _ = write!(text, " Skipped {} without a usable name.", report.skipped);
                }
                Reply::Continue(text)
            }
            Command::Members => {
                let engine = self.sync.as_ref().ok_or_else(missing_group)?;
                let records = engine.source().fetch_members().await?;
                if records.is_empty() {
                    Reply::Continue("No members returned by the group chat.".to_string())
                } else {
                    let mut text = String::from("Group Members:");
                    for record in records {
                        let id = record.user_id.as_deref().unwrap_or("unknown");
                        let _ = write!(text, "\n- {} (ID: {})", record.name, id);
                    }
                    Reply::Continue(text)
                }
            }
            Command::Save(path) => {
                let path = path.unwrap_or_else(|| self.config.roster_path().to_string());
                if self.store.save(&self.roster, &path).await {
                    self.unsaved = false;
                    Reply::Continue(format!("Saved {} members to {}.", self.roster.len(), path))
                } else {
                    Reply::Continue(format!("Could not save the roster to {}.", path))
                }
            }
            Command::Help => Reply::Continue(HELP_TEXT.to_string()),
            Command::Exit if self.unsaved => {
                Reply::Exit("Goodbye. Changes since the last save were not written.".to_string())
            }
            Command::Exit => Reply::Exit("Goodbye.".to_string()),
        };
        Ok(reply)
    }

    /// Reads commands until `exit` or end of input.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            writer.write_all(PROMPT.as_bytes()).await?;
            writer.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let reply = self.handle_line(&line).await;
            writer.write_all(reply.text().as_bytes()).await?;
            writer.write_all(b"\n").await?;
            if matches!(reply, Reply::Exit(_)) {
                break;
            }
        }
        writer.flush().await?;
        Ok(())
    }

    fn view_all(&self) -> String {
        if self.roster.is_empty() {
            return format!("'{}' has no members yet.", self.roster.name());
        }

        let mut text = format!(
            "{} ({} members, {} total hours)",
            self.roster.name(),
            self.roster.len(),
            self.roster.total_hours()
        );
        for member in self.roster.members() {
            let _ = write!(text, "\n  {:<30} {}", member.name(), member.hours());
        }
        text
    }

    fn view_below(&self, threshold: f64) -> String {
        let below = self.roster.members_below(threshold);
        if below.is_empty() {
            return format!("Nobody is below {} hours.", threshold);
        }

        let mut text = format!("{} members below {} hours:", below.len(), threshold);
        for member in below {
            let _ = write!(text, "\n  {:<30} {}", member.name(), member.hours());
        }
        text
    }
}

fn missing_group() -> RosterError {
    RosterError::MissingConfig {
        field: "source.group_id".to_string(),
    }
}
