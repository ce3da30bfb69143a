//! This module contains all commands backed by the hosted AI model, plus the
//! undo/redo commands over their stored history.

/// Submodule defining the `ask` command.
pub(crate) mod ask;
/// Submodule defining the `campaign` command.
pub(crate) mod campaign;
/// Submodule defining the `chat` command.
pub(crate) mod chat;
/// Submodule defining the `history` command.
pub(crate) mod history;
/// Submodule defining the `undo` and `redo` commands.
pub(crate) mod ledger;

use crate::utils::database::{HistoryKind, HistoryRecord};
use crate::{CommandResult, Context};

/// The maximum character length allowed for a single Discord message.
const MAX_MESSAGE_LENGTH: usize = 2000;

/// Number of stored exchanges replayed to the model as context.
pub const CONTEXT_WINDOW: usize = 10;

/// Sends a potentially long response string by splitting it into chunks
/// that respect Discord's message length limit.
///
/// # Arguments
///
/// * `ctx` - The command context.
/// * `response` - The response string to send. Can be any type that implements `AsRef<str>`.
pub async fn chunk_response<S: AsRef<str>>(ctx: Context<'_>, response: S) -> CommandResult {
    for chunk in split_message(response.as_ref(), MAX_MESSAGE_LENGTH) {
        ctx.say(chunk).await?;
    }

    Ok(())
}

/// Splits `text` into pieces of at most `max_chars` characters, never inside a character.
pub fn split_message(text: &str, max_chars: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut iter = text.chars();
    let mut pos = 0;
    while pos < text.len() {
        let mut len = 0;
        for ch in iter.by_ref().take(max_chars) {
            len += ch.len_utf8();
        }
        chunks.push(&text[pos..pos + len]);
        pos += len;
    }
    chunks
}

/// Runs one exchange with stored context and records it.
async fn converse(ctx: Context<'_>, kind: HistoryKind, message: &str) -> CommandResult {
    ctx.defer().await?;

    let data = ctx.data();
    let channel_id = ctx.channel_id().to_string();
    let user_id = ctx.author().id.to_string();

    let history = data.database.recent(kind, &channel_id, CONTEXT_WINDOW)?;
    let reply = data.ai.converse(kind, &history, message).await?;
    data.database
        .record(kind, &user_id, &channel_id, message, &reply)?;

    let speaker = match kind {
        HistoryKind::Chat => "🐶 Dogbot",
        HistoryKind::Campaign => "🎲 Dungeon Master",
    };
    chunk_response(
        ctx,
        format!("**{}**: {message}\n\n**{speaker}**: {reply}", ctx.author().name),
    )
    .await
}

/// One line per record, truncated to keep listings readable.
pub fn summarize(record: &HistoryRecord) -> String {
    const PREVIEW: usize = 80;
    let preview = |text: &str| {
        if text.chars().count() > PREVIEW {
            format!("{}…", text.chars().take(PREVIEW).collect::<String>())
        } else {
            text.to_string()
        }
    };
    format!(
        "**{}** ({}): {}\n↳ {}",
        record.created_at.get(..10).unwrap_or(&record.created_at),
        record.kind,
        preview(&record.message),
        preview(&record.response)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_messages_are_sent_whole() {
        assert_eq!(split_message("woof", 2000), vec!["woof"]);
        assert!(split_message("", 2000).is_empty());
    }

    #[test]
    fn long_messages_split_on_char_boundaries() {
        let text = "🐶".repeat(5);
        let chunks = split_message(&text, 2);

        assert_eq!(chunks, vec!["🐶🐶", "🐶🐶", "🐶"]);
    }

    #[test]
    fn summary_truncates_long_text() {
        let record = HistoryRecord {
            id: 1,
            kind: HistoryKind::Chat,
            user_id: "1".into(),
            channel_id: "2".into(),
            message: "a".repeat(100),
            response: "short".into(),
            created_at: "2024-05-01T10:00:00+00:00".into(),
            active: true,
        };

        let summary = summarize(&record);

        assert!(summary.starts_with("**2024-05-01** (chat): "));
        assert!(summary.contains(&format!("{}…", "a".repeat(80))));
        assert!(summary.ends_with("↳ short"));
    }
}
