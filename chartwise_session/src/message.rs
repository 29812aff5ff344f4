// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversation transcript entries.

use serde::Serialize;

/// Who wrote a [`Message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions.
    User,
    /// The session's replies.
    Assistant,
}

/// One transcript entry.
///
/// Assistant messages may contain Markdown emphasis (`**bar chart**`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Position in the transcript, starting at 0 and never reused within a session.
    pub id: u64,
    /// Author.
    pub role: Role,
    /// Message text.
    pub content: String,
}
