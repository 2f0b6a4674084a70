use std::fmt;

/// An update from the monitored chat, reduced to what moderation looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A regular chat message.
    Message(ChatMessage),
    /// An update with no chat-message payload (a channel post).
    ChannelPost { message_id: i32 },
}

impl ChatEvent {
    pub fn message_id(&self) -> i32 {
        match self {
            ChatEvent::Message(msg) => msg.id,
            ChatEvent::ChannelPost { message_id } => *message_id,
        }
    }
}

/// A chat message as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: i32,
    pub voice: Option<VoiceNote>,
    pub sender_chat: Option<SenderChat>,
}

impl ChatMessage {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            voice: None,
            sender_chat: None,
        }
    }

    pub fn with_voice(mut self, voice: VoiceNote) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn with_sender_chat(mut self, sender_chat: SenderChat) -> Self {
        self.sender_chat = Some(sender_chat);
        self
    }
}

/// Voice recording attached to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceNote {
    pub file_size: u32,
}

/// The channel a message was posted as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderChat {
    pub chat_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    DeleteVoice,
    DeleteSenderChat,
    Skip,
}

impl Verdict {
    /// Whether the transport has to delete the message.
    pub fn deletes(self) -> bool {
        matches!(self, Verdict::DeleteVoice | Verdict::DeleteSenderChat)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Allow => write!(f, "allow"),
            Verdict::DeleteVoice => write!(f, "voice message"),
            Verdict::DeleteSenderChat => write!(f, "sender_chat message"),
            Verdict::Skip => write!(f, "skip"),
        }
    }
}

/// Decide what to do with an event from the monitored chat.
///
/// Checks run in order and the first match wins: events without a message
/// are skipped, then voice messages, then messages sent as a channel.
pub fn admit(event: &ChatEvent) -> Verdict {
    let msg = match event {
        ChatEvent::Message(msg) => msg,
        ChatEvent::ChannelPost { .. } => return Verdict::Skip,
    };

    if msg.voice.is_some() {
        return Verdict::DeleteVoice;
    }
    if msg.sender_chat.is_some() {
        return Verdict::DeleteSenderChat;
    }
    Verdict::Allow
}
