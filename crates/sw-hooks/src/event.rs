//! Catalog of hook events the host application fires.

/// Known hook events.
///
/// Settings may name events outside this catalog; those are still reported
/// as configured, they just never appear as "unconfigured".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownEvent {
    /// Before a tool call runs; may block it.
    PreToolUse,
    /// After a tool call returns.
    PostToolUse,
    Notification,
    /// When the user submits a prompt, before the model sees it.
    UserPromptSubmit,
    Stop,
    SubagentStop,
    /// Before context compaction.
    PreCompact,
    SessionStart,
    SessionEnd,
    /// When a permission dialog would be shown.
    PermissionRequest,
}

impl KnownEvent {
    /// Catalog order, which is also the order of `unconfiguredEvents`.
    pub const ALL: [KnownEvent; 10] = [
        KnownEvent::PreToolUse,
        KnownEvent::PostToolUse,
        KnownEvent::Notification,
        KnownEvent::UserPromptSubmit,
        KnownEvent::Stop,
        KnownEvent::SubagentStop,
        KnownEvent::PreCompact,
        KnownEvent::SessionStart,
        KnownEvent::SessionEnd,
        KnownEvent::PermissionRequest,
    ];

    /// The key used under `hooks` in settings files.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownEvent::PreToolUse => "PreToolUse",
            KnownEvent::PostToolUse => "PostToolUse",
            KnownEvent::Notification => "Notification",
            KnownEvent::UserPromptSubmit => "UserPromptSubmit",
            KnownEvent::Stop => "Stop",
            KnownEvent::SubagentStop => "SubagentStop",
            KnownEvent::PreCompact => "PreCompact",
            KnownEvent::SessionStart => "SessionStart",
            KnownEvent::SessionEnd => "SessionEnd",
            KnownEvent::PermissionRequest => "PermissionRequest",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }
}

/// Catalog event names in catalog order.
pub fn available_events() -> Vec<String> {
    KnownEvent::ALL
        .iter()
        .map(|event| event.as_str().to_string())
        .collect()
}
