//! Additive resolvers: hooks from settings files, plus the slash command
//! and skill catalog scanned from disk.

pub mod commands;
pub mod event;
pub mod frontmatter;
pub mod hooks;

pub use commands::{
    CommandEntry, CommandSource, CommandsInput, CommandsOptions, CommandsResult, resolve_commands,
};
pub use event::{KnownEvent, available_events};
pub use hooks::{HookCommand, HookEvent, HookMatcher, HooksResult, custom_events, resolve_hooks};
