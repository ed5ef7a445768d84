//! Shared primitives for scopewise: the scope model, the scanner's input
//! records and validating extraction from parsed JSON.

pub mod error;
pub mod extract;
pub mod paths;
pub mod scope;
pub mod types;

pub use error::{FileIssue, SkipReason, snapshot_issues};
pub use extract::{Extract, JsonObject};
pub use scope::{PermissionRule, Scope, compare_permission, compare_scope_desc};
pub use types::{ConfigFile, ConfigFileKind, OutputFormat, PluginInfo, ScopedDir};
