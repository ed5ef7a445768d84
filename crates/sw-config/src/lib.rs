//! Settings and permissions resolution, plus scopewise's own config file.

pub mod global;
pub mod permissions;
pub mod settings;

pub use global::GlobalConfig;
pub use permissions::{
    EffectivePermission, PermissionEntry, PermissionsResult, parse_rule, resolve_permissions,
};
pub use settings::{ResolvedSetting, SettingOverride, SettingsResult, resolve_settings};
