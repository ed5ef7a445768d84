//! Scope and rule ordering shared by every resolver.
//!
//! Two priority tables live here and nowhere else:
//! - scope priority: `managed < user < project < local`
//! - permission rule priority: `allow < ask < deny`
//!
//! In the permissions domain the rule is compared before the scope, so a
//! `deny` at `managed` outranks an `allow` at `local`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Configuration scope. Declaration order is override power.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Managed,
    User,
    Project,
    Local,
}

impl Scope {
    /// All scopes, lowest priority first.
    pub const ALL: [Scope; 4] = [Scope::Managed, Scope::User, Scope::Project, Scope::Local];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Managed => "managed",
            Self::User => "user",
            Self::Project => "project",
            Self::Local => "local",
        }
    }

    /// Override power; a higher value wins.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Managed => 0,
            Self::User => 1,
            Self::Project => 2,
            Self::Local => 3,
        }
    }

    /// Position used when listing commands and skills.
    ///
    /// Project-level entries are listed first, then local, user and managed.
    pub fn listing_rank(&self) -> u8 {
        match self {
            Self::Project => 0,
            Self::Local => 1,
            Self::User => 2,
            Self::Managed => 3,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Orders scopes highest priority first.
pub fn compare_scope_desc(a: Scope, b: Scope) -> Ordering {
    b.priority().cmp(&a.priority())
}

/// Permission rule kind found under `permissions.{allow,ask,deny}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionRule {
    Allow,
    Ask,
    Deny,
}

impl PermissionRule {
    /// Rules in the order their arrays are read from a settings file.
    pub const ALL: [PermissionRule; 3] =
        [PermissionRule::Allow, PermissionRule::Deny, PermissionRule::Ask];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Ask => "ask",
            Self::Deny => "deny",
        }
    }

    pub fn priority(&self) -> u8 {
        match self {
            Self::Allow => 0,
            Self::Ask => 1,
            Self::Deny => 2,
        }
    }
}

impl std::fmt::Display for PermissionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Orders `(rule, scope)` pairs strongest first: rule priority, then scope.
pub fn compare_permission(a: (PermissionRule, Scope), b: (PermissionRule, Scope)) -> Ordering {
    b.0.priority()
        .cmp(&a.0.priority())
        .then_with(|| compare_scope_desc(a.1, b.1))
}
