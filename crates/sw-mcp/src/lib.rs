//! MCP server resolution.
//!
//! Servers are read from `.mcp.json` files (direct or `mcpServers`-wrapped),
//! from settings files that carry an `mcpServers` block, and from enabled
//! plugins found through a tiered directory lookup. A server's identity is
//! its name: a name defined at more than one `(scope, path)` location is a
//! duplicate and only the highest-priority instance is active.

pub mod mask;
pub mod plugins;
pub mod resolve;
pub mod server;

pub use mask::{MASKED_VALUE, is_secret_like};
pub use plugins::{InstallRegistry, PluginLookup};
pub use resolve::{McpResult, resolve_mcp, resolve_sources};
pub use server::{McpDuplicate, McpLocation, McpServer, McpServerType, McpSource};
