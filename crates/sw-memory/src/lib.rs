//! Memory file import resolution: `@path` directives and the bounded,
//! cycle-aware walk over the import graph they form.

pub mod directive;
pub mod resolve;

pub use directive::{Directive, ImportForm, parse_directives};
pub use resolve::{
    FILE_NOT_FOUND, MAX_IMPORT_DEPTH, MemoryImport, MemoryImportResult, ResolvedMemoryFile,
    direct_imports, resolve_memory,
};
