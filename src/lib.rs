//! site-rename library for normalizing content file names.
//!
//! Renames every page under a site's pages directory to kebab-case and keeps
//! the site consistent while doing so. The workflow has four phases:
//!
//! 1. **Mapping**: Discover deployable files and compute canonical names ([`FileMap`])
//! 2. **Rewriting**: Update markdown links and navigation `path:` entries ([`rewriter`])
//! 3. **Redirects**: Migrate the redirect table so old URLs keep working ([`redirects`])
//! 4. **Moving**: Rename files on disk and prune emptied directories ([`mover`])
//!
//! # Example
//!
//! ```no_run
//! use site_rename::{Config, engine};
//!
//! let config = Config::new(".");
//! let plan = engine::plan(&config).unwrap();
//! for rename in &plan.report().renames {
//!     println!("{} -> {}", rename.from.display(), rename.to.display());
//! }
//! plan.apply(&config).unwrap();
//! ```

pub mod case;
pub mod config;
pub mod engine;
pub mod error;
pub mod file_map;
pub mod link_map;
pub mod mover;
pub mod paths;
pub mod redirects;
pub mod rewriter;
pub mod scanner;

// Re-export commonly used types at crate root
pub use config::Config;
pub use engine::{Plan, Report};
pub use error::{RenameError, Result};
pub use file_map::FileMap;
pub use link_map::LinkMap;
pub use redirects::RedirectEntry;
