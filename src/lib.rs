//! # panesearch
//!
//! Compare several search engines side by side. This crate holds the
//! headless state behind the comparison page and the small reverse proxy
//! that lets Baidu and DuckDuckGo be framed.
//!
//! - [`registry::EngineRegistry`] tracks the active engines (at most four).
//! - [`sync`] keeps each engine's URL in step with the shared query and with
//!   parameter overrides from the settings panel.
//! - [`settings::ParamEditor`] is the settings panel's draft state.
//! - [`layout::PanelLayout`] is the pane group state the renderer reads.
//! - [`workspace::Workspace`] ties them together behind page-level actions.
//! - [`proxy`] forwards `/api/baidu/**` and `/api/duckduckgo/**`.
//!
//! ## Quick Start
//!
//! ```rust
//! use panesearch::{EngineName, Workspace};
//!
//! # fn main() -> panesearch::Result<()> {
//! let mut workspace = Workspace::parse("http://localhost:3000/?q=rust")?;
//! workspace.add_engine(EngineName::Baidu)?;
//! workspace.submit_query("rust borrow checker");
//!
//! for engine in workspace.engines() {
//!     println!("{}: {}", engine.name, engine.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod layout;
pub mod proxy;
pub mod registry;
pub mod settings;
pub mod sync;
pub mod types;
pub mod utils;
pub mod workspace;

// Re-export common types
pub use error::{Notice, PaneError, Result};
pub use registry::EngineRegistry;
pub use types::{Engine, EngineKey, EngineName, ParamsByKey};
pub use workspace::Workspace;
