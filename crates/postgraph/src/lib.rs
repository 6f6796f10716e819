//! # postgraph
//!
//! Link graph tooling for a markdown blog: backlinks, a graph dataset for
//! visualisation, and an internal link checker, served over HTTP or used
//! from the command line.
//!
//! ```no_run
//! use postgraph::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<()> {
//! let site = Arc::new(Site::load(SiteConfig::default()).await?);
//! println!("{}", site.graph().to_json()?);
//! postgraph::server::serve(site, "127.0.0.1", 4321, postgraph::server::shutdown_signal()).await?;
//! # Ok(())
//! # }
//! ```

pub mod server;
pub mod site;

pub use site::{BacklinkEntry, BacklinksReport, Site};

pub mod prelude {
    pub use crate::site::{BacklinkEntry, BacklinksReport, Site};
    pub use postgraph_corpus::prelude::*;
    pub use postgraph_graph::prelude::*;
}
