//! Public SDK for the weft page composition framework.
//!
//! This crate re-exports all framework functionality:
//!
//! ```ignore
//! use weft_sdk::prelude::*;
//!
//! let block = Component::new("block", move |_ctx| fetch_block().boxed())
//!     .action("reload-block", move |_ctx, _args| fetch_block().boxed());
//!
//! let index = Page::new("index", "page.index").component("block", Arc::new(block));
//!
//! App::new(AppConfig::from_env())
//!     .page("/", index, render_index)
//!     .serve()
//!     .await?;
//! ```

pub use weft_compose;
pub use weft_core;
pub use weft_data;
pub use weft_render;
pub use weft_server;

/// Prelude for convenient imports.
pub mod prelude {
    pub use weft_compose::*;
    pub use weft_core::*;
    pub use weft_data::*;
    pub use weft_render::*;
    pub use weft_server::*;
}
