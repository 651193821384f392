//! glTF scene graph traversal & mesh instantiation.
//!
//! A [Registry] owns parsed documents by identifier. A [Context] walks a document's scenes
//! depth-first and, through a host-supplied [Spawner], creates one object per mesh node and one
//! [GeometryBuffer] per triangle primitive of that node's mesh, up to a fixed instance capacity.
//!
//! ```no_run
//! # use scenery::*;
//! # fn run<S: Spawner>(spawner: S) -> Result<(), Error> {
//! let mut registry = Registry::new();
//! registry.load("assets/scene.glb")?;
//! let mut context = Context::new(Config::default(), spawner)?;
//! let report = context.process(&mut registry, "assets/scene.glb")?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod buffer;
mod config;
mod context;
pub mod document;
mod error;
pub mod info;
pub mod primitive;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod spawn;
pub mod stream;
pub mod validate;
pub mod walk;

pub use config::*;
pub use context::*;
pub use document::Document;
pub use error::*;
pub use registry::{DocumentId, ItemHandle, PrimitiveHandle, Registry};
pub use report::{ProcessReport, Skip};
pub use resolve::IndexBase;
pub use spawn::{Instance, InstancePool, SpawnError, Spawner, Transform};
pub use stream::{GeometryBuffer, StreamLayout};
