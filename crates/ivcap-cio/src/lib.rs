//! # IVCAP Artifact I/O
//!
//! Uniform byte access to artifacts and external URLs for service
//! execution code.
//!
//! The [`IoAdapter`] trait mediates three data paths behind one streaming
//! interface: reading an artifact from the store, reading an arbitrary
//! external URL, and writing a new artifact. Handles are modelled as two
//! independent capability traits, [`Readable`] and [`Writable`]; a type
//! offering both simply implements both.
//!
//! Two adapters ship with the crate:
//!
//! - [`InMemoryAdapter`]: keeps everything in process memory, primarily
//!   for testing and demonstration
//! - [`LocalAdapter`]: a directory-rooted adapter that persists artifacts
//!   as files and materializes external downloads to disk
//!
//! The adapters never retry; retry policy belongs to the caller.

pub mod adapter;
pub mod cache;
pub mod download;
mod error;
mod local;
mod memory;
pub mod stream;

pub use adapter::{ArtifactInfo, IoAdapter, MetaMap, OnClose, ReadOptions, WriteOptions};
pub use download::{DownloadOptions, download};
pub use error::{Error, Result};
pub use local::LocalAdapter;
pub use memory::InMemoryAdapter;
pub use stream::{BufferReader, BufferSink, FileSink, Mode, Readable, Writable};
