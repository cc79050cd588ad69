//! Patch persistence for patchwire.
//!
//! A patch is a JSON [`GraphDocument`]: modules with their ids, kinds,
//! positions and settings, the connections between them, and an `autoplay`
//! flag. This crate captures a [`GraphSession`](patchwire_core::GraphSession)
//! into a document and replays documents back into a session.
//!
//! Loading is tolerant. A record that cannot be restored (an unknown kind,
//! a connection to a missing module, a setting the module rejects) is
//! skipped and reported as a [`LoadWarning`]; the rest of the patch loads.
//!
//! # Example
//!
//! ```rust
//! use patchwire_config::{capture, factory_patch, apply};
//! use patchwire_core::GraphSession;
//! use patchwire_registry::KindRegistry;
//!
//! let mut session = GraphSession::open(KindRegistry::new());
//! let report = apply(&mut session, &factory_patch("default").unwrap());
//! assert!(report.is_clean());
//!
//! let json = capture(&session).to_json().unwrap();
//! assert!(json.contains("\"type\": \"keyboard\""));
//! ```

mod document;
mod error;
mod persistence;

pub mod factory_patches;
pub mod paths;
pub mod settings;

pub use document::{ConnectionRecord, GraphDocument, ModuleRecord};
pub use error::ConfigError;
pub use factory_patches::{factory_patch, factory_patch_names, factory_patches, is_factory_patch};
pub use paths::{
    find_patch, list_all_patches, list_system_patches, list_user_patches, system_patches_dir,
    user_config_dir, user_patches_dir,
};
pub use persistence::{
    LoadReport, LoadWarning, apply, capture, check_document, load_file, load_str, read_document,
    save_file,
};
