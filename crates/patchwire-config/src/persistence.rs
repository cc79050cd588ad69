//! Saving and replaying sessions.
//!
//! [`capture`] snapshots a [`GraphSession`] into a [`GraphDocument`];
//! [`apply`] replays a document into a session. Replay is tolerant: a record
//! that cannot be restored is skipped and reported as a [`LoadWarning`],
//! and everything else still loads.
//!
//! Replay order is fixed: clear the session, restore modules under their
//! saved ids, apply settings, connect edges, and only then start playback
//! if the document asks for it.

use std::path::Path;

use patchwire_core::{
    Connection, GraphError, GraphSession, ModuleId, ParamError, PartialStartFailure,
};
use patchwire_registry::KindRegistry;
use serde_json::Value;
use thiserror::Error;

use crate::document::{ConnectionRecord, GraphDocument, ModuleRecord};
use crate::settings::{capture_settings, json_to_value};
use crate::ConfigError;

/// A document record that was skipped while loading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadWarning {
    /// A module entry is not shaped like a module.
    #[error("module record {index} is malformed: {reason}")]
    MalformedModule {
        /// Position in the `modules` array.
        index: usize,
        /// Parser message.
        reason: String,
    },
    /// The kind is not registered.
    #[error("module {id} has unknown kind '{kind}'")]
    UnknownKind {
        /// Saved id.
        id: String,
        /// Saved kind tag.
        kind: String,
    },
    /// Two records share an id; the later one is dropped.
    #[error("module {0} appears more than once")]
    DuplicateModule(String),
    /// A setting value that is neither number, flag, text nor list.
    #[error("module {module}: setting '{name}' has no usable value")]
    MalformedSetting {
        /// Module id.
        module: String,
        /// Setting name.
        name: String,
    },
    /// The module rejected a setting.
    #[error("module {module}: {error}")]
    InvalidSetting {
        /// Module id.
        module: String,
        /// Validation failure.
        error: ParamError,
    },
    /// A connection entry is not shaped like a connection.
    #[error("connection record {index} is malformed: {reason}")]
    MalformedConnection {
        /// Position in the `connections` array.
        index: usize,
        /// Parser message.
        reason: String,
    },
    /// A connection names a module that is not in the loaded graph.
    #[error("connection {index} ({connection}) refers to missing module {missing}")]
    DanglingConnection {
        /// Position in the `connections` array.
        index: usize,
        /// The skipped connection.
        connection: Connection,
        /// Id that could not be found.
        missing: ModuleId,
    },
    /// The graph refused a connection.
    #[error("connection {index} rejected: {error}")]
    RejectedConnection {
        /// Position in the `connections` array.
        index: usize,
        /// Why it was refused.
        error: GraphError,
    },
}

/// Outcome of replaying a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Modules restored.
    pub modules_loaded: usize,
    /// Connections restored.
    pub connections_loaded: usize,
    /// Records that were skipped, in document order.
    pub warnings: Vec<LoadWarning>,
    /// Modules that refused to start under `autoplay`.
    pub start_failure: Option<PartialStartFailure>,
}

impl LoadReport {
    /// Returns true if nothing was skipped and every module started.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.start_failure.is_none()
    }

    fn warn(&mut self, warning: LoadWarning) {
        tracing::warn!(%warning, "skipped patch record");
        self.warnings.push(warning);
    }
}

/// Snapshot of a session: modules and edges in insertion order.
///
/// Capturing an unchanged session twice yields equal documents, and so
/// byte-identical JSON.
pub fn capture(session: &GraphSession) -> GraphDocument {
    let modules = session
        .registry()
        .iter()
        .map(|(id, position, module)| ModuleRecord {
            id: id.as_str().to_string(),
            kind: module.kind().to_string(),
            x: position.x,
            y: position.y,
            settings: capture_settings(module),
        })
        .collect();

    let connections = session
        .connections()
        .map(|c| ConnectionRecord::new(c.from.as_str(), c.from_port, c.to.as_str(), c.to_port))
        .collect();

    GraphDocument {
        modules,
        connections,
        autoplay: session.is_playing(),
    }
}

/// Parse a document, skipping records that are not well formed.
///
/// Fails only when the text is not JSON or its top level is not shaped
/// like a patch.
pub fn read_document(json: &str) -> Result<(GraphDocument, Vec<LoadWarning>), ConfigError> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Object(mut root) = root else {
        return Err(ConfigError::PersistenceFormat(
            "top level must be an object".to_string(),
        ));
    };

    let mut warnings = Vec::new();
    let mut doc = GraphDocument::default();

    for (index, record) in take_array(&mut root, "modules")?.into_iter().enumerate() {
        match serde_json::from_value::<ModuleRecord>(record) {
            Ok(module) => doc.modules.push(module),
            Err(e) => warnings.push(LoadWarning::MalformedModule {
                index,
                reason: e.to_string(),
            }),
        }
    }

    for (index, record) in take_array(&mut root, "connections")?.into_iter().enumerate() {
        match serde_json::from_value::<ConnectionRecord>(record) {
            Ok(connection) => doc.connections.push(connection),
            Err(e) => warnings.push(LoadWarning::MalformedConnection {
                index,
                reason: e.to_string(),
            }),
        }
    }

    doc.autoplay = match root.remove("autoplay") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(_) => {
            return Err(ConfigError::PersistenceFormat(
                "autoplay must be a boolean".to_string(),
            ));
        }
    };

    for warning in &warnings {
        tracing::warn!(%warning, "skipped patch record");
    }
    Ok((doc, warnings))
}

fn take_array(
    root: &mut serde_json::Map<String, Value>,
    key: &str,
) -> Result<Vec<Value>, ConfigError> {
    match root.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ConfigError::PersistenceFormat(format!(
            "{key} must be an array"
        ))),
    }
}

/// Replay a document into `session`, replacing whatever it held.
pub fn apply(session: &mut GraphSession, doc: &GraphDocument) -> LoadReport {
    session.clear();
    let mut report = LoadReport::default();

    for record in &doc.modules {
        let id = ModuleId::new(record.id.as_str());
        match session.restore_module(id.clone(), &record.kind, record.x, record.y) {
            Ok(()) => report.modules_loaded += 1,
            Err(GraphError::DuplicateModule(_)) => {
                report.warn(LoadWarning::DuplicateModule(record.id.clone()));
                continue;
            }
            Err(_) => {
                report.warn(LoadWarning::UnknownKind {
                    id: record.id.clone(),
                    kind: record.kind.clone(),
                });
                continue;
            }
        }

        for (name, json) in &record.settings {
            let Some(value) = json_to_value(json) else {
                report.warn(LoadWarning::MalformedSetting {
                    module: record.id.clone(),
                    name: name.clone(),
                });
                continue;
            };
            if let Err(GraphError::InvalidParameter { error, .. }) =
                session.set_parameter(&id, name, value)
            {
                report.warn(LoadWarning::InvalidSetting {
                    module: record.id.clone(),
                    error,
                });
            }
        }
    }

    for (index, record) in doc.connections.iter().enumerate() {
        let connection = Connection::new(
            record.from.as_str(),
            record.from_port,
            record.to.as_str(),
            record.to_port,
        );
        match session.connect(connection.clone()) {
            Ok(_) => report.connections_loaded += 1,
            Err(GraphError::ModuleNotFound(missing)) => {
                report.warn(LoadWarning::DanglingConnection {
                    index,
                    connection,
                    missing,
                });
            }
            Err(error) => report.warn(LoadWarning::RejectedConnection { index, error }),
        }
    }

    if doc.autoplay
        && let Err(failure) = session.start()
    {
        report.start_failure = Some(failure);
    }

    tracing::info!(
        modules = report.modules_loaded,
        connections = report.connections_loaded,
        warnings = report.warnings.len(),
        "patch loaded"
    );
    report
}

/// Parse and replay a JSON patch.
pub fn load_str(session: &mut GraphSession, json: &str) -> Result<LoadReport, ConfigError> {
    let (doc, mut warnings) = read_document(json)?;
    let mut report = apply(session, &doc);
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    Ok(report)
}

/// Read and replay a patch file.
pub fn load_file(
    session: &mut GraphSession,
    path: impl AsRef<Path>,
) -> Result<LoadReport, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    load_str(session, &content)
}

/// Save a session to a patch file.
pub fn save_file(session: &GraphSession, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    capture(session).save(path)
}

/// Replays `doc` into a scratch session and attempts a start, reporting
/// every record that would be skipped and every module that would fail.
pub fn check_document(doc: &GraphDocument) -> LoadReport {
    let mut scratch = GraphSession::open(KindRegistry::new());
    let mut report = apply(&mut scratch, &GraphDocument {
        autoplay: false,
        ..doc.clone()
    });
    report.start_failure = scratch.start().err();
    scratch.close();
    report
}
