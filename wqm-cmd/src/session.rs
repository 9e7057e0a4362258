//! Line-oriented view-host adapter.
//!
//! Each input line is one JSON event. After every line the session writes one
//! JSON line back: the full views bundle, or `{"error": "..."}` when the line
//! was rejected. A rejected line never changes the selection.
//!
//! Besides the selection events understood by [`Event`], the host may send
//! `{"event":"reload"}` to rebuild the canonical table from the source files.

use anyhow::Context;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::{BufRead, Write};
use wqm_core::canonical::{CanonicalTable, TableHandle};
use wqm_core::loader::SourcePaths;
use wqm_view::selection::{Event, SelectionResolver};

/// Requests handled by the session itself rather than the resolver.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum HostCommand {
    Reload,
}

pub struct Session {
    handle: TableHandle,
    paths: SourcePaths,
    resolver: SelectionResolver,
}

impl Session {
    pub fn new(handle: TableHandle, paths: SourcePaths) -> Self {
        let resolver = SelectionResolver::new(handle.snapshot());
        Self {
            handle,
            paths,
            resolver,
        }
    }

    /// Load the canonical table from `paths` and open a session on it.
    pub fn open(paths: SourcePaths) -> anyhow::Result<Self> {
        let table = CanonicalTable::load(&paths).context("Failed to build canonical table")?;
        info!("Serving {} canonical rows", table.len());
        Ok(Self::new(TableHandle::new(table), paths))
    }

    pub fn resolver(&self) -> &SelectionResolver {
        &self.resolver
    }

    /// Handle one input line, returning the JSON value to send back.
    pub fn handle_line(&mut self, line: &str) -> serde_json::Value {
        if let Ok(HostCommand::Reload) = serde_json::from_str::<HostCommand>(line) {
            return match self.handle.reload(&self.paths) {
                Ok(table) => {
                    self.resolver.rebind(table);
                    self.views_json()
                }
                Err(e) => {
                    error!("Reload failed, keeping previous table: {}", e);
                    json!({ "error": e.to_string() })
                }
            };
        }

        match Event::from_json(line).and_then(|event| self.resolver.apply(event)) {
            Ok(()) => self.views_json(),
            Err(e) => {
                warn!("Rejected event {:?}: {}", line, e);
                json!({ "error": e.to_string() })
            }
        }
    }

    fn views_json(&self) -> serde_json::Value {
        to_json(&self.resolver.views())
    }

    /// Write the initial views, then answer every non-blank input line.
    /// Only I/O errors end the loop.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> anyhow::Result<()> {
        write_line(out, &self.views_json())?;
        for bytes in input.split(b'\n') {
            let bytes = bytes?;
            let response = match String::from_utf8(bytes) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.handle_line(line)
                }
                Err(e) => {
                    warn!("Rejected event line: {}", e);
                    json!({ "error": format!("event is not valid UTF-8: {}", e) })
                }
            };
            write_line(out, &response)?;
        }
        Ok(())
    }
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| json!({ "error": e.to_string() }))
}

fn write_line<W: Write>(out: &mut W, value: &serde_json::Value) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
