// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One load → mutate → persist cycle per process.
//!
//! The document is read and normalized once when the [`App`] is opened.
//! Every mutation goes through [`App::update`], which writes the local copy
//! synchronously and hands a snapshot to the debounced remote mirror.

use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config;
use crate::db;
use crate::error::LedgerError;
use crate::mirror::Mirror;
use crate::models::Document;
use crate::remote::{HttpRemoteStore, RemoteStore};

struct Remote {
    store: Arc<dyn RemoteStore>,
    user_id: String,
    mirror: Mirror,
}

pub struct App {
    conn: Connection,
    doc: Document,
    remote: Option<Remote>,
}

impl App {
    /// Local-only app over an already initialized connection.
    pub fn open(conn: Connection) -> Result<Self> {
        let doc = db::load_document(&conn)?;
        Ok(Self {
            conn,
            doc,
            remote: None,
        })
    }

    /// Opens the app and, when a remote store and a session are configured,
    /// pulls the remote copy before anything else reads the document.
    pub fn connect(conn: Connection) -> Result<Self> {
        let remote = config::remote(&conn)?;
        let session = config::current_session(&conn)?;
        let mut app = Self::open(conn)?;
        if let (Some(remote), Some(session)) = (remote, session) {
            let store = HttpRemoteStore::new(remote, &session)?;
            app.attach_remote(Arc::new(store), session.user_id)?;
            if let Err(err) = app.pull() {
                tracing::warn!(error = %format!("{:#}", err), "remote pull failed; using local ledger");
            }
        }
        Ok(app)
    }

    pub fn attach_remote(&mut self, store: Arc<dyn RemoteStore>, user_id: String) -> Result<()> {
        let debounce = config::debounce(&self.conn)?;
        let mirror = Mirror::spawn(store.clone(), user_id.clone(), debounce);
        self.remote = Some(Remote {
            store,
            user_id,
            mirror,
        });
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Applies a mutation and persists the result.
    pub fn update<T>(
        &mut self,
        f: impl FnOnce(&mut Document) -> Result<T, LedgerError>,
    ) -> Result<T> {
        let out = f(&mut self.doc)?;
        self.commit()?;
        Ok(out)
    }

    /// Writes the local copy and schedules the remote one.
    pub fn commit(&mut self) -> Result<()> {
        db::save_document(&self.conn, &self.doc)?;
        if let Some(remote) = &self.remote {
            remote.mirror.schedule(&self.doc);
        }
        Ok(())
    }

    /// Replaces the local document with the remote one, if the remote has
    /// one. Returns whether anything was replaced.
    pub fn pull(&mut self) -> Result<bool> {
        let Some(remote) = &self.remote else {
            return Ok(false);
        };
        match remote.store.fetch(&remote.user_id)? {
            Some(doc) => {
                db::save_document(&self.conn, &doc)?;
                self.doc = doc;
                tracing::info!(months = self.doc.months.len(), "ledger replaced from remote");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pushes the current document immediately, bypassing the debounce.
    pub fn push_now(&self) -> Result<()> {
        let remote = self
            .remote
            .as_ref()
            .context("No remote store configured or not signed in")?;
        remote.store.upsert(&remote.user_id, &self.doc)
    }

    /// Flushes pending remote writes and releases the connection.
    pub fn close(self) {
        if let Some(remote) = self.remote {
            remote.mirror.shutdown();
        }
    }
}
