// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Debounced background writer for the remote copy.
//!
//! Snapshots are queued without blocking. The worker waits until no new
//! snapshot has arrived for the debounce period and pushes only the latest
//! one. Failed pushes are logged and dropped; the local store stays the
//! source of truth.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::models::Document;
use crate::remote::RemoteStore;

pub struct Mirror {
    tx: Option<Sender<Document>>,
    worker: Option<JoinHandle<()>>,
}

impl Mirror {
    pub fn spawn(store: Arc<dyn RemoteStore>, user_id: String, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker = std::thread::Builder::new()
            .name("monthbook-mirror".into())
            .spawn(move || run(rx, store.as_ref(), &user_id, debounce));
        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!(error = %err, "could not start remote mirror; remote copy disabled");
                None
            }
        };
        Self {
            tx: worker.as_ref().map(|_| tx),
            worker,
        }
    }

    /// Queues a snapshot for the next debounced push.
    pub fn schedule(&self, doc: &Document) {
        let Some(tx) = &self.tx else { return };
        if tx.send(doc.clone()).is_err() {
            tracing::warn!("remote mirror worker is gone; snapshot dropped");
        }
    }

    /// Pushes whatever is still pending and stops the worker.
    pub fn shutdown(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        drop(self.tx.take());
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::warn!("remote mirror worker panicked");
            }
        }
    }
}

impl Drop for Mirror {
    fn drop(&mut self) {
        self.finish();
    }
}

fn run(rx: Receiver<Document>, store: &dyn RemoteStore, user_id: &str, debounce: Duration) {
    while let Ok(mut pending) = rx.recv() {
        loop {
            match rx.recv_timeout(debounce) {
                Ok(newer) => pending = newer,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    push(store, user_id, &pending);
                    return;
                }
            }
        }
        push(store, user_id, &pending);
    }
}

fn push(store: &dyn RemoteStore, user_id: &str, doc: &Document) {
    match store.upsert(user_id, doc) {
        Ok(()) => tracing::debug!(user_id, months = doc.months.len(), "ledger mirrored"),
        Err(err) => tracing::warn!(user_id, error = %format!("{:#}", err), "remote mirror write failed"),
    }
}
