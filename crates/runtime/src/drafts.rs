//! Local drafts of in-progress edits.
//!
//! A draft lets the learner leave a bite (or pause a mission) and resume with
//! their work intact. Drafts are local only; the data source never sees them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use progress_core::{BiteId, MissionId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::Clock;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub key: String,
    pub content: Value,
    pub updated_at: Timestamp,
}

pub fn bite_draft_key(bite: BiteId) -> String {
    format!("draft_bite_{bite}")
}

pub fn mission_draft_key(mission: MissionId) -> String {
    format!("draft_mission_{mission}")
}

struct Inner {
    drafts: HashMap<String, Draft>,
    closed: bool,
}

pub struct DraftStore {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
}

impl DraftStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                drafts: HashMap::new(),
                closed: false,
            }),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<Draft> {
        self.lock().drafts.get(key).cloned()
    }

    /// Replaces the draft under `key`.
    pub fn save(&self, key: &str, content: Value) {
        let now = self.clock.now();
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.drafts.insert(
            key.to_string(),
            Draft {
                key: key.to_string(),
                content,
                updated_at: now,
            },
        );
    }

    /// Merges `patch` into the draft under `key`.
    ///
    /// Object fields in `patch` overwrite or extend the stored object; any other
    /// shape replaces the stored content outright.
    pub fn merge(&self, key: &str, patch: Value) {
        let now = self.clock.now();
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        match inner.drafts.get_mut(key) {
            Some(draft) => {
                merge_value(&mut draft.content, patch);
                draft.updated_at = now;
            }
            None => {
                inner.drafts.insert(
                    key.to_string(),
                    Draft {
                        key: key.to_string(),
                        content: patch,
                        updated_at: now,
                    },
                );
            }
        }
    }

    /// Removes the draft under `key`. Returns whether one existed.
    pub fn clear(&self, key: &str) -> bool {
        self.lock().drafts.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().drafts.is_empty()
    }

    pub fn close(&self) {
        let mut inner = self.lock();
        inner.drafts.clear();
        inner.closed = true;
    }
}

fn merge_value(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(stored), Value::Object(fields)) => {
            for (field, value) in fields {
                stored.insert(field, value);
            }
        }
        (target, patch) => *target = patch,
    }
}
