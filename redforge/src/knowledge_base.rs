//! Append-only, indexed shared store through which agents exchange
//! artifacts.
//!
//! Restricted to the two entity kinds this crate ever needs — `Attack` and
//! `TestResult` — as a closed enum rather than an open string-keyed store;
//! see `DESIGN.md` for the reasoning. The write path is serialized through
//! one `Mutex`; `snapshot()` hands back an `Arc` clone that later writes
//! never mutate in place, giving readers a consistent point-in-time view.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use redforge_core::model::{Attack, TestResult};

use crate::error::{Error, Result};

/// The two entity kinds the store indexes, named for `Duplicate`/`NotFound`
/// error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Attack,
    TestResult,
}

impl EntityKind {
    fn as_str(self) -> &'static str {
        match self {
            EntityKind::Attack => "attack",
            EntityKind::TestResult => "test_result",
        }
    }
}

#[derive(Clone, Default)]
struct Data {
    attacks: IndexMap<String, Attack>,
    results: IndexMap<String, TestResult>,
    attack_tags: std::collections::HashMap<String, HashSet<String>>,
    result_tags: std::collections::HashMap<String, HashSet<String>>,
}

/// The process-local, append-only store. Cheap to clone (an `Arc` handle);
/// share one instance across all agents and the scheduler.
#[derive(Clone, Default)]
pub struct KnowledgeBase {
    inner: Arc<Mutex<Arc<Data>>>,
}

impl KnowledgeBase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an `Attack`. Fails with `Duplicate` if `attack_id` already
    /// exists; the caller is expected to log and continue, not abort the
    /// evaluation.
    ///
    /// # Errors
    /// Returns `Error::Eval(redforge_core::Error::Duplicate)` if the id is
    /// already present.
    pub fn append_attack(&self, attack: Attack) -> Result<()> {
        let mut guard = self.inner.lock().expect("knowledge base mutex poisoned");
        if guard.attacks.contains_key(&attack.attack_id) {
            return Err(Error::Eval(redforge_core::Error::Duplicate {
                kind: EntityKind::Attack.as_str().to_string(),
                id: attack.attack_id,
            }));
        }
        let data = Arc::make_mut(&mut guard);
        data.attacks.insert(attack.attack_id.clone(), attack);
        Ok(())
    }

    /// Appends a `TestResult`. Fails with `Duplicate` on a repeated
    /// `result_id`, or `NotFound` if the referenced `Attack` is absent —
    /// the invariant that every `TestResult` names a real `Attack`.
    ///
    /// # Errors
    /// See above.
    pub fn append_result(&self, result: TestResult) -> Result<()> {
        let mut guard = self.inner.lock().expect("knowledge base mutex poisoned");
        if guard.results.contains_key(&result.result_id) {
            return Err(Error::Eval(redforge_core::Error::Duplicate {
                kind: EntityKind::TestResult.as_str().to_string(),
                id: result.result_id,
            }));
        }
        if !guard.attacks.contains_key(&result.attack_id) {
            return Err(Error::Eval(redforge_core::Error::NotFound {
                kind: EntityKind::Attack.as_str().to_string(),
                id: result.attack_id,
            }));
        }
        let data = Arc::make_mut(&mut guard);
        data.results.insert(result.result_id.clone(), result);
        Ok(())
    }

    pub fn get_attack(&self, id: &str) -> Option<Attack> {
        let guard = self.inner.lock().expect("knowledge base mutex poisoned");
        guard.attacks.get(id).cloned()
    }

    pub fn tag_attack(&self, id: &str, tag: impl Into<String>) {
        let mut guard = self.inner.lock().expect("knowledge base mutex poisoned");
        let data = Arc::make_mut(&mut guard);
        data.attack_tags
            .entry(id.to_string())
            .or_default()
            .insert(tag.into());
    }

    pub fn by_tag_attacks(&self, tag: &str) -> Vec<Attack> {
        let guard = self.inner.lock().expect("knowledge base mutex poisoned");
        guard
            .attacks
            .values()
            .filter(|a| {
                guard
                    .attack_tags
                    .get(&a.attack_id)
                    .is_some_and(|tags| tags.contains(tag))
            })
            .cloned()
            .collect()
    }

    /// Returns an immutable point-in-time view. Writes after this call
    /// never affect the returned snapshot.
    #[must_use]
    pub fn snapshot(&self) -> KnowledgeBaseSnapshot {
        let guard = self.inner.lock().expect("knowledge base mutex poisoned");
        KnowledgeBaseSnapshot(Arc::clone(&guard))
    }
}

/// An immutable, point-in-time view of the `KnowledgeBase`, used by the
/// scorer and the Judge so both observe exactly the same data.
#[derive(Clone)]
pub struct KnowledgeBaseSnapshot(Arc<Data>);

impl KnowledgeBaseSnapshot {
    #[must_use]
    pub fn attacks(&self) -> Vec<&Attack> {
        self.0.attacks.values().collect()
    }

    #[must_use]
    pub fn results(&self) -> Vec<&TestResult> {
        self.0.results.values().collect()
    }

    #[must_use]
    pub fn get_attack(&self, id: &str) -> Option<&Attack> {
        self.0.attacks.get(id)
    }

    #[must_use]
    pub fn by_tag_attacks(&self, tag: &str) -> Vec<&Attack> {
        self.0
            .attacks
            .values()
            .filter(|a| {
                self.0
                    .attack_tags
                    .get(&a.attack_id)
                    .is_some_and(|tags| tags.contains(tag))
            })
            .collect()
    }
}
