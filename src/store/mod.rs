//! Directive store: owns the canonical collection and is the only code
//! that writes it back to the key-value collaborator.
//!
//! Every mutation builds the next collection, swaps it in, and persists the
//! whole thing under [`DIRECTIVES_KEY`] in one `set`. A failed save is
//! logged and otherwise ignored: the in-memory collection stays
//! authoritative and the next mutation's save carries it forward.

mod kv;
mod schema;
pub mod seed;
mod sqlite;

pub use kv::{KeyValueStore, MemoryKv};
pub use sqlite::SqliteKv;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::clock::{self, Clock};
use crate::error::{PersistenceError, StoreError, WorkflowError};
use crate::models::{Actor, CreateDirectiveInput, Directive, EditDirectiveInput};
use crate::workflow::{self, Command};

/// The single key the collection is stored under.
pub const DIRECTIVES_KEY: &str = "directives_data";

pub struct DirectiveStore {
    kv: Arc<dyn KeyValueStore>,
    directives: Vec<Directive>,
    clock: Clock,
}

impl DirectiveStore {
    /// Load the stored collection, or seed and persist the bootstrap dataset
    /// when nothing usable is stored.
    pub async fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::load_with_clock(kv, clock::system_now).await
    }

    pub async fn load_with_clock(kv: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        let stored = match kv.get(DIRECTIVES_KEY).await {
            Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str::<Vec<Directive>>(&raw) {
                Ok(directives) => Some(directives),
                Err(e) => {
                    tracing::warn!("Stored directives could not be parsed: {}", e);
                    None
                }
            },
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Failed to read stored directives: {}", e);
                None
            }
        };

        match stored {
            Some(directives) => {
                tracing::info!("Loaded {} directives", directives.len());
                Self {
                    kv,
                    directives,
                    clock,
                }
            }
            None => {
                tracing::info!("First run: seeding bootstrap directives");
                let store = Self {
                    kv,
                    directives: seed::bootstrap(),
                    clock,
                };
                store.persist().await;
                store
            }
        }
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn get(&self, id: u64) -> Option<&Directive> {
        self.directives.iter().find(|d| d.id == id)
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Register a new directive and append it to the collection.
    pub async fn add(
        &mut self,
        actor: &Actor,
        input: CreateDirectiveInput,
    ) -> Result<Directive, StoreError> {
        let directive = workflow::create(&self.directives, actor, input, self.today())?;
        tracing::debug!(id = directive.id, actor = %actor.name, "Directive created");

        let mut next = self.directives.clone();
        next.push(directive.clone());
        self.commit(next).await;
        Ok(directive)
    }

    /// Run a workflow command against directive `id`.
    pub async fn apply(
        &mut self,
        id: u64,
        actor: &Actor,
        command: Command,
    ) -> Result<Directive, StoreError> {
        let current = self.get(id).ok_or(StoreError::NotFound(id))?;
        let next = match workflow::apply(current, actor, command, self.now()) {
            Ok(next) => next,
            Err(e @ WorkflowError::IllegalTransition { .. }) => {
                tracing::error!(id, "Refused command: {}", e);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(id, status = %next.status, actor = %actor.name, "Workflow command applied");

        self.replace(next.clone()).await;
        Ok(next)
    }

    pub async fn edit(
        &mut self,
        id: u64,
        actor: &Actor,
        input: EditDirectiveInput,
    ) -> Result<Directive, StoreError> {
        let current = self.get(id).ok_or(StoreError::NotFound(id))?;
        let next = workflow::edit(current, actor, input)?;
        tracing::debug!(id, actor = %actor.name, "Directive edited");

        self.replace(next.clone()).await;
        Ok(next)
    }

    /// Replace the whole collection and persist it. Ids must be unique;
    /// a collection repeating one is refused and nothing changes.
    pub async fn replace_all(&mut self, directives: Vec<Directive>) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(directives.len());
        if let Some(dup) = directives.iter().find(|d| !seen.insert(d.id)) {
            return Err(StoreError::DuplicateId(dup.id));
        }
        self.commit(directives).await;
        Ok(())
    }

    /// Final save, reporting failure to the caller. Used at shutdown.
    pub async fn flush(&self) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(&self.directives)?;
        self.kv.set(DIRECTIVES_KEY, &raw).await
    }

    async fn replace(&mut self, directive: Directive) {
        let next = self
            .directives
            .iter()
            .map(|d| {
                if d.id == directive.id {
                    directive.clone()
                } else {
                    d.clone()
                }
            })
            .collect();
        self.commit(next).await;
    }

    async fn commit(&mut self, next: Vec<Directive>) {
        self.directives = next;
        self.persist().await;
    }

    async fn persist(&self) {
        if let Err(e) = self.flush().await {
            tracing::error!("Failed to save directives: {}", e);
        }
    }
}
