//! Primary → dependent wheel links.

use std::collections::HashMap;

use rotor_model::DataSet;

use crate::error::{Result, WheelError};
use crate::registry::WheelId;

/// Replacement data for a dependent wheel, keyed by the primary item's
/// join key.
pub type JoinTable<T> = HashMap<String, DataSet<T>>;

/// One-directional link from a primary wheel to its dependent.
#[derive(Debug, Clone)]
pub struct JoinEdge<T> {
    dependent: WheelId,
    table: Option<JoinTable<T>>,
}

impl<T> JoinEdge<T> {
    pub fn new(dependent: WheelId) -> Self {
        Self {
            dependent,
            table: None,
        }
    }

    pub fn dependent(&self) -> WheelId {
        self.dependent
    }

    pub fn set_table(&mut self, table: JoinTable<T>) {
        self.table = Some(table);
    }

    /// Data the dependent should show when the primary commits `key`.
    pub fn resolve(&self, key: &str) -> Result<&DataSet<T>> {
        let table = self.table.as_ref().ok_or_else(|| {
            WheelError::JoinDataMissing(format!(
                "no join table supplied for dependent {}",
                self.dependent
            ))
        })?;
        if table.is_empty() {
            return Err(WheelError::JoinDataMissing(format!(
                "join table for dependent {} is empty",
                self.dependent
            )));
        }
        table.get(key).ok_or_else(|| {
            WheelError::JoinDataMissing(format!(
                "no entry for key {key:?} in join table for dependent {}",
                self.dependent
            ))
        })
    }
}
