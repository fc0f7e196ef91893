//! Arena of wheels addressed by [`WheelId`], plus the joins between them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Instant;

use rotor_model::{JoinKey, Selection};
use tracing::{debug, warn};

use crate::error::{Result, WheelError};
use crate::join::{JoinEdge, JoinTable};
use crate::wheel::{HostRequest, Wheel};

/// Non-owning handle to a wheel inside a [`WheelRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WheelId(u64);

impl WheelId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wheel-{}", self.0)
    }
}

/// A commit observed during [`WheelRegistry::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct Settled<T> {
    pub wheel: WheelId,
    pub selection: Selection<T>,
}

/// Everything one [`WheelRegistry::tick`] pass produced.
///
/// A failing wheel or cascade does not stop the pass, so commits from other
/// wheels are still reported next to the failures.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport<T> {
    pub settled: Vec<Settled<T>>,
    pub failures: Vec<(WheelId, WheelError)>,
}

impl<T> Default for TickReport<T> {
    fn default() -> Self {
        Self {
            settled: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> TickReport<T> {
    pub fn is_empty(&self) -> bool {
        self.settled.is_empty() && self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct WheelRegistry<T> {
    wheels: BTreeMap<WheelId, Wheel<T>>,
    joins: HashMap<WheelId, JoinEdge<T>>,
    next_id: u64,
}

impl<T> Default for WheelRegistry<T> {
    fn default() -> Self {
        Self {
            wheels: BTreeMap::new(),
            joins: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> WheelRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, wheel: Wheel<T>) -> WheelId {
        let id = WheelId(self.next_id);
        self.next_id += 1;
        self.wheels.insert(id, wheel);
        id
    }

    pub fn get(&self, id: WheelId) -> Option<&Wheel<T>> {
        self.wheels.get(&id)
    }

    pub fn get_mut(&mut self, id: WheelId) -> Option<&mut Wheel<T>> {
        self.wheels.get_mut(&id)
    }

    pub fn contains(&self, id: WheelId) -> bool {
        self.wheels.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = WheelId> + '_ {
        self.wheels.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.wheels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wheels.is_empty()
    }

    /// Detach a wheel, cancelling its timers and dropping every join that
    /// starts or ends at it.
    pub fn remove(&mut self, id: WheelId) -> Option<Wheel<T>> {
        let mut wheel = self.wheels.remove(&id)?;
        wheel.shutdown();
        self.joins.remove(&id);
        self.joins.retain(|_, edge| edge.dependent() != id);
        debug!(target: "rotor::join", wheel = %id, "wheel removed");
        Some(wheel)
    }

    /// Link `primary` to `dependent`, replacing any previous dependent of
    /// `primary` and its join table.
    pub fn join(&mut self, primary: WheelId, dependent: WheelId) -> Result<()> {
        self.require(primary, "primary")?;
        self.require(dependent, "dependent")?;
        if primary == dependent {
            return Err(WheelError::InvalidArgument(format!(
                "{primary} cannot be joined to itself"
            )));
        }
        self.joins.insert(primary, JoinEdge::new(dependent));
        debug!(target: "rotor::join", %primary, %dependent, "wheels joined");
        Ok(())
    }

    pub fn unjoin(&mut self, primary: WheelId) -> Option<WheelId> {
        self.joins.remove(&primary).map(|edge| edge.dependent())
    }

    pub fn dependent_of(&self, primary: WheelId) -> Option<WheelId> {
        self.joins.get(&primary).map(JoinEdge::dependent)
    }

    /// Supply the key → data table consulted when `primary` commits.
    pub fn set_join_data(
        &mut self,
        primary: WheelId,
        table: JoinTable<T>,
    ) -> Result<()> {
        let edge = self.joins.get_mut(&primary).ok_or_else(|| {
            WheelError::InvalidArgument(format!("{primary} has no join"))
        })?;
        edge.set_table(table);
        Ok(())
    }

    /// Earliest deadline across all wheels.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.wheels.values().filter_map(Wheel::next_deadline).min()
    }

    /// Collect queued host commands from every wheel.
    pub fn drain_requests(&mut self) -> Vec<(WheelId, HostRequest)> {
        self.wheels
            .iter_mut()
            .flat_map(|(id, wheel)| {
                wheel.drain_requests().into_iter().map(|req| (*id, req))
            })
            .collect()
    }

    fn require(&self, id: WheelId, role: &str) -> Result<()> {
        if self.wheels.contains_key(&id) {
            Ok(())
        } else {
            Err(WheelError::InvalidArgument(format!(
                "{role} {id} is not registered"
            )))
        }
    }
}

impl<T: Clone + JoinKey> WheelRegistry<T> {
    /// Fire due timers on every wheel and cascade commits through joins.
    ///
    /// A cascade schedules a deferred reset on the dependent; a commit of the
    /// same key before that reset fires replaces it, so the dependent is
    /// reset once.
    ///
    /// A commit whose cascade fails is still reported as settled: its
    /// listener has already run.
    pub fn tick(&mut self, now: Instant) -> TickReport<T> {
        let ids: Vec<WheelId> = self.wheels.keys().copied().collect();
        let mut report = TickReport::default();
        for id in ids {
            let Some(wheel) = self.wheels.get_mut(&id) else {
                continue;
            };
            let selection = match wheel.tick(now) {
                Ok(Some(selection)) => selection,
                Ok(None) => continue,
                Err(err) => {
                    warn!(target: "rotor::join", wheel = %id, error = %err, "wheel tick failed");
                    report.failures.push((id, err));
                    continue;
                }
            };
            if let Err(err) = self.cascade(now, id, &selection) {
                warn!(target: "rotor::join", primary = %id, error = %err, "cascade failed");
                report.failures.push((id, err));
            }
            report.settled.push(Settled {
                wheel: id,
                selection,
            });
        }
        report
    }

    fn cascade(
        &mut self,
        now: Instant,
        primary: WheelId,
        selection: &Selection<T>,
    ) -> Result<()> {
        let Some(edge) = self.joins.get(&primary) else {
            return Ok(());
        };
        let key = selection.item.join_key();
        let data = edge.resolve(&key)?.clone();
        let dependent = edge.dependent();
        let wheel = self.wheels.get_mut(&dependent).ok_or_else(|| {
            WheelError::InvalidArgument(format!(
                "dependent {dependent} is not registered"
            ))
        })?;
        debug!(
            target: "rotor::join",
            %primary,
            %dependent,
            key = %key,
            len = data.len(),
            "cascading selection"
        );
        wheel.reset_data_from_top(now, data);
        Ok(())
    }
}
