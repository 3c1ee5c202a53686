//! Group and membership lifecycle.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Currency, Engine, EngineError, Group, Money, Participant, ResultEngine,
    util::normalize_display_name,
};

/// Dashboard-style rollup of a group's state.
#[derive(Clone, Debug, Serialize)]
pub struct GroupSummary {
    pub id: Uuid,
    pub name: String,
    pub currency: Currency,
    pub member_count: usize,
    pub entry_count: usize,
    pub total_expenses: Money,
    /// Net balance of the requesting participant, when one is given.
    pub your_balance: Option<Money>,
}

impl Engine {
    /// Creates an empty group and returns its id.
    pub fn create_group(&self, name: &str, currency: Option<Currency>) -> ResultEngine<Uuid> {
        let name = normalize_display_name(name, "group")?;
        let group = Group::new(name, currency.unwrap_or_default());
        let id = group.id;
        self.groups.write().insert(id, Arc::new(RwLock::new(group)));
        tracing::info!(group_id = %id, "group created");
        Ok(id)
    }

    /// Deletes a group. Fails while any member still has a nonzero balance.
    pub fn delete_group(&self, group_id: Uuid) -> ResultEngine<()> {
        let mut groups = self.groups.write();
        let group = groups
            .get(&group_id)
            .ok_or_else(|| EngineError::KeyNotFound(group_id.to_string()))?;
        if group.read().has_unsettled_balances() {
            return Err(EngineError::UnsettledBalance(format!(
                "group {group_id} has unsettled balances"
            )));
        }
        groups.remove(&group_id);
        tracing::info!(group_id = %group_id, "group deleted");
        Ok(())
    }

    /// Adds a member to a group and returns the participant id.
    pub fn add_participant(&self, group_id: Uuid, display_name: &str) -> ResultEngine<Uuid> {
        let group = self.group(group_id)?;
        let mut group = group.write();
        group.add_participant(display_name)
    }

    /// Archives a member. Fails while their net balance is nonzero.
    pub fn remove_participant(&self, group_id: Uuid, participant_id: Uuid) -> ResultEngine<()> {
        let group = self.group(group_id)?;
        let mut group = group.write();
        group.remove_participant(participant_id)
    }

    /// Active members of a group, sorted by display name.
    pub fn participants(&self, group_id: Uuid) -> ResultEngine<Vec<Participant>> {
        let group = self.group(group_id)?;
        let group = group.read();
        let mut members: Vec<Participant> = group.iter_participants().cloned().collect();
        members.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(members)
    }

    /// Rollup for the dashboard: counts, expense volume, and the viewer's
    /// own net balance when `viewer` is given.
    pub fn group_summary(
        &self,
        group_id: Uuid,
        viewer: Option<Uuid>,
    ) -> ResultEngine<GroupSummary> {
        let group = self.group(group_id)?;
        let group = group.read();
        let your_balance = viewer.map(|viewer| {
            super::net_balances(group.ledger(), group.currency)
                .get(&viewer)
                .copied()
                .unwrap_or(Money::zero(group.currency))
        });
        Ok(GroupSummary {
            id: group.id,
            name: group.name.clone(),
            currency: group.currency,
            member_count: group.iter_participants().count(),
            entry_count: group.ledger().len(),
            total_expenses: group.total_expenses(),
            your_balance,
        })
    }
}
