use std::sync::Arc;

use log::{debug, info};

use crate::error::{Error, Result, ValidationError};
use crate::model::{
    common::{
        election::{AccessCode, ElectionId},
        user::UserId,
    },
    db::election::{Election, ElectionState, NewElection},
};
use crate::store::{ElectionFilter, Store};

use super::access_code;

/// Reads and writes election records.
///
/// Lifecycle fields must only be changed through the lifecycle manager.
#[derive(Clone)]
pub struct ElectionRepository {
    store: Arc<dyn Store>,
}

impl ElectionRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Persist a new, open election with a fresh ID and access code.
    pub async fn create(&self, draft: NewElection) -> Result<Election> {
        let id = self.store.next_election_id().await?;
        let election = draft.into_election(id, access_code::generate());
        self.store.insert_election(&election).await?;
        info!(
            "Created election {} '{}' owned by {}",
            election.id, election.title, election.owner_id
        );
        Ok(election)
    }

    pub async fn get_by_id(&self, id: ElectionId) -> Result<Election> {
        self.store
            .election(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Election with ID '{id}'")))
    }

    pub async fn list_public(&self) -> Result<Vec<Election>> {
        Ok(self.store.elections(&ElectionFilter::Public).await?)
    }

    pub async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Election>> {
        Ok(self
            .store
            .elections(&ElectionFilter::OwnedBy(owner.clone()))
            .await?)
    }

    /// Find an election by access code, ignoring case.
    ///
    /// Codes are not unique; if several elections share one, the one with the
    /// lowest ID is returned.
    pub async fn find_by_access_code(&self, raw: &str) -> Result<Election> {
        let code = AccessCode::parse(raw).ok_or(ValidationError::BlankAccessCode)?;
        let mut matches = self
            .store
            .elections(&ElectionFilter::AccessCode(code.clone()))
            .await?;
        if matches.len() > 1 {
            debug!("Access code {code} is shared by {} elections", matches.len());
        }
        if matches.is_empty() {
            return Err(Error::not_found(format!("Election with access code '{code}'")));
        }
        Ok(matches.swap_remove(0))
    }

    /// Atomically replace an election's lifecycle state if its stored
    /// `is_closed` flag is still `expect_closed`.
    pub async fn update_state(
        &self,
        id: ElectionId,
        expect_closed: bool,
        state: &ElectionState,
    ) -> Result<bool> {
        Ok(self.store.update_state(id, expect_closed, state).await?)
    }
}
