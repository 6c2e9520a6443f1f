//! Who voters are and what we know about them.

use std::sync::Arc;

use crate::error::StoreError;
use crate::model::{common::user::UserId, db::voter::Voter};
use crate::store::Store;

/// Attributes of a voter relevant to eligibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoterAttributes {
    /// Age in years, if known.
    pub age: Option<u32>,
}

/// Source of voter attributes.
#[rocket::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up a voter's attributes. `None` means the voter is unknown.
    async fn attributes_of(&self, id: &UserId) -> Result<Option<VoterAttributes>, StoreError>;
}

/// An [`IdentityProvider`] serving the voter records held in the store.
#[derive(Clone)]
pub struct VoterDirectory {
    store: Arc<dyn Store>,
}

impl VoterDirectory {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: &UserId) -> Result<Option<Voter>, StoreError> {
        self.store.voter(id).await
    }

    pub async fn put(&self, voter: &Voter) -> Result<(), StoreError> {
        self.store.upsert_voter(voter).await
    }
}

#[rocket::async_trait]
impl IdentityProvider for VoterDirectory {
    async fn attributes_of(&self, id: &UserId) -> Result<Option<VoterAttributes>, StoreError> {
        Ok(self
            .get(id)
            .await?
            .map(|voter| VoterAttributes { age: voter.age }))
    }
}
