// Post-mutation notification.
//
// Observers are injected when the client is built and cannot be swapped
// afterwards. They receive the client by reference, so an observer that
// needs to re-read server state does not have to hold a handle to it.

use std::fmt;

use async_trait::async_trait;
use strum::{Display, EnumIter, IntoStaticStr};

use crate::client::SignedApiClient;
use crate::error::Error;

/// The state-changing operations exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MutationKind {
    Start,
    Stop,
    Update,
    Create,
    Delete,
    Restart,
}

/// A mutation the server has just accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub kind: MutationKind,
    /// Name of the service the mutation targeted.
    pub service: String,
}

impl Mutation {
    pub fn new(kind: MutationKind, service: impl Into<String>) -> Self {
        Self {
            kind,
            service: service.into(),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.service)
    }
}

/// Hook run after every successful mutating call.
///
/// The mutating call awaits the observer before returning. An `Err` from the
/// observer turns the call's result into [`Error::Observer`], which records
/// that the server already applied the mutation.
#[async_trait]
pub trait MutationObserver: Send + Sync {
    async fn mutation_applied(
        &self,
        client: &SignedApiClient,
        mutation: &Mutation,
    ) -> Result<(), Error>;
}
