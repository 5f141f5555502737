use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use super::controller::{ControllerError, DonorListController};
use crate::api::DonorApi;

/// A donor panel shared between concurrent requests from one visitor.
///
/// Reads wait their turn. Mutations never queue: while one is in flight
/// every other mutation is refused with `ControllerError::Busy`.
pub struct SharedDonorController<A: ?Sized> {
    inner: Arc<Mutex<DonorListController<A>>>,
}

impl<A: ?Sized> Clone for SharedDonorController<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: DonorApi + ?Sized> SharedDonorController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DonorListController::new(api))),
        }
    }

    pub async fn read(&self) -> MutexGuard<'_, DonorListController<A>> {
        self.inner.lock().await
    }

    pub fn try_mutate(&self) -> Result<MutexGuard<'_, DonorListController<A>>, ControllerError> {
        self.inner.try_lock().map_err(|_| {
            tracing::warn!("Donor panel busy, rejecting concurrent change");
            ControllerError::Busy
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;

    #[tokio::test]
    async fn second_mutation_is_refused_while_first_holds_the_panel() {
        let shared = SharedDonorController::new(Arc::new(MockBackend::new()));
        let other = shared.clone();

        let first = shared.try_mutate().expect("panel should be free");
        assert!(matches!(other.try_mutate(), Err(ControllerError::Busy)));
        drop(first);

        let mut panel = other.try_mutate().expect("panel should be free again");
        panel.begin_create();
        assert!(panel.composer().is_some());
    }
}
