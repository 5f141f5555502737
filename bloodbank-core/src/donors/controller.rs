use std::sync::Arc;

use thiserror::Error;

use crate::api::DonorApi;
use crate::error::ApiError;
use crate::models::{DonorForm, DonorId, DonorRecord};

pub const WRITE_FALLBACK: &str = "Operation failed";
pub const LOAD_FALLBACK: &str = "Failed to fetch donors";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("{0}")]
    Invalid(String),

    #[error("Another change to the donor list is still being applied")]
    Busy,

    #[error("No donor form is open")]
    NotComposing,

    #[error("Close the donor form first")]
    ComposerOpen,

    #[error("Donor {0} is not in the list")]
    UnknownDonor(DonorId),

    #[error("{}", .0.operator_message(LOAD_FALLBACK))]
    Load(#[source] ApiError),

    #[error("{}", .0.operator_message(WRITE_FALLBACK))]
    Write(#[source] ApiError),

    #[error("Change saved, but the donor list could not be refreshed: {}", .source.operator_message(LOAD_FALLBACK))]
    Resync {
        applied: Mutation,
        #[source]
        source: ApiError,
    },
}

/// A write the backend confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated(DonorId),
    Deleted(DonorId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Deleted,
    Declined,
}

/// Open donor form. `target` is `None` when adding a donor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composer {
    pub target: Option<DonorId>,
    pub buffer: DonorForm,
}

impl Composer {
    pub fn is_edit(&self) -> bool {
        self.target.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelMode {
    #[default]
    Viewing,
    Composing(Composer),
}

/// Donor management panel: a local mirror of the backend's donor list plus
/// the single add/edit form.
///
/// The mirror is never patched locally. Every confirmed write is followed by
/// a full reload, and a failed read keeps whatever was shown before.
pub struct DonorListController<A: ?Sized> {
    api: Arc<A>,
    donors: Vec<DonorRecord>,
    mode: PanelMode,
    loaded: bool,
    last_error: Option<String>,
}

impl<A: DonorApi + ?Sized> DonorListController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            donors: Vec::new(),
            mode: PanelMode::Viewing,
            loaded: false,
            last_error: None,
        }
    }

    pub fn donors(&self) -> &[DonorRecord] {
        &self.donors
    }

    pub fn mode(&self) -> &PanelMode {
        &self.mode
    }

    pub fn composer(&self) -> Option<&Composer> {
        match &self.mode {
            PanelMode::Composing(composer) => Some(composer),
            PanelMode::Viewing => None,
        }
    }

    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    /// Message of the most recent failure, until an operation succeeds.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub async fn load(&mut self) -> Result<&[DonorRecord], ControllerError> {
        match self.api.list_donors().await {
            Ok(donors) => {
                tracing::debug!(count = donors.len(), "Donor list loaded");
                self.donors = donors;
                self.loaded = true;
                self.last_error = None;
                Ok(&self.donors)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch donors");
                Err(self.surface(ControllerError::Load(e)))
            }
        }
    }

    pub fn begin_create(&mut self) {
        self.mode = PanelMode::Composing(Composer {
            target: None,
            buffer: DonorForm::default(),
        });
    }

    pub fn begin_edit(&mut self, id: DonorId) -> Result<(), ControllerError> {
        let record = self
            .donors
            .iter()
            .find(|d| d.id == id)
            .ok_or(ControllerError::UnknownDonor(id))?;
        self.mode = PanelMode::Composing(Composer {
            target: Some(id),
            buffer: DonorForm::from_record(record),
        });
        Ok(())
    }

    /// Replaces the open form's contents without submitting them.
    pub fn stage(&mut self, buffer: DonorForm) -> Result<(), ControllerError> {
        match &mut self.mode {
            PanelMode::Composing(composer) => {
                composer.buffer = buffer;
                Ok(())
            }
            PanelMode::Viewing => Err(ControllerError::NotComposing),
        }
    }

    pub fn cancel(&mut self) {
        self.mode = PanelMode::Viewing;
    }

    /// Sends the form as a create or an update depending on how the
    /// composer was opened. On failure the composer stays open holding
    /// `buffer`, so nothing has to be typed again.
    pub async fn submit(&mut self, buffer: DonorForm) -> Result<Mutation, ControllerError> {
        let target = match &self.mode {
            PanelMode::Composing(composer) => composer.target,
            PanelMode::Viewing => return Err(ControllerError::NotComposing),
        };
        self.mode = PanelMode::Composing(Composer {
            target,
            buffer: buffer.clone(),
        });

        let checked = match target {
            Some(_) => buffer.check(),
            None => buffer.check_for_create(),
        };
        if let Err(message) = checked {
            return Err(self.surface(ControllerError::Invalid(message)));
        }

        let written = match target {
            Some(id) => self
                .api
                .update_donor(id, &buffer)
                .await
                .map(|_| Mutation::Updated(id)),
            None => self
                .api
                .create_donor(&buffer)
                .await
                .map(|_| Mutation::Created),
        };

        match written {
            Ok(mutation) => {
                tracing::info!(?mutation, "Donor saved");
                self.mode = PanelMode::Viewing;
                self.resync(mutation).await
            }
            Err(e) => {
                tracing::error!(error = %e, donor_id = ?target, "Failed to save donor");
                Err(self.surface(ControllerError::Write(e)))
            }
        }
    }

    /// Deletes a donor once the operator has confirmed.
    pub async fn remove(
        &mut self,
        id: DonorId,
        confirmation: Confirmation,
    ) -> Result<RemoveOutcome, ControllerError> {
        if self.composer().is_some() {
            return Err(ControllerError::ComposerOpen);
        }
        if confirmation == Confirmation::Declined {
            tracing::debug!(donor_id = id, "Delete declined");
            return Ok(RemoveOutcome::Declined);
        }

        if let Err(e) = self.api.delete_donor(id).await {
            tracing::error!(error = %e, donor_id = id, "Failed to delete donor");
            return Err(self.surface(ControllerError::Write(e)));
        }
        tracing::info!(donor_id = id, "Donor deleted");
        self.resync(Mutation::Deleted(id)).await?;
        Ok(RemoveOutcome::Deleted)
    }

    async fn resync(&mut self, applied: Mutation) -> Result<Mutation, ControllerError> {
        match self.load().await {
            Ok(_) => Ok(applied),
            Err(ControllerError::Load(source)) => {
                Err(self.surface(ControllerError::Resync { applied, source }))
            }
            Err(other) => Err(other),
        }
    }

    fn surface(&mut self, error: ControllerError) -> ControllerError {
        self.last_error = Some(error.to_string());
        error
    }
}
