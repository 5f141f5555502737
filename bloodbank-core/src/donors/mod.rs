mod controller;
mod shared;

pub use controller::{
    Composer, Confirmation, ControllerError, DonorListController, Mutation, PanelMode,
    RemoveOutcome, LOAD_FALLBACK, WRITE_FALLBACK,
};
pub use shared::SharedDonorController;
