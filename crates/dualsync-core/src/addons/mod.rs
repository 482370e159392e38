//! Optional package bundles for the frontend and backend

pub mod catalog;
pub mod install;

pub use catalog::{catalog, choices, find, AddonDescriptor};
pub use install::{install_addons, AddonError, InstallPlan};
