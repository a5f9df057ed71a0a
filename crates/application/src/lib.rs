//! Application services and ports.

#![forbid(unsafe_code)]

mod directory_admin_service;
mod directory_ports;

pub use directory_admin_service::DirectoryAdminService;
pub use directory_ports::{
    DeletionConfirmation, DirectoryClient, PermissionDeletionOutcome, PermissionDeletionReport,
};
