use dialoguer::Confirm;
use rolekeeper_application::DeletionConfirmation;
use rolekeeper_core::{AppError, AppResult};
use rolekeeper_domain::CorrectivePlan;

use crate::render::permission_warning;

/// Asks on the terminal before a permission is stripped from roles.
pub struct TerminalConfirmation {
    assume_yes: bool,
}

impl TerminalConfirmation {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl DeletionConfirmation for TerminalConfirmation {
    fn confirm_permission_deletion(&self, plan: &CorrectivePlan) -> AppResult<bool> {
        print!("{}", permission_warning(plan));

        if self.assume_yes {
            println!("Proceeding without prompt (ROLEKEEPER_ASSUME_YES).");
            return Ok(true);
        }

        Confirm::new()
            .with_prompt("Are you sure you want to delete this permission?")
            .default(false)
            .interact()
            .map_err(|error| AppError::Internal(format!("failed to read confirmation: {error}")))
    }
}
