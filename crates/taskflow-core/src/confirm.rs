//! Human-in-the-loop confirmation for destructive operations.
//!
//! Destructive service calls take a [`Confirmation`], which can only be
//! obtained by accepting a [`ConfirmDialog`]. The front end decides how the
//! dialog is shown; the type system makes sure it was.

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogVariant {
    Danger,
    Warning,
}

/// Content of a confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    pub variant: DialogVariant,
}

impl ConfirmDialog {
    pub fn delete_task(task: &Task) -> Self {
        Self {
            title: "Delete Task".to_string(),
            message: format!(
                "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                task.title
            ),
            confirm_text: "Delete Task".to_string(),
            cancel_text: "Keep Task".to_string(),
            variant: DialogVariant::Danger,
        }
    }

    pub fn disconnect_google() -> Self {
        Self {
            title: "Disconnect Google Calendar".to_string(),
            message: "Your tasks will stop syncing with Google Calendar. You can reconnect at any time."
                .to_string(),
            confirm_text: "Disconnect".to_string(),
            cancel_text: "Stay Connected".to_string(),
            variant: DialogVariant::Warning,
        }
    }

    /// The user said yes.
    pub fn accept(self) -> Confirmation {
        Confirmation { _private: () }
    }
}

/// Proof that a [`ConfirmDialog`] was accepted.
#[derive(Debug)]
pub struct Confirmation {
    _private: (),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::CreateTaskRequest;

    #[test]
    fn delete_dialog_names_the_task() {
        let task = CreateTaskRequest::new("Pay rent").to_provisional(1);
        let dialog = ConfirmDialog::delete_task(&task);
        assert!(dialog.message.contains("\"Pay rent\""));
        assert_eq!(dialog.variant, DialogVariant::Danger);
    }

    #[test]
    fn disconnect_dialog_is_a_warning() {
        let dialog = ConfirmDialog::disconnect_google();
        assert_eq!(dialog.variant, DialogVariant::Warning);
        assert_eq!(dialog.confirm_text, "Disconnect");
    }
}
