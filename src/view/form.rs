use crate::domain::assignee::{AssigneeCandidate, AssigneeSelection};
use crate::domain::ticket::{Ticket, TicketStatus};
use crate::domain::user::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub label: &'static str,
    pub value: String,
    pub required: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOption {
    pub status: TicketStatus,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeBadge {
    pub id: String,
    pub label: String,
}

/// Presentation state of the ticket edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketForm {
    pub title: FieldView,
    pub status: Vec<StatusOption>,
    pub status_disabled: bool,
    pub description: FieldView,
    pub picker: Vec<AssigneeCandidate>,
    pub badges: Vec<AssigneeBadge>,
    pub submit_disabled: bool,
}

impl TicketForm {
    pub fn project(
        ticket: &Ticket,
        selected: &AssigneeSelection,
        candidates: &[AssigneeCandidate],
        session: &Session,
    ) -> Self {
        // Author-only controls; the server enforces the same rule.
        let locked = !session.is_author_of(&ticket.author);

        let status = TicketStatus::ALL
            .iter()
            .map(|status| StatusOption {
                status: *status,
                label: status.label(),
                selected: *status == ticket.status,
            })
            .collect();

        let badges = selected
            .ids()
            .iter()
            .map(|id| AssigneeBadge {
                id: id.clone(),
                label: candidates
                    .iter()
                    .find(|candidate| &candidate.id == id)
                    .map(|candidate| candidate.full_name.clone())
                    .unwrap_or_else(|| id.clone()),
            })
            .collect();

        Self {
            title: FieldView {
                label: "Title",
                value: ticket.title.clone(),
                required: true,
                disabled: locked,
            },
            status,
            status_disabled: locked,
            description: FieldView {
                label: "Description",
                value: ticket.description.clone(),
                required: false,
                disabled: locked,
            },
            picker: candidates.to_vec(),
            badges,
            submit_disabled: locked,
        }
    }

    pub fn selected_status(&self) -> Option<&StatusOption> {
        self.status.iter().find(|option| option.selected)
    }
}
