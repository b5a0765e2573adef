use std::io::{self, Write};

use crate::domain::user::Session;
use crate::view::comments::visible_comments;
use crate::view::composer::PLACEHOLDER;
use crate::view::form::{FieldView, TicketForm};
use crate::workflow::ticket_view::{TicketViewState, ViewRoute};

pub fn render_ticket_view(
    out: &mut impl Write,
    state: &TicketViewState,
    session: &Session,
) -> io::Result<()> {
    if state.route == ViewRoute::NotFound {
        writeln!(out, "404: ticket '{}' was not found.", state.ticket_id)?;
        return Ok(());
    }
    let Some(ticket) = &state.ticket else {
        writeln!(out, "Ticket '{}' is not available.", state.ticket_id)?;
        return Ok(());
    };

    let form = TicketForm::project(ticket, &state.selected, &state.candidates, session);

    writeln!(out, "Dashboard / Tickets / {}", ticket.title)?;
    writeln!(out)?;
    render_field(out, &form.title)?;
    let status = form
        .selected_status()
        .map(|option| option.label)
        .unwrap_or("Select One");
    writeln!(out, "Status*: {status}{}", lock_marker(form.status_disabled))?;
    render_field(out, &form.description)?;

    if form.badges.is_empty() {
        writeln!(out, "Selected assignees: None")?;
    } else {
        let badges = form
            .badges
            .iter()
            .map(|badge| format!("[{}]", badge.label))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "Selected assignees: {badges}")?;
    }
    if !form.picker.is_empty() {
        writeln!(out, "Assignee picker:")?;
        for candidate in &form.picker {
            writeln!(out, "  {} ({})", candidate.full_name, candidate.id)?;
        }
    }
    if form.submit_disabled {
        writeln!(out, "Update: disabled, only the ticket author can update")?;
    }

    let comments = visible_comments(&ticket.comments);
    writeln!(out)?;
    writeln!(out, "Comments ({})", comments.len())?;
    for comment in comments {
        writeln!(
            out,
            "  {}  {}",
            comment.created_at.format("%Y-%m-%d %H:%M"),
            comment.author.display_name()
        )?;
        for line in comment.text.lines() {
            writeln!(out, "    {line}")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "> {PLACEHOLDER}")?;
    Ok(())
}

fn render_field(out: &mut impl Write, field: &FieldView) -> io::Result<()> {
    let required = if field.required { "*" } else { "" };
    let lock = lock_marker(field.disabled);
    if field.value.contains('\n') {
        writeln!(out, "{}{required}:{lock}", field.label)?;
        for line in field.value.lines() {
            writeln!(out, "  {line}")?;
        }
        Ok(())
    } else {
        writeln!(out, "{}{required}: {}{lock}", field.label, field.value)
    }
}

fn lock_marker(disabled: bool) -> &'static str {
    if disabled { " (read-only)" } else { "" }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::assignee::{AssigneeCandidate, AssigneeSelection};
    use crate::domain::comment::Comment;
    use crate::domain::ticket::{Ticket, TicketStatus};
    use crate::domain::user::UserRef;

    fn state(ticket: Option<Ticket>, route: ViewRoute) -> TicketViewState {
        TicketViewState {
            ticket_id: "t-1".to_string(),
            route,
            selected: AssigneeSelection::from_ids(["u-3".to_string()]),
            candidates: vec![AssigneeCandidate::from_names("u-3", "Grace", "Hopper")],
            ticket,
            draft: String::new(),
        }
    }

    fn ticket() -> Ticket {
        Ticket {
            id: "t-1".to_string(),
            title: "Projector flickers".to_string(),
            status: TicketStatus::AwaitingFeedback,
            author: "u-1".to_string(),
            description: "Room 4B.\nOnly with HDMI.".to_string(),
            assignees: vec![UserRef::new("u-3")],
            comments: vec![
                Comment {
                    id: "c-1".to_string(),
                    author: UserRef::new("u-1").with_label("Ada Lovelace"),
                    text: "Older".to_string(),
                    created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
                    parent_id: None,
                },
                Comment {
                    id: "c-2".to_string(),
                    author: UserRef::new("u-2"),
                    text: "Reply".to_string(),
                    created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
                    parent_id: Some("c-1".to_string()),
                },
                Comment {
                    id: "c-3".to_string(),
                    author: UserRef::new("u-2"),
                    text: "Newer".to_string(),
                    created_at: Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap(),
                    parent_id: None,
                },
            ],
        }
    }

    fn render(state: &TicketViewState, session: &Session) -> String {
        let mut out = Vec::new();
        render_ticket_view(&mut out, state, session).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_not_found_route_only() {
        let text = render(&state(None, ViewRoute::NotFound), &Session::default());
        assert_eq!(text, "404: ticket 't-1' was not found.\n");
    }

    #[test]
    fn renders_form_and_thread_for_author() {
        let session = Session {
            user_id: Some("u-1".to_string()),
            username: Some("ada".to_string()),
        };
        let text = render(
            &state(Some(ticket()), ViewRoute::Ticket("t-1".to_string())),
            &session,
        );

        assert!(text.starts_with("Dashboard / Tickets / Projector flickers\n"));
        assert!(text.contains("Title*: Projector flickers\n"));
        assert!(text.contains("Status*: Awaiting Feedback\n"));
        assert!(text.contains("Description:\n  Room 4B.\n  Only with HDMI.\n"));
        assert!(text.contains("Selected assignees: [Grace Hopper]\n"));
        assert!(!text.contains("read-only"));
        assert!(text.contains("Comments (2)\n"));
        assert!(!text.contains("Reply"));
        let newer = text.find("Newer").unwrap();
        let older = text.find("Older").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn marks_fields_read_only_for_other_viewers() {
        let text = render(
            &state(Some(ticket()), ViewRoute::Ticket("t-1".to_string())),
            &Session::default(),
        );
        assert!(text.contains("Title*: Projector flickers (read-only)\n"));
        assert!(text.contains("Status*: Awaiting Feedback (read-only)\n"));
        assert!(text.contains("Update: disabled"));
    }
}
