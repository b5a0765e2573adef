use std::io;

use clap::Args;

use crate::context::AppContext;
use crate::domain::ticket::{TicketEdit, TicketStatus};
use crate::error::{AppError, AppResult};
use crate::view::composer::read_draft;
use crate::view::render::render_ticket_view;
use crate::workflow::ticket_view::{
    CommentOutcome, LoadOutcome, TicketViewController, UpdateOutcome,
};

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Ticket identifier.
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    /// One of: unassigned, awaiting-feedback, complete.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TicketStatus>,
    #[arg(long)]
    pub description: Option<String>,
    /// Add an assignee by user id (repeatable).
    #[arg(long = "assign", value_name = "USER_ID")]
    pub assign: Vec<String>,
    /// Remove an assignee by user id (repeatable).
    #[arg(long = "unassign", value_name = "USER_ID")]
    pub unassign: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CommentArgs {
    /// Ticket identifier.
    pub id: String,
    /// Comment text; read from stdin when omitted or `-`.
    pub text: Option<String>,
}

/// Renders each ticket in turn, reusing one view so the assignee directory
/// is fetched once.
pub async fn show(ctx: &AppContext, ids: Vec<String>) -> AppResult<()> {
    let mut ids = ids.into_iter();
    let Some(first) = ids.next() else {
        return Ok(());
    };
    let mut view = open(ctx, first).await?;
    render(&view)?;

    for id in ids {
        println!();
        view.navigate(id.clone());
        let outcome = view.load_ticket().await;
        settle(&view, id, outcome)?;
        render(&view)?;
    }
    Ok(())
}

pub async fn edit(ctx: &AppContext, args: EditArgs) -> AppResult<()> {
    let mut view = open(ctx, args.id).await?;

    if let Some(title) = args.title {
        view.edit_field(TicketEdit::Title(title))?;
    }
    if let Some(status) = args.status {
        view.edit_field(TicketEdit::Status(status))?;
    }
    if let Some(description) = args.description {
        view.edit_field(TicketEdit::Description(description))?;
    }
    for id in &args.assign {
        if !view.state().candidates.iter().any(|c| &c.id == id) {
            eprintln!("Warning: '{id}' is not in the assignee directory.");
        }
        view.add_assignee(id);
    }
    for id in &args.unassign {
        view.remove_assignee(id);
    }

    match view.submit_ticket_update().await {
        UpdateOutcome::Saved { message, reload } => {
            println!("{message}");
            report_reload(reload);
            render(&view)
        }
        UpdateOutcome::Failed(err) => Err(err),
    }
}

pub async fn comment(ctx: &AppContext, args: CommentArgs) -> AppResult<()> {
    let mut view = open(ctx, args.id).await?;
    let draft = read_draft(args.text, &mut io::stdin().lock())?;
    view.set_draft(draft);

    match view.submit_comment().await {
        CommentOutcome::Posted { reload } => {
            report_reload(reload);
            render(&view)
        }
        CommentOutcome::EmptyDraft => Err(AppError::BadRequest(
            "comment text must not be empty".to_string(),
        )),
        CommentOutcome::Failed(err) => Err(err),
    }
}

async fn open(ctx: &AppContext, id: String) -> AppResult<TicketViewController> {
    let mut view = TicketViewController::new(ctx, id.clone());
    let outcome = view.mount().await;
    settle(&view, id, outcome)?;
    Ok(view)
}

fn settle(view: &TicketViewController, id: String, outcome: LoadOutcome) -> AppResult<()> {
    match outcome {
        LoadOutcome::Loaded | LoadOutcome::Stale => Ok(()),
        LoadOutcome::Redirected => {
            render(view)?;
            Err(AppError::NotFound(id))
        }
        LoadOutcome::Failed(err) => Err(err),
    }
}

/// A failed reload after a successful write leaves the pre-write snapshot
/// on screen; the write itself went through.
fn report_reload(reload: LoadOutcome) {
    if let LoadOutcome::Failed(err) = reload {
        eprintln!("Warning: saved, but the ticket could not be refreshed: {err}");
    }
}

fn render(view: &TicketViewController) -> AppResult<()> {
    render_ticket_view(&mut io::stdout().lock(), view.state(), view.session())?;
    Ok(())
}

fn parse_status(value: &str) -> Result<TicketStatus, String> {
    TicketStatus::from_str(value).ok_or_else(|| {
        let known = TicketStatus::ALL
            .iter()
            .map(TicketStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown status '{value}' (expected one of: {known})")
    })
}
