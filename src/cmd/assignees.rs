use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let candidates = ctx.assignee_directory.list_assignees().await?;
    if candidates.is_empty() {
        println!("No assignees available.");
    }
    for candidate in candidates {
        println!("{}\t{}", candidate.id, candidate.full_name);
    }
    Ok(())
}
