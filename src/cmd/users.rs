use crate::context::AppContext;
use crate::domain::user::assignee_options;
use crate::error::AppResult;
use crate::view::render_options;
use crate::workflow::board::load_users;

/// Prints the assignee selector options: user id and email.
pub async fn run(ctx: &AppContext) -> AppResult<bool> {
    if load_users(ctx).await? == 0 {
        println!("No users found.");
        return Ok(true);
    }
    print!("{}", render_options(&assignee_options(&ctx.store.users().await)));
    Ok(true)
}
