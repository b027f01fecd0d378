use std::collections::BTreeMap;

use clap::{Args, Subcommand};
use tracing::warn;

use crate::cache::DraftCache;
use crate::context::AppContext;
use crate::domain::ticket::TicketKind;
use crate::error::{AppError, AppResult};
use crate::form::FormController;
use crate::form::project::{ProjectField, project_ticket_form};
use crate::form::support::{SupportField, support_ticket_form};
use crate::view::render_form;
use crate::workflow::board::load_users;
use crate::workflow::submit::{SubmissionOutcome, submit_ticket};

#[derive(Args, Debug, Clone)]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TicketCommand {
    /// Create a project ticket.
    Project(ProjectTicketArgs),
    /// Create a support ticket.
    Support(SupportTicketArgs),
    /// List drafts cleared after the server rejected them.
    Drafts,
    /// Submit a stashed draft again.
    Resubmit {
        /// Draft key or unambiguous prefix, as listed by `drafts`.
        key: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectTicketArgs {
    #[arg(long)]
    pub title: Option<String>,
    /// Who is responsible.
    #[arg(long)]
    pub assign: Option<String>,
    /// Client email address.
    #[arg(long)]
    pub email: Option<String>,
    /// support, projects, architecture or certification.
    #[arg(long)]
    pub incident: Option<String>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    /// Project coordinator id.
    #[arg(long)]
    pub project: Option<String>,
    /// low, medium or high.
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub overview: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SupportTicketArgs {
    #[arg(long)]
    pub title: Option<String>,
    /// Reporter's name.
    #[arg(long)]
    pub name: Option<String>,
    /// Reporter's email.
    #[arg(long)]
    pub email: Option<String>,
    /// Reporter's phone number.
    #[arg(long)]
    pub phone: Option<String>,
    /// Id of the responsible user (see `desk users`).
    #[arg(long)]
    pub assignee: Option<String>,
    /// low, medium or high.
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub overview: Option<String>,
}

/// Returns whether the command succeeded.
pub async fn run(ctx: &AppContext, command: TicketCommand) -> AppResult<bool> {
    match command {
        TicketCommand::Project(args) => {
            let mut form = project_ticket_form(&ctx.config.project_coordinators);
            fill_project(&mut form, args)?;
            submit_and_report(ctx, &mut form).await
        }
        TicketCommand::Support(args) => {
            let mut form = support_form(ctx).await?;
            fill_support(&mut form, args)?;
            submit_and_report(ctx, &mut form).await
        }
        TicketCommand::Drafts => {
            list_drafts()?;
            Ok(true)
        }
        TicketCommand::Resubmit { key } => resubmit(ctx, &key).await,
    }
}

async fn support_form(ctx: &AppContext) -> AppResult<FormController> {
    load_users(ctx).await?;
    Ok(support_ticket_form(&ctx.store.users().await))
}

fn fill_project(form: &mut FormController, args: ProjectTicketArgs) -> AppResult<()> {
    let fields = [
        (ProjectField::TITLE, args.title),
        (ProjectField::ASSIGN, args.assign),
        (ProjectField::EMAIL, args.email),
        (ProjectField::INCIDENT, args.incident),
        (ProjectField::START_DATE, args.start_date),
        (ProjectField::END_DATE, args.end_date),
        (ProjectField::PROJECT, args.project),
        (ProjectField::PRIORITY, args.priority),
        (ProjectField::OVERVIEW, args.overview),
    ];
    fill(form, fields)
}

fn fill_support(form: &mut FormController, args: SupportTicketArgs) -> AppResult<()> {
    let fields = [
        (SupportField::TITLE, args.title),
        (SupportField::NAME, args.name),
        (SupportField::EMAIL, args.email),
        (SupportField::PHONE, args.phone),
        (SupportField::ASSIGNEE, args.assignee),
        (SupportField::PRIORITY, args.priority),
        (SupportField::OVERVIEW, args.overview),
    ];
    fill(form, fields)
}

fn fill<const N: usize>(
    form: &mut FormController,
    fields: [(&str, Option<String>); N],
) -> AppResult<()> {
    for (name, value) in fields {
        if let Some(value) = value {
            form.change(name, value)?;
            form.blur(name)?;
        }
    }
    Ok(())
}

async fn submit_and_report(ctx: &AppContext, form: &mut FormController) -> AppResult<bool> {
    let kind = form.kind();
    match submit_ticket(ctx, form).await? {
        SubmissionOutcome::Accepted { .. } => Ok(true),
        SubmissionOutcome::Rejected { error, discarded } => {
            if error.server_message().is_none() {
                eprintln!("Ticket was not created: {error}");
            }
            if let Some(values) = discarded {
                match stash(kind, values, &error) {
                    Ok(key) => eprintln!(
                        "Your input was saved as draft {}; run `desk ticket resubmit {}` to retry.",
                        short_key(&key),
                        short_key(&key)
                    ),
                    Err(err) => warn!(%err, "could not stash rejected draft"),
                }
            }
            Ok(false)
        }
        SubmissionOutcome::Blocked => {
            eprintln!("A submission is already in progress.");
            Ok(false)
        }
    }
}

fn stash(
    kind: TicketKind,
    values: BTreeMap<String, String>,
    error: &AppError,
) -> AppResult<String> {
    let mut cache = DraftCache::load()?;
    let reason = error
        .server_message()
        .map(str::to_string)
        .or_else(|| Some(error.to_string()));
    let key = cache.stash(kind, values, reason);
    cache.save()?;
    Ok(key)
}

fn list_drafts() -> AppResult<()> {
    let cache = DraftCache::load()?;
    if cache.entries().is_empty() {
        println!("No stashed drafts.");
        return Ok(());
    }
    for draft in cache.entries().iter().rev() {
        println!(
            "{}  {:<8} {}  ({})",
            short_key(&draft.key),
            draft.kind,
            draft.title(),
            draft.reason.as_deref().unwrap_or("no reason given")
        );
    }
    Ok(())
}

async fn resubmit(ctx: &AppContext, key: &str) -> AppResult<bool> {
    let cache = DraftCache::load()?;
    let draft = cache
        .find(key)
        .cloned()
        .ok_or_else(|| AppError::Configuration(format!("no stashed draft matches '{key}'")))?;

    let mut form = match draft.kind() {
        Some(TicketKind::Project) => project_ticket_form(&ctx.config.project_coordinators),
        Some(TicketKind::Support) => support_form(ctx).await?,
        None => {
            return Err(AppError::Configuration(format!(
                "draft {} has unknown kind '{}'",
                short_key(&draft.key),
                draft.kind
            )));
        }
    };
    form.restore(&draft.values)?;
    print!("{}", render_form(&form));

    let accepted = submit_and_report(ctx, &mut form).await?;
    if accepted {
        let mut cache = DraftCache::load()?;
        cache.remove(&draft.key);
        cache.save()?;
    }
    Ok(accepted)
}

fn short_key(key: &str) -> &str {
    key.get(..8).unwrap_or(key)
}
