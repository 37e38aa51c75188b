use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use directive_tracker::config::Config;
use directive_tracker::models::*;
use directive_tracker::query::{self, FieldFilters, QuickFilter, SortKey};
use directive_tracker::report::{self, Dimension};
use directive_tracker::store::{DirectiveStore, SqliteKv};
use directive_tracker::workflow::{self, Command, FollowUpPeriod};
use directive_tracker::{api, render};

#[derive(Parser)]
#[command(name = "dtrk")]
#[command(about = "Track meeting directives from issuance to closure")]
struct Cli {
    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, global = true, env = "DTRK_DB_PATH")]
    db: Option<PathBuf>,

    /// Role of the acting user: admin, assignee or ceo
    #[arg(long, global = true, env = "DTRK_ROLE", default_value = "admin", value_parser = parse_role)]
    role: Role,

    /// Name recorded on history entries
    #[arg(long, global = true, env = "DTRK_NAME", default_value = "Admin User")]
    name: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List directives, filtered and sorted
    List {
        /// all, open, inProgress, requestForClosing, overdue or dueSoon
        #[arg(long, default_value = "all", value_parser = parse_quick)]
        quick: QuickFilter,

        /// dueDate or priority
        #[arg(long, default_value = "dueDate", value_parser = parse_sort)]
        sort: SortKey,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show one directive with its history and the actions on offer
    Show { id: u64 },
    /// Register a new directive
    Add {
        #[command(flatten)]
        fields: DirectiveArgs,
    },
    /// Replace a directive's classification, content, owner and due date
    Edit {
        id: u64,

        #[command(flatten)]
        fields: DirectiveArgs,
    },
    /// List the workflow actions available to the acting role
    Actions { id: u64 },
    /// Move an open directive to In-Progress
    Start { id: u64 },
    /// Record a progress update
    Progress {
        id: u64,

        #[arg(long)]
        text: String,

        /// Attachment; only the file name is recorded
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
    /// Ask a reviewer to close the directive
    RequestClose {
        id: u64,

        /// Progress narrative recorded before the request
        #[arg(long, default_value = "")]
        text: String,

        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
    /// Approve closure
    Approve {
        id: u64,

        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Send back for additional follow-up with a new due date
    FollowUp {
        id: u64,

        /// 1week, 2weeks, 3weeks, 1month, 2months or 3months
        #[arg(long, default_value = "1week", value_parser = parse_period)]
        period: FollowUpPeriod,

        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Reopen a closed directive
    Reopen {
        id: u64,

        #[arg(long)]
        reason: String,
    },
    /// Dashboard counters
    Stats,
    /// Status counts per meeting or large category
    Report {
        /// meeting or large-category
        #[arg(long, default_value = "meeting", value_parser = parse_dimension)]
        by: Dimension,

        /// Break one group down by assignee
        #[arg(long)]
        group: Option<String>,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    meeting: Option<String>,
    #[arg(long)]
    large_category: Option<String>,
    #[arg(long)]
    small_category: Option<String>,
    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,
    #[arg(long, value_parser = parse_status)]
    status: Option<DirectiveStatus>,
    #[arg(long)]
    assignee: Option<String>,
}

#[derive(Args)]
struct DirectiveArgs {
    #[arg(long)]
    meeting: Option<String>,
    #[arg(long)]
    large_category: Option<String>,
    #[arg(long)]
    small_category: Option<String>,
    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long)]
    assignee: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    due: Option<NaiveDate>,
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::from_str(s).ok_or_else(|| format!("unknown role: {}", s))
}

fn parse_quick(s: &str) -> Result<QuickFilter, String> {
    QuickFilter::from_str(s).ok_or_else(|| format!("unknown quick filter: {}", s))
}

fn parse_sort(s: &str) -> Result<SortKey, String> {
    SortKey::from_str(s).ok_or_else(|| format!("unknown sort key: {}", s))
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::from_str(s).ok_or_else(|| format!("unknown priority: {}", s))
}

fn parse_status(s: &str) -> Result<DirectiveStatus, String> {
    DirectiveStatus::from_str(s).ok_or_else(|| format!("unknown status: {}", s))
}

fn parse_period(s: &str) -> Result<FollowUpPeriod, String> {
    FollowUpPeriod::from_str(s).ok_or_else(|| format!("unknown follow-up period: {}", s))
}

fn parse_dimension(s: &str) -> Result<Dimension, String> {
    Dimension::from_str(s).ok_or_else(|| format!("unknown report dimension: {}", s))
}

/// Only the file name crosses into the core; contents are never read.
fn attachment_names(paths: Vec<PathBuf>) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.to_string_lossy().into_owned())
        })
        .collect()
}

/// Initialize tracing with output to stderr (one-shot commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "directive_tracker=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Keep stdout clean for command output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_kv(path: Option<PathBuf>) -> anyhow::Result<SqliteKv> {
    let kv = match path {
        Some(path) => SqliteKv::open(path)?,
        None => SqliteKv::open_default()?,
    };
    kv.migrate()?;
    Ok(kv)
}

async fn serve(store: DirectiveStore, bind: &str, port: u16) -> anyhow::Result<()> {
    let store = api::shared(store);
    let app = api::create_router(store.clone());

    let addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Directive tracker listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutting down"),
                Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
            }
        })
        .await?;

    store.lock().await.flush().await?;
    Ok(())
}

fn fill_edit(existing: &Directive, args: DirectiveArgs) -> EditDirectiveInput {
    let current = EditDirectiveInput::from(existing);
    EditDirectiveInput {
        meeting: args.meeting.unwrap_or(current.meeting),
        large_category: args.large_category.unwrap_or(current.large_category),
        small_category: args.small_category.unwrap_or(current.small_category),
        priority: args.priority.unwrap_or(current.priority),
        content: args.content.unwrap_or(current.content),
        assignee: args.assignee.unwrap_or(current.assignee),
        due_date: args.due.unwrap_or(current.due_date),
    }
}

async fn run_workflow(
    store: &mut DirectiveStore,
    id: u64,
    actor: &Actor,
    command: Command,
) -> anyhow::Result<()> {
    let directive = store.apply(id, actor, command).await?;
    let actions = workflow::allowed_actions(directive.status, actor.role);
    print!("{}", render::render_detail(&directive, &actions));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let serving = matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(!serving);

    let config = Config::from_env();
    let kv = open_kv(cli.db.or(config.db_path.clone())).context("Failed to open database")?;
    let mut store = DirectiveStore::load(Arc::new(kv)).await;
    let actor = Actor::new(cli.role, cli.name);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            return serve(store, &config.bind, port.unwrap_or(config.port)).await;
        }
        Commands::List {
            quick,
            sort,
            filters,
        } => {
            let fields = FieldFilters {
                meeting: filters.meeting,
                large_category: filters.large_category,
                small_category: filters.small_category,
                priority: filters.priority,
                status: filters.status,
                assignee: filters.assignee,
            };
            let today = store.today();
            let filtered = query::filter(store.directives(), quick, &fields, today);
            print!("{}", render::render_list(&query::sort(&filtered, sort), today));
        }
        Commands::Show { id } => {
            let directive = store
                .get(id)
                .with_context(|| format!("directive {} not found", id))?;
            let actions = workflow::allowed_actions(directive.status, actor.role);
            print!("{}", render::render_detail(directive, &actions));
        }
        Commands::Add { fields } => {
            let input = CreateDirectiveInput {
                meeting: fields.meeting.unwrap_or_default(),
                large_category: fields.large_category.unwrap_or_default(),
                small_category: fields.small_category.unwrap_or_default(),
                priority: fields.priority,
                content: fields.content.unwrap_or_default(),
                assignee: fields.assignee.unwrap_or_default(),
                due_date: fields.due,
            };
            let directive = store.add(&actor, input).await?;
            println!("Registered directive #{}", directive.id);
        }
        Commands::Edit { id, fields } => {
            let existing = store
                .get(id)
                .with_context(|| format!("directive {} not found", id))?;
            let input = fill_edit(existing, fields);
            let directive = store.edit(id, &actor, input).await?;
            let actions = workflow::allowed_actions(directive.status, actor.role);
            print!("{}", render::render_detail(&directive, &actions));
        }
        Commands::Actions { id } => {
            let directive = store
                .get(id)
                .with_context(|| format!("directive {} not found", id))?;
            for action in workflow::allowed_actions(directive.status, actor.role) {
                println!("{}", action);
            }
        }
        Commands::Start { id } => run_workflow(&mut store, id, &actor, Command::Start).await?,
        Commands::Progress { id, text, files } => {
            let files = attachment_names(files);
            run_workflow(&mut store, id, &actor, Command::RecordProgress { text, files }).await?
        }
        Commands::RequestClose { id, text, files } => {
            let files = attachment_names(files);
            run_workflow(&mut store, id, &actor, Command::RequestClosing { text, files }).await?
        }
        Commands::Approve { id, comment } => {
            run_workflow(&mut store, id, &actor, Command::Approve { comment }).await?
        }
        Commands::FollowUp {
            id,
            period,
            comment,
        } => {
            run_workflow(
                &mut store,
                id,
                &actor,
                Command::RequestFollowUp { period, comment },
            )
            .await?
        }
        Commands::Reopen { id, reason } => {
            run_workflow(&mut store, id, &actor, Command::Reopen { reason }).await?
        }
        Commands::Stats => {
            print!(
                "{}",
                render::render_summary(&query::summary(store.directives(), store.today()))
            );
        }
        Commands::Report { by, group } => {
            if !actor.role.can(Capability::ViewReports) {
                anyhow::bail!("{} may not {}", actor.role, Capability::ViewReports);
            }
            let rows = match group {
                Some(group) => report::assignee_breakdown(store.directives(), by, &group),
                None => report::group_counts(store.directives(), by),
            };
            print!("{}", render::render_report(&rows));
        }
    }

    store.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_names_keep_only_the_file_name() {
        let names = attachment_names(vec![
            PathBuf::from("/home/kim/reports/q1.pdf"),
            PathBuf::from("notes.txt"),
        ]);
        assert_eq!(names, vec!["q1.pdf".to_string(), "notes.txt".to_string()]);
    }
}
