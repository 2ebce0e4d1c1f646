use clap::{Parser, Subcommand};
use lexitwin_client::{ApiClient, DtLibQuery, DtlQuery};
use lexitwin_core::{LibStatus, ReviewStatus};
use lexitwin_workflow::{ArtifactStore, WorkflowError};

mod display;

#[derive(Parser)]
#[command(name = "lexitwin", version, about = "Digital twins of legislation")]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "LEXITWIN_API_URL", default_value = "http://localhost:8000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List statute libraries.
    Libs {
        /// Free-text search over names and identifiers.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        jurisdiction: Option<String>,
        /// Filter by library status (draft, in-progress, review, approved).
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Show one statute library.
    Lib { dtlib_id: String },
    /// List a library's rules.
    Rules {
        dtlib_id: String,
        #[arg(long)]
        search: Option<String>,
        /// Filter by review status (pending, approved, revision-requested).
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one rule with its artifact completion.
    Rule { dtlib_id: String, dtl_id: String },
    /// Show a rule's review comment log.
    Comments { dtlib_id: String, dtl_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("lexitwin v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let client = ApiClient::new(cli.base_url);

    match cli.command {
        Command::Libs {
            search,
            jurisdiction,
            status,
            limit,
            offset,
        } => {
            let query = DtLibQuery {
                search,
                jurisdiction,
                status: status.as_deref().map(|s| LibStatus::normalize(Some(s))),
                limit,
                offset,
            };
            let libs = client.list_dtlibs(&query).await?;
            display::print_lib_table(&libs);
        }
        Command::Lib { dtlib_id } => {
            let lib = client.get_dtlib(&dtlib_id).await?;
            display::print_lib_card(&lib);
        }
        Command::Rules {
            dtlib_id,
            search,
            status,
        } => {
            let query = DtlQuery {
                search,
                status: status.as_deref().map(|s| ReviewStatus::normalize(Some(s))),
                owner: None,
            };
            let dtls = client.list_dtls(&dtlib_id, &query).await?;
            display::print_dtl_table(&dtls);
        }
        Command::Rule { dtlib_id, dtl_id } => {
            let dtl = client.get_dtl(&dtlib_id, &dtl_id).await?;
            let mut store = ArtifactStore::new(dtlib_id, dtl_id);
            match store.load(&client).await {
                Ok(()) => {}
                Err(WorkflowError::PartialLoad { failures }) => {
                    for (kind, msg) in &failures {
                        tracing::warn!(kind = %kind, error = %msg, "artifact load failed");
                    }
                }
                Err(err) => return Err(err.into()),
            }
            display::print_dtl_card(&dtl, &store);
        }
        Command::Comments { dtlib_id, dtl_id } => {
            let comments = client.list_comments(&dtlib_id, &dtl_id).await?;
            display::print_comment_log(&comments);
        }
    }

    Ok(())
}
