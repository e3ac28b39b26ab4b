use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod console;
mod error;
mod exec;
mod model;
mod query;
mod render;

use error::QueryError;
use exec::tso::{self, TsoPrograms, TsoRequest};
use exec::{ConsoleExecutor, OpercmdConsole, ReplayConsole};
use query::RawCriteria;
use render::{FailureReport, QueryReport, TsoReport};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "zos-operator-query")]
#[command(about = "Query outstanding z/OS operator actions and run TSO commands", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display outstanding messages requiring operator action.
    Query {
        /// Request numbers to return, or `all`.
        #[arg(long = "request-number", value_delimiter = ',', default_value = "all")]
        request_number_list: Vec<String>,

        /// System name; leading and trailing `*` are ignored.
        #[arg(long)]
        system: Option<String>,

        /// Job name; leading and trailing `*` are ignored.
        #[arg(long)]
        job_name: Option<String>,

        /// Message id; leading and trailing `*` are ignored.
        #[arg(long)]
        message_id: Option<String>,

        /// Validate the parameters and stop before issuing any command.
        #[arg(long)]
        check: bool,

        #[command(flatten)]
        console: ConsoleArgs,
    },

    /// Run a TSO command.
    Tso {
        command: String,

        /// Run through IKJEFT01 under mvscmdauth (APF-authorized).
        #[arg(long)]
        auth: bool,

        #[arg(long, env = "ZOQ_TSO", default_value = "tso")]
        tso_program: PathBuf,

        #[arg(long, env = "ZOQ_MVSCMDAUTH", default_value = "mvscmdauth")]
        mvscmdauth: PathBuf,
    },

    /// Join captured `D R,A,S` and `D R,A,JN` output and print every record.
    Parse {
        #[arg(long)]
        replies_file: String,

        #[arg(long)]
        jobnames_file: String,
    },
}

#[derive(Args)]
struct ConsoleArgs {
    /// Program used to issue operator commands.
    #[arg(long, env = "ZOQ_OPERCMD", default_value = "opercmd")]
    opercmd: PathBuf,

    /// Captured `D R,A,S` output to use instead of the live console.
    #[arg(long, requires = "jobnames_file")]
    replies_file: Option<String>,

    /// Captured `D R,A,JN` output to use instead of the live console.
    #[arg(long, requires = "replies_file")]
    jobnames_file: Option<String>,
}

impl ConsoleArgs {
    fn executor(&self) -> Result<Box<dyn ConsoleExecutor>> {
        match (&self.replies_file, &self.jobnames_file) {
            (Some(replies), Some(jobnames)) => Ok(Box::new(replay(replies, jobnames)?)),
            _ => Ok(Box::new(OpercmdConsole::new(&self.opercmd))),
        }
    }
}

fn replay(replies_file: &str, jobnames_file: &str) -> Result<ReplayConsole> {
    ReplayConsole::new()
        .with_file(console::DISPLAY_REPLIES_BY_SYSTEM, replies_file)?
        .with_file(console::DISPLAY_REPLIES_BY_JOBNAME, jobnames_file)
}

fn init_tracing(default_filter: &str) {
    // stdout carries the result document; logs go to stderr.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.cmd {
        Commands::Query {
            request_number_list,
            system,
            job_name,
            message_id,
            check,
            console,
        } => {
            let params = RawCriteria {
                request_number_list,
                system,
                message_id,
                jobname: job_name,
            };
            run_query(&params, check, &console)
        }
        Commands::Tso {
            command,
            auth,
            tso_program,
            mvscmdauth,
        } => {
            let request = TsoRequest { command, auth };
            let programs = TsoPrograms {
                tso: tso_program,
                mvscmdauth,
            };
            run_tso(&request, &programs)
        }
        Commands::Parse {
            replies_file,
            jobnames_file,
        } => {
            let merged = replay(&replies_file, &jobnames_file)
                .map_err(unexpected)
                .and_then(|console| query::collect_merged(&console));
            match merged {
                Ok(merged) => emit(&merged, true),
                Err(e) => emit(&FailureReport::new(&e), false),
            }
        }
    }
}

fn run_query(params: &RawCriteria, check: bool, console: &ConsoleArgs) -> Result<ExitCode> {
    // Validation runs before anything is issued.
    let criteria = match params.validate() {
        Ok(criteria) => criteria,
        Err(e) => return emit(&QueryReport::failure(params, &e), false),
    };

    if check {
        return emit(&QueryReport::checked(params), true);
    }

    let executor = match console.executor() {
        Ok(executor) => executor,
        Err(e) => return emit(&QueryReport::failure(params, &unexpected(e)), false),
    };
    match query::find_requests(executor.as_ref(), &criteria) {
        Ok(requests) => emit(&QueryReport::success(params, &requests), true),
        Err(e) => emit(&QueryReport::failure(params, &e), false),
    }
}

/// Replay file errors keep their context chain in the reported message.
fn unexpected(err: anyhow::Error) -> QueryError {
    QueryError::Unexpected(format!("{:#}", err))
}

fn run_tso(request: &TsoRequest, programs: &TsoPrograms) -> Result<ExitCode> {
    match tso::run_tso_command(request, programs) {
        Ok(outcome) => {
            let report = TsoReport::from_outcome(request, &outcome);
            let ok = !report.failed();
            emit(&report, ok)
        }
        Err(e) => emit(&TsoReport::failure(request, &e), false),
    }
}

fn emit<T: serde::Serialize>(doc: &T, ok: bool) -> Result<ExitCode> {
    println!("{}", render::render_json(doc)?);
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
