//! mdspace: opens a markdown workspace headlessly and prints its visible tree.
//!
//! Usage: `mdspace [ROOT] [--find QUERY]`. Without `ROOT` the last opened
//! workspace is restored.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use mdspace::kernel::services::adapters::{LocalFs, SessionStore};
use mdspace::kernel::Workspace;

mod logging;

struct Args {
    root: Option<PathBuf>,
    find: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        root: None,
        find: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--find" => {
                let query = iter.next().ok_or("--find needs a query")?;
                args.find = Some(query);
            }
            "-h" | "--help" => return Err("usage: mdspace [ROOT] [--find QUERY]".to_string()),
            _ if args.root.is_none() => args.root = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument: {arg}")),
        }
    }
    Ok(args)
}

async fn run(args: Args, session: Option<SessionStore>) -> Result<(), String> {
    let root = match args.root {
        Some(root) => root,
        None => session
            .as_ref()
            .and_then(SessionStore::restore)
            .ok_or("no workspace given and none to restore")?,
    };
    let root = std::fs::canonicalize(&root).map_err(|err| format!("{}: {err}", root.display()))?;

    let mut workspace = Workspace::new(Arc::new(LocalFs::new()));
    workspace
        .open(&root)
        .await
        .map_err(|err| err.to_string())?;

    if let Some(session) = session.as_ref() {
        if let Err(err) = session.remember(&root) {
            tracing::warn!(error = %err, "failed to remember workspace");
        }
    }

    match args.find {
        Some(query) => {
            for path in workspace.quick_find(&query) {
                println!("{}", path.display());
            }
        }
        None => {
            println!("{}", root.display());
            for row in workspace.rows() {
                let indent = "  ".repeat(usize::from(row.depth) + 1);
                let marker = match (row.is_dir, row.is_expanded) {
                    (true, true) => "v ",
                    (true, false) => "> ",
                    (false, _) => "  ",
                };
                println!("{indent}{marker}{}", row.name);
            }
        }
    }

    for notification in workspace.notifications().items() {
        eprintln!("{}", notification.message);
    }
    workspace.close().await;
    Ok(())
}

fn main() -> ExitCode {
    let _logging = logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args, SessionStore::from_app_dir())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!(%message, "mdspace failed");
            eprintln!("mdspace: {message}");
            ExitCode::FAILURE
        }
    }
}
