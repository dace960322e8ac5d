use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use vshell::console::run_console;
use vshell::loader::load_archive;
use vshell::server::Server;
use vshell::{AuditLog, Result, ShellError, ShellErrorType, Shell};

#[derive(Parser)]
#[clap(version, about)]
struct Opts {
    /// Hostname shown in the prompt
    #[clap(long)]
    hostname: String,
    /// Tar archive holding the virtual file system
    #[clap(long, alias = "fs_path")]
    fs_path: PathBuf,
    /// Where to write the audit log
    #[clap(long, alias = "log_path")]
    log_path: PathBuf,
    /// Serve sessions over TCP on this address instead of the console
    #[clap(short, long)]
    listen: Option<String>,
    #[clap(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let opts: Opts = Opts::parse();
    let _guard = match vshell::log::init_logging(opts.debug) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("vshell: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match run(opts).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("vshell: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(opts: Opts) -> Result<()> {
    let vfs = Arc::new(load_archive(&opts.fs_path)?);
    let audit = AuditLog::create(&opts.log_path)?;

    match opts.listen {
        Some(addr) => {
            let audit = Arc::new(Mutex::new(audit));
            let server = Server::bind(&addr, vfs, audit, &opts.hostname).await?;
            println!("Listening on {}", server.local_addr()?);
            server.start().await
        }
        None => {
            let hostname = opts.hostname;
            tokio::task::spawn_blocking(move || {
                let mut shell = Shell::new(vfs, audit, &hostname);
                let stdin = std::io::stdin();
                run_console(&mut shell, stdin.lock(), &mut std::io::stdout())
            })
            .await
            .map_err(|e| ShellError::new(ShellErrorType::IOError, e.to_string()))?
        }
    }
}
