//! Playtime CLI (playtime) - Main binary entry point

use playtime::cli::args::{ApiArgs, Command, ReportArgs, ServersArgs, parse_args};
use playtime::cli::output::{
    format_issues, format_json, format_servers_json, format_servers_text, format_text,
};
use playtime::io::config::{Config, load_config};
use playtime::services::remote::api::{ApiClient, ClientOptions};
use playtime::services::remote::local::LocalFiles;
use playtime::services::report::{SortBy, sort_and_limit};
use playtime::services::select::{Selection, select_server};
use playtime::{
    AggregateOptions, FailurePolicy, MissingFieldPolicy, RemoteFiles, ReportOptions,
};
use std::process;
use std::str::FromStr;
use std::time::Duration;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug playtime report
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    // Parse arguments
    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    // Execute command
    let exit_code = match &cli_args.command {
        Command::Report(report_args) => handle_report(report_args),
        Command::Servers(servers_args) => handle_servers(servers_args),
    };

    process::exit(exit_code);
}

fn exit_code_for(err: &playtime::Error) -> i32 {
    match err {
        playtime::Error::InvalidInput(_) | playtime::Error::Config(_) => 2,
        _ => 4,
    }
}

/// Load configuration and build an authenticated client
fn connect(api: &ApiArgs) -> Result<(Config, ApiClient), playtime::Error> {
    let config = load_config(&api.config, &api.secure_config)?;

    let mut opts = ClientOptions::default();
    if let Some(url) = &api.api_url {
        opts.base_url.clone_from(url);
    }
    if let Some(secs) = api.timeout_secs {
        opts.timeout = Duration::from_secs(secs);
    }

    let client = ApiClient::new(config.api_key().unwrap_or_default(), &opts)?;
    Ok((config, client))
}

fn handle_report(args: &ReportArgs) -> i32 {
    // Parse sort
    let sort_by = match args.sort.as_deref().map(SortBy::from_str).transpose() {
        Ok(sort) => sort,
        Err(e) => {
            eprintln!("{e}");
            return 2;
        }
    };

    let opts = ReportOptions {
        usercache_path: args.usercache.clone(),
        key_field: args.key_field.clone(),
        identity_policy: if args.skip_bad_identities {
            MissingFieldPolicy::SkipAndWarn
        } else {
            MissingFieldPolicy::Fail
        },
        aggregate: AggregateOptions {
            stats_dir: args.stats_dir.clone(),
            jobs: args.jobs,
            policy: if args.best_effort {
                FailurePolicy::BestEffort
            } else {
                FailurePolicy::FailFast
            },
        },
    };

    if let Some(root) = &args.local {
        let files = match LocalFiles::new(root) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error: {e}");
                return 2;
            }
        };
        let server_id = args.server.as_deref().unwrap_or("local");
        if !args.quiet {
            eprintln!("Checking playtime in local directory: {}", files.root().display());
        }
        return run_report(&files, server_id, args, &opts, sort_by);
    }

    let (config, client) = match connect(&args.api) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    // Validate the credential before anything else
    let account = match client.account() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error in accessing exaroton API - check if API key is valid");
            eprintln!("  {e}");
            return 4;
        }
    };
    if !args.quiet {
        eprintln!(
            "Accessing exaroton API through account: {} - {}",
            account.name, account.email
        );
    }

    let servers = match client.servers() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return 4;
        }
    };

    let configured = args.server.as_deref().or(config.server_id());
    let server = match select_server(servers, configured) {
        Ok(Selection::Only(server)) => {
            if !args.quiet {
                eprintln!("Found exactly 1 server in exaroton account - proceeding with it");
            }
            server
        }
        Ok(Selection::Configured(server)) => server,
        Ok(Selection::Ambiguous(servers)) => {
            eprintln!(
                "Multiple servers associated with this exaroton account, set SERVER_ID in {} or pass --server",
                args.api.config
            );
            eprint!("{}", format_servers_text(&servers));
            return 2;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    if !args.quiet {
        eprintln!("Checking playtime for server \"{}\"", server.name);
        eprintln!("  IP: {}", server.address);
        eprintln!("  ID: {}", server.id);
    }

    run_report(&client, &server.id, args, &opts, sort_by)
}

fn run_report(
    files: &dyn RemoteFiles,
    server_id: &str,
    args: &ReportArgs,
    opts: &ReportOptions,
    sort_by: Option<SortBy>,
) -> i32 {
    let mut report = match playtime::generate_playtime_report(files, server_id, opts) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    if args.strict && !report.issues.is_empty() {
        eprint!("{}", format_issues(&report));
        if let Err(e) = report.into_strict() {
            eprintln!("Error: {e}");
        }
        return 3;
    }

    let lines = sort_and_limit(std::mem::take(&mut report.lines), sort_by, args.top);

    if args.json {
        println!("{}", format_json(&report, &lines));
    } else {
        print!("{}", format_text(&lines));
    }

    if !report.issues.is_empty() {
        eprint!("{}", format_issues(&report));
        return 3; // Partial failure
    }

    if !args.quiet {
        eprintln!("Reported {} player(s)", lines.len());
    }
    0
}

fn handle_servers(args: &ServersArgs) -> i32 {
    let (_, client) = match connect(&args.api) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    match client.servers() {
        Ok(servers) if args.json => {
            println!("{}", format_servers_json(&servers));
            0
        }
        Ok(servers) => {
            print!("{}", format_servers_text(&servers));
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code_for(&e)
        }
    }
}

fn print_help() {
    println!("Playtime CLI (playtime) - Report player playtime for an exaroton server");
    println!();
    println!("USAGE:");
    println!("    playtime report [OPTIONS]");
    println!("    playtime servers [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    report    Download world/stats and print each player's total playtime");
    println!("    servers   List the servers of the configured exaroton account");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    -h, --help                 Show this help message");
    println!("    -v, --version              Show version information");
    println!();
    println!("CONNECTION OPTIONS:");
    println!("    --config <FILE>           Primary config (default: config.json)");
    println!("    --secure-config <FILE>    Secure config filling blank keys (default: secure/secure_config.json)");
    println!("    --api-url <URL>           Override the API base URL");
    println!("    --timeout <S>             Per-request timeout in seconds (default: 30)");
    println!();
    println!("REPORT OPTIONS:");
    println!("    --server <ID>             Server to report on (overrides SERVER_ID)");
    println!("    --local <DIR>             Read files from a local world directory instead of the API");
    println!("    --stats-dir <PATH>        Stats directory (default: world/stats)");
    println!("    --usercache <PATH>        Identity source (default: usercache.json)");
    println!("    --key-field <FIELD>       Identity key field (default: uuid)");
    println!("    --jobs <N>                Concurrent stats downloads (default: 1)");
    println!("    --best-effort             Skip stats files that fail to download or parse");
    println!("    --skip-bad-identities     Skip user cache records missing uuid/name");
    println!("    --strict                  Treat any per-player issue as fatal");
    println!("    --sort <FIELD>            Sort by playtime|name|uuid (default: listing order)");
    println!("    --top <K>                 Show only the first K players");
    println!("    --json                    Emit machine-readable output");
    println!("    --quiet                   Suppress non-error output");
    println!();
    println!("EXAMPLES:");
    println!("    playtime report");
    println!("    playtime report --server 1a2b3c4d --sort playtime --top 10");
    println!("    playtime report --local ./server --json");
    println!("    RUST_LOG=debug playtime report --jobs 8");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_DATE: &str = env!("GIT_DATE");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("playtime {VERSION}");
    println!("Commit: {GIT_HASH} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
