//! CLI argument parsing

use crate::io::config::{DEFAULT_CONFIG_PATH, DEFAULT_SECURE_CONFIG_PATH};
use crate::services::aggregate::DEFAULT_STATS_DIR;
use crate::services::identity::DEFAULT_KEY_FIELD;
use crate::DEFAULT_USERCACHE_PATH;

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Report(ReportArgs),
    Servers(ServersArgs),
}

/// Connection settings shared by every command that talks to the API
#[derive(Debug, Clone)]
pub struct ApiArgs {
    pub config: String,
    pub secure_config: String,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ReportArgs {
    pub api: ApiArgs,
    pub server: Option<String>,
    pub local: Option<String>,
    pub stats_dir: String,
    pub usercache: String,
    pub key_field: String,
    pub jobs: usize,
    pub best_effort: bool,
    pub skip_bad_identities: bool,
    pub strict: bool,
    pub sort: Option<String>,
    pub top: Option<usize>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct ServersArgs {
    pub api: ApiArgs,
    pub json: bool,
}

impl Default for ApiArgs {
    fn default() -> Self {
        Self {
            config: DEFAULT_CONFIG_PATH.to_string(),
            secure_config: DEFAULT_SECURE_CONFIG_PATH.to_string(),
            api_url: None,
            timeout_secs: None,
        }
    }
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            api: ApiArgs::default(),
            server: None,
            local: None,
            stats_dir: DEFAULT_STATS_DIR.to_string(),
            usercache: DEFAULT_USERCACHE_PATH.to_string(),
            key_field: DEFAULT_KEY_FIELD.to_string(),
            jobs: 1,
            best_effort: false,
            skip_bad_identities: false,
            strict: false,
            sort: None,
            top: None,
            json: false,
            quiet: false,
        }
    }
}

/// Parse command line arguments
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    let command = match args[1].as_str() {
        "report" => Command::Report(parse_report_args(&args[2..])?),
        "servers" => Command::Servers(parse_servers_args(&args[2..])?),
        _ => return Err(format!("Unknown command: {}", args[1])),
    };

    Ok(CliArgs { command })
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_positive(value: &str, flag: &str) -> Result<u64, String> {
    let parsed: u64 = value
        .parse()
        .map_err(|_| format!("{flag} must be a positive integer"))?;
    if parsed == 0 {
        return Err(format!("{flag} must be greater than zero"));
    }
    Ok(parsed)
}

/// Consume an API connection flag. Returns `false` when the flag is not one.
fn parse_api_flag(
    api: &mut ApiArgs,
    args: &[String],
    i: &mut usize,
) -> Result<bool, String> {
    match args[*i].as_str() {
        "--config" => api.config = next_value(args, i, "--config")?.to_string(),
        "--secure-config" => {
            api.secure_config = next_value(args, i, "--secure-config")?.to_string();
        }
        "--api-url" => api.api_url = Some(next_value(args, i, "--api-url")?.to_string()),
        "--timeout" => {
            let value = next_value(args, i, "--timeout")?;
            api.timeout_secs = Some(parse_positive(value, "--timeout")?);
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_report_args(args: &[String]) -> Result<ReportArgs, String> {
    let mut report = ReportArgs::default();
    let mut i = 0;

    while i < args.len() {
        if parse_api_flag(&mut report.api, args, &mut i)? {
            i += 1;
            continue;
        }

        match args[i].as_str() {
            "--server" => report.server = Some(next_value(args, &mut i, "--server")?.to_string()),
            "--local" => report.local = Some(next_value(args, &mut i, "--local")?.to_string()),
            "--stats-dir" => {
                report.stats_dir = next_value(args, &mut i, "--stats-dir")?.to_string();
            }
            "--usercache" => {
                report.usercache = next_value(args, &mut i, "--usercache")?.to_string();
            }
            "--key-field" => {
                report.key_field = next_value(args, &mut i, "--key-field")?.to_string();
            }
            "--jobs" => {
                let value = next_value(args, &mut i, "--jobs")?;
                let jobs = parse_positive(value, "--jobs")?;
                report.jobs = usize::try_from(jobs).map_err(|_| "--jobs is too large".to_string())?;
            }
            "--best-effort" => report.best_effort = true,
            "--skip-bad-identities" => report.skip_bad_identities = true,
            "--strict" => report.strict = true,
            "--sort" => report.sort = Some(next_value(args, &mut i, "--sort")?.to_string()),
            "--top" => {
                let value = next_value(args, &mut i, "--top")?;
                report.top = Some(
                    value
                        .parse()
                        .map_err(|_| "--top must be a number".to_string())?,
                );
            }
            "--json" => report.json = true,
            "--quiet" => report.quiet = true,
            other => return Err(format!("Unknown option: {other}")),
        }
        i += 1;
    }

    if report.stats_dir.trim().is_empty() {
        return Err("--stats-dir must not be empty".to_string());
    }

    Ok(report)
}

fn parse_servers_args(args: &[String]) -> Result<ServersArgs, String> {
    let mut servers = ServersArgs {
        api: ApiArgs::default(),
        json: false,
    };
    let mut i = 0;

    while i < args.len() {
        if parse_api_flag(&mut servers.api, args, &mut i)? {
            i += 1;
            continue;
        }

        match args[i].as_str() {
            "--json" => servers.json = true,
            other => return Err(format!("Unknown option: {other}")),
        }
        i += 1;
    }

    Ok(servers)
}
