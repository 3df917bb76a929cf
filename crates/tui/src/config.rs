use crate::app::runtime::Endpoint;
use crate::error::ConfigError;
use std::env;
use std::io::Write;
use std::path::PathBuf;

const DEFAULT_HOST_CMD: &str = "node";
const DEFAULT_HOST_ARGS: &str = "host/index.js";
const DEFAULT_RESOURCE: &str = "simple-dialogs";
const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_LOG_FILE: &str = "simple-dialogs.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host_command: String,
    pub host_args: Vec<String>,
    pub endpoint: Endpoint,
    pub log_filter: String,
    pub log_file: PathBuf,
    pub alt_screen: bool,
}

pub fn parse_bool_like(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_truthy(value: Option<&str>) -> Option<bool> {
    value.map(|value| parse_bool_like(value).unwrap_or(false))
}

pub fn split_args(value: &str) -> Vec<String> {
    match shell_words::split(value) {
        Ok(parts) => parts.into_iter().filter(|part| !part.is_empty()).collect(),
        Err(error) => {
            if !cfg!(test) {
                let _ = writeln!(
                    std::io::stderr(),
                    "[simple-dialogs] host args parse warning ({error}); \
                     falling back to whitespace split"
                );
            }
            value.split_whitespace().map(str::to_string).collect()
        }
    }
}

fn validate_endpoint(value: &str) -> Result<Endpoint, ConfigError> {
    let valid = ["http://", "https://"]
        .iter()
        .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme));
    if !valid {
        return Err(ConfigError::InvalidEndpoint {
            value: value.to_string(),
        });
    }
    Ok(Endpoint::new(value))
}

/// Reads `--flag value` or `--flag=value`.
fn flag_value(
    arg: &str,
    flag: &'static str,
    rest: &mut impl Iterator<Item = String>,
) -> Result<Option<String>, ConfigError> {
    if let Some(value) = arg
        .strip_prefix(flag)
        .and_then(|tail| tail.strip_prefix('='))
    {
        return Ok(Some(value.to_string()));
    }
    if arg != flag {
        return Ok(None);
    }
    match rest.next() {
        Some(value) if !value.starts_with("--") => Ok(Some(value)),
        _ => Err(ConfigError::MissingValue { flag }),
    }
}

pub fn parse_config() -> Result<Config, ConfigError> {
    parse_config_from_args(env::args().skip(1), |key| env::var(key).ok())
}

/// Flags win over environment variables, which win over defaults.
pub fn parse_config_from_args(
    args: impl IntoIterator<Item = impl AsRef<str>>,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let mut host_command = env_lookup("SIMPLE_DIALOGS_HOST_CMD");
    let mut host_args = env_lookup("SIMPLE_DIALOGS_HOST_ARGS");
    let mut log_file = env_lookup("SIMPLE_DIALOGS_LOG_FILE").map(PathBuf::from);
    let mut alt_screen =
        env_truthy(env_lookup("SIMPLE_DIALOGS_ALT_SCREEN").as_deref()).unwrap_or(true);
    let mut resource: Option<String> = None;
    let mut endpoint: Option<String> = None;

    let mut args = args.into_iter().map(|arg| arg.as_ref().to_string());
    while let Some(arg) = args.next() {
        if let Some(value) = flag_value(&arg, "--host-cmd", &mut args)? {
            host_command = Some(value);
        } else if let Some(value) = flag_value(&arg, "--host-args", &mut args)? {
            host_args = Some(value);
        } else if let Some(value) = flag_value(&arg, "--resource", &mut args)? {
            resource = Some(value);
        } else if let Some(value) = flag_value(&arg, "--endpoint", &mut args)? {
            endpoint = Some(value);
        } else if let Some(value) = flag_value(&arg, "--log-file", &mut args)? {
            log_file = Some(PathBuf::from(value));
        } else if arg == "--alt-screen" {
            alt_screen = true;
        } else if arg == "--no-alt-screen" {
            alt_screen = false;
        } else if let Some(value) = arg.strip_prefix("--alt-screen=") {
            alt_screen = parse_bool_like(value).unwrap_or(false);
        }
    }

    let host_command = host_command.unwrap_or_else(|| DEFAULT_HOST_CMD.to_string());
    if host_command.trim().is_empty() {
        return Err(ConfigError::EmptyHostCommand);
    }
    let endpoint = match (endpoint, resource) {
        (Some(url), _) => validate_endpoint(url.trim())?,
        (None, Some(name)) if name.trim().is_empty() => return Err(ConfigError::EmptyResource),
        (None, Some(name)) => Endpoint::for_resource(name.trim()),
        (None, None) => Endpoint::for_resource(DEFAULT_RESOURCE),
    };

    Ok(Config {
        host_command,
        host_args: split_args(host_args.as_deref().unwrap_or(DEFAULT_HOST_ARGS)),
        endpoint,
        log_filter: env_lookup("SIMPLE_DIALOGS_LOG")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        log_file: log_file.unwrap_or_else(|| env::temp_dir().join(DEFAULT_LOG_FILE)),
        alt_screen,
    })
}
