#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually, the way the rest of the binary keeps its surface
//! small. Every option can also come from an `ASSET_HUNTER_*` environment
//! variable; explicit flags win.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use asset_hunter_core::{JsonFileSource, MockSource, ScanSource, ScanType, TargetSource};
use ftui_runtime::MouseCapturePolicy;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Asset Hunter: scan for, list, and value forgotten digital assets

USAGE:
    asset-hunter [OPTIONS]

OPTIONS:
    --screen-mode=MODE     Screen mode: 'alt' (default) or 'inline'
    --ui-height=N          UI height in rows for inline mode (default: 24)
    --scan-latency-ms=N    Simulated scan latency (default: 2000)
    --source=SPEC          Scan source (default: mock)
                             mock
                             target:<url>[:github|chrome|all]
                             file:<path to JSON array of records>
    --report-dir=PATH      Directory for exported reports (default: .)
    --log-file=PATH        Write tracing output to PATH
    --no-mouse             Disable mouse event capture
    --help, -h             Show this help message
    --version, -V          Show version

KEYBINDINGS:
    s               Initiate system scan
    x               Cancel the running scan
    Arrows / j k    Move card focus
    Enter           Analyze focused card
    o               Reopen the valuation drawer
    e               Export the open valuation
    Esc             Close drawer or overlay
    u               Toggle account menu
    ?               Toggle help overlay
    q / Ctrl+C      Quit

ENVIRONMENT VARIABLES:
    ASSET_HUNTER_SCREEN_MODE        Override --screen-mode (alt|inline)
    ASSET_HUNTER_UI_HEIGHT          Override --ui-height
    ASSET_HUNTER_SCAN_LATENCY_MS    Override --scan-latency-ms
    ASSET_HUNTER_SOURCE             Override --source
    ASSET_HUNTER_REPORT_DIR         Override --report-dir
    ASSET_HUNTER_LOG_FILE           Override --log-file
    ASSET_HUNTER_LOG                Log filter directive (default: info)
    ASSET_HUNTER_EXIT_AFTER_MS      Auto-quit after N milliseconds (for testing)";

/// How the program occupies the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenModeOpt {
    Alt,
    Inline,
}

impl ScreenModeOpt {
    fn parse(flag: &'static str, value: &str) -> Result<Self, OptsError> {
        match value {
            "alt" | "altscreen" => Ok(Self::Alt),
            "inline" => Ok(Self::Inline),
            _ => Err(OptsError::InvalidValue {
                flag,
                value: value.to_string(),
            }),
        }
    }
}

/// Where scans get their records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Mock,
    Target { url: String, scan_type: ScanType },
    File(PathBuf),
}

impl SourceSpec {
    /// Parse `mock`, `target:<url>[:github|chrome|all]`, or `file:<path>`.
    pub fn parse(value: &str) -> Result<Self, OptsError> {
        if value == "mock" {
            return Ok(Self::Mock);
        }
        if let Some(path) = value.strip_prefix("file:") {
            if path.is_empty() {
                return Err(OptsError::InvalidSource(value.to_string()));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if let Some(rest) = value.strip_prefix("target:") {
            // The url itself may contain ':', so only a recognized suffix counts.
            let (url, scan_type) = match rest.rsplit_once(':') {
                Some((url, suffix)) => match suffix.parse::<ScanType>() {
                    Ok(scan_type) => (url, scan_type),
                    Err(_) => (rest, ScanType::All),
                },
                None => (rest, ScanType::All),
            };
            if url.trim().is_empty() {
                return Err(OptsError::InvalidSource(value.to_string()));
            }
            return Ok(Self::Target {
                url: url.to_string(),
                scan_type,
            });
        }
        Err(OptsError::InvalidSource(value.to_string()))
    }

    pub fn build(&self) -> Arc<dyn ScanSource> {
        match self {
            Self::Mock => Arc::new(MockSource),
            Self::Target { url, scan_type } => Arc::new(TargetSource::new(url.clone(), *scan_type)),
            Self::File(path) => Arc::new(JsonFileSource::new(path.clone())),
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mock => f.write_str("mock"),
            Self::Target { url, scan_type } => write!(f, "target:{url}:{}", scan_type.as_str()),
            Self::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// Invalid command-line or environment configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptsError {
    InvalidValue { flag: &'static str, value: String },
    InvalidSource(String),
    UnknownArgument(String),
}

impl fmt::Display for OptsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptsError::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            OptsError::InvalidSource(value) => write!(
                f,
                "Invalid --source value: {value} (expected mock, target:<url>[:type], or file:<path>)"
            ),
            OptsError::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for OptsError {}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub screen_mode: ScreenModeOpt,
    /// UI height for inline mode.
    pub ui_height: u16,
    /// Delay before a scan reports back.
    pub scan_latency: Duration,
    pub source: SourceSpec,
    /// Directory exported reports are written into.
    pub report_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub mouse: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            screen_mode: ScreenModeOpt::Alt,
            ui_height: 24,
            scan_latency: asset_hunter_core::DEFAULT_SCAN_LATENCY,
            source: SourceSpec::Mock,
            report_dir: PathBuf::from("."),
            log_file: None,
            mouse: true,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, value: &str) -> Result<T, OptsError> {
    value.parse().map_err(|_| OptsError::InvalidValue {
        flag,
        value: value.to_string(),
    })
}

impl Opts {
    /// Runtime mouse capture for the `--no-mouse` setting.
    pub fn mouse_capture_policy(&self) -> MouseCapturePolicy {
        if self.mouse {
            MouseCapturePolicy::Auto
        } else {
            MouseCapturePolicy::Off
        }
    }

    /// Parse process arguments and environment variables.
    ///
    /// Prints help or version and exits 0 when asked; prints the error and
    /// exits 1 on invalid input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(|key| env::var(key).ok(), args) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("asset-hunter {VERSION}");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("{e}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse from an explicit environment lookup and argument list.
    ///
    /// Environment values are applied first, then flags override them.
    pub fn parse_from<E, I>(env_lookup: E, args: I) -> Result<Parsed, OptsError>
    where
        E: Fn(&str) -> Option<String>,
        I: IntoIterator<Item = String>,
    {
        let mut opts = Self::default();

        if let Some(val) = env_lookup("ASSET_HUNTER_SCREEN_MODE") {
            opts.screen_mode = ScreenModeOpt::parse("ASSET_HUNTER_SCREEN_MODE", &val)?;
        }
        if let Some(val) = env_lookup("ASSET_HUNTER_UI_HEIGHT") {
            opts.ui_height = parse_number("ASSET_HUNTER_UI_HEIGHT", &val)?;
        }
        if let Some(val) = env_lookup("ASSET_HUNTER_SCAN_LATENCY_MS") {
            let ms: u64 = parse_number("ASSET_HUNTER_SCAN_LATENCY_MS", &val)?;
            opts.scan_latency = Duration::from_millis(ms);
        }
        if let Some(val) = env_lookup("ASSET_HUNTER_SOURCE") {
            opts.source = SourceSpec::parse(&val)?;
        }
        if let Some(val) = env_lookup("ASSET_HUNTER_REPORT_DIR") {
            opts.report_dir = PathBuf::from(val);
        }
        if let Some(val) = env_lookup("ASSET_HUNTER_LOG_FILE") {
            opts.log_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env_lookup("ASSET_HUNTER_EXIT_AFTER_MS") {
            opts.exit_after_ms = parse_number("ASSET_HUNTER_EXIT_AFTER_MS", &val)?;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--no-mouse" => opts.mouse = false,
                other => {
                    if let Some(val) = other.strip_prefix("--screen-mode=") {
                        opts.screen_mode = ScreenModeOpt::parse("--screen-mode", val)?;
                    } else if let Some(val) = other.strip_prefix("--ui-height=") {
                        opts.ui_height = parse_number("--ui-height", val)?;
                    } else if let Some(val) = other.strip_prefix("--scan-latency-ms=") {
                        let ms: u64 = parse_number("--scan-latency-ms", val)?;
                        opts.scan_latency = Duration::from_millis(ms);
                    } else if let Some(val) = other.strip_prefix("--source=") {
                        opts.source = SourceSpec::parse(val)?;
                    } else if let Some(val) = other.strip_prefix("--report-dir=") {
                        opts.report_dir = PathBuf::from(val);
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = parse_number("--exit-after-ms", val)?;
                    } else {
                        return Err(OptsError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Parsed::Run(opts))
    }
}
