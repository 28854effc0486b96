use crate::checks::{CheckError, CheckResult, GuestPowerCheck, HostTemperatureCheck};
use crate::config::{parse_log_level, Endpoint, DEFAULT_API_RELEASE};
use crate::report;
use clap::{Args, Parser};
use std::ffi::OsString;
use tracing::level_filters::LevelFilter;

/// Single-dash multi-letter flag and the long flag it stands for.
pub type LegacyFlag = (&'static str, &'static str);

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Diagnostics level on stderr: DEBUG, INFO, WARNING, ERROR or CRITICAL
    #[arg(long = "log-level", value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LevelFilter>,
    /// VI/JSON API release used in request paths
    #[arg(long, default_value = DEFAULT_API_RELEASE)]
    pub api_release: String,
    /// Verify the endpoint's TLS certificate
    #[arg(long)]
    pub verify_tls: bool,
}

impl CommonArgs {
    fn endpoint(&self, host: &str, username: &str, password: &str) -> Endpoint {
        Endpoint {
            host: host.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            api_release: self.api_release.clone(),
            verify_tls: self.verify_tls,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "check_guest_powerstate")]
#[command(version, about = "Report a guest VM's power state as a Nagios check")]
pub struct GuestPowerCli {
    /// vSphere endpoint (host[:port] or URL)
    #[arg(short = 'H', long)]
    pub hostname: String,
    #[arg(short, long)]
    pub username: String,
    #[arg(short, long)]
    pub password: String,
    /// Guest BIOS UUID
    #[arg(short = 'i', long)]
    pub uuid: String,
    #[command(flatten)]
    pub common: CommonArgs,
}

impl GuestPowerCli {
    pub const LEGACY_FLAGS: &'static [LegacyFlag] = &[("-ll", "--log-level")];

    pub fn endpoint(&self) -> Endpoint {
        self.common
            .endpoint(&self.hostname, &self.username, &self.password)
    }

    pub fn probe(&self) -> GuestPowerCheck {
        GuestPowerCheck::new(self.uuid.trim())
    }
}

#[derive(Parser, Debug)]
#[command(name = "check_host_temperature")]
#[command(version, about = "Report an ESXi host temperature sensor as a Nagios check")]
pub struct HostTemperatureCli {
    /// vCenter endpoint (host[:port] or URL)
    #[arg(long)]
    pub vcenter: String,
    #[arg(short, long)]
    pub username: String,
    #[arg(short, long)]
    pub password: String,
    /// DNS name of the ESXi host
    #[arg(long)]
    pub hostname: String,
    /// Sensor name prefix, e.g. "CPU1"
    #[arg(short = 'n', long)]
    pub sensorname: String,
    #[command(flatten)]
    pub common: CommonArgs,
}

impl HostTemperatureCli {
    pub const LEGACY_FLAGS: &'static [LegacyFlag] = &[
        ("-ll", "--log-level"),
        ("-vc", "--vcenter"),
        ("-hn", "--hostname"),
    ];

    pub fn endpoint(&self) -> Endpoint {
        self.common
            .endpoint(&self.vcenter, &self.username, &self.password)
    }

    pub fn probe(&self) -> HostTemperatureCheck {
        HostTemperatureCheck::new(self.hostname.trim(), self.sensorname.as_str())
    }
}

/// Rewrites `-ll`, `-ll=VALUE` and friends to their long forms. Tokens after
/// `--` and tokens consumed as option values are left alone.
pub fn expand_legacy_flags<I, T>(args: I, legacy: &[LegacyFlag]) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    let mut expecting_value = false;
    for (index, arg) in args.into_iter().map(Into::into).enumerate() {
        if index == 0 || passthrough || expecting_value {
            expecting_value = false;
            out.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        let mut rewritten = None;
        for (short, long) in legacy {
            if text == *short {
                rewritten = Some(OsString::from(*long));
                break;
            }
            if let Some(value) = text.strip_prefix(short).and_then(|r| r.strip_prefix('=')) {
                rewritten = Some(OsString::from(format!("{long}={value}")));
                break;
            }
        }
        let arg = rewritten.unwrap_or(arg);
        expecting_value = takes_separate_value(&arg);
        out.push(arg);
    }
    out
}

/// Every option of both probes takes a value except the boolean switches.
fn takes_separate_value(arg: &OsString) -> bool {
    let Some(text) = arg.to_str() else {
        return false;
    };
    if !text.starts_with('-') || text.contains('=') {
        return false;
    }
    if text.starts_with("--") {
        return !matches!(text, "--verify-tls" | "--help" | "--version");
    }
    text.len() == 2 && !matches!(text, "-h" | "-V")
}

pub fn parse<T: Parser>(
    args: impl IntoIterator<Item = OsString>,
    legacy: &[LegacyFlag],
) -> Result<T, clap::Error> {
    T::try_parse_from(expand_legacy_flags(args, legacy))
}

/// Parses the command line; help and version exit 0, every other argument
/// error is reported as UNKNOWN so a broken command definition never looks
/// like a CRITICAL service.
pub fn parse_or_exit<T: Parser>(
    args: impl IntoIterator<Item = OsString>,
    legacy: &[LegacyFlag],
) -> T {
    match parse(args, legacy) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            report::exit(&CheckResult::from(CheckError::Arguments(summarize(&err))))
        }
    }
}

fn summarize(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let summary = rendered
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");
    summary.trim_start_matches("error: ").to_string()
}
