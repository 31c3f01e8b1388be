// # ddriftd - DNS reconciliation daemon
//
// Thin integration layer: reads configuration, wires the capability
// adapters into the reconcile engine, runs one reconciliation, and maps
// the outcome onto a process exit code. All reconciliation logic lives in
// ddrift-core; this binary adds nothing but plumbing.
//
// ## Configuration
//
// Either a JSON config file:
//
// - `DDRIFT_CONFIG`: path to a file deserializing into ReconcileConfig
//
// or individual environment variables:
//
// ### Record
// - `DDRIFT_DOMAIN`: zone apex (e.g. example.com)
// - `DDRIFT_RECORD_NAME`: host label (e.g. home, or @ for the apex)
// - `DDRIFT_RECORD_TYPE`: A or AAAA (default A)
// - `DDRIFT_RECORD_TTL`: record TTL in seconds (default 3600)
//
// ### Detection
// - `DDRIFT_LOOKUP_URL`: public-IP echo endpoint (default icanhazip.com)
//
// ### Provider
// - `DDRIFT_PROVIDER_TYPE`: godaddy or route53
// - `DDRIFT_GODADDY_API_KEY` / `DDRIFT_GODADDY_API_SECRET`
// - `DDRIFT_ROUTE53_ZONE_ID` / `DDRIFT_AWS_ACCESS_KEY_ID` /
//   `DDRIFT_AWS_SECRET_ACCESS_KEY` / `DDRIFT_AWS_REGION` (optional)
//
// ### Escalation & guard
// - `DDRIFT_NOTIFY_EMAIL`: destination for the timeout notification
// - `DDRIFT_NOTIFY_COMMAND`: mail command (default "mail")
// - `DDRIFT_LOCK_PATH`: advisory lock file path (default in the temp dir)
//
// ### Logging
// - `DDRIFT_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export DDRIFT_DOMAIN=example.com
// export DDRIFT_RECORD_NAME=home
// export DDRIFT_PROVIDER_TYPE=godaddy
// export DDRIFT_GODADDY_API_KEY=your_key
// export DDRIFT_GODADDY_API_SECRET=your_secret
// export DDRIFT_NOTIFY_EMAIL=ops@example.com
//
// ddriftd
// ```
//
// Intended to be invoked periodically (cron, systemd timer); the exit code
// distinguishes outcomes so monitoring can alert on repeated failures.

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use ddrift_core::config::{NotifyConfig, ProviderConfig, ReconcileConfig, RecordSpec, RecordType};
use ddrift_core::{
    CommandNotifier, PidFileGuard, ProviderRegistry, ReconcileEngine, ReconcileOutcome,
};
use ddrift_dns_lookup::RecursiveDnsReader;
use ddrift_ip_http::HttpIpResolver;

/// Exit codes for the reconciliation outcomes
///
/// Success-equivalent outcomes map to 0 so a scheduler only alerts on the
/// codes that need operator attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunExitCode {
    /// AlreadyInSync, SkippedConcurrentRun, or UpdateConfirmed
    Success = 0,
    /// Configuration error (nothing was attempted)
    ConfigError = 1,
    /// Public IP or DNS record could not be determined
    DetectionFailed = 2,
    /// Update issued but never observed within the poll budget
    ConvergenceTimeout = 3,
    /// Provider or guard failure
    RuntimeError = 4,
}

impl From<RunExitCode> for ExitCode {
    fn from(code: RunExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn exit_for(outcome: ReconcileOutcome) -> RunExitCode {
    match outcome {
        ReconcileOutcome::AlreadyInSync
        | ReconcileOutcome::SkippedConcurrentRun
        | ReconcileOutcome::UpdateConfirmed => RunExitCode::Success,
        ReconcileOutcome::DetectionFailed => RunExitCode::DetectionFailed,
        ReconcileOutcome::UpdateTimedOut => RunExitCode::ConvergenceTimeout,
    }
}

/// Load configuration from a JSON file or from the environment
fn load_config() -> Result<ReconcileConfig> {
    if let Ok(path) = env::var("DDRIFT_CONFIG") {
        return load_config_file(&path);
    }
    config_from_env()
}

fn load_config_file(path: &str) -> Result<ReconcileConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path))
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| {
        anyhow::anyhow!(
            "{} is required. Set it via: export {}=...",
            key,
            key
        )
    })
}

fn parse_record_type(s: &str) -> Result<RecordType> {
    match s.to_uppercase().as_str() {
        "A" => Ok(RecordType::A),
        "AAAA" => Ok(RecordType::Aaaa),
        other => anyhow::bail!(
            "DDRIFT_RECORD_TYPE '{}' is not supported. Supported types: A, AAAA",
            other
        ),
    }
}

fn config_from_env() -> Result<ReconcileConfig> {
    let record = RecordSpec {
        domain: required("DDRIFT_DOMAIN")?,
        name: required("DDRIFT_RECORD_NAME")?,
        record_type: match env::var("DDRIFT_RECORD_TYPE") {
            Ok(s) => parse_record_type(&s)?,
            Err(_) => RecordType::A,
        },
        ttl: match env::var("DDRIFT_RECORD_TTL") {
            Ok(s) => s
                .parse()
                .with_context(|| format!("DDRIFT_RECORD_TTL '{}' is not a number", s))?,
            Err(_) => 3600,
        },
    };

    let provider = match required("DDRIFT_PROVIDER_TYPE")?.as_str() {
        "godaddy" => ProviderConfig::Godaddy {
            api_key: required("DDRIFT_GODADDY_API_KEY")?,
            api_secret: required("DDRIFT_GODADDY_API_SECRET")?,
            base_url: None,
        },
        "route53" => ProviderConfig::Route53 {
            hosted_zone_id: required("DDRIFT_ROUTE53_ZONE_ID")?,
            access_key_id: required("DDRIFT_AWS_ACCESS_KEY_ID")?,
            secret_access_key: required("DDRIFT_AWS_SECRET_ACCESS_KEY")?,
            region: env::var("DDRIFT_AWS_REGION").ok(),
        },
        other => anyhow::bail!(
            "DDRIFT_PROVIDER_TYPE '{}' is not supported. Supported providers: godaddy, route53",
            other
        ),
    };

    let notify = NotifyConfig {
        destination: required("DDRIFT_NOTIFY_EMAIL")?,
        command: env::var("DDRIFT_NOTIFY_COMMAND").unwrap_or_else(|_| "mail".to_string()),
    };

    let mut config = ReconcileConfig {
        record,
        lookup_url: env::var("DDRIFT_LOOKUP_URL")
            .unwrap_or_else(|_| "https://icanhazip.com".to_string()),
        provider,
        notify,
        lock_path: std::env::temp_dir().join("ddrift.lock"),
    };

    if let Ok(path) = env::var("DDRIFT_LOCK_PATH") {
        config.lock_path = path.into();
    }

    Ok(config)
}

fn main() -> ExitCode {
    // Load and validate configuration before touching anything else.
    let config = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return RunExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return RunExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match env::var("DDRIFT_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RunExitCode::ConfigError.into();
    }

    info!("starting ddriftd for {}", config.record.fqdn());

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RunExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match run_once(config).await {
            Ok(outcome) => {
                info!("reconciliation finished: {}", outcome);
                exit_for(outcome)
            }
            Err(e) => {
                error!("reconciliation failed: {}", e);
                RunExitCode::RuntimeError
            }
        }
    });

    code.into()
}

/// Wire the capability adapters and perform one reconciliation
async fn run_once(config: ReconcileConfig) -> ddrift_core::Result<ReconcileOutcome> {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "godaddy")]
    ddrift_provider_godaddy::register(&registry);

    #[cfg(feature = "route53")]
    ddrift_provider_route53::register(&registry);

    let provider = registry.create_provider(&config.provider)?;

    let ip_resolver = Box::new(HttpIpResolver::new(config.lookup_url.clone())?);
    let dns_reader = Box::new(RecursiveDnsReader::new(config.record.record_type));
    let guard = Box::new(PidFileGuard::new(&config.lock_path));
    let notifier = Box::new(CommandNotifier::new(config.notify.command.clone()));

    let engine = ReconcileEngine::new(ip_resolver, dns_reader, provider, guard, notifier, config)?;

    engine.run().await
}
