use std::process::ExitCode;

use http_resolver::error::ResolverError;
use http_resolver_config::shared::ResolverConfig;
use http_resolver_telemetry::init_tracing;
use tracing::error;

use crate::config::load_resolver_config;
use crate::core::resolve_with_config;

mod config;
mod core;

/// Exit code of failures that left the cluster partially mutated.
const FATAL_EXIT_CODE: u8 = 2;

fn main() -> anyhow::Result<ExitCode> {
    // Load resolver config
    let resolver_config = load_resolver_config()?;

    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"))?;

    // Both kube and reqwest speak rustls, so the process-wide provider must be picked up front.
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        anyhow::bail!("failed to install default crypto provider");
    }

    // We start the runtime.
    let exit_code = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(resolver_config));

    Ok(exit_code)
}

async fn async_main(resolver_config: ResolverConfig) -> ExitCode {
    let Err(err) = resolve_with_config(resolver_config).await else {
        return ExitCode::SUCCESS;
    };

    let fatal = err
        .downcast_ref::<ResolverError>()
        .is_some_and(ResolverError::is_process_fatal);
    error!(fatal, "an error occurred in the resolver: {err:#}");

    if fatal {
        ExitCode::from(FATAL_EXIT_CODE)
    } else {
        ExitCode::FAILURE
    }
}
