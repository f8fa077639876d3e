use http_resolver_config::load_config;
use http_resolver_config::shared::ResolverConfig;

/// Loads the [`ResolverConfig`] and validates it.
pub fn load_resolver_config() -> anyhow::Result<ResolverConfig> {
    let config = load_config::<ResolverConfig>()?;
    config.validate()?;

    Ok(config)
}
