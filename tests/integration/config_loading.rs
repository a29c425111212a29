//! Integration tests for layered configuration and building an aggregator from it

use super::test_utils::IsolatedEnv;
use geoctx::aggregate::ContextAggregator;
use geoctx::config::ConfigLoader;
use geoctx::error::AggregateError;
use geoctx::types::Coordinate;
use std::time::Duration;

#[test]
fn test_layers_apply_in_precedence_order() {
    let env = IsolatedEnv::new();
    let workspace = env.workspace();
    env.write(
        &env.global_config(),
        r#"
[aggregation]
cancel_grace_ms = 75
session_timeout_ms = 20000
"#,
    );
    env.write(
        &workspace.join("config").join("config.toml"),
        r#"
[aggregation]
session_timeout_ms = 12000
"#,
    );
    env.set_var("GEOCTX__AGGREGATION__SOURCE_TIMEOUT_MS", "3000");

    let config = ConfigLoader::load(&workspace).unwrap();
    assert_eq!(config.aggregation.cancel_grace_ms, 75);
    assert_eq!(config.aggregation.session_timeout_ms, 12_000);
    assert_eq!(config.aggregation.source_timeout_ms, 3_000);

    let options = config.aggregation.session_options();
    assert_eq!(options.source_timeout, Some(Duration::from_secs(3)));
    assert_eq!(options.cancel_grace, Duration::from_millis(75));
}

#[test]
fn test_disabled_sources_are_not_registered() {
    let env = IsolatedEnv::new();
    let workspace = env.workspace();
    env.write(
        &workspace.join("config").join("config.toml"),
        r#"
[sources.urban]
source_type = "static"

[sources.notams]
source_type = "http"
endpoint = "http://127.0.0.1:9/notams"
enabled = false
"#,
    );

    let config = ConfigLoader::load(&workspace).unwrap();
    let aggregator = ContextAggregator::from_config(&config).unwrap();
    let names: Vec<String> = aggregator
        .registry()
        .names()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["urban".to_string()]);
}

#[test]
fn test_invalid_source_definition_is_a_config_error() {
    let env = IsolatedEnv::new();
    let workspace = env.workspace();
    env.write(
        &workspace.join("config").join("config.toml"),
        r#"
[sources.infrastructure]
source_type = "http"
endpoint = "ftp://example.com"
"#,
    );

    let err = ConfigLoader::load(&workspace).unwrap_err();
    assert!(matches!(err, AggregateError::ConfigError(ref msg) if msg.contains("infrastructure")));
}

#[tokio::test]
async fn test_config_with_unreachable_http_source_still_aggregates() {
    let config = {
        let env = IsolatedEnv::new();
        let workspace = env.workspace();
        env.write(
            &workspace.join("config").join("config.toml"),
            r#"
[aggregation]
source_timeout_ms = 2000
session_timeout_ms = 10000

[sources.infrastructure]
source_type = "http"
endpoint = "http://127.0.0.1:9/infrastructure"
timeout_ms = 1000

[sources.urban]
source_type = "static"

[[sources.urban.records]]
id = "plaza-1"
kind = "plaza"
"#,
        );
        ConfigLoader::load(&workspace).unwrap()
    };

    let aggregate = ContextAggregator::from_config(&config)
        .unwrap()
        .aggregate(Coordinate::new(40.0, -3.7).unwrap(), 1.5)
        .await
        .unwrap();

    assert_eq!(aggregate.urban()[0].id, "plaza-1");
    assert!(aggregate.infrastructure().is_empty());
    assert_eq!(aggregate.failures().len(), 1);
}
