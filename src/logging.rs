use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
fn default_filter(env: &Environment) -> &'static str {
    match env {
        Environment::Dev | Environment::Staging => "blueprintx_estimator=debug,info",
        Environment::Prod => "blueprintx_estimator=info,warn",
    }
}

pub fn init_logging(env: &Environment) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    // stdout carries the estimate JSON, so logs go to stderr
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    if matches!(env, Environment::Prod) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .init();
    }

    tracing::info!("Logging initialized for {:?} environment", env);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prod_logs_less_than_other_environments() {
        assert_eq!(default_filter(&Environment::Dev), default_filter(&Environment::Staging));
        assert_eq!(default_filter(&Environment::Prod), "blueprintx_estimator=info,warn");
    }
}
