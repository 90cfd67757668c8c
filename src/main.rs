//! Memo Cache - demonstration binary
//!
//! Memoizes a few small functions, calls them with repeating arguments and
//! prints the resulting cache statistics as JSON.

use anyhow::Context;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::config::DEFAULT_LOG_FILTER;
use memo_cache::{memoize, CacheStats, CallArgs, Config, ToCallArgs};

/// Keyword-style arguments for [`scale`].
struct ScaleArgs {
    a: i64,
}

impl Default for ScaleArgs {
    fn default() -> Self {
        Self { a: 1 }
    }
}

impl ToCallArgs for ScaleArgs {
    fn to_call_args(&self) -> CallArgs {
        CallArgs::new().kwarg("a", &self.a)
    }
}

fn identity(&(a,): &(i64,)) -> i64 {
    a
}

fn scale(args: &ScaleArgs) -> i64 {
    args.a * 3
}

fn sum3(&(a, b, c): &(i64, i64, i64)) -> i64 {
    a + b + c
}

/// Stats of one memoized function plus its hit rate.
fn report(stats: CacheStats) -> serde_json::Value {
    json!({
        "hit_rate": stats.hit_rate(),
        "stats": stats,
    })
}

fn main() -> anyhow::Result<()> {
    // Defaults to memo_cache=debug, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Configuration loaded: capacity={}", config.capacity);

    let mut identity = memoize(identity, config.capacity).context("memoizing identity")?;
    let mut scale = memoize(scale, config.capacity).context("memoizing scale")?;
    let mut sum3 = memoize(sum3, config.capacity).context("memoizing sum3")?;

    info!("identity(5) = {}", identity.call((5,))?);
    info!("identity(3) = {}", identity.call((3,))?);
    info!("scale(a=3) = {}", scale.call(ScaleArgs { a: 3 })?);
    info!("scale() = {}", scale.call(ScaleArgs::default())?);
    info!("identity(5) = {}", identity.call((5,))?);
    info!("sum3(1, 2, 3) = {}", sum3.call((1, 2, 3))?);
    info!("sum3(1, 2, 3) = {}", sum3.call((1, 2, 3))?);

    let summary = json!({
        "identity": report(identity.stats()),
        "scale": report(scale.stats()),
        "sum3": report(sum3.stats()),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
