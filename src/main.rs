use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;

use daily_bias::config::Config;
use daily_bias::feed::LiveFeed;
use daily_bias::logging::{self, log_fatal, log_startup};
use daily_bias::{pipeline, report};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    log_startup(&cfg.symbol, &cfg.output_path, cfg.event_policy.is_enabled());

    let today = Utc::now().with_timezone(&cfg.tz).date_naive();
    let feed = LiveFeed::new(&cfg);

    let outcome = match pipeline::run(&feed, &cfg, today).await {
        Ok(outcome) => outcome,
        Err(err) => {
            log_fatal("acquire_failed", &err.to_string());
            logging::flush();
            return Err(err).context("cannot compute daily bias");
        }
    };

    let written = report::publish(Path::new(&cfg.output_path), &outcome.report)
        .with_context(|| format!("writing {}", cfg.output_path));
    if let Err(err) = &written {
        log_fatal("report_failed", &format!("{:#}", err));
    }
    logging::flush();
    written
}
