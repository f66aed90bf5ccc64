use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use engine_logging::{engine_error, engine_info, engine_warn};
use harvester_engine::{
    numbered_listing, write_url_list, ChromiumDriver, HarvestError, HarvestOutcome, HarvestStatus,
    Harvester, LogProgressSink,
};
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;
use crate::config::{self, AppConfig};
use crate::logging;

/// Exit code for runs that ended before the feed was exhausted.
const PARTIAL_EXIT: u8 = 2;

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    if cli.print_config {
        println!("{}", config::to_ron(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    logging::initialize(cli.verbose, config.log_file.as_deref());

    let harvester = Harvester::new(config.harvest.clone()).context("invalid harvest settings")?;
    watch_ctrl_c(harvester.cancellation_token());

    let mut driver = ChromiumDriver::launch(&config.browser)
        .await
        .context("launching browser")?;

    if !cli.no_prompt {
        wait_for_user().await?;
    }

    let started = Local::now();
    let result = harvester.run(&mut driver, &LogProgressSink).await;
    let elapsed = Local::now() - started;
    let finished = finish(result, &config, elapsed.num_seconds());

    if config.linger_secs > 0 {
        engine_info!("Closing the browser in {} seconds...", config.linger_secs);
        tokio::time::sleep(Duration::from_secs(config.linger_secs)).await;
    }
    driver.close().await;

    Ok(if finished?.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(PARTIAL_EXIT)
    })
}

/// Reports and saves whatever the run collected, then surfaces a lost session.
fn finish(
    result: Result<HarvestOutcome, HarvestError>,
    config: &AppConfig,
    elapsed_secs: i64,
) -> Result<HarvestStatus> {
    let outcome = match &result {
        Ok(outcome) => outcome,
        Err(err) => err.partial(),
    };
    engine_info!(
        "{} after {} cycles in {}s",
        outcome.status,
        outcome.cycles,
        elapsed_secs
    );
    report(outcome, config)?;

    let outcome = result.context("harvest interrupted")?;
    Ok(outcome.status)
}

fn report(outcome: &HarvestOutcome, config: &AppConfig) -> Result<()> {
    if outcome.urls.is_empty() {
        println!("No item links found.");
        return Ok(());
    }

    println!(
        "\n--- Total of {} unique item links found ---",
        outcome.urls.len()
    );
    for line in numbered_listing(&outcome.urls) {
        println!("{line}");
    }

    let path = write_url_list(&config.output, &outcome.urls)
        .with_context(|| format!("writing {}", config.output.display()))?;
    println!("\nLinks saved to {}", path.display());

    if !outcome.status.is_complete() {
        engine_warn!("Run ended early ({}); the list may be incomplete", outcome.status);
    }
    Ok(())
}

/// The user logs in and opens the feed by hand before harvesting starts.
async fn wait_for_user() -> Result<()> {
    println!("Log in and navigate to the feed you want to harvest.");
    print!("Press Enter when the feed is on screen and ready... ");
    io::stdout().flush()?;

    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map(|_| ())
    })
    .await
    .context("waiting for user input")??;
    Ok(())
}

fn watch_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                engine_warn!("Interrupt received, stopping after the current cycle");
                cancel.cancel();
            }
            Err(err) => engine_error!("Could not listen for Ctrl-C: {err}"),
        }
    });
}
