use std::io::Write;

use crate::error::AppResult;
use crate::metrics::{AggregateSummary, Quantiles, Spread, TrialSummary};
use crate::sweep::SweepObserver;

const BANNER_WIDTH: usize = 60;

/// Streams the sweep to a writer as it happens.
pub struct TextReport<W: Write> {
    out: W,
    trials: usize,
}

impl<W: Write> TextReport<W> {
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out, trials: 0 }
    }

    /// Prints the one-line run header shown before the first level.
    ///
    /// # Errors
    ///
    /// Returns an error when the writer fails.
    pub fn header(&mut self, model: &str, endpoint: &str) -> AppResult<()> {
        writeln!(self.out, "Using model: {} at {}", model, endpoint)?;
        Ok(())
    }

    /// Separates consecutive sweeps in continuous mode.
    ///
    /// # Errors
    ///
    /// Returns an error when the writer fails.
    pub fn sweep_separator(&mut self, sweep: usize) -> AppResult<()> {
        writeln!(self.out, "\n{}", "=".repeat(BANNER_WIDTH))?;
        writeln!(self.out, "Sweep {} complete", sweep)?;
        self.out.flush()?;
        Ok(())
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SweepObserver for TextReport<W> {
    fn level_started(&mut self, concurrency: usize, trials: usize) -> AppResult<()> {
        self.trials = trials;
        let banner = "=".repeat(BANNER_WIDTH);
        writeln!(self.out, "\n{}", banner)?;
        writeln!(self.out, "Concurrency Level: {}", concurrency)?;
        writeln!(self.out, "{}", banner)?;
        self.out.flush()?;
        Ok(())
    }

    fn trial_completed(&mut self, summary: &TrialSummary) -> AppResult<()> {
        writeln!(self.out, "\n--- Run {}/{} ---", summary.trial, self.trials)?;
        writeln!(
            self.out,
            "Batch completed in {:.2}s",
            summary.batch_time.as_secs_f64()
        )?;
        match summary.stats {
            None => writeln!(
                self.out,
                "  No successful requests ({} failed)",
                summary.failed()
            )?,
            Some(stats) => {
                writeln!(
                    self.out,
                    "  Successful requests: {}/{}",
                    summary.successful, summary.requests
                )?;
                writeln!(self.out, "  TTFT  - {}", spread_secs(&stats.ttft))?;
                writeln!(self.out, "  Total - {}", spread_secs(&stats.total_time))?;
                writeln!(
                    self.out,
                    "  TPS   - min: {:.1}, median: {:.1}, max: {:.1}",
                    stats.tps.min, stats.tps.median, stats.tps.max
                )?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn level_completed(&mut self, aggregate: &AggregateSummary) -> AppResult<()> {
        writeln!(
            self.out,
            "\n--- Aggregate Statistics (all {} runs) ---",
            aggregate.trials
        )?;
        match aggregate.stats {
            None => writeln!(self.out, "  No successful requests")?,
            Some(stats) => {
                writeln!(
                    self.out,
                    "  Successful requests: {}/{}",
                    aggregate.successful, aggregate.requests
                )?;
                writeln!(self.out, "  TTFT  - {}", quantile_secs(&stats.ttft))?;
                writeln!(self.out, "  Total - {}", quantile_secs(&stats.total_time))?;
                writeln!(
                    self.out,
                    "  TPS   - p50: {:.1}, p95: {:.1}, min: {:.1}, max: {:.1}",
                    stats.tps.p50, stats.tps.p95, stats.tps.min, stats.tps.max
                )?;
                if stats.sparse {
                    writeln!(
                        self.out,
                        "  Note: only {} samples, p95 is unreliable",
                        stats.samples
                    )?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

fn spread_secs(spread: &Spread) -> String {
    format!(
        "min: {:.3}s, median: {:.3}s, max: {:.3}s",
        spread.min, spread.median, spread.max
    )
}

fn quantile_secs(quantiles: &Quantiles) -> String {
    format!(
        "p50: {:.3}s, p95: {:.3}s, min: {:.3}s, max: {:.3}s",
        quantiles.p50, quantiles.p95, quantiles.min, quantiles.max
    )
}
