use std::io::Stdout;
use std::sync::Arc;

use tracing::info;

use crate::args::OutputFormat;
use crate::bench::RequestDispatcher;
use crate::error::AppResult;
use crate::http::{HttpSessionFactory, SessionFactory};
use crate::report::{LogObserver, RunDocument, TextReport, export_json, render_json};
use crate::sweep::{SweepController, SweepObserver, SweepReport};
use crate::system::shutdown::SweepInterrupt;

use super::types::SweepPlan;

/// Where progress goes while the sweep runs.
enum Progress {
    Text(TextReport<Stdout>),
    Log(LogObserver),
}

impl Progress {
    fn observer(&mut self) -> &mut dyn SweepObserver {
        match self {
            Progress::Text(report) => report,
            Progress::Log(log) => log,
        }
    }
}

pub(crate) async fn execute_plan(plan: SweepPlan) -> AppResult<()> {
    let SweepPlan {
        config,
        continuous,
        output_format,
        output,
    } = plan;

    let factory: Arc<dyn SessionFactory> = Arc::new(HttpSessionFactory::new(
        config.endpoint.clone(),
        config.request_timeout,
    ));
    let dispatcher = RequestDispatcher::new(factory, &config.model, &config.prompt);
    let controller = SweepController::new(dispatcher, &config.levels, config.trials);

    let mut progress = match output_format {
        OutputFormat::Text => {
            let mut report = TextReport::new(std::io::stdout());
            report.header(&config.model, config.endpoint.as_str())?;
            Progress::Text(report)
        }
        OutputFormat::Json => Progress::Log(LogObserver::default()),
    };
    info!(
        "Sweeping {} at concurrency {} ({} runs per level)",
        config.endpoint,
        config.levels,
        config.trials.get()
    );

    let interrupt = SweepInterrupt::listen();
    let mut interrupted = interrupt.subscribe();

    let mut sweeps: Vec<SweepReport> = Vec::new();
    loop {
        let sweep = tokio::select! {
            result = controller.run(progress.observer()) => result?,
            _ = interrupted.recv() => break,
        };
        sweeps.push(sweep);
        if !continuous {
            break;
        }
        if let Progress::Text(report) = &mut progress {
            report.sweep_separator(sweeps.len())?;
        }
    }

    interrupt.stop().await;

    let document = RunDocument {
        endpoint: config.endpoint.as_str(),
        model: &config.model,
        prompt: &config.prompt,
        trials_per_level: config.trials.get(),
        sweeps: &sweeps,
    };
    if output_format == OutputFormat::Json {
        println!("{}", render_json(&document)?);
    }
    if let Some(path) = output.as_deref() {
        export_json(path, &document).await?;
        info!("Wrote results to {}", path);
    }
    Ok(())
}
