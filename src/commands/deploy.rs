//! `capstan deploy` - run the convergence pipeline against one host

use std::path::Path;

use anyhow::Result;

use capstan::{
    pipeline, ConsoleEventSink, DeployEventSink, Deployment, JsonEventSink, SshTransport,
};

pub fn run(
    host: Option<String>,
    config_path: &Path,
    dry_run: bool,
    json: bool,
    verbose: u8,
) -> Result<()> {
    let (config, spec, host, warnings) = super::load(host, config_path)?;
    super::print_warnings(&warnings, json);

    let transport = SshTransport::new(host.as_str());
    let supervisor = super::supervisor_for(&config, &transport);

    if dry_run {
        let plan = pipeline::plan::plan(&spec, &transport, &supervisor)?;
        render_plan(&plan, &host, json);
        return Ok(());
    }

    let sink: Box<dyn DeployEventSink> = if json {
        Box::new(JsonEventSink::stdout())
    } else {
        Box::new(ConsoleEventSink::new(verbose))
    };

    let summary = Deployment::new(&spec, &transport, &supervisor, sink.as_ref()).run()?;

    if !json && verbose > 0 {
        println!(
            "{} convergence steps ran against {}",
            summary.steps_run, host
        );
    }

    Ok(())
}

fn render_plan(plan: &pipeline::plan::DeployPlan, host: &str, json: bool) {
    if json {
        for change in &plan.changes {
            println!(
                "{}",
                serde_json::json!({
                    "event": "plan",
                    "item": change.label,
                    "dest": change.dest.display().to_string(),
                    "state": change.kind.as_str(),
                })
            );
        }
        println!(
            "{}",
            serde_json::json!({
                "event": "plan_summary",
                "will_stop_service": plan.will_stop_service,
                "link_current": plan.link_current,
            })
        );
        return;
    }

    println!("Plan for {} (nothing will be written):", host);
    for change in &plan.changes {
        println!(
            "  {:<9} {} -> {}",
            change.kind.as_str(),
            change.label,
            change.dest.display()
        );
    }
    if plan.link_current {
        println!("  unchanged data link");
    } else {
        println!("  repair    data link");
    }
    if plan.will_stop_service {
        println!("  service would be stopped before the binary is replaced");
    } else {
        println!("  first deployment: no service to stop");
    }
}
