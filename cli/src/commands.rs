use std::io::Write;
use std::path::Path;

use rezwatch_core::context::{AppConfigExt, highlight_colors, resolve};
use rezwatch_core::observer::{IdleSource, ObservationMode, Scenario, ScriptedSource};
use rezwatch_core::pipeline::{TickReport, TrackerConfig};
use rezwatch_core::status::StatusList;

use crate::CliContext;

pub fn load_scenario(path: &str, ctx: &mut CliContext) -> Result<(), String> {
    let scenario = Scenario::load(Path::new(path)).map_err(|e| format!("{e}\n"))?;

    let catalog = scenario
        .statuses
        .iter()
        .map(|status| (status.id, status.name.clone()));
    let config = TrackerConfig::from_app_config(&ctx.latest_app_config(), catalog);

    println!(
        "loaded {} ticks, {} statuses ({} monitored, {} ignored) from {}",
        scenario.total_ticks(),
        config.status_set.len(),
        config.status_set.enabled().count(),
        config.status_set.disabled().count(),
        path
    );
    tracing::info!(path, ticks = scenario.total_ticks(), "Scenario loaded");

    ctx.pipeline.apply_config(config);
    ctx.pipeline.reset();
    ctx.source = Some(ScriptedSource::new(scenario));
    Ok(())
}

/// Run up to `count` ticks. Returns the number actually run.
pub fn tick(ctx: &mut CliContext, count: u32) -> Result<u32, String> {
    let mut ran = 0;
    for _ in 0..count {
        let Some(report) = tick_once(ctx)? else {
            break;
        };
        print_report(&report);
        ran += 1;
    }
    if ran < count {
        println!("scenario finished after {ran} tick(s)");
    }
    Ok(ran)
}

/// Run the rest of the loaded scenario, then show the result
pub fn run(ctx: &mut CliContext) -> Result<(), String> {
    if ctx.source.is_none() {
        return Err("error: no scenario loaded (use `load --path <file>`)\n".to_string());
    }
    let mut ran = 0;
    let mut issues = 0;
    while let Some(report) = tick_once(ctx)? {
        ran += 1;
        issues += report.noteworthy_issues().count();
    }
    println!("ran {ran} tick(s), {issues} issue(s)");
    show(ctx);
    Ok(())
}

fn tick_once(ctx: &mut CliContext) -> Result<Option<TickReport>, String> {
    if let ObservationMode::Synthetic(_) = ctx.pipeline.mode() {
        let timestamp = ctx.advance_idle_clock();
        return Ok(Some(ctx.pipeline.tick(&IdleSource { timestamp })));
    }

    let Some(source) = ctx.source.as_mut() else {
        return Err(
            "error: no scenario loaded (use `load --path <file>` or `test-mode`)\n".to_string(),
        );
    };
    if source.is_finished() {
        return Ok(None);
    }
    let report = ctx.pipeline.tick(&*source);
    source.advance();
    Ok(Some(report))
}

fn print_report(report: &TickReport) {
    println!(
        "tick {:>4} @ {}  actors: {}  events: {}  highlighted: {}{}",
        report.tick,
        report.timestamp.format("%H:%M:%S%.3f"),
        report.resolved,
        report.events.len(),
        report.highlighted,
        if report.config_applied {
            "  (config applied)"
        } else {
            ""
        }
    );
    for issue in report.noteworthy_issues() {
        println!("    ! {issue}");
    }
}

pub fn show(ctx: &CliContext) {
    let rows = ctx.pipeline.debug_rows();
    if rows.is_empty() {
        println!("No tracked actors");
        return;
    }

    println!(
        "{:<8} {:<20} {:<16} {:<17} {:<10} Casts",
        "Actor", "Name", "Raise", "Dispel", "Frame"
    );
    println!("{}", "-".repeat(90));

    for row in rows {
        let frame = ctx
            .pipeline
            .render(row.actor)
            .and_then(|desc| desc.frame_color())
            .map(highlight_colors::to_hex)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<20} {:<16} {:<17} {:<10} {}",
            row.actor.to_string(),
            row.name,
            row.raise,
            row.dispel,
            frame,
            row.casts
        );
    }

    for desc in ctx.pipeline.render_all() {
        for highlight in [&desc.raise, &desc.dispel].into_iter().flatten() {
            let Some(casters) = &highlight.caster_name_text else {
                continue;
            };
            println!("  {}: {} by {}", desc.name, highlight.label, casters);
        }
    }
}

pub fn set_test_mode(state: &str, ctx: &mut CliContext) -> Result<(), String> {
    let mode: ObservationMode = state.parse().map_err(|e| format!("error: {e}\n"))?;
    ctx.pipeline.set_mode(mode);
    println!("test mode: {mode}");
    Ok(())
}

pub fn list_statuses(ctx: &CliContext, filter: &str, disabled: bool) {
    let config = ctx.pipeline.latest_config();
    let list = if disabled {
        StatusList::Disabled
    } else {
        StatusList::Enabled
    };
    let entries = config.status_set.visible_entries(list, filter);
    if entries.is_empty() {
        println!("No statuses");
        return;
    }
    for entry in &entries {
        println!("{:>8}  {}", entry.id, entry.name);
    }
    println!("\nTotal: {} ({:?})", entries.len(), list);
}

pub fn swap_status(id: u32, ctx: &mut CliContext) -> Result<(), String> {
    if ctx.pipeline.latest_config().status_set.list_of(id).is_none() {
        return Err(format!("error: unknown status id {id}\n"));
    }
    let mut moved = None;
    ctx.pipeline.update_config(|config| moved = config.status_set.swap(id));
    if let Some(list) = moved {
        println!("status {id} moved to {list:?} (applies next tick)");
    }
    Ok(())
}

pub fn enable_all(ctx: &mut CliContext) {
    ctx.pipeline
        .update_config(|config| config.status_set.clear_disabled_list());
    println!("all statuses monitored (applies next tick)");
}

pub fn disable_all(ctx: &mut CliContext) {
    ctx.pipeline
        .update_config(|config| config.status_set.clear_enabled_list());
    println!("all statuses ignored (applies next tick)");
}

pub fn show_config(ctx: &CliContext) -> Result<(), String> {
    let text = toml::to_string_pretty(&ctx.latest_app_config()).map_err(|e| e.to_string())?;
    println!("{text}");
    match rezwatch_core::context::AppConfig::config_path() {
        Ok(path) => println!("# {}", path.display()),
        Err(e) => tracing::debug!(error = %e, "Config path unavailable"),
    }
    Ok(())
}

/// Persist the current settings. Disabled ids that the loaded catalog does
/// not know about are kept as they were.
pub fn save(ctx: &mut CliContext) -> Result<(), String> {
    let latest = ctx.pipeline.latest_config();
    let mut config = latest.to_app_config();
    config.disabled_statuses.extend(
        ctx.config
            .disabled_statuses
            .iter()
            .filter(|id| latest.status_set.list_of(**id).is_none()),
    );
    config.disabled_statuses.sort_unstable();
    config.disabled_statuses.dedup();

    config.save().map_err(|e| format!("error: {e}\n"))?;
    tracing::info!(disabled = config.disabled_statuses.len(), "Configuration saved");
    ctx.config = config;
    println!("configuration saved");
    Ok(())
}

/// Describe a single actor by name (case-insensitive)
pub fn inspect(name: &str, ctx: &CliContext) -> Result<(), String> {
    let needle = name.to_lowercase();
    let Some(classification) = ctx
        .pipeline
        .classifications()
        .find(|c| resolve(c.name).to_lowercase() == needle)
    else {
        return Err(format!("error: no tracked actor named '{name}'\n"));
    };
    let Some(desc) = ctx.pipeline.render(classification.actor) else {
        return Ok(());
    };
    println!("{:#?}", desc);
    Ok(())
}

pub fn exit() -> Result<(), String> {
    write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}
