use crate::OutputMode;
use namegraph::config::{write_config, NamegraphConfig};
use namegraph::ui::{self, Icons};
use namegraph::{Manifest, ResolutionReport, ResolveOptions};
use std::path::Path;

pub struct ResolveSettings {
    pub options: ResolveOptions,
    pub filler: char,
    pub strict: bool,
}

pub fn run_resolve(manifest_path: &Path, settings: &ResolveSettings, output_mode: OutputMode) -> anyhow::Result<()> {
    tracing::info!("Resolving {}", manifest_path.display());
    let manifest = Manifest::load(manifest_path)?;
    let built = manifest.build_with(settings.filler)?;
    let resolution = built.resolve(settings.options)?;
    let report = ResolutionReport::new(&built, &resolution);

    if output_mode.is_human() {
        ui::header(&format!("Resolved {}", manifest_path.display()));
        let table = ui::assignment_table(&report);
        if !table.is_empty() {
            println!("{}", table);
        }
        ui::summary_row("Named:", &report.assignments.len().to_string());
        ui::summary_row("Rounds:", &report.rounds.to_string());

        if report.complete {
            ui::success("Every entity has a name");
        } else {
            ui::warn(&format!("{} entities could not be named", report.unresolved.len()));
            println!("{}", ui::unresolved_table(&report));
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if settings.strict && !report.complete {
        anyhow::bail!(
            "resolution stalled: {} unnamed entities (dependency cycle or unreachable forbidden namespace)",
            report.unresolved.len()
        );
    }
    Ok(())
}

pub fn run_check(manifest_path: &Path) -> anyhow::Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let built = match manifest.build() {
        Ok(built) => built,
        Err(e) => {
            ui::error(&e.to_string());
            return Err(e.into());
        }
    };

    ui::header(&format!("{} {}", Icons::FILE, manifest_path.display()));
    let namespaces = built.graph.namespace_count().to_string();
    let entities = built.graph.named_count().to_string();
    let roots = built.roots.len().to_string();
    let namers = manifest.namers.len().to_string();
    let dependencies = built
        .graph
        .named()
        .map(|named| named.dependencies().len())
        .sum::<usize>()
        .to_string();
    println!(
        "{}",
        ui::stats_table(&[
            ("Namespaces", namespaces.as_str()),
            ("Roots", roots.as_str()),
            ("Entities", entities.as_str()),
            ("Declared namers", namers.as_str()),
            ("Dependency edges", dependencies.as_str()),
        ])
    );
    ui::info(&format!("{} Valid", Icons::LINK), &ui::dim("all references resolve"));
    Ok(())
}

pub fn run_init(path: &Path, force: bool) -> anyhow::Result<()> {
    let config = NamegraphConfig {
        filler: Some(namegraph::CountingNamer::DEFAULT_FILLER),
        guard_own_namespace: Some(ResolveOptions::default().guard_own_namespace),
        strict: Some(false),
    };
    write_config(path, &config, force)?;
    ui::success(&format!("Wrote {}", path.display()));
    Ok(())
}
