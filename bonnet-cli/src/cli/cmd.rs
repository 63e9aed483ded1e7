use super::{CliErr, CliResult};
use bonnet::{
    csv::dump_table, plot, Direction, LinkLengths, LookupEntry, Model, Range, SweepEnd,
};
use ron::ser::PrettyConfig;
use serde::Serialize;
use std::{io::Write as _, path::Path};

#[derive(Serialize)]
struct Summary<'a> {
    entries: usize,
    end: SweepEnd,
    direction: Direction,
    links: &'a LinkLengths,
    range: &'a Range,
    view_box: String,
}

#[derive(Serialize)]
struct Pose<'a> {
    bonnet_angle: f64,
    input_offset: f64,
    entry: &'a LookupEntry,
    path: &'a str,
    view_box: String,
}

fn print_ron<S: Serialize>(s: &S) -> CliResult {
    let s = ron::ser::to_string_pretty(s, PrettyConfig::new())?;
    writeln!(std::io::stdout().lock(), "{s}")?;
    Ok(())
}

pub(super) fn table(model: &Model, output: Option<std::path::PathBuf>) -> CliResult {
    let csv = dump_table(model.table())?;
    match output {
        Some(path) => {
            std::fs::write(&path, csv)?;
            tracing::info!("{} entries written to {}", model.table().len(), path.display());
        }
        None => std::io::stdout().lock().write_all(csv.as_bytes())?,
    }
    Ok(())
}

pub(super) fn range(model: &Model) -> CliResult {
    let table = model.table();
    print_ron(&Summary {
        entries: table.len(),
        end: table.end(),
        direction: table.direction(),
        links: table.links(),
        range: model.range(),
        view_box: model.view_box().to_string(),
    })
}

pub(super) fn pose(mut model: Model, angle: Option<f64>, offset: Option<f64>) -> CliResult {
    let ans = match (angle, offset) {
        (_, Some(offset)) => *model.edit_input_offset(offset),
        (Some(angle), None) => *model.edit_bonnet_angle(angle),
        (None, None) => {
            tracing::info!("no control given, show the reference pose");
            *model.edit_bonnet_angle(0.)
        }
    };
    if let Some(w) = ans.write {
        tracing::debug!("synchronized {:?} to {}", w.control, w.value);
    }
    print_ron(&Pose {
        bonnet_angle: model.bonnet_angle(),
        input_offset: model.input_offset(),
        entry: model.current(),
        path: model.path(),
        view_box: model.view_box().to_string(),
    })
}

pub(super) fn plot(mut model: Model, output: &Path, curve: bool, angle: Option<f64>) -> CliResult {
    let svg = plot::SVGBackend::new(output, (1600, 1600));
    let ans = if curve {
        plot::plot_curve(svg, model.table())
    } else {
        let angle = angle.unwrap_or(model.range().max_bonnet_angle);
        model.edit_bonnet_angle(angle);
        plot::plot_linkage(svg, model.table(), model.current())
    };
    ans.map_err(|e| CliErr::Plot(e.to_string()))?;
    tracing::info!("plot saved to {}", output.display());
    Ok(())
}
