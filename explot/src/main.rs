use std::{
    error::Error,
    fs::{
        self,
        DirEntry,
    },
    path::{
        Path,
        PathBuf,
    },
};

use clap::{
    Parser,
    ValueHint,
};
use log::{
    error,
    info,
    warn,
};
use plotters::{
    self,
    prelude::*,
};
use serde::Deserialize;

// Points kept per series.
const MAX_POINTS: usize = 800;

/// Plots the accumulated utility series written by `leduc_cfr simulate`.
#[derive(Parser)]
struct AppArgs {
    /// Each sub-directory becomes one graph with one line per CSV file.
    #[clap(long, short, value_parser, value_hint(ValueHint::DirPath), default_value = "logs")]
    logs: PathBuf,

    #[clap(long, short, value_parser, value_hint(ValueHint::DirPath), default_value = "graphs")]
    graphs: PathBuf,
}

#[derive(Deserialize)]
struct UtilityRecord {
    round: u32,
    accumulated_utility: f64,
}

type Series = (String, Vec<UtilityRecord>);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = AppArgs::parse();
    fs::create_dir_all(&args.graphs)?;
    for path in fs::read_dir(&args.logs)? {
        let path = path?;
        if !path.file_type()?.is_dir() {
            continue;
        }
        plot_dir(&path, &args.graphs)?;
    }
    Ok(())
}

fn plot_dir(dir: &DirEntry, graphs: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let series = load_series(dir);
    if series.is_empty() {
        warn!("no series in {}", dir.path().display());
        return Ok(());
    }

    let img_path = graphs.join(dir.file_name()).with_extension("svg");
    let root_area = SVGBackend::new(&img_path, (1000, 800)).into_drawing_area();
    root_area.fill(&WHITE)?;

    let (xr, yr) = series_to_range(&series);
    let caption = dir.file_name().to_string_lossy().to_string();
    let mut chart = ChartBuilder::on(&root_area)
        .caption(caption, ("sans-serif", 20).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(xr.0..xr.1, yr.0..yr.1)?;

    chart
        .configure_mesh()
        .y_desc("Accumulated utility")
        .y_label_style(("sans-serif", 18).into_font())
        .x_desc("Hands played")
        .x_label_style(("sans-serif", 18).into_font())
        .draw()?;

    for (i, (name, records)) in series.iter().enumerate() {
        let color = Palette99::pick(i).mix(0.8);
        info!("plotting: {}", name);
        chart
            .draw_series(LineSeries::new(
                records.iter().map(|r| (r.round, r.accumulated_utility)),
                color,
            ))?
            .label(name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(1))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE)
        .border_style(BLACK)
        .label_font(("sans-serif", 18).into_font())
        .draw()?;

    root_area.present()?;
    info!("{} created", img_path.display());

    Ok(())
}

fn series_to_range(series: &[Series]) -> ((u32, u32), (f64, f64)) {
    let mut xmax = 1;
    // keep the zero line visible
    let mut ymin = 0.0f64;
    let mut ymax = 0.0f64;
    for (_name, records) in series.iter() {
        for r in records.iter() {
            xmax = xmax.max(r.round);
            ymin = ymin.min(r.accumulated_utility);
            ymax = ymax.max(r.accumulated_utility);
        }
    }
    if ymin == ymax {
        ymax += 1.0;
    }
    ((0, xmax), (ymin, ymax))
}

fn load_series(dir: &DirEntry) -> Vec<Series> {
    let mut v = vec![];
    let paths = match fs::read_dir(dir.path()) {
        Ok(p) => p,
        Err(err) => {
            error!("Failed to read dir: {}", err);
            return v;
        }
    };
    for path in paths.flatten() {
        let path = path.path();
        if path.extension().map_or(true, |ext| ext != "csv") {
            continue;
        }
        match load_csv(&path) {
            Ok(records) => {
                let name = path.file_stem().unwrap_or_default().to_string_lossy().to_string();
                v.push((name, records));
            }
            Err(err) => warn!("skipping {}: {}", path.display(), err),
        }
    }
    v.sort_by(|a, b| a.0.cmp(&b.0));
    v
}

fn load_csv(path: &Path) -> Result<Vec<UtilityRecord>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut v = vec![];
    for r in reader.deserialize() {
        v.push(r?);
    }
    Ok(limit_len(v, MAX_POINTS))
}

fn limit_len(v: Vec<UtilityRecord>, max: usize) -> Vec<UtilityRecord> {
    if v.len() <= max {
        return v;
    }

    let step = v.len() as f64 / max as f64;
    let mut new_v = Vec::with_capacity(max);
    let mut next = 0.0f64;
    for (i, elem) in v.into_iter().enumerate() {
        if i as f64 >= next {
            new_v.push(elem);
            next += step;
        }
    }
    new_v
}
