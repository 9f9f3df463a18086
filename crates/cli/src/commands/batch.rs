//! `batch`: nearest land for every point in a file.
//!
//! Input is one point per line, `lat,lon` or `lat lon`. Blank lines and
//! lines starting with `#` are skipped. The dataset is loaded once and
//! queried serially; the first failing line aborts the run.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use dist2land_geo::QueryPoint;

use super::common::{render, AppContext, QueryArgs};

pub fn run(ctx: &AppContext, input: &Path, args: &QueryArgs) -> Result<()> {
    let reader: Box<dyn BufRead> = if input == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
        Box::new(BufReader::new(file))
    };

    let search = ctx.search()?;
    let (provider_id, mut land) = ctx.open_dataset(&args.provider)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut answered = 0usize;

    for (number, line) in reader.lines().enumerate() {
        let line_no = number + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;

        let Some(parsed) = parse_line(&line) else {
            continue;
        };
        let (lat, lon) = parsed.with_context(|| format!("line {}", line_no))?;
        let query = QueryPoint::new(lat, lon).with_context(|| format!("line {}", line_no))?;

        let result = search
            .find_nearest_land(query, &mut land, &provider_id)
            .with_context(|| format!("line {}", line_no))?;
        writeln!(out, "{}", render(query, &result, args)?)?;
        answered += 1;
    }

    out.flush()?;
    tracing::info!("Answered {} queries", answered);
    Ok(())
}

/// Parse one input line into `(lat, lon)`. `None` for blank and comment lines.
pub fn parse_line(line: &str) -> Option<Result<(f64, f64)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();

    Some(match fields.as_slice() {
        [lat, lon] => parse_coordinate(lat, "latitude")
            .and_then(|lat| Ok((lat, parse_coordinate(lon, "longitude")?))),
        _ => Err(anyhow!("expected \"lat,lon\", got {:?}", line)),
    })
}

fn parse_coordinate(field: &str, what: &str) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| anyhow!("invalid {} {:?}", what, field))
}
