//! `distance`: nearest land to a single point.

use anyhow::Result;

use dist2land_geo::QueryPoint;

use super::common::{render, AppContext, QueryArgs};

pub fn run(ctx: &AppContext, lat: f64, lon: f64, args: &QueryArgs) -> Result<()> {
    let query = QueryPoint::new(lat, lon)?;
    let search = ctx.search()?;
    let (provider_id, mut land) = ctx.open_dataset(&args.provider)?;

    let result = search.find_nearest_land(query, &mut land, &provider_id)?;
    println!("{}", render(query, &result, args)?);
    Ok(())
}
