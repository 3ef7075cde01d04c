//! Choropleth frame example for coffeemap-rs
//!
//! Writes a tiny production table and boundary file to a scratch directory,
//! then builds the render-ready rows for one year and coffee type.

use coffeemap_rs::prelude::*;
use coffeemap_rs::DatasetEntry;
use std::fs;

const PRODUCTION: &str = "\
Country,Coffee type,2018/19,2019/20
Brazil,Arabica,40000,38000
Brazil,Robusta,15000,16000
Viet Nam,Robusta,30000,31000
Bolivia (Plurinational State of),Arabica,90,85
Atlantis,Arabica,1,1
";

const BOUNDARY: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "name": "Brazil" }, "geometry": null },
    { "type": "Feature", "properties": { "name": "Vietnam" }, "geometry": null },
    { "type": "Feature", "properties": { "ADMIN": "Bolivia" }, "geometry": null }
  ]
}"#;

fn main() -> Result<()> {
    let dir = std::env::temp_dir().join("coffeemap-demo");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("production.csv"), PRODUCTION)?;
    fs::write(dir.join("world.geojson"), BOUNDARY)?;

    let config = AtlasConfig {
        data_dir: dir,
        boundary_file: "world.geojson".into(),
        datasets: vec![DatasetEntry::new("Production", "production.csv")],
        ..AtlasConfig::default()
    };
    let ws = Workspace::new(config)?;
    let source = DatasetSource::Metric("Production".into());

    let table = ws.table(&source)?;
    println!("Years: {}", table.years().join(", "));
    let types: Vec<String> = table.coffee_types().iter().map(|t| t.to_string()).collect();
    println!("Types: {}\n", types.join(", "));

    for coffee_type in ["All", "Robusta"] {
        let selection = Selection::new("2019/20", TypeFilter::parse(coffee_type));
        let frame = ws.frame(&source, &selection)?;
        println!("{}", frame.title());
        for row in &frame.rows {
            println!(
                "  {:<34} {:>8} -> {}",
                row.country, row.value, row.plot_location
            );
        }
        println!(
            "  {} of {} countries placed on the map\n",
            frame.matched_count(),
            frame.rows.len()
        );
    }

    Ok(())
}
