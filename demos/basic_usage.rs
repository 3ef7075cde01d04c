//! Basic usage example for coffeemap-rs
//!
//! This example demonstrates how to:
//! - Normalize country names
//! - Build a reference index from boundary region names
//! - Resolve statistics names through the exact, normalized and fuzzy tiers

use coffeemap_rs::prelude::*;
use coffeemap_rs::text::normalize;

fn main() -> Result<()> {
    println!("=== coffeemap-rs Basic Usage Example ===\n");

    println!("--- Example 1: Normalized keys ---");
    for raw in [
        "Bolivia (Plurinational State of)",
        "Côte d'Ivoire",
        "Congo, Dem. Rep. of the",
        "Trinidad & Tobago",
    ] {
        println!("{raw:<36} -> {}", normalize(raw));
    }
    println!();

    println!("--- Example 2: Resolve against region names ---");
    let index = ReferenceIndex::build([
        "United States of America",
        "Bolivia",
        "Cote d'Ivoire",
        "Vietnam",
        "Brazil",
    ]);
    let cutoff = Cutoff::new(0.7)?;
    let result = resolve(
        [
            "Brazil",
            "Bolivia (Plurinational State of)",
            "Côte d'Ivoire",
            "Viet Nam",
            "United States",
            "Atlantis",
        ],
        &index,
        cutoff,
    );
    for (raw, found) in result.iter() {
        match found {
            Some(m) => println!("{raw:<36} -> {} [{}]", m.reference, m.tier),
            None => println!("{raw:<36} -> (no region)"),
        }
    }
    println!();

    println!("--- Example 3: Tier summary ---");
    let counts = result.tier_counts();
    println!(
        "exact {}, normalized {}, fuzzy {}, unmatched {}",
        counts.exact, counts.normalized, counts.fuzzy, counts.unmatched
    );

    Ok(())
}
