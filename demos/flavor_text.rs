/// Landmark generator demo — the kind of outline this crate was built for.
///
/// Run with: cargo run --example flavor_text

use rolltable::core::engine::{Roll, RollEngine};

const OUTLINE: &str = "\
landmark
  natural
    Series of small waterfalls
    Small \"empty\" lake
    Reflective ponds
    Glacier holding [1-3] frozen statues
    Bird hill, [2-6] migratory flocks circling
  manmade
    Grounded pirate ship
    Offensive statue
    Large well
    Floating boulder
    Statue of a [famous|forgotten|despised] hero
    Sacred sanctuary, rest-free for [1-4] days
color
  yellow
  blue
rumor
  a [color] light was seen over the [landmark]
  treasure worth [100-600] gold buried near the [landmark]
";

fn main() {
    let mut engine = RollEngine::from_text(OUTLINE).with_seed(2026);

    println!("Tables: {}\n", engine.tables().collect::<Vec<_>>().join(", "));

    println!("-- landmarks --");
    for _ in 0..5 {
        match engine.roll("landmark") {
            // Multi-segment rolls keep the category: "manmade / Large well".
            Ok(Roll::Path(segments)) => println!("  {}", segments.join(" / ")),
            Ok(Roll::Text(text)) => println!("  {}", text),
            Err(e) => eprintln!("  roll failed: {}", e),
        }
    }

    println!("\n-- rumors --");
    for _ in 0..5 {
        match engine.roll("rumor") {
            Ok(roll) => println!("  {}", roll),
            Err(e) => eprintln!("  roll failed: {}", e),
        }
    }
}
