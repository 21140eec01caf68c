//! `gigmate capabilities` — List the capabilities the assistant can invoke.

use gigmate_capabilities::default_registry;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = default_registry();
    let descriptors = registry.discover();

    println!("Gigmate Capabilities");
    println!("====================");
    for descriptor in &descriptors {
        println!("  {:<20} {}", descriptor.name, descriptor.description);
    }
    println!();
    println!("  {} capabilities available", descriptors.len());

    Ok(())
}
