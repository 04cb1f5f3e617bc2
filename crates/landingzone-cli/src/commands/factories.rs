use colored::Colorize;
use landingzone::DefinitionRegistry;

pub fn handle() {
    let registry = DefinitionRegistry::new();

    println!("{}", "Landing zone factories".bold());
    println!();
    for factory in registry.list_factories() {
        let versions: Vec<_> = factory
            .supported_versions
            .iter()
            .map(|v| v.to_string())
            .collect();
        println!(
            "  {} {}",
            factory.identifier.cyan().bold(),
            format!("[{}]", versions.join(", ")).dimmed()
        );
        println!("    {}", factory.display_name);
        println!("    {}", factory.description.dimmed());
    }
}
