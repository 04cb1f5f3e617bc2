use super::Context;
use colored::Colorize;
use landingzone::DefinitionVersion;

pub fn handle(
    context: &Context,
    id: &str,
    factory: &str,
    version: &DefinitionVersion,
    json: bool,
) -> anyhow::Result<()> {
    let plan = context.manager.plan_landing_zone(id, factory, version)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    context.print_header();
    println!(
        "{} {} {} {}",
        "Plan for".bold(),
        id.cyan().bold(),
        "using".bold(),
        format!("{}@{}", factory, version).cyan()
    );
    println!();

    for resource in &plan.resources {
        println!("  {} {}", "+".green(), resource.name.bold());
        println!("      {} {}", "type:".dimmed(), resource.resource_type);
        if let Some(purpose) = resource.purpose {
            println!("      {} {}", "purpose:".dimmed(), purpose);
        }
        for (purpose, subnet) in &resource.subnet_purposes {
            println!("      {} {} -> {}", "subnet:".dimmed(), purpose, subnet);
        }
    }

    println!();
    println!("{}", plan.summary().to_string().green());
    Ok(())
}
