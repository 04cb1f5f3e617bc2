use super::Context;
use colored::Colorize;
use landingzone::{DeployedResource, ResourcePurpose, SubnetResourcePurpose, tags};

pub async fn handle(
    context: &Context,
    id: Option<&str>,
    purpose: Option<ResourcePurpose>,
    subnet_purpose: Option<SubnetResourcePurpose>,
) -> anyhow::Result<()> {
    let reader = match id {
        Some(id) => context.manager.reader().for_landing_zone(id),
        None => context.manager.reader(),
    };

    context.print_header();

    if let Some(subnet_purpose) = subnet_purpose {
        let vnets = reader.list_vnet_with_subnet_purpose(subnet_purpose).await?;
        if vnets.is_empty() {
            println!("{}", "No matching virtual networks".dimmed());
        }
        for vnet in vnets {
            println!("{}", vnet.resource_id.bold());
            for (purpose, subnet) in &vnet.subnets_by_purpose {
                println!("  {} {}", format!("{}:", purpose).dimmed(), subnet.name.cyan());
            }
        }
        return Ok(());
    }

    let resources = match purpose {
        Some(purpose) => reader.list_resources_by_purpose(purpose).await?,
        None => reader.list_landing_zone_resources().await?,
    };

    if resources.is_empty() {
        println!("{}", "No landing zone resources found".dimmed());
    }
    for resource in &resources {
        print_resource(resource);
    }
    Ok(())
}

fn print_resource(resource: &DeployedResource) {
    let owner = tags::landing_zone_id(&resource.tags).unwrap_or("-");
    let purpose = tags::resource_purpose(&resource.tags)
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{} {} {}",
        resource.name().bold(),
        format!("[{}]", owner).cyan(),
        purpose.dimmed()
    );
    println!("  {}", resource.resource_type.dimmed());
}
