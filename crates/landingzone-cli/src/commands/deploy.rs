use super::Context;
use colored::Colorize;
use futures_util::StreamExt;
use landingzone::DefinitionVersion;

pub async fn handle(
    context: &Context,
    id: &str,
    factory: &str,
    version: &DefinitionVersion,
) -> anyhow::Result<()> {
    context.print_header();
    println!(
        "{} {} {}",
        "Deploying".bold(),
        id.cyan().bold(),
        format!("({}@{})", factory, version).dimmed()
    );

    let mut stream = Box::pin(
        context
            .manager
            .deploy_landing_zone_stream(id, factory, version)?,
    );

    let mut deployed = 0;
    while let Some(result) = stream.next().await {
        match result {
            Ok(resource) => {
                deployed += 1;
                println!(
                    "  {} {} {}",
                    "✓".green(),
                    resource.name().bold(),
                    format!("({})", resource.resource_type).dimmed()
                );
            }
            Err(e) => {
                println!("  {} {}", "✗".red(), e);
                println!();
                println!(
                    "{}",
                    format!(
                        "{} resource(s) were created before the failure; deploying again resumes from there",
                        deployed
                    )
                    .yellow()
                );
                return Err(e.into());
            }
        }
    }

    println!();
    println!("{}", format!("{} resource(s) deployed", deployed).green());
    Ok(())
}
