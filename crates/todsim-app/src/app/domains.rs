use anyhow::{anyhow, Result};
use colored::Colorize;

use todsim_types::{Domain, DomainInfo, ModelKind};

/// Print the domain catalog, or the details of one domain
pub fn list_domains(name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            let domain = Domain::parse(name).ok_or_else(|| {
                anyhow!("Invalid domain: {}. Available domains: hotel, restaurant, flight", name)
            })?;
            print!("{}", describe(domain.info()));
        }
        None => {
            println!("{}", "Domains:".bright_cyan().bold());
            for domain in Domain::all() {
                let info = domain.info();
                println!("  {:<12} {}", info.name.bold(), info.title);
            }
            println!("\n{}", "Models:".bright_cyan().bold());
            for model in ModelKind::all() {
                println!("  {}", model.as_str());
            }
        }
    }
    Ok(())
}

/// Multi-line description of a domain
pub fn describe(info: &DomainInfo) -> String {
    let mut out = format!("{} ({})\n{}\n\nIntents:\n", info.title, info.name, info.description);
    for (intent, meaning) in info.intents {
        out.push_str(&format!("  {:<20} {}\n", intent, meaning));
    }
    out.push_str("\nSlots:\n");
    for (slot, intents) in info.slots {
        out.push_str(&format!("  {:<20} {}\n", slot, intents.join(", ")));
    }
    out.push_str("\nActions:\n");
    for (action, slots) in info.actions {
        out.push_str(&format!("  {:<20} {}\n", action, slots.join(", ")));
    }
    out
}
