use anyhow::Result;

use famenu_core::service::MenuService;

pub(crate) fn cmd_audit(service: &MenuService, json: bool) -> Result<()> {
    let audit = service.catalog().audit();

    if json {
        println!("{}", serde_json::to_string_pretty(&audit)?);
        return Ok(());
    }

    if audit.is_clean() {
        println!("Catalog is complete: every dish resolves to ingredients");
        return Ok(());
    }

    if !audit.unmapped_dishes.is_empty() {
        println!(
            "Dishes with no ingredient mapping ({}):",
            audit.unmapped_dishes.len()
        );
        for id in &audit.unmapped_dishes {
            println!("  {id}");
        }
    }
    if !audit.dangling_ingredients.is_empty() {
        println!(
            "Ingredient ids missing from the catalog ({}):",
            audit.dangling_ingredients.len()
        );
        for id in &audit.dangling_ingredients {
            println!("  {id}");
        }
    }
    Ok(())
}
