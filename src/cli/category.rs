//! CLI command for listing the category taxonomy

use crate::error::FiscallyResult;
use crate::storage::JsonSnapshotStore;

/// Print the taxonomy as a two-level tree
pub fn handle_categories(store: &JsonSnapshotStore) -> FiscallyResult<()> {
    let taxonomy = store.load_taxonomy()?;

    println!("{:<20} {:<24} {:<14} {}", "ID", "Name", "Icon", "Color");
    println!("{}", "-".repeat(66));

    for parent in taxonomy.parents() {
        println!(
            "{:<20} {:<24} {:<14} {}",
            parent.id.as_str(), parent.name, parent.icon, parent.color
        );
        for child in taxonomy.children_of(&parent.id) {
            println!(
                "  {:<18} {:<24} {:<14} {}",
                child.id.as_str(), child.name, child.icon, child.color
            );
        }
    }

    Ok(())
}
