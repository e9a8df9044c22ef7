// category.rs - Category subcommands: tree, options, verify, add, delete.

use bc_api::{CategoryApi, CategoryDelete, CategoryService, CategoryWrite};
use bc_taxonomy::{flatten_tree, Category, CategoryId, CategoryTreeNode};
use clap::Subcommand;

use super::print_json;

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Show the category tree.
    Tree {
        /// Only include active categories.
        #[arg(long)]
        active_only: bool,
        /// Print the tree as nested by the server instead of locally.
        #[arg(long)]
        server: bool,
    },
    /// List parent-category options as a selector would show them.
    Options {
        /// Category being edited; it is left out of the options.
        #[arg(long)]
        exclude: Option<CategoryId>,
        #[arg(long)]
        active_only: bool,
    },
    /// Check stored parent links for loops. Exits non-zero if any exist.
    Verify,
    /// Create a category.
    Add {
        name: String,
        slug: String,
        /// Parent category ID.
        #[arg(long)]
        parent: Option<CategoryId>,
        /// Position among siblings (lower first).
        #[arg(long, default_value_t = 0)]
        order: i32,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a category. Refused while other categories sit under it.
    Delete { id: CategoryId },
}

pub async fn execute<A: CategoryApi>(
    cmd: &CategoryCommands,
    service: &CategoryService<A>,
    json: bool,
) -> anyhow::Result<()> {
    match cmd {
        CategoryCommands::Tree {
            active_only,
            server,
        } => {
            let tree = if *server {
                service.api().category_tree(*active_only).await?
            } else {
                service.snapshot(*active_only).await?.tree
            };
            if json {
                return print_json(&tree);
            }
            if tree.is_empty() {
                println!("No categories found.");
            }
            print_tree(&tree);
            Ok(())
        }
        CategoryCommands::Options {
            exclude,
            active_only,
        } => {
            let options = service.snapshot(*active_only).await?.options(*exclude);
            if json {
                return print_json(&options);
            }
            println!("{:<8} {}", "ID", "CATEGORY");
            println!("{}", "-".repeat(48));
            for entry in &options {
                println!("{:<8} {}", entry.id(), entry.full_path);
            }
            Ok(())
        }
        CategoryCommands::Verify => {
            let snapshot = service.snapshot(false).await?;
            if json {
                print_json(&snapshot.cycles)?;
            } else if snapshot.cycles.is_empty() {
                println!(
                    "{} categories checked, no parent loops.",
                    snapshot.categories.len()
                );
            } else {
                println!("Parent loops found:");
                for cycle in &snapshot.cycles {
                    let path: Vec<String> = cycle.iter().map(|id| id.to_string()).collect();
                    println!("  {}", path.join(" -> "));
                }
            }
            if !snapshot.cycles.is_empty() {
                std::process::exit(1);
            }
            Ok(())
        }
        CategoryCommands::Add {
            name,
            slug,
            parent,
            order,
            description,
        } => {
            let mut category = Category::new(0, name.as_str(), slug.as_str()).with_order(*order);
            category.parent_id = *parent;
            category.description = description.clone();

            match service.save(&category).await? {
                CategoryWrite::Saved(saved) => {
                    if json {
                        return print_json(&saved);
                    }
                    println!("Category created: {} ({})", saved.id, saved.name);
                    Ok(())
                }
                CategoryWrite::Rejected(reasons) => {
                    if json {
                        print_json(&reasons)?;
                    } else {
                        println!("Category not saved:");
                        for reason in &reasons {
                            println!("  - {}", reason);
                        }
                    }
                    anyhow::bail!("category '{}' was rejected", slug)
                }
            }
        }
        CategoryCommands::Delete { id } => match service.delete(*id).await? {
            CategoryDelete::Deleted(id) => {
                if json {
                    return print_json(&serde_json::json!({ "deleted": id }));
                }
                println!("Category deleted: {}", id);
                Ok(())
            }
            CategoryDelete::Rejected(reasons) => {
                if json {
                    print_json(&reasons)?;
                } else {
                    println!("Category not deleted:");
                    for reason in &reasons {
                        println!("  - {}", reason);
                    }
                }
                anyhow::bail!("delete of category {} was rejected", id)
            }
        },
    }
}

fn print_tree(nodes: &[CategoryTreeNode]) {
    for entry in flatten_tree(nodes, 0) {
        let c = &entry.category;
        println!(
            "{}{} [{}] ({} posts){}",
            "  ".repeat(entry.level),
            c.name,
            c.slug,
            c.post_count,
            if c.is_active { "" } else { " inactive" }
        );
    }
}
