//! # Products Command Implementation
//!
//! This module implements the `products` subcommand, which shows how the
//! organization's repositories group into products, as a tree.
//!
//! Only the GitHub API is used: no repository is cloned and no guideline is
//! checked, so this is a quick way to review `.tractusx` declarations.

use std::borrow::Cow;
use std::io::Write;

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, Style, TreeItem};

use trg_checks::dashboard::{Dashboard, Discovery};
use trg_checks::output::{emoji, OutputConfig};
use trg_checks::product::Product;

use super::OrganizationArgs;

/// List the products of the organization without cloning anything
#[derive(Args, Debug)]
pub struct ProductsArgs {
    #[command(flatten)]
    pub organization: OrganizationArgs,

    /// Also list repositories that declare no product.
    #[arg(long)]
    pub unhandled: bool,
}

/// Execute the `products` command.
pub fn execute(args: ProductsArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config = args.organization.to_config()?;
    let dashboard = Dashboard::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to set up dashboard: {}", e))?;

    println!(
        "{} Products of {}",
        emoji(&out, "🌳", "[TREE]"),
        config.organization
    );
    let discovery = dashboard.discover_products();

    let tree = build_tree(&config.organization, &discovery, args.unhandled);
    print_tree(&tree).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    println!(
        "{} products, {} repositories without product metadata",
        discovery.products.len(),
        discovery.unhandled_repositories.len()
    );
    Ok(())
}

fn product_label(product: &Product) -> String {
    if product.has_leading_declaration() {
        format!("{} ({})", product.name, product.leading_repo)
    } else {
        "<leading repository does not declare itself>".to_string()
    }
}

/// Build the display tree: organization, then products, then members.
fn build_tree(organization: &str, discovery: &Discovery, include_unhandled: bool) -> TreeNode {
    let mut children: Vec<TreeNode> = discovery
        .products
        .iter()
        .map(|product| TreeNode {
            label: product_label(product),
            children: product
                .repositories
                .iter()
                .map(|repo| TreeNode::leaf(format!("{} ({})", repo.name, repo.url)))
                .collect(),
        })
        .collect();

    if include_unhandled && !discovery.unhandled_repositories.is_empty() {
        children.push(TreeNode {
            label: "unhandled".to_string(),
            children: discovery
                .unhandled_repositories
                .iter()
                .map(|repo| TreeNode::leaf(repo.name.clone()))
                .collect(),
        });
    }

    TreeNode {
        label: organization.to_string(),
        children,
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: vec![],
        }
    }
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: Write>(&self, f: &mut W, _style: &Style) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}
