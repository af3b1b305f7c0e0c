use std::fs;
use std::path::Path;

use anyhow::Context;
use chef_core::{Ingredient, Recipe};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RecipeFile {
    id: String,
    title: String,
    /// Authored serving count; 0 or missing shows amounts unscaled.
    #[serde(default)]
    servings: u32,
    #[serde(default)]
    ingredients: Vec<IngredientEntry>,
    steps: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IngredientEntry {
    name: String,
    amount: String,
}

pub fn load_recipe(path: &Path) -> anyhow::Result<Recipe> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading recipe {}", path.display()))?;
    parse_recipe(&content).with_context(|| format!("parsing recipe {}", path.display()))
}

fn parse_recipe(content: &str) -> anyhow::Result<Recipe> {
    let file: RecipeFile = ron::from_str(content)?;
    if file.steps.is_empty() {
        anyhow::bail!("recipe has no steps");
    }
    Ok(Recipe {
        id: file.id,
        title: file.title,
        servings: file.servings,
        ingredients: file
            .ingredients
            .into_iter()
            .map(|entry| Ingredient {
                name: entry.name,
                amount: entry.amount,
            })
            .collect(),
        steps: file.steps,
    })
}
