use anyhow::Result;
use diesel::prelude::*;
use std::collections::HashSet;
use sweetie_server::schema::{
    comments, favorites, ingredients, ratings, recipe_ingredients, recipes, users,
};

/// Rows whose foreign keys point at parents that no longer exist. The
/// schema has no cascades, so a parent deleted outside the app leaves
/// these behind.
#[derive(Debug, Default, PartialEq)]
pub struct OrphanReport {
    /// (recipe id, title, missing user id)
    pub orphaned_recipes: Vec<(i32, String, i32)>,
    /// (link id, recipe id, ingredient id) with a missing recipe or ingredient
    pub dangling_links: Vec<(i32, i32, i32)>,
}

impl OrphanReport {
    pub fn is_empty(&self) -> bool {
        self.orphaned_recipes.is_empty() && self.dangling_links.is_empty()
    }
}

/// Pure scan over loaded rows; separated from the queries so it can be
/// tested without a database.
fn scan(
    user_ids: &HashSet<i32>,
    ingredient_ids: &HashSet<i32>,
    recipe_rows: &[(i32, String, i32)],
    link_rows: &[(i32, i32, i32)],
) -> OrphanReport {
    let recipe_ids: HashSet<i32> = recipe_rows.iter().map(|(id, _, _)| *id).collect();

    let orphaned_recipes = recipe_rows
        .iter()
        .filter(|(_, _, user_id)| !user_ids.contains(user_id))
        .cloned()
        .collect();

    let dangling_links = link_rows
        .iter()
        .filter(|(_, recipe_id, ingredient_id)| {
            !recipe_ids.contains(recipe_id) || !ingredient_ids.contains(ingredient_id)
        })
        .cloned()
        .collect();

    OrphanReport {
        orphaned_recipes,
        dangling_links,
    }
}

pub fn report(conn: &mut PgConnection) -> Result<OrphanReport> {
    let user_ids: HashSet<i32> = users::table.select(users::id).load(conn)?.into_iter().collect();
    let ingredient_ids: HashSet<i32> = ingredients::table
        .select(ingredients::id)
        .load(conn)?
        .into_iter()
        .collect();

    let recipe_rows: Vec<(i32, String, i32)> = recipes::table
        .select((recipes::id, recipes::title, recipes::user_id))
        .load(conn)?;

    let link_rows: Vec<(i32, i32, i32)> = recipe_ingredients::table
        .select((
            recipe_ingredients::id,
            recipe_ingredients::recipe_id,
            recipe_ingredients::ingredient_id,
        ))
        .load(conn)?;

    Ok(scan(&user_ids, &ingredient_ids, &recipe_rows, &link_rows))
}

/// Deletes an orphaned recipe with its dependents, same order as the
/// web handler's delete.
fn delete_recipe_with_dependents(conn: &mut PgConnection, recipe_id: i32) -> QueryResult<()> {
    conn.transaction(|conn| {
        diesel::delete(
            recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
        )
        .execute(conn)?;
        diesel::delete(comments::table.filter(comments::recipe_id.eq(recipe_id)))
            .execute(conn)?;
        diesel::delete(ratings::table.filter(ratings::recipe_id.eq(recipe_id))).execute(conn)?;
        diesel::delete(favorites::table.filter(favorites::recipe_id.eq(recipe_id)))
            .execute(conn)?;
        diesel::delete(recipes::table.find(recipe_id)).execute(conn)?;
        Ok(())
    })
}

pub fn check_orphans(conn: &mut PgConnection, fix: bool, yes: bool) -> Result<()> {
    let report = report(conn)?;

    if report.is_empty() {
        println!("No orphaned rows found.");
        return Ok(());
    }

    if !report.orphaned_recipes.is_empty() {
        println!(
            "Found {} recipe(s) whose user no longer exists:",
            report.orphaned_recipes.len()
        );
        for (id, title, user_id) in &report.orphaned_recipes {
            println!("  recipe {} \"{}\" (user_id {})", id, title, user_id);
        }
    }

    if !report.dangling_links.is_empty() {
        println!(
            "Found {} recipe_ingredient row(s) with a missing recipe or ingredient:",
            report.dangling_links.len()
        );
        for (id, recipe_id, ingredient_id) in &report.dangling_links {
            println!(
                "  link {} (recipe_id {}, ingredient_id {})",
                id, recipe_id, ingredient_id
            );
        }
    }

    if !fix {
        println!("\nRe-run with --fix to delete these rows.");
        return Ok(());
    }

    if !yes && !crate::confirm("Delete these rows?")? {
        println!("Aborted.");
        return Ok(());
    }

    for (id, _, _) in &report.orphaned_recipes {
        delete_recipe_with_dependents(conn, *id)?;
    }

    let link_ids: Vec<i32> = report.dangling_links.iter().map(|(id, _, _)| *id).collect();
    if !link_ids.is_empty() {
        diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::id.eq_any(&link_ids)))
            .execute(conn)?;
    }

    println!(
        "Deleted {} recipe(s) and {} dangling link(s).",
        report.orphaned_recipes.len(),
        link_ids.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_clean_database() {
        let users: HashSet<i32> = [1].into_iter().collect();
        let ingredients: HashSet<i32> = [10].into_iter().collect();
        let recipes = vec![(1, "Торт".to_string(), 1)];
        let links = vec![(1, 1, 10)];
        assert!(scan(&users, &ingredients, &recipes, &links).is_empty());
    }

    #[test]
    fn test_scan_finds_orphaned_recipe() {
        let users: HashSet<i32> = [1].into_iter().collect();
        let ingredients = HashSet::new();
        let recipes = vec![
            (1, "ok".to_string(), 1),
            (2, "orphan".to_string(), 99),
        ];
        let report = scan(&users, &ingredients, &recipes, &[]);
        assert_eq!(report.orphaned_recipes, vec![(2, "orphan".to_string(), 99)]);
    }

    #[test]
    fn test_scan_finds_dangling_links() {
        let users: HashSet<i32> = [1].into_iter().collect();
        let ingredients: HashSet<i32> = [10].into_iter().collect();
        let recipes = vec![(1, "ok".to_string(), 1)];
        // missing recipe 7 and missing ingredient 11
        let links = vec![(1, 1, 10), (2, 7, 10), (3, 1, 11)];
        let report = scan(&users, &ingredients, &recipes, &links);
        assert_eq!(report.dangling_links, vec![(2, 7, 10), (3, 1, 11)]);
    }
}
