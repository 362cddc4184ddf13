use anyhow::Result;
use diesel::prelude::*;
use sweetie_server::schema::{
    categories, comments, favorites, ingredients, ratings, recipe_ingredients, recipes, users,
};

use crate::orphans;

/// Dumps per-table counts and key rows; the troubleshooting view for a
/// misbehaving install.
pub fn inspect(conn: &mut PgConnection) -> Result<()> {
    let user_count: i64 = users::table.count().get_result(conn)?;
    let category_count: i64 = categories::table.count().get_result(conn)?;
    let recipe_count: i64 = recipes::table.count().get_result(conn)?;
    let ingredient_count: i64 = ingredients::table.count().get_result(conn)?;
    let link_count: i64 = recipe_ingredients::table.count().get_result(conn)?;
    let comment_count: i64 = comments::table.count().get_result(conn)?;
    let rating_count: i64 = ratings::table.count().get_result(conn)?;
    let favorite_count: i64 = favorites::table.count().get_result(conn)?;

    println!("users:              {}", user_count);
    println!("categories:         {}", category_count);
    println!("recipes:            {}", recipe_count);
    println!("ingredients:        {}", ingredient_count);
    println!("recipe_ingredients: {}", link_count);
    println!("comments:           {}", comment_count);
    println!("ratings:            {}", rating_count);
    println!("favorites:          {}", favorite_count);

    if user_count == 0 {
        println!("\nNo users found. Run `sweetie seed` to load fixtures.");
    } else {
        println!("\nUsers:");
        let rows: Vec<(i32, String, String)> = users::table
            .select((users::id, users::username, users::email))
            .order(users::id.asc())
            .load(conn)?;
        for (id, username, email) in rows {
            println!("  {} {} <{}>", id, username, email);
        }
    }

    if recipe_count > 0 {
        println!("\nRecipes:");
        let rows: Vec<(i32, String, i32)> = recipes::table
            .select((recipes::id, recipes::title, recipes::user_id))
            .order(recipes::id.asc())
            .load(conn)?;
        for (id, title, user_id) in rows {
            println!("  {} \"{}\" (user_id {})", id, title, user_id);
        }
    }

    let report = orphans::report(conn)?;
    if report.is_empty() {
        println!("\nReferential integrity: OK");
    } else {
        println!(
            "\nReferential integrity: {} orphaned recipe(s), {} dangling link(s).",
            report.orphaned_recipes.len(),
            report.dangling_links.len()
        );
        println!("Run `sweetie check-orphans --fix` to repair.");
    }

    Ok(())
}
