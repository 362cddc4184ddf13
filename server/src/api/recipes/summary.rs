use crate::models::Recipe;
use crate::schema::ratings;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// List-page view of a recipe, shared by the public list, "my recipes",
/// and the favorites page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub image_path: Option<String>,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Arithmetic mean and count. Zero ratings means average 0.
pub fn summarize(ratings: &[i32]) -> (f64, i64) {
    if ratings.is_empty() {
        return (0.0, 0);
    }
    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    (sum as f64 / ratings.len() as f64, ratings.len() as i64)
}

fn fold_by_recipe(rows: Vec<(i32, i32)>) -> HashMap<i32, Vec<i32>> {
    let mut by_recipe: HashMap<i32, Vec<i32>> = HashMap::new();
    for (recipe_id, rating) in rows {
        by_recipe.entry(recipe_id).or_default().push(rating);
    }
    by_recipe
}

/// Turns recipe rows into list items, pulling every rating for the listed
/// recipes in one query.
pub fn to_summaries(
    conn: &mut PgConnection,
    recipes: Vec<Recipe>,
) -> QueryResult<Vec<RecipeSummary>> {
    let ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();

    let rating_rows: Vec<(i32, i32)> = ratings::table
        .filter(ratings::recipe_id.eq_any(&ids))
        .select((ratings::recipe_id, ratings::rating))
        .load(conn)?;

    let by_recipe = fold_by_recipe(rating_rows);

    Ok(recipes
        .into_iter()
        .map(|r| {
            let (average_rating, total_ratings) = by_recipe
                .get(&r.id)
                .map(|rs| summarize(rs))
                .unwrap_or((0.0, 0));
            RecipeSummary {
                id: r.id,
                title: r.title,
                description: r.description,
                category_id: r.category_id,
                image_path: r.image_path,
                average_rating,
                total_ratings,
                created_at: r.created_at,
                updated_at: r.updated_at,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), (0.0, 0));
    }

    #[test]
    fn test_summarize_single() {
        assert_eq!(summarize(&[3]), (3.0, 1));
    }

    #[test]
    fn test_summarize_mean() {
        let (avg, count) = summarize(&[5, 4, 3]);
        assert!((avg - 4.0).abs() < f64::EPSILON);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_fold_groups_by_recipe() {
        let folded = fold_by_recipe(vec![(1, 5), (2, 3), (1, 1)]);
        assert_eq!(folded[&1], vec![5, 1]);
        assert_eq!(folded[&2], vec![3]);
    }
}
