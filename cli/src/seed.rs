use anyhow::{anyhow, Context, Result};
use diesel::prelude::*;
use sweetie_server::auth::hash_password;
use sweetie_server::models::{
    NewCategory, NewComment, NewIngredient, NewRating, NewRecipe, NewRecipeIngredient, NewUser,
    NewUserProfile,
};
use sweetie_server::schema::{
    categories, comments, ingredients, ratings, recipe_ingredients, recipes, user_profiles, users,
};

const SEED_USERNAME: &str = "testuser";
const SEED_EMAIL: &str = "test@example.com";
const SEED_PASSWORD: &str = "password123";

const CATEGORIES: &[(&str, &str)] = &[
    ("Торты", "Праздничные и повседневные торты"),
    ("Печенье", "Хрустящее печенье и мягкие кексы"),
    ("Десерты", "Холодные и горячие десерты"),
    ("Конфеты", "Домашние конфеты и сладости"),
];

const INGREDIENTS: &[(&str, &str)] = &[
    ("Мука", "г"),
    ("Сахар", "г"),
    ("Яйца", "шт"),
    ("Масло сливочное", "г"),
    ("Молоко", "мл"),
    ("Соль", "г"),
    ("Разрыхлитель", "г"),
    ("Ванилин", "г"),
    ("Какао-порошок", "г"),
    ("Сметана", "г"),
];

struct SeedRecipe {
    title: &'static str,
    description: &'static str,
    instructions: &'static str,
    prep_time: i32,
    cook_time: i32,
    servings: i32,
    category: &'static str,
    /// (ingredient name, quantity, unit for first use, notes)
    ingredients: &'static [(&'static str, f64, &'static str, Option<&'static str>)],
}

const SAMPLE_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        title: "Классический шоколадный торт",
        description:
            "Нежный шоколадный торт с кремом - идеальный десерт для особых случаев",
        instructions: "1. Разогрейте духовку до 180°C
2. Смешайте муку, какао и разрыхлитель
3. Взбейте масло с сахаром до пышности
4. Добавьте яйца по одному
5. Добавьте сухие ингредиенты
6. Выпекайте 25-30 минут
7. Остудите и украсьте кремом",
        prep_time: 30,
        cook_time: 30,
        servings: 8,
        category: "Торты",
        ingredients: &[
            ("Мука", 200.0, "г", Some("просеянная")),
            ("Сахар", 150.0, "г", None),
            ("Какао-порошок", 50.0, "г", None),
            ("Яйца", 3.0, "шт", None),
            ("Масло сливочное", 100.0, "г", None),
            ("Разрыхлитель", 10.0, "г", None),
        ],
    },
    SeedRecipe {
        title: "Печенье с шоколадной крошкой",
        description:
            "Хрустящее печенье с кусочками шоколада - любимое лакомство детей и взрослых",
        instructions: "1. Разогрейте духовку до 190°C
2. Смешайте масло с сахаром
3. Добавьте яйцо и ванилин
4. Добавьте муку и соль
5. Добавьте шоколадную крошку
6. Сформируйте шарики
7. Выпекайте 10-12 минут",
        prep_time: 15,
        cook_time: 12,
        servings: 24,
        category: "Печенье",
        ingredients: &[
            ("Мука", 250.0, "г", None),
            ("Сахар", 100.0, "г", None),
            ("Масло сливочное", 125.0, "г", None),
            ("Яйца", 1.0, "шт", None),
            ("Ванилин", 5.0, "г", None),
        ],
    },
    SeedRecipe {
        title: "Тирамису",
        description: "Классический итальянский десерт с кофе и маскарпоне",
        instructions: "1. Приготовьте кофе и остудите
2. Взбейте маскарпоне с сахаром
3. Добавьте яичные желтки
4. Смочите савоярди в кофе
5. Выложите слоями
6. Охладите 4 часа
7. Посыпьте какао перед подачей",
        prep_time: 45,
        cook_time: 0,
        servings: 6,
        category: "Десерты",
        ingredients: &[
            ("Маскарпоне", 500.0, "г", None),
            ("Сахар", 100.0, "г", None),
            ("Яйца", 4.0, "шт", None),
            ("Кофе", 200.0, "мл", None),
            ("Какао-порошок", 20.0, "г", None),
        ],
    },
];

const SAMPLE_COMMENTS: &[&str] = &[
    "Отличный рецепт! Получилось очень вкусно.",
    "Спасибо за подробные инструкции!",
    "Мой любимый рецепт, готовлю уже не первый раз.",
];

fn find_or_create_ingredient(
    conn: &mut PgConnection,
    name: &str,
    unit: &str,
) -> QueryResult<i32> {
    match ingredients::table
        .filter(ingredients::name.eq(name))
        .select(ingredients::id)
        .first(conn)
    {
        Ok(id) => Ok(id),
        Err(diesel::NotFound) => diesel::insert_into(ingredients::table)
            .values(&NewIngredient {
                name,
                unit: Some(unit),
            })
            .returning(ingredients::id)
            .get_result(conn),
        Err(e) => Err(e),
    }
}

pub fn seed(conn: &mut PgConnection) -> Result<()> {
    // Existence guard so repeated runs do not duplicate fixtures
    let user_count: i64 = users::table.count().get_result(conn)?;
    if user_count > 0 {
        println!("Database already contains data, skipping seed.");
        return Ok(());
    }

    println!("Seeding database...");

    let password_hash =
        hash_password(SEED_PASSWORD).map_err(|e| anyhow!("Failed to hash password: {}", e))?;

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        let user_id: i32 = diesel::insert_into(users::table)
            .values(&NewUser {
                username: SEED_USERNAME,
                email: SEED_EMAIL,
                password_hash: &password_hash,
            })
            .returning(users::id)
            .get_result(conn)
            .context("Failed to create seed user")?;

        diesel::insert_into(user_profiles::table)
            .values(&NewUserProfile {
                user_id,
                first_name: Some("Тестовый"),
                bio: Some("Люблю готовить сладости и делиться рецептами"),
            })
            .execute(conn)?;

        for (name, description) in CATEGORIES {
            diesel::insert_into(categories::table)
                .values(&NewCategory {
                    name,
                    description: Some(description),
                })
                .execute(conn)?;
        }

        for (name, unit) in INGREDIENTS {
            find_or_create_ingredient(conn, name, unit)?;
        }

        for recipe in SAMPLE_RECIPES {
            let category_id: i32 = categories::table
                .filter(categories::name.eq(recipe.category))
                .select(categories::id)
                .first(conn)?;

            let recipe_id: i32 = diesel::insert_into(recipes::table)
                .values(&NewRecipe {
                    user_id,
                    category_id: Some(category_id),
                    title: recipe.title,
                    description: Some(recipe.description),
                    instructions: recipe.instructions,
                    prep_time: Some(recipe.prep_time),
                    cook_time: Some(recipe.cook_time),
                    servings: Some(recipe.servings),
                    image_path: None,
                })
                .returning(recipes::id)
                .get_result(conn)?;

            for (name, quantity, unit, notes) in recipe.ingredients {
                let ingredient_id = find_or_create_ingredient(conn, name, unit)?;

                diesel::insert_into(recipe_ingredients::table)
                    .values(&NewRecipeIngredient {
                        recipe_id,
                        ingredient_id,
                        quantity: *quantity,
                        notes: *notes,
                    })
                    .execute(conn)?;
            }

            for content in SAMPLE_COMMENTS {
                diesel::insert_into(comments::table)
                    .values(&NewComment {
                        user_id,
                        recipe_id,
                        content,
                    })
                    .execute(conn)?;
            }

            diesel::insert_into(ratings::table)
                .values(&NewRating {
                    user_id,
                    recipe_id,
                    rating: 5,
                })
                .execute(conn)?;
        }

        Ok(())
    })?;

    println!("Database seeded.");
    println!("Test user: {} / {}", SEED_EMAIL, SEED_PASSWORD);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_recipe_categories_exist() {
        let names: HashSet<&str> = CATEGORIES.iter().map(|(n, _)| *n).collect();
        for recipe in SAMPLE_RECIPES {
            assert!(
                names.contains(recipe.category),
                "unknown category {}",
                recipe.category
            );
        }
    }

    #[test]
    fn test_fixtures_are_well_formed() {
        for recipe in SAMPLE_RECIPES {
            assert!(!recipe.title.is_empty());
            assert!(!recipe.instructions.is_empty());
            assert!(!recipe.ingredients.is_empty());
            for (name, quantity, _, _) in recipe.ingredients {
                assert!(!name.is_empty());
                assert!(*quantity > 0.0, "{} has non-positive quantity", name);
            }
        }
    }

    #[test]
    fn test_shared_ingredients_reused_across_recipes() {
        // "Мука" appears in two recipes and must resolve to one row
        let users_of_flour = SAMPLE_RECIPES
            .iter()
            .filter(|r| r.ingredients.iter().any(|(n, _, _, _)| *n == "Мука"))
            .count();
        assert!(users_of_flour >= 2);
    }

    #[test]
    fn test_base_ingredient_names_unique() {
        let mut seen = HashSet::new();
        for (name, _) in INGREDIENTS {
            assert!(seen.insert(*name), "duplicate fixture ingredient {}", name);
        }
    }
}
