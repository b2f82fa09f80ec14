//! Integration tests for article/media/category repository operations.
//!
//! Exercises the repos against a real database:
//! - Article create/find and joined metadata queries
//! - `allocate_version_number` hands out strictly increasing values
//! - `update_content` replaces the media list wholesale in one transaction
//! - Case-insensitive category slug resolution
//! - Like/favorite uniqueness

use sqlx::PgPool;

use khub_db::models::article::{ArticleContent, CreateArticle};
use khub_db::models::media::CreateMedia;
use khub_db::models::user::CreateUser;
use khub_db::repositories::{ArticleRepo, CategoryRepo, FavoriteRepo, MediaRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, username: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "$argon2id$fake$hash".to_string(),
            bio: None,
        },
    )
    .await
    .expect("user creation should succeed");
    user.id
}

async fn category_id(pool: &PgPool, slug: &str) -> i64 {
    CategoryRepo::find_by_slug(pool, slug)
        .await
        .expect("category query should succeed")
        .expect("seeded category should exist")
        .id
}

fn new_article(owner_id: i64, category_id: i64, title: &str) -> CreateArticle {
    CreateArticle {
        title: title.to_string(),
        content_source: "Some *content*".to_string(),
        content_rendered: "<p>Some <em>content</em></p>\n".to_string(),
        status: "published".to_string(),
        category_id,
        owner_id,
    }
}

fn media(url: &str, position: i32) -> CreateMedia {
    CreateMedia {
        url: url.to_string(),
        media_type: "image".to_string(),
        description: None,
        position,
    }
}

// ---------------------------------------------------------------------------
// Article CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_find_article(pool: PgPool) {
    let owner = create_user(&pool, "author").await;
    let cat = category_id(&pool, "technology").await;

    let article = ArticleRepo::create(&pool, &new_article(owner, cat, "First"))
        .await
        .expect("create should succeed");
    assert_eq!(article.title, "First");
    assert_eq!(article.version_seq, 0, "fresh articles start at seq 0");

    let found = ArticleRepo::find_by_id(&pool, article.id)
        .await
        .expect("query should succeed")
        .expect("article should exist");
    assert_eq!(found.owner_id, owner);
    assert_eq!(found.status, "published");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_with_meta_joins_owner_and_category(pool: PgPool) {
    let owner = create_user(&pool, "meta_author").await;
    let cat = category_id(&pool, "science").await;
    let article = ArticleRepo::create(&pool, &new_article(owner, cat, "Meta"))
        .await
        .expect("create should succeed");

    let meta = ArticleRepo::find_with_meta(&pool, article.id)
        .await
        .expect("query should succeed")
        .expect("article should exist");
    assert_eq!(meta.owner_username, "meta_author");
    assert_eq!(meta.category_name, "Science");
    assert_eq!(meta.category_slug, "science");
    assert_eq!(meta.likes_count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_category_slug_is_case_insensitive(pool: PgPool) {
    let lower = CategoryRepo::find_by_slug(&pool, "technology")
        .await
        .expect("query should succeed");
    let upper = CategoryRepo::find_by_slug(&pool, "TECHNOLOGY")
        .await
        .expect("query should succeed");
    assert_eq!(
        lower.expect("should exist").id,
        upper.expect("should exist").id
    );
}

// ---------------------------------------------------------------------------
// Version number allocation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_allocate_version_number_increments(pool: PgPool) {
    let owner = create_user(&pool, "alloc").await;
    let cat = category_id(&pool, "technology").await;
    let article = ArticleRepo::create(&pool, &new_article(owner, cat, "Alloc"))
        .await
        .expect("create should succeed");

    for expected in 1..=3i64 {
        let got = ArticleRepo::allocate_version_number(&pool, article.id)
            .await
            .expect("allocation should succeed")
            .expect("article exists");
        assert_eq!(got, expected);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_allocate_version_number_missing_article(pool: PgPool) {
    let got = ArticleRepo::allocate_version_number(&pool, 424242)
        .await
        .expect("query should succeed");
    assert!(got.is_none(), "missing article yields no allocation");
}

// ---------------------------------------------------------------------------
// Content replacement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_update_content_replaces_media_wholesale(pool: PgPool) {
    let owner = create_user(&pool, "media_owner").await;
    let cat = category_id(&pool, "technology").await;
    let article = ArticleRepo::create(&pool, &new_article(owner, cat, "Media"))
        .await
        .expect("create should succeed");

    MediaRepo::create(&pool, article.id, &media("old-a.png", 0))
        .await
        .expect("media insert should succeed");
    MediaRepo::create(&pool, article.id, &media("old-b.png", 1))
        .await
        .expect("media insert should succeed");

    let content = ArticleContent {
        title: "Media v2".to_string(),
        content_source: "new".to_string(),
        content_rendered: "<p>new</p>\n".to_string(),
        status: "published".to_string(),
        category_id: cat,
        media_items: vec![media("new-only.png", 0)],
    };
    let updated = ArticleRepo::update_content(&pool, article.id, &content)
        .await
        .expect("update should succeed")
        .expect("article exists");
    assert_eq!(updated.title, "Media v2");
    assert!(updated.updated_at >= updated.created_at);

    let remaining = MediaRepo::list_by_article(&pool, article.id)
        .await
        .expect("query should succeed");
    assert_eq!(remaining.len(), 1, "old media fully replaced");
    assert_eq!(remaining[0].url, "new-only.png");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_content_missing_article_is_none(pool: PgPool) {
    let cat = category_id(&pool, "technology").await;
    let content = ArticleContent {
        title: "x".to_string(),
        content_source: "x".to_string(),
        content_rendered: "<p>x</p>\n".to_string(),
        status: "draft".to_string(),
        category_id: cat,
        media_items: vec![],
    };
    let updated = ArticleRepo::update_content(&pool, 999_999, &content)
        .await
        .expect("query should succeed");
    assert!(updated.is_none());
}

// ---------------------------------------------------------------------------
// Likes and favorites
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_like_is_unique_per_user(pool: PgPool) {
    let owner = create_user(&pool, "liker_owner").await;
    let liker = create_user(&pool, "liker").await;
    let cat = category_id(&pool, "technology").await;
    let article = ArticleRepo::create(&pool, &new_article(owner, cat, "Likeable"))
        .await
        .expect("create should succeed");

    assert!(ArticleRepo::like(&pool, article.id, liker).await.unwrap());
    assert!(
        !ArticleRepo::like(&pool, article.id, liker).await.unwrap(),
        "second like is a no-op"
    );
    assert!(ArticleRepo::unlike(&pool, article.id, liker).await.unwrap());
    assert!(
        !ArticleRepo::unlike(&pool, article.id, liker).await.unwrap(),
        "unlike without a like is a no-op"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_favorites_roundtrip(pool: PgPool) {
    let owner = create_user(&pool, "fav_owner").await;
    let reader = create_user(&pool, "fav_reader").await;
    let cat = category_id(&pool, "culture").await;
    let article = ArticleRepo::create(&pool, &new_article(owner, cat, "Favorite me"))
        .await
        .expect("create should succeed");

    assert!(FavoriteRepo::add(&pool, article.id, reader).await.unwrap());
    assert!(
        !FavoriteRepo::add(&pool, article.id, reader).await.unwrap(),
        "duplicate favorite is a no-op"
    );

    let favorites = FavoriteRepo::list_articles_for_user(&pool, reader)
        .await
        .expect("query should succeed");
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, article.id);

    assert!(FavoriteRepo::remove(&pool, article.id, reader).await.unwrap());
    let favorites = FavoriteRepo::list_articles_for_user(&pool, reader)
        .await
        .expect("query should succeed");
    assert!(favorites.is_empty());
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_search_published_matches_title_and_content(pool: PgPool) {
    let owner = create_user(&pool, "searcher").await;
    let cat = category_id(&pool, "technology").await;

    let mut hit = new_article(owner, cat, "Rust ownership explained");
    hit.content_source = "borrowing and lifetimes".to_string();
    ArticleRepo::create(&pool, &hit).await.expect("create");

    let mut draft = new_article(owner, cat, "Rust draft notes");
    draft.status = "draft".to_string();
    ArticleRepo::create(&pool, &draft).await.expect("create");

    let by_title = ArticleRepo::search_published(&pool, "ownership", 20)
        .await
        .expect("search should succeed");
    assert_eq!(by_title.len(), 1);

    let by_content = ArticleRepo::search_published(&pool, "LIFETIMES", 20)
        .await
        .expect("search should succeed");
    assert_eq!(by_content.len(), 1, "ILIKE match is case-insensitive");

    let drafts_hidden = ArticleRepo::search_published(&pool, "draft notes", 20)
        .await
        .expect("search should succeed");
    assert!(drafts_hidden.is_empty(), "drafts are not searchable");
}
