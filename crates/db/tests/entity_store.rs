//! Integration tests for the PostgreSQL entity store.
//!
//! Need a running PostgreSQL reachable through `DATABASE_URL`; run with
//! `cargo test -p gallery-db -- --ignored`.

use gallery_core::character::{CharacterQuery, NewCharacter, NewUser};
use gallery_core::session::SessionUser;
use gallery_core::engagement::{EngagementAction, NewEngagement};
use gallery_core::error::CoreError;
use gallery_core::media::{AssetType, MusicPlatform, NewAsset, NewMusic};
use gallery_core::ports::EntityStore;
use gallery_core::roles::ANONYMOUS_USER_ID;
use gallery_core::status::CharacterStatus;
use gallery_core::types::{new_entity_id, EntityId};
use gallery_db::repositories::TagRepo;
use gallery_db::PgEntityStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_character(name: &str, has_music: bool, minutes_ago: i64) -> NewCharacter {
    NewCharacter {
        id: new_entity_id(),
        owner_id: ANONYMOUS_USER_ID,
        name: name.to_string(),
        short_worldview: "Traveller between stations".into(),
        description: None,
        has_music,
        ai_tool_used: Some("NovelAI".into()),
        created_at: chrono::Utc::now() - chrono::Duration::minutes(minutes_ago),
    }
}

fn new_asset(character_id: EntityId) -> NewAsset {
    NewAsset {
        id: new_entity_id(),
        character_id,
        asset_type: AssetType::Image,
        original_url: "https://img.example/a.png".into(),
        thumbnail_url: "https://img.example/a.png".into(),
        prompt_summary: Some("1girl".into()),
        downloadable: true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_bootstrap(pool: PgPool) {
    gallery_db::health_check(&pool).await.unwrap();
    let anonymous: (String,) = sqlx::query_as("SELECT handle FROM users WHERE id = $1")
        .bind(ANONYMOUS_USER_ID)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(anonymous.0, "anonymous");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_create_and_hydrate(pool: PgPool) {
    let store = PgEntityStore::new(pool.clone());
    let character = store
        .create_character(&new_character("Rin", true, 0))
        .await
        .unwrap();
    assert_eq!(character.status, CharacterStatus::Pending);

    store.create_asset(&new_asset(character.id)).await.unwrap();
    store
        .create_music(&NewMusic {
            id: new_entity_id(),
            character_id: character.id,
            platform: MusicPlatform::Youtube,
            embed_url: "https://youtube.example/v".into(),
            title: Some("Theme".into()),
            verified_owner: false,
        })
        .await
        .unwrap();
    let tags = store.list_tags().await.unwrap();
    TagRepo::attach(&pool, character.id, tags[0].id).await.unwrap();

    let detail = store.find_character(character.id).await.unwrap().unwrap();
    assert_eq!(detail.owner.unwrap().handle, "anonymous");
    assert_eq!(detail.assets.len(), 1);
    assert_eq!(detail.music[0].platform, MusicPlatform::Youtube);
    assert_eq!(detail.tags.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_list_filters_and_orders(pool: PgPool) {
    let store = PgEntityStore::new(pool);
    let old = store.create_character(&new_character("old", false, 10)).await.unwrap();
    let new = store.create_character(&new_character("new", false, 1)).await.unwrap();
    let music = store.create_character(&new_character("music", true, 5)).await.unwrap();

    let without = store
        .list_characters(&CharacterQuery::with_status(CharacterStatus::Pending).has_music(false))
        .await
        .unwrap();
    let ids: Vec<EntityId> = without.iter().map(|d| d.id()).collect();
    assert_eq!(ids, vec![new.id, old.id]);

    let all = store
        .list_characters(&CharacterQuery::with_status(CharacterStatus::Pending))
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].id(), music.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_transition_is_conditional(pool: PgPool) {
    let store = PgEntityStore::new(pool);
    let c = store.create_character(&new_character("Mio", false, 0)).await.unwrap();

    let approved = store
        .transition_status(c.id, CharacterStatus::Pending, CharacterStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.unwrap().status, CharacterStatus::Approved);

    let again = store
        .transition_status(c.id, CharacterStatus::Pending, CharacterStatus::Rejected)
        .await
        .unwrap();
    assert!(again.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_orphans_listed_and_deleted_with_cascade(pool: PgPool) {
    let store = PgEntityStore::new(pool);
    let orphan = store.create_character(&new_character("orphan", false, 60)).await.unwrap();
    let complete = store.create_character(&new_character("complete", false, 60)).await.unwrap();
    store.create_asset(&new_asset(complete.id)).await.unwrap();

    let cutoff = chrono::Utc::now() - chrono::Duration::minutes(30);
    let orphans = store.list_orphaned_pending(cutoff).await.unwrap();
    assert_eq!(orphans, vec![orphan.id]);

    assert!(!store.delete_orphaned_pending(complete.id).await.unwrap());
    assert!(store.find_character(complete.id).await.unwrap().is_some());

    assert!(store.delete_orphaned_pending(orphan.id).await.unwrap());
    assert!(store.find_character(orphan.id).await.unwrap().is_none());
    assert!(!store.delete_orphaned_pending(orphan.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_constraint_violations(pool: PgPool) {
    let store = PgEntityStore::new(pool);

    let dangling = store
        .record_engagement(&NewEngagement::now(new_entity_id(), EngagementAction::Play))
        .await;
    assert!(matches!(dangling, Err(CoreError::NotFound { .. })));

    let input = new_character("dup", false, 0);
    store.create_character(&input).await.unwrap();
    let duplicate = store.create_character(&input).await;
    assert!(matches!(duplicate, Err(CoreError::Conflict(_))));

    let too_long = store
        .create_character(&new_character(&"x".repeat(101), false, 0))
        .await;
    assert!(matches!(too_long, Err(CoreError::Persistence(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_signed_in_owner_is_upserted_and_hydrated(pool: PgPool) {
    let store = PgEntityStore::new(pool);
    let session = SessionUser::new(new_entity_id(), "authenticated");
    let user = NewUser::for_session(&session);

    store.ensure_user(&user).await.unwrap();
    store.ensure_user(&user).await.unwrap();

    let created = store
        .create_character(&NewCharacter {
            owner_id: session.user_id,
            ..new_character("owned", false, 0)
        })
        .await
        .unwrap();

    let detail = store.find_character(created.id).await.unwrap().unwrap();
    let owner = detail.owner.expect("owner should be hydrated");
    assert_eq!(owner.id, session.user_id);
    assert_eq!(owner.handle, user.handle);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_character_requires_existing_owner(pool: PgPool) {
    let store = PgEntityStore::new(pool);

    let result = store
        .create_character(&NewCharacter {
            owner_id: new_entity_id(),
            ..new_character("stray", false, 0)
        })
        .await;

    assert!(matches!(result, Err(CoreError::Persistence(_))));
}
