//! Demo content for mock mode: four approved characters and one pending.

use crate::character::{NewCharacter, UserSummary};
use crate::error::CoreError;
use crate::media::{AssetType, MusicPlatform, NewAsset, NewMusic};
use crate::memory_store::InMemoryStore;
use crate::ports::EntityStore;
use crate::status::CharacterStatus;
use crate::tag::Tag;
use crate::types::{new_entity_id, EntityId};

struct DemoCharacter {
    name: &'static str,
    short_worldview: &'static str,
    description: &'static str,
    ai_tool: &'static str,
    prompt: &'static str,
    track: Option<(&'static str, &'static str)>,
    tags: &'static [&'static str],
    approved: bool,
}

const DEMO_TRACK_URL: &str = "https://www.soundjay.com/misc/sounds/bell-ringing-05.wav";

const DEMO_TAGS: &[(&str, &str, &str)] = &[
    ("cat ears", "feature", "#F59E0B"),
    ("wings", "feature", "#06B6D4"),
    ("fantasy", "world", "#8B5CF6"),
    ("sci-fi", "world", "#06B6D4"),
    ("japanese", "world", "#F59E0B"),
    ("smile", "emotion", "#10B981"),
    ("stoic", "emotion", "#6B7280"),
];

const DEMO_CHARACTERS: &[DemoCharacter] = &[
    DemoCharacter {
        name: "Mikan",
        short_worldview: "Cheerful cat-eared mage of the old wood",
        description: "Blue hair, cat ears and a staff of birch. Friends with every animal in the forest.",
        ai_tool: "Stable Diffusion",
        prompt: "1girl, cat ears, blue hair, magic staff, forest background",
        track: Some(("suno", "Forest Magic")),
        tags: &["cat ears", "fantasy", "smile"],
        approved: true,
    },
    DemoCharacter {
        name: "Luna",
        short_worldview: "Moon warrior guarding the night sky",
        description: "Silver hair and pale blue eyes. Draws on moonlight to hold back the dark.",
        ai_tool: "Midjourney",
        prompt: "1girl, silver hair, blue eyes, armor, moon, night sky",
        track: Some(("suno", "Moonlight Warrior")),
        tags: &["wings", "sci-fi", "stoic"],
        approved: true,
    },
    DemoCharacter {
        name: "Sakura",
        short_worldview: "Spirit of the cherry blossoms",
        description: "Appears with the first petals of spring, wrapped in a pink kimono.",
        ai_tool: "NovelAI",
        prompt: "1girl, pink hair, kimono, cherry blossoms, spring",
        track: None,
        tags: &["japanese", "smile"],
        approved: true,
    },
    DemoCharacter {
        name: "Ellie",
        short_worldview: "Steampunk inventor of gears and goggles",
        description: "Always halfway through a new machine. Her goggles never come off.",
        ai_tool: "DALL-E",
        prompt: "1girl, goggles, steampunk, gears, workshop",
        track: None,
        tags: &["sci-fi", "smile"],
        approved: true,
    },
    DemoCharacter {
        name: "Hanabi",
        short_worldview: "Fireworks spirit of summer festivals",
        description: "Only seen on festival nights, just before the first rocket goes up.",
        ai_tool: "Stable Diffusion",
        prompt: "1girl, yukata, fireworks, summer festival, night",
        track: None,
        tags: &["japanese"],
        approved: false,
    },
];

/// Insert the demo tags, creators and characters.
///
/// Returns the ids of the characters created, newest first.
pub async fn seed_demo_data(store: &InMemoryStore) -> Result<Vec<EntityId>, CoreError> {
    let mut tag_ids = Vec::with_capacity(DEMO_TAGS.len());
    for (name, tag_type, color) in DEMO_TAGS {
        let tag = Tag {
            id: new_entity_id(),
            name: (*name).to_string(),
            color: Some((*color).to_string()),
            tag_type: (*tag_type).to_string(),
        };
        tag_ids.push((*name, tag.id));
        store.insert_tag(tag).await;
    }

    let now = chrono::Utc::now();
    let mut created = Vec::with_capacity(DEMO_CHARACTERS.len());

    for (index, demo) in DEMO_CHARACTERS.iter().enumerate() {
        let owner = UserSummary {
            id: new_entity_id(),
            name: format!("Creator {}", (b'A' + index as u8) as char),
            handle: format!("creator_{}", (b'a' + index as u8) as char),
            avatar_url: None,
        };
        let owner_id = owner.id;
        store.insert_user(owner).await;

        let character = store
            .create_character(&NewCharacter {
                id: new_entity_id(),
                owner_id,
                name: demo.name.to_string(),
                short_worldview: demo.short_worldview.to_string(),
                description: Some(demo.description.to_string()),
                has_music: demo.track.is_some(),
                ai_tool_used: Some(demo.ai_tool.to_string()),
                created_at: now - chrono::Duration::days(index as i64),
            })
            .await?;

        let image_url = format!("https://picsum.photos/400/400?random={}", index + 1);
        store
            .create_asset(&NewAsset {
                id: new_entity_id(),
                character_id: character.id,
                asset_type: AssetType::Image,
                original_url: image_url.clone(),
                thumbnail_url: image_url,
                prompt_summary: Some(demo.prompt.to_string()),
                downloadable: true,
            })
            .await?;

        if let Some((platform, title)) = demo.track {
            store
                .create_music(&NewMusic {
                    id: new_entity_id(),
                    character_id: character.id,
                    platform: MusicPlatform::from_name(platform)?,
                    embed_url: DEMO_TRACK_URL.to_string(),
                    title: Some(title.to_string()),
                    verified_owner: false,
                })
                .await?;
        }

        for tag_name in demo.tags {
            if let Some((_, tag_id)) = tag_ids.iter().find(|(name, _)| name == tag_name) {
                store.attach_tag(character.id, *tag_id).await?;
            }
        }

        if demo.approved {
            store
                .transition_status(character.id, CharacterStatus::Pending, CharacterStatus::Approved)
                .await?;
        }
        created.push(character.id);
    }

    tracing::info!(characters = created.len(), tags = tag_ids.len(), "Demo data seeded");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterQuery;

    #[tokio::test]
    async fn seeds_four_approved_and_one_pending() {
        let store = InMemoryStore::new();
        let ids = seed_demo_data(&store).await.unwrap();
        assert_eq!(ids.len(), 5);

        let approved = store
            .list_characters(&CharacterQuery::with_status(CharacterStatus::Approved))
            .await
            .unwrap();
        let pending = store
            .list_characters(&CharacterQuery::with_status(CharacterStatus::Pending))
            .await
            .unwrap();
        assert_eq!(approved.len(), 4);
        assert_eq!(pending.len(), 1);
        assert_eq!(approved[0].character.name, "Mikan");
        assert_eq!(approved[0].tags.len(), 3);
    }

    #[tokio::test]
    async fn music_flag_matches_music_rows() {
        let store = InMemoryStore::new();
        seed_demo_data(&store).await.unwrap();

        let approved = store
            .list_characters(&CharacterQuery::with_status(CharacterStatus::Approved))
            .await
            .unwrap();
        for detail in approved {
            assert_eq!(detail.character.has_music, !detail.music.is_empty());
            assert!(detail.music.iter().all(|m| !m.verified_owner));
        }
    }
}
