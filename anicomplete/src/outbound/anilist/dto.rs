//! DTOs for decoding AniList GraphQL responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into domain
//! records in one pass. Missing envelope objects are decode failures; missing
//! leaf fields fall back to empty values.

use serde::Deserialize;

use crate::domain::ports::ResolvedUser;
use crate::domain::{AccentColor, CatalogEntry, ProgressValue};

const COMPLETED_LIST_NAME: &str = "Completed";

#[derive(Debug, Deserialize)]
pub(super) struct UserResponseDto {
    pub(super) data: Option<UserDataDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDataDto {
    #[serde(rename = "User")]
    pub(super) user: Option<UserDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: i64,
    pub(super) options: Option<UserOptionsDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserOptionsDto {
    pub(super) profile_color: Option<String>,
}

/// Outcome of decoding a lookup payload.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum UserLookup {
    Found(ResolvedUser),
    Missing,
}

impl UserResponseDto {
    pub(super) fn into_lookup(self) -> Result<UserLookup, String> {
        let data = self
            .data
            .ok_or_else(|| "response has no data object".to_owned())?;
        let Some(user) = data.user else {
            return Ok(UserLookup::Missing);
        };
        let user_id = u64::try_from(user.id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| format!("user id {} is not positive", user.id))?;
        let accent_color = AccentColor::from_profile(
            user.options
                .as_ref()
                .and_then(|options| options.profile_color.as_deref()),
        );
        Ok(UserLookup::Found(ResolvedUser {
            user_id,
            accent_color,
        }))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ListResponseDto {
    pub(super) data: Option<ListDataDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListDataDto {
    #[serde(rename = "MediaListCollection")]
    pub(super) collection: Option<CollectionDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CollectionDto {
    #[serde(default)]
    pub(super) lists: Vec<Option<ListGroupDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListGroupDto {
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) entries: Vec<Option<ListEntryDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListEntryDto {
    pub(super) status: Option<String>,
    pub(super) progress: Option<ProgressValue>,
    pub(super) media: Option<MediaDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MediaDto {
    pub(super) title: Option<MediaTitleDto>,
    pub(super) chapters: Option<ProgressValue>,
    pub(super) site_url: Option<String>,
    pub(super) cover_image: Option<CoverImageDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MediaTitleDto {
    pub(super) english: Option<String>,
    pub(super) romaji: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CoverImageDto {
    pub(super) large: Option<String>,
}

impl ListResponseDto {
    pub(super) fn into_completed_entries(self) -> Result<Vec<CatalogEntry>, String> {
        let collection = self
            .data
            .and_then(|data| data.collection)
            .ok_or_else(|| "response has no MediaListCollection".to_owned())?;

        let Some(completed) = collection
            .lists
            .into_iter()
            .flatten()
            .find(|group| group.name.as_deref() == Some(COMPLETED_LIST_NAME))
        else {
            return Ok(Vec::new());
        };

        completed
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .ok_or_else(|| format!("completed entry {index} is null"))?
                    .into_domain_entry(index)
            })
            .collect()
    }
}

impl ListEntryDto {
    fn into_domain_entry(self, index: usize) -> Result<CatalogEntry, String> {
        let media = self
            .media
            .ok_or_else(|| format!("completed entry {index} has no media"))?;
        let (title_preferred, title_alternate) = media
            .title
            .map(|title| {
                (
                    title.english.unwrap_or_default(),
                    title.romaji.unwrap_or_default(),
                )
            })
            .unwrap_or_default();

        Ok(CatalogEntry {
            progress: self.progress.unwrap_or(ProgressValue::Number(0)),
            chapters: media.chapters,
            title_preferred,
            title_alternate,
            cover_image_url: media
                .cover_image
                .and_then(|cover| cover.large)
                .unwrap_or_default(),
            link_url: media.site_url.unwrap_or_default(),
            status: self.status,
        })
    }
}
