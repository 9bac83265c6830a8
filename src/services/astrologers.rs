//! Astrologer directory and profile editing.

use std::collections::BTreeMap;

use crate::domain::astrologer::Astrologer;
use crate::domain::types::AstrologerId;
use crate::dto::astrologers::{AstrologerPageData, AstrologersPageData, AstrologersQuery};
use crate::forms::astrologers::UpdateAstrologerForm;
use crate::forms::optional_text;
use crate::pagination::Paginated;
use crate::pricing::price_table;
use crate::repository::{AstrologerReader, AstrologerWriter};
use crate::services::{ServiceError, ServiceResult};

fn matches_search(astrologer: &Astrologer, term: &str) -> bool {
    astrologer.name.as_str().to_lowercase().contains(term)
        || astrologer.email.as_str().contains(term)
        || astrologer
            .phone
            .as_ref()
            .is_some_and(|phone| phone.as_str().contains(term))
        || astrologer
            .languages
            .iter()
            .any(|language| language.to_lowercase().contains(term))
}

/// Lists astrologers, optionally filtered by name, contact or language.
pub fn list_astrologers<R>(
    repo: &R,
    query: &AstrologersQuery,
    per_page: usize,
) -> ServiceResult<AstrologersPageData>
where
    R: AstrologerReader + ?Sized,
{
    let search = optional_text(query.search.as_deref()).map(|term| term.to_lowercase());

    let mut astrologers = repo.list_astrologers().map_err(|err| {
        log::error!("Failed to list astrologers: {err}");
        err
    })?;
    if let Some(term) = &search {
        astrologers.retain(|astrologer| matches_search(astrologer, term));
    }

    Ok(AstrologersPageData {
        astrologers: Paginated::from_vec(astrologers, query.page.unwrap_or(1).max(1), per_page),
        search,
    })
}

/// Loads one profile with its resolved price table.
pub fn load_astrologer<R>(
    repo: &R,
    astrologer_id: &str,
    platform_offers: &BTreeMap<u32, u32>,
) -> ServiceResult<AstrologerPageData>
where
    R: AstrologerReader + ?Sized,
{
    let id = AstrologerId::new(astrologer_id)?;

    let astrologer = repo
        .get_astrologer(&id)
        .map_err(|err| {
            log::error!("Failed to load astrologer {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let prices = price_table(&astrologer, platform_offers);
    Ok(AstrologerPageData { astrologer, prices })
}

/// Replaces the profile with the submitted form.
pub fn update_astrologer<R>(repo: &R, astrologer_id: &str, form: UpdateAstrologerForm) -> ServiceResult<()>
where
    R: AstrologerWriter + ?Sized,
{
    let id = AstrologerId::new(astrologer_id)?;
    let update = form.into_update(id)?;

    repo.update_astrologer(&update).map_err(|err| {
        log::error!("Failed to update astrologer {}: {err}", update.id);
        err
    })?;

    log::info!("Updated astrologer {}", update.id);
    Ok(())
}
