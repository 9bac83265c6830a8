//! DTOs used by the astrologer directory and profile pages.

use serde::Deserialize;

use crate::domain::astrologer::Astrologer;
use crate::pagination::Paginated;
use crate::pricing::PriceRow;

#[derive(Debug, Default, Deserialize)]
pub struct AstrologersQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

pub struct AstrologersPageData {
    pub astrologers: Paginated<Astrologer>,
    pub search: Option<String>,
}

pub struct AstrologerPageData {
    pub astrologer: Astrologer,
    pub prices: Vec<PriceRow>,
}
