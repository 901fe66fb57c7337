//! Response normalization
//!
//! Picks the top suggestion from a raw service response and flattens it
//! into a [`PlantIdentification`].

use crate::vision::models::{ClassificationResponseRaw, PlantIdentification};

/// The response carried no suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoMatch;

/// Normalize a raw response.
///
/// The service ranks suggestions by descending probability, so the first
/// one is taken as-is: no re-ranking and no threshold.
pub fn normalize(response: ClassificationResponseRaw) -> Result<PlantIdentification, NoMatch> {
    let top = response
        .suggestions
        .and_then(|suggestions| suggestions.into_iter().next())
        .ok_or(NoMatch)?;

    let details = top.plant_details.unwrap_or_default();
    let taxonomy = details.taxonomy.unwrap_or_default();

    Ok(PlantIdentification {
        scientific_name: top.plant_name,
        common_names: details.common_names,
        probability: top.probability,
        family: taxonomy.family,
        genus: taxonomy.genus,
        description: details.wiki_description.and_then(|d| d.value),
    })
}
