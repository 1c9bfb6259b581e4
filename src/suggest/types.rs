//! Suggestion payloads
//!
//! [`SuggestionResponse`] mirrors the JSON returned by the search-suggestions
//! endpoint. [`SuggestionResult`] is the render-ready form built from it, with
//! every hit carrying the storefront link it leads to.

use serde::{Deserialize, Serialize};

use crate::config::SiteContext;
use crate::navigation::NavigationTarget;

/// Raw search-suggestions response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestionResponse {
    pub search_phrase: Option<String>,
    pub brand_suggestions: Option<BrandSuggestions>,
    pub category_suggestions: Option<CategorySuggestions>,
    pub product_suggestions: Option<ProductSuggestions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandSuggestions {
    pub brands: Vec<String>,
    pub suggested_phrases: Vec<SuggestedPhrase>,
    pub suggested_terms: Vec<SuggestedTerms>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategorySuggestions {
    pub categories: Vec<CategoryHit>,
    pub suggested_phrases: Vec<SuggestedPhrase>,
    pub suggested_terms: Vec<SuggestedTerms>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSuggestions {
    pub products: Vec<ProductHit>,
    pub suggested_phrases: Vec<SuggestedPhrase>,
    pub suggested_terms: Vec<SuggestedTerms>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryHit {
    pub id: String,
    pub name: String,
    pub parent_category_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductHit {
    pub product_id: String,
    pub product_name: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestedPhrase {
    pub exact_match: bool,
    pub phrase: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestedTerms {
    pub original_term: String,
    pub terms: Vec<SuggestedTerm>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestedTerm {
    pub completed: bool,
    pub corrected: bool,
    pub exact_match: bool,
    pub value: String,
}

/// What a suggestion points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Category,
    Product,
    Brand,
    Phrase,
}

/// A single render-ready suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub name: String,
    pub link: NavigationTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Suggestion {
    fn new(kind: SuggestionKind, name: impl Into<String>, link: NavigationTarget) -> Self {
        Self {
            kind,
            name: name.into(),
            link,
            parent_name: None,
            price: None,
            currency: None,
        }
    }
}

/// Ranked suggestions for one query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub query: String,
    pub categories: Vec<Suggestion>,
    pub products: Vec<Suggestion>,
    pub brands: Vec<Suggestion>,
    pub phrases: Vec<Suggestion>,
}

impl SuggestionResult {
    /// A result with no hits
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.products.is_empty()
            && self.brands.is_empty()
            && self.phrases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len() + self.products.len() + self.brands.len() + self.phrases.len()
    }

    /// Build render-ready suggestions, linking each hit under the site's path prefix
    ///
    /// Phrases are gathered from every suggestion group in response order,
    /// without duplicates.
    pub fn from_response(query: &str, response: SuggestionResponse, site: &SiteContext) -> Self {
        let mut result = Self::empty(query);
        let mut phrases: Vec<String> = Vec::new();
        let mut collect_phrases = |suggested: Vec<SuggestedPhrase>| {
            for SuggestedPhrase { phrase, .. } in suggested {
                if !phrase.is_empty() && !phrases.contains(&phrase) {
                    phrases.push(phrase);
                }
            }
        };

        if let Some(categories) = response.category_suggestions {
            result.categories = categories
                .categories
                .into_iter()
                .map(|hit| {
                    let link = NavigationTarget::category(site, &hit.id);
                    let mut suggestion = Suggestion::new(SuggestionKind::Category, hit.name, link);
                    suggestion.parent_name = hit.parent_category_name;
                    suggestion
                })
                .collect();
            collect_phrases(categories.suggested_phrases);
        }

        if let Some(products) = response.product_suggestions {
            result.products = products
                .products
                .into_iter()
                .map(|hit| {
                    let link = NavigationTarget::product(site, &hit.product_id);
                    let mut suggestion =
                        Suggestion::new(SuggestionKind::Product, hit.product_name, link);
                    suggestion.price = hit.price;
                    suggestion.currency = hit.currency;
                    suggestion
                })
                .collect();
            collect_phrases(products.suggested_phrases);
        }

        if let Some(brands) = response.brand_suggestions {
            result.brands = brands
                .brands
                .into_iter()
                .map(|brand| {
                    let link = NavigationTarget::search(site, &brand);
                    Suggestion::new(SuggestionKind::Brand, brand, link)
                })
                .collect();
            collect_phrases(brands.suggested_phrases);
        }

        result.phrases = phrases
            .into_iter()
            .map(|phrase| {
                let link = NavigationTarget::search(site, &phrase);
                Suggestion::new(SuggestionKind::Phrase, phrase, link)
            })
            .collect();

        result
    }
}
