use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::ScoreResult;
use crate::catalog::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferSort {
    #[default]
    Approval,
    Apr,
    Amount,
}

impl OfferSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "approval" => Some(Self::Approval),
            "apr" => Some(Self::Apr),
            "amount" => Some(Self::Amount),
            _ => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            OfferSort::Approval => "approval",
            OfferSort::Apr => "apr",
            OfferSort::Amount => "amount",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            OfferSort::Approval => "По одобрению",
            OfferSort::Apr => "По ставке",
            OfferSort::Amount => "По сумме",
        }
    }
}

/// Range filters and ordering for the personal offers list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferFilter {
    pub min_amount: f64,
    pub max_amount: f64,
    pub min_apr: f64,
    pub max_apr: f64,
    pub sort_by: OfferSort,
}

impl Default for OfferFilter {
    fn default() -> Self {
        Self {
            min_amount: 0.0,
            max_amount: 5_000_000.0,
            min_apr: 0.0,
            max_apr: 100.0,
            sort_by: OfferSort::Approval,
        }
    }
}

impl OfferFilter {
    fn admits(&self, product: &Product) -> bool {
        let max_amount = product.max_amount.unwrap_or(0.0);
        max_amount >= self.min_amount
            && max_amount <= self.max_amount
            && product.apr >= self.min_apr
            && product.apr <= self.max_apr
    }
}

/// Product paired with the applicant's approval chance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOffer {
    pub product: Product,
    pub approval_chance: u8,
    pub recommended: bool,
}

/// Attaches the estimate to each product, then filters and orders the list.
///
/// The approval chance is the applicant's score, so offers and the score card
/// never disagree for the same input.
pub fn rank_offers(
    products: &[Product],
    estimate: &ScoreResult,
    recommended_at: u8,
    filter: &OfferFilter,
) -> Vec<RankedOffer> {
    let mut offers: Vec<RankedOffer> = products
        .iter()
        .filter(|product| filter.admits(product))
        .map(|product| RankedOffer {
            product: product.clone(),
            approval_chance: estimate.score,
            recommended: estimate.score >= recommended_at,
        })
        .collect();

    match filter.sort_by {
        OfferSort::Approval => offers.sort_by(|a, b| {
            b.approval_chance
                .cmp(&a.approval_chance)
                .then_with(|| by_f64(b.product.ai_score, a.product.ai_score))
        }),
        OfferSort::Apr => offers.sort_by(|a, b| by_f64(a.product.apr, b.product.apr)),
        OfferSort::Amount => offers.sort_by(|a, b| {
            by_f64(
                b.product.max_amount.unwrap_or(0.0),
                a.product.max_amount.unwrap_or(0.0),
            )
        }),
    }

    offers
}

fn by_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
