use std::cmp::Ordering;

use super::domain::{AiScoreSummary, Product, ProductType, SearchResponse};

/// Products of the requested type (all types when `None`), best AI score first.
pub fn filter_by_type(products: &[Product], product_type: Option<ProductType>) -> Vec<Product> {
    let mut filtered: Vec<Product> = products
        .iter()
        .filter(|product| product_type.map_or(true, |wanted| product.product_type == wanted))
        .cloned()
        .collect();
    sort_by_ai_score(&mut filtered);
    filtered
}

pub fn sort_by_ai_score(products: &mut [Product]) {
    products.sort_by(|a, b| b.ai_score.partial_cmp(&a.ai_score).unwrap_or(Ordering::Equal));
}

pub fn top_products(products: &[Product], limit: usize) -> Vec<Product> {
    let mut ranked = products.to_vec();
    sort_by_ai_score(&mut ranked);
    ranked.truncate(limit);
    ranked
}

/// Local search over a product list.
///
/// A product matches an amount when its maximum covers it or when it has no
/// known maximum. The summary score is the rounded mean AI score of the
/// matches.
pub fn search_products(
    products: &[Product],
    amount: Option<f64>,
    product_type: Option<ProductType>,
) -> SearchResponse {
    let mut results = filter_by_type(products, product_type);
    if let Some(amount) = amount.filter(|amount| *amount > 0.0) {
        results.retain(|product| match product.max_amount {
            Some(max) if max > 0.0 => max >= amount,
            _ => true,
        });
    }

    let score = if results.is_empty() {
        0.0
    } else {
        let total: f64 = results.iter().map(|product| product.ai_score).sum();
        (total / results.len() as f64).round()
    };

    SearchResponse {
        results,
        ai_summary: AiScoreSummary {
            score,
            explanation: vec![
                "Низкая кредитная нагрузка".to_string(),
                "Стабильный доход".to_string(),
                "Длительная кредитная история".to_string(),
            ],
            suggestions: vec![
                "Рассмотрите увеличение срока для снижения платежа".to_string(),
                "Подтвердите доход справкой 2-НДФЛ".to_string(),
            ],
        },
    }
}
