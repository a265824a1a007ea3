use super::domain::{Product, ProductType};

struct Seed {
    id: &'static str,
    title: &'static str,
    product_type: ProductType,
    apr: f64,
    monthly: f64,
    badge: Option<&'static str>,
    ai_score: f64,
    bank: &'static str,
    features: [&'static str; 3],
    max_amount: f64,
    min_amount: Option<f64>,
    term: &'static str,
}

const SEEDS: [Seed; 8] = [
    Seed {
        id: "card_1",
        title: "Cashback Card X",
        product_type: ProductType::Card,
        apr: 14.5,
        monthly: 1250.0,
        badge: Some("Top10"),
        ai_score: 78.0,
        bank: "Alpha Bank",
        features: [
            "5% кэшбэк на рестораны",
            "Бесплатное обслуживание",
            "Apple Pay / Google Pay",
        ],
        max_amount: 500_000.0,
        min_amount: None,
        term: "Бессрочно",
    },
    Seed {
        id: "card_2",
        title: "Premium Travel Card",
        product_type: ProductType::Card,
        apr: 19.9,
        monthly: 990.0,
        badge: Some("Популярное"),
        ai_score: 85.0,
        bank: "Tinkoff",
        features: [
            "Мили за покупки",
            "Бесплатные залы ожидания",
            "Страховка путешественника",
        ],
        max_amount: 1_000_000.0,
        min_amount: None,
        term: "Бессрочно",
    },
    Seed {
        id: "loan_1",
        title: "Personal Loan Z",
        product_type: ProductType::Loan,
        apr: 11.9,
        monthly: 8200.0,
        badge: None,
        ai_score: 64.0,
        bank: "Sberbank",
        features: [
            "Без залога",
            "Быстрое решение",
            "Досрочное погашение без штрафов",
        ],
        max_amount: 3_000_000.0,
        min_amount: Some(100_000.0),
        term: "12-60 месяцев",
    },
    Seed {
        id: "loan_2",
        title: "Экспресс Кредит",
        product_type: ProductType::Loan,
        apr: 15.5,
        monthly: 12_500.0,
        badge: Some("Быстрое одобрение"),
        ai_score: 72.0,
        bank: "VTB",
        features: [
            "Решение за 5 минут",
            "Минимум документов",
            "Онлайн оформление",
        ],
        max_amount: 1_000_000.0,
        min_amount: Some(50_000.0),
        term: "6-36 месяцев",
    },
    Seed {
        id: "microloan_1",
        title: "МикроЗайм Быстро",
        product_type: ProductType::Microloan,
        apr: 0.8,
        monthly: 2100.0,
        badge: Some("Первый займ 0%"),
        ai_score: 55.0,
        bank: "MoneyMan",
        features: [
            "Первый займ без процентов",
            "Деньги за 15 минут",
            "На карту любого банка",
        ],
        max_amount: 30_000.0,
        min_amount: Some(1_000.0),
        term: "5-30 дней",
    },
    Seed {
        id: "microloan_2",
        title: "Срочный Займ",
        product_type: ProductType::Microloan,
        apr: 1.0,
        monthly: 1800.0,
        badge: None,
        ai_score: 48.0,
        bank: "Займер",
        features: ["Без проверки КИ", "24/7 одобрение", "Продление срока"],
        max_amount: 50_000.0,
        min_amount: Some(3_000.0),
        term: "7-30 дней",
    },
    Seed {
        id: "card_3",
        title: "Дебетовая Мультикарта",
        product_type: ProductType::Card,
        apr: 0.0,
        monthly: 0.0,
        badge: Some("Без комиссий"),
        ai_score: 92.0,
        bank: "Raiffeisen",
        features: [
            "Кэшбэк до 5%",
            "Бесплатные переводы",
            "Проценты на остаток",
        ],
        max_amount: 0.0,
        min_amount: None,
        term: "Бессрочно",
    },
    Seed {
        id: "loan_3",
        title: "Рефинансирование",
        product_type: ProductType::Loan,
        apr: 9.9,
        monthly: 15_600.0,
        badge: Some("Лучшая ставка"),
        ai_score: 81.0,
        bank: "Газпромбанк",
        features: [
            "Объединение кредитов",
            "Снижение платежа",
            "Кредитные каникулы",
        ],
        max_amount: 5_000_000.0,
        min_amount: Some(300_000.0),
        term: "24-84 месяца",
    },
];

/// Built-in catalog served when the service runs without a backend.
pub fn fixture_products() -> Vec<Product> {
    SEEDS
        .iter()
        .map(|seed| Product {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            product_type: seed.product_type,
            apr: seed.apr,
            monthly: seed.monthly,
            badge: seed.badge.map(str::to_string),
            ai_score: seed.ai_score,
            bank: Some(seed.bank.to_string()),
            features: seed.features.iter().map(|f| f.to_string()).collect(),
            requirements: Vec::new(),
            max_amount: Some(seed.max_amount),
            min_amount: seed.min_amount,
            term: Some(seed.term.to_string()),
            logo_url: None,
            tracking_url: None,
        })
        .collect()
}
