//! Server-rendered HTML for the marketplace pages.

use axum::response::Html;
use credium::catalog::{ApprovalCheckResponse, Product, ProductType, SearchResponse};
use credium::format::{format_apr, format_currency, format_percent, rubles};
use credium::onboarding::{encode_existing_loans, LoanPurpose, OnboardingStep, OnboardingWizard};
use credium::scoring::{OfferFilter, OfferSort, RankedOffer, ScoreResult};

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"ru\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title} | Credium</title></head><body>\
         <header><a href=\"/\">Credium</a> \
         <nav><a href=\"/catalog\">Каталог</a> <a href=\"/onboarding\">Подбор</a> \
         <a href=\"/personal-offers\">Предложения</a></nav></header>\
         <main>{body}</main></body></html>",
        title = escape_html(title),
        body = body,
    ))
}

fn empty_state(title: &str, hint: &str) -> String {
    format!(
        "<section class=\"empty\"><h2>{}</h2><p>{}</p></section>",
        escape_html(title),
        escape_html(hint)
    )
}

fn product_card(product: &Product, extra: &str) -> String {
    let mut card = format!(
        "<article class=\"product\" data-id=\"{id}\"><h3><a href=\"/product/{id}\">{title}</a></h3>\
         <p class=\"bank\">{bank} · {kind}</p><p class=\"rate\">{apr}</p>\
         <p class=\"ai-score\">AI-скор: {score:.0}</p>",
        id = escape_html(&product.id),
        title = escape_html(&product.title),
        bank = escape_html(product.bank_name()),
        kind = product.product_type.label(),
        apr = format_apr(product.apr),
        score = product.ai_score,
    );
    if let Some(badge) = &product.badge {
        card.push_str(&format!("<span class=\"badge\">{}</span>", escape_html(badge)));
    }
    if let Some(max) = product.max_amount.filter(|max| *max > 0.0) {
        card.push_str(&format!(
            "<p class=\"amount\">до {}</p>",
            format_currency(max, 0, true)
        ));
    }
    card.push_str(extra);
    card.push_str("</article>");
    card
}

fn product_list(products: &[Product]) -> String {
    products
        .iter()
        .map(|product| product_card(product, ""))
        .collect()
}

pub(crate) fn home(top: &[Product]) -> Html<String> {
    let mut body = String::from(
        "<section class=\"hero\"><h1>Подберём кредит с AI-оценкой одобрения</h1>\
         <a class=\"cta\" href=\"/onboarding\">Узнать свои шансы</a></section>\
         <section><h2>Топ-10 предложений</h2>",
    );
    if top.is_empty() {
        body.push_str(&empty_state(
            "Предложения временно недоступны",
            "Попробуйте обновить страницу позже",
        ));
    } else {
        body.push_str(&product_list(top));
    }
    body.push_str("</section>");
    page("Кредиты с AI-подбором", &body)
}

pub(crate) fn catalog(products: &[Product], selected: Option<ProductType>) -> Html<String> {
    let mut body = String::from("<h1>Каталог продуктов</h1><nav class=\"filters\">");
    let all_class = if selected.is_none() { " class=\"active\"" } else { "" };
    body.push_str(&format!("<a href=\"/catalog?type=all\"{all_class}>Все</a>"));
    for product_type in ProductType::ALL {
        let class = if selected == Some(product_type) {
            " class=\"active\""
        } else {
            ""
        };
        body.push_str(&format!(
            " <a href=\"/catalog?type={}\"{class}>{}</a>",
            product_type.code(),
            product_type.label()
        ));
    }
    body.push_str("</nav>");

    if products.is_empty() {
        body.push_str(&empty_state(
            "Продукты не найдены",
            "Попробуйте выбрать другой тип продукта",
        ));
    } else {
        body.push_str(&product_list(products));
    }
    page("Каталог", &body)
}

pub(crate) fn search_prompt() -> Html<String> {
    let mut body = String::from(
        "<h1>Поиск кредитов и займов</h1><form method=\"get\" action=\"/search\">\
         <label>Сумма <input type=\"number\" name=\"amount\" min=\"0\"></label>\
         <label>Срок, мес. <input type=\"number\" name=\"term\" min=\"1\"></label>\
         <select name=\"type\"><option value=\"\">Любой продукт</option>",
    );
    for product_type in ProductType::ALL {
        body.push_str(&format!(
            "<option value=\"{}\">{}</option>",
            product_type.code(),
            product_type.label()
        ));
    }
    body.push_str("</select><button>Найти</button></form>");
    page("Поиск", &body)
}

pub(crate) fn search_results(
    response: &SearchResponse,
    amount: f64,
    product_type: Option<ProductType>,
) -> Html<String> {
    let heading = match product_type {
        Some(product_type) => format!("{} на {}", product_type.label(), rubles(amount)),
        None => format!("Предложения на {}", rubles(amount)),
    };
    let mut body = format!("<h1>{}</h1>", escape_html(&heading));

    if response.results.is_empty() {
        body.push_str(&empty_state(
            "Ничего не нашлось",
            "Измените сумму или тип продукта",
        ));
        return page("Результаты поиска", &body);
    }

    let summary = &response.ai_summary;
    body.push_str(&format!(
        "<aside class=\"ai-summary\"><p>Средний AI-скор: {:.0}</p><ul>",
        summary.score
    ));
    for line in &summary.explanation {
        body.push_str(&format!("<li>{}</li>", escape_html(line)));
    }
    body.push_str("</ul><ul class=\"suggestions\">");
    for line in &summary.suggestions {
        body.push_str(&format!("<li>{}</li>", escape_html(line)));
    }
    body.push_str("</ul></aside>");
    body.push_str(&product_list(&response.results));
    page("Результаты поиска", &body)
}

pub(crate) fn product_details(
    product: &Product,
    approval: Option<&ApprovalCheckResponse>,
) -> Html<String> {
    let mut body = format!(
        "<h1>{}</h1><p class=\"bank\">{}</p><dl>\
         <dt>Ставка</dt><dd>{}</dd><dt>Ежемесячный платёж</dt><dd>{}</dd>",
        escape_html(&product.title),
        escape_html(product.bank_name()),
        format_apr(product.apr),
        rubles(product.monthly),
    );
    if let Some(max) = product.max_amount.filter(|max| *max > 0.0) {
        body.push_str(&format!("<dt>Сумма</dt><dd>до {}</dd>", rubles(max)));
    }
    if let Some(term) = &product.term {
        body.push_str(&format!("<dt>Срок</dt><dd>{}</dd>", escape_html(term)));
    }
    body.push_str("</dl>");

    for (heading, items) in [
        ("Преимущества", &product.features),
        ("Требования", &product.requirements),
    ] {
        if items.is_empty() {
            continue;
        }
        body.push_str(&format!("<h2>{heading}</h2><ul>"));
        for item in items {
            body.push_str(&format!("<li>{}</li>", escape_html(item)));
        }
        body.push_str("</ul>");
    }

    match approval {
        Some(check) => {
            body.push_str(&format!(
                "<section class=\"approval\"><h2>Вероятность одобрения: {:.0}%</h2><ul>",
                check.chance
            ));
            for factor in &check.factors {
                body.push_str(&format!(
                    "<li>{}: {:.0}%</li>",
                    escape_html(&factor.name),
                    factor.weight
                ));
            }
            body.push_str("</ul><ul class=\"suggestions\">");
            for suggestion in &check.suggestions {
                body.push_str(&format!("<li>{}</li>", escape_html(suggestion)));
            }
            body.push_str("</ul></section>");
        }
        None => body.push_str(
            "<p class=\"approval\"><a href=\"/onboarding\">Пройдите подбор</a>, \
             чтобы узнать шансы на одобрение</p>",
        ),
    }

    if let Some(url) = &product.tracking_url {
        body.push_str(&format!(
            "<a class=\"cta\" href=\"{}\" rel=\"nofollow\">Оформить</a>",
            escape_html(url)
        ));
    }
    page(&product.title, &body)
}

pub(crate) fn not_found(message: &str) -> Html<String> {
    page(
        "Страница не найдена",
        &empty_state("Страница не найдена", message),
    )
}

pub(crate) fn backend_unavailable() -> Html<String> {
    page(
        "Сервис недоступен",
        &empty_state(
            "Не удалось загрузить данные",
            "Сервис временно недоступен, попробуйте позже",
        ),
    )
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"{name}\" value=\"{}\">",
        escape_html(value)
    )
}

pub(crate) fn onboarding(wizard: &OnboardingWizard) -> Html<String> {
    let draft = &wizard.draft;
    let step = wizard.step();

    let mut body = String::from("<ol class=\"stepper\">");
    for candidate in OnboardingStep::ALL {
        let class = if candidate == step { " class=\"current\"" } else { "" };
        body.push_str(&format!("<li{class}>{}</li>", candidate.title()));
    }
    body.push_str(&format!(
        "</ol><h1>{}</h1><form method=\"get\" action=\"/onboarding\">",
        step.description()
    ));
    body.push_str(&hidden("step", &wizard.step_index().to_string()));

    let purpose = draft.purpose.map(LoanPurpose::code).unwrap_or_default();
    let loans = encode_existing_loans(&draft.existing_loans);

    match step {
        OnboardingStep::ProductType => {
            for product_type in ProductType::ALL {
                let checked = if product_type == draft.product_type {
                    " checked"
                } else {
                    ""
                };
                body.push_str(&format!(
                    "<label><input type=\"radio\" name=\"type\" value=\"{}\"{checked}> {}</label>",
                    product_type.code(),
                    product_type.label()
                ));
            }
        }
        _ => body.push_str(&hidden("type", draft.product_type.code())),
    }

    match step {
        OnboardingStep::Amount => body.push_str(&format!(
            "<label>Сумма <input type=\"number\" name=\"amount\" min=\"0\" step=\"{:.0}\" value=\"{}\"></label>",
            draft.amount_step(),
            draft.amount
        )),
        _ => body.push_str(&hidden("amount", &draft.amount.to_string())),
    }

    match step {
        OnboardingStep::Purpose => {
            body.push_str("<select name=\"purpose\">");
            for option in LoanPurpose::ALL {
                let selected = if draft.purpose == Some(option) {
                    " selected"
                } else {
                    ""
                };
                body.push_str(&format!(
                    "<option value=\"{}\"{selected}>{}</option>",
                    option.code(),
                    option.label()
                ));
            }
            body.push_str(&format!(
                "</select><label>Другое <input type=\"text\" name=\"other_purpose\" value=\"{}\"></label>",
                escape_html(draft.other_purpose.as_deref().unwrap_or_default())
            ));
        }
        _ => {
            body.push_str(&hidden("purpose", purpose));
            body.push_str(&hidden(
                "other_purpose",
                draft.other_purpose.as_deref().unwrap_or_default(),
            ));
        }
    }

    match step {
        OnboardingStep::Profile => body.push_str(&format!(
            "<label>Доход в месяц <input type=\"number\" name=\"income\" min=\"0\" value=\"{}\"></label>\
             <label>Расходы в месяц <input type=\"number\" name=\"expenses\" min=\"0\" value=\"{}\"></label>\
             <label>Текущие кредиты (название:платёж;…) <input type=\"text\" name=\"loans\" value=\"{}\"></label>",
            draft.income,
            draft.expenses,
            escape_html(&loans)
        )),
        _ => {
            body.push_str(&hidden("income", &draft.income.to_string()));
            body.push_str(&hidden("expenses", &draft.expenses.to_string()));
            body.push_str(&hidden("loans", &loans));
        }
    }

    if step == OnboardingStep::Result {
        body.push_str(&format!(
            "<dl class=\"summary\"><dt>Продукт</dt><dd>{}</dd><dt>Сумма</dt><dd>{}</dd>\
             <dt>Доход</dt><dd>{}</dd><dt>Платежи по кредитам</dt><dd>{}</dd></dl>",
            draft.product_type.label(),
            rubles(draft.amount),
            rubles(draft.income),
            rubles(draft.total_monthly_payments()),
        ));
    }

    body.push_str("<div class=\"actions\">");
    if !wizard.is_first() {
        body.push_str("<button name=\"action\" value=\"back\">Назад</button>");
    }
    if wizard.is_last() {
        body.push_str("<button name=\"action\" value=\"finish\">Показать результат</button>");
    } else {
        body.push_str("<button name=\"action\" value=\"next\">Далее</button>");
    }
    body.push_str("</div></form>");

    page("Подбор кредита", &body)
}

fn score_card(result: &ScoreResult) -> String {
    let mut card = format!(
        "<section class=\"score-card {band}\"><p class=\"score\">{score}</p>\
         <p class=\"band\">{label}</p><p>Долговая нагрузка: {ratio}</p><h3>Что повлияло</h3><ul>",
        band = result.band.code(),
        score = result.score,
        label = result.band.label(),
        ratio = format_percent(result.debt_to_income_ratio, 1),
    );
    for message in result.explanation_messages() {
        card.push_str(&format!("<li>{}</li>", escape_html(&message)));
    }
    card.push_str("</ul><h3>Рекомендации</h3><ul class=\"suggestions\">");
    for message in result.suggestion_messages() {
        card.push_str(&format!("<li>{}</li>", escape_html(&message)));
    }
    card.push_str("</ul></section>");
    card
}

pub(crate) fn ai_results(
    result: &ScoreResult,
    authenticated: bool,
    offers_query: &str,
) -> Html<String> {
    let mut body = String::from("<h1>Ваш AI-скор</h1>");
    body.push_str(&score_card(result));
    if !authenticated {
        body.push_str(
            "<p class=\"hint\">Войдите, чтобы учесть вашу кредитную историю в оценке</p>",
        );
    }
    body.push_str(&format!(
        "<a class=\"cta\" href=\"/personal-offers?{}\">Смотреть предложения</a>",
        escape_html(offers_query)
    ));
    page("Результаты AI анализа", &body)
}

pub(crate) fn personal_offers(
    offers: &[RankedOffer],
    filter: &OfferFilter,
    estimate: &ScoreResult,
    profile_query: &str,
) -> Html<String> {
    let mut body = String::from("<h1>Персональные предложения</h1>");
    body.push_str(&score_card(estimate));

    body.push_str("<nav class=\"sort\">");
    for sort in [OfferSort::Approval, OfferSort::Apr, OfferSort::Amount] {
        let class = if sort == filter.sort_by {
            " class=\"active\""
        } else {
            ""
        };
        body.push_str(&format!(
            "<a href=\"/personal-offers?{}&amp;minAmount={}&amp;maxAmount={}&amp;minApr={}&amp;maxApr={}&amp;sortBy={}\"{class}>{}</a> ",
            escape_html(profile_query),
            filter.min_amount,
            filter.max_amount,
            filter.min_apr,
            filter.max_apr,
            sort.code(),
            sort.label()
        ));
    }
    body.push_str("</nav>");

    if offers.is_empty() {
        body.push_str(&empty_state(
            "Подходящих предложений нет",
            "Расширьте диапазон суммы или ставки",
        ));
        return page("Персональные предложения", &body);
    }

    for offer in offers {
        let mut extra = format!(
            "<p class=\"chance\">Шанс одобрения: {}%</p>",
            offer.approval_chance
        );
        if offer.recommended {
            extra.push_str("<span class=\"recommended\">Рекомендуем</span>");
        }
        body.push_str(&product_card(&offer.product, &extra));
    }
    page("Персональные предложения", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use credium::catalog::fixture_products;
    use credium::onboarding::OnboardingDraft;
    use credium::scoring::{ApplicantProfile, ScoreEstimator};

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html("<b>\"A&B\"</b> it's"),
            "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt; it&#39;s"
        );
    }

    #[test]
    fn product_titles_are_escaped() {
        let mut product = fixture_products().remove(0);
        product.title = "<script>alert(1)</script>".to_string();

        let Html(html) = catalog(&[product], None);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_catalog_renders_empty_state() {
        let Html(html) = catalog(&[], Some(ProductType::Card));
        assert!(html.contains("Продукты не найдены"));
        assert!(html.contains("class=\"active\">Кредитная карта"));
    }

    #[test]
    fn onboarding_carries_draft_between_steps() {
        let wizard = OnboardingWizard::at_step(3, OnboardingDraft::default());
        let Html(html) = onboarding(&wizard);

        assert!(html.contains("name=\"income\" min=\"0\" value=\"80000\""));
        assert!(html.contains("<input type=\"hidden\" name=\"amount\" value=\"300000\">"));
        assert!(html.contains("value=\"back\""));
        assert!(html.contains("value=\"next\""));
    }

    #[test]
    fn results_page_shows_band_and_messages() {
        let result = ScoreEstimator::default()
            .estimate(&ApplicantProfile::new(100_000.0, 300_000.0, 0.0));
        let Html(html) = ai_results(&result, false, "type=loan&amount=300000");

        assert!(html.contains("Высокий шанс"));
        assert!(html.contains("Стабильный доход"));
        assert!(html.contains("/personal-offers?type=loan&amp;amount=300000"));
    }
}
