//! Fare scraping from booking-site search pages.
//!
//! Some sites only expose prices in their rendered HTML. For those we fetch
//! the search results page and read every element carrying one of the site's
//! price classes. Only the cheapest value is reported; these pages don't give
//! us reliable per-service details.

use std::sync::LazyLock;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use regex::Regex;
use tracing::debug;

use crate::cities::{CityTable, makemytrip_slugs, redbus_slugs};
use crate::domain::{DateFormat, Fare, Route, TravelDate};

use super::http::{HttpTransport, ProviderConfig};
use super::{FareProvider, ProviderError, ProviderResult};

/// An opening tag with a class attribute, capturing the tag name and the
/// class list. Matched against lowercased HTML.
static CLASSED_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([a-z][a-z0-9]*)\b[^>]*?\bclass\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("valid regex")
});

/// Any tag.
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// How to query one HTML site.
#[derive(Debug, Clone)]
pub struct HtmlSite {
    /// Provider name.
    pub name: &'static str,

    /// Production base URL.
    pub default_base_url: &'static str,

    /// Search path with `{from}`, `{to}` and `{date}` placeholders.
    pub path_template: &'static str,

    /// How the site wants the date written.
    pub date_format: DateFormat,

    /// Class names whose element text is a price.
    pub fare_classes: &'static [&'static str],

    /// Built-in city slugs for this site.
    pub cities: fn() -> CityTable<String>,
}

impl HtmlSite {
    /// RedBus route search page.
    pub fn redbus() -> Self {
        Self {
            name: "RedBus",
            default_base_url: "https://www.redbus.in",
            path_template: "/bus-tickets/{from}-to-{to}?onward={date}",
            date_format: DateFormat::DayAbbrevMonthYear,
            fare_classes: &["fare"],
            cities: redbus_slugs,
        }
    }

    /// MakeMyTrip bus search page.
    pub fn makemytrip() -> Self {
        Self {
            name: "MakeMyTrip",
            default_base_url: "https://www.makemytrip.com",
            path_template: "/bus/search/{from}/{to}/{date}",
            date_format: DateFormat::DayMonthYear,
            fare_classes: &["actual-price", "fare"],
            cities: makemytrip_slugs,
        }
    }

    /// Fill in the search path.
    fn search_path(&self, from: &str, to: &str, date: TravelDate) -> String {
        self.path_template
            .replace("{from}", from)
            .replace("{to}", to)
            .replace("{date}", &date.render(self.date_format))
    }
}

/// A provider that scrapes the lowest fare from a site's search page.
#[derive(Debug, Clone)]
pub struct HtmlFareProvider {
    site: HtmlSite,
    transport: HttpTransport,
    cities: CityTable<String>,
}

impl HtmlFareProvider {
    /// Create a provider for a site with its built-in city slugs.
    pub fn new(site: HtmlSite, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let transport = HttpTransport::new(config, site.default_base_url)?;
        let cities = (site.cities)();
        Ok(Self {
            site,
            transport,
            cities,
        })
    }

    /// Replace the city slug table.
    pub fn with_cities(mut self, cities: CityTable<String>) -> Self {
        self.cities = cities;
        self
    }

    /// Fetch the search page and return the cheapest fare on it.
    pub async fn get_cheapest_fare(
        &self,
        route: &Route,
        date: TravelDate,
    ) -> Result<Option<Fare>, ProviderError> {
        let (from, to) = self.cities.resolve_route(route)?;
        let url = self
            .transport
            .url(&self.site.search_path(&from, &to, date));

        let html = self.transport.get_text(&url).await?;
        let fares = extract_fares(&html, self.site.fare_classes);

        debug!(
            provider = self.site.name,
            route = %route,
            fares_found = fares.len(),
            "Scraped search page"
        );

        Ok(fares.into_iter().min())
    }
}

impl FareProvider for HtmlFareProvider {
    fn name(&self) -> &str {
        self.site.name
    }

    fn timeout(&self) -> Duration {
        self.transport.timeout()
    }

    fn fetch<'a>(
        &'a self,
        route: &'a Route,
        date: TravelDate,
    ) -> BoxFuture<'a, Result<ProviderResult, ProviderError>> {
        async move {
            self.get_cheapest_fare(route, date)
                .await
                .map(ProviderResult::CheapestFare)
        }
        .boxed()
    }
}

/// Read every price shown in elements with one of the given classes.
///
/// An element's text runs to its matching closing tag, so nested elements
/// are included. Tags, rupee signs, thousands separators and common entities
/// are removed; anything that still isn't a number is skipped.
pub fn extract_fares(html: &str, classes: &[&str]) -> Vec<Fare> {
    // ASCII lowercasing keeps byte offsets, so match positions index `html` too
    let lower = html.to_ascii_lowercase();
    let mut fares = Vec::new();

    for caps in CLASSED_TAG.captures_iter(&lower) {
        let (Some(open), Some(tag), Some(class_list)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if !class_list
            .as_str()
            .split_whitespace()
            .any(|class| classes.contains(&class))
        {
            continue;
        }

        let Some(end) = matching_close(&lower, open.end(), tag.as_str()) else {
            continue;
        };

        let inner = &html[open.end()..end];
        let text = TAG
            .replace_all(inner, "")
            .replace("&#8377;", "")
            .replace("&#x20b9;", "")
            .replace("&nbsp;", "");

        if let Ok(fare) = Fare::parse(&text) {
            fares.push(fare);
        }
    }

    fares
}

/// Byte offset of the `</tag` closing the element whose content starts at
/// `from`, counting nested elements of the same name.
fn matching_close(lower: &str, from: usize, tag: &str) -> Option<usize> {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut depth = 1usize;
    let mut pos = from;

    while let Some(rel) = lower[pos..].find('<') {
        let at = pos + rel;
        let rest = &lower[at..];
        if starts_tag(rest, &close) {
            depth -= 1;
            if depth == 0 {
                return Some(at);
            }
        } else if starts_tag(rest, &open) {
            let self_closing = rest
                .find('>')
                .is_some_and(|gt| rest[..gt].ends_with('/'));
            if !self_closing {
                depth += 1;
            }
        }
        pos = at + 1;
    }

    None
}

/// True if `rest` starts with `prefix` followed by something other than a
/// name character, so `<div` doesn't match `<divider`.
fn starts_tag(rest: &str, prefix: &str) -> bool {
    rest.strip_prefix(prefix).is_some_and(|after| {
        after
            .bytes()
            .next()
            .is_none_or(|b| !b.is_ascii_alphanumeric() && b != b'-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn route(from: &str, to: &str) -> Route {
        Route::parse(from, to).unwrap()
    }

    fn date() -> TravelDate {
        TravelDate::parse("14-09-2025").unwrap()
    }

    #[test]
    fn extracts_marked_prices() {
        let html = r#"
            <div class="bus-item">
              <span class="fare d-block">₹ 1,250</span>
              <div class="seat-fare"><span class="fare">&#8377;899</span></div>
              <span class="discount">₹ 100</span>
            </div>"#;
        let fares = extract_fares(html, &["fare"]);
        assert_eq!(fares, vec![Fare::from_rupees(1250), Fare::from_rupees(899)]);
    }

    #[test]
    fn nested_tags_are_stripped() {
        let html = r#"<p class='actual-price'><b>₹</b>640</p>"#;
        assert_eq!(extract_fares(html, &["actual-price"]), vec![Fare::from_rupees(640)]);
    }

    #[test]
    fn nested_same_name_elements_are_read_whole() {
        let html = r#"<div class="fare"><div class="currency">₹</div>599</div>"#;
        assert_eq!(extract_fares(html, &["fare"]), vec![Fare::from_rupees(599)]);
    }

    #[test]
    fn deeper_nesting_and_siblings() {
        let html = r#"
            <div class="bus">
              <div class="fare"><div><div>&#8377;</div></div><span>1,020</span></div>
              <div class="fare"><div class="strike"></div>875<br/></div>
              <div class="seat-count">12</div>
            </div>"#;
        assert_eq!(
            extract_fares(html, &["fare"]),
            vec![Fare::from_rupees(1020), Fare::from_rupees(875)]
        );
    }

    #[test]
    fn unclosed_element_is_skipped() {
        let html = r#"<div class="fare"><div>₹</div>599"#;
        assert!(extract_fares(html, &["fare"]).is_empty());
    }

    #[test]
    fn similar_tag_names_do_not_nest() {
        assert!(starts_tag("<div class=x>", "<div"));
        assert!(starts_tag("</div>", "</div"));
        assert!(!starts_tag("<divider>", "<div"));
        assert!(!starts_tag("<div-x>", "<div"));
    }

    #[test]
    fn sites_carry_their_own_city_tables() {
        let route = Route::parse("Chennai", "Erode").unwrap();
        let redbus = (HtmlSite::redbus().cities)().resolve_route(&route).unwrap();
        assert_eq!(redbus, ("chennai".to_string(), "erode".to_string()));
        let mmt = (HtmlSite::makemytrip().cities)().resolve_route(&route).unwrap();
        assert_eq!(mmt, ("Chennai".to_string(), "Erode".to_string()));
    }

    #[test]
    fn class_match_is_by_token() {
        let html = r#"<span class="fares-header">999</span><span class="fare">500</span>"#;
        assert_eq!(extract_fares(html, &["fare"]), vec![Fare::from_rupees(500)]);
    }

    #[test]
    fn non_numeric_text_skipped() {
        let html = r#"<span class="fare">Sold out</span><span class="fare"></span>"#;
        assert!(extract_fares(html, &["fare"]).is_empty());
    }

    #[test]
    fn search_paths() {
        let redbus = HtmlSite::redbus();
        assert_eq!(
            redbus.search_path("chennai", "erode", date()),
            "/bus-tickets/chennai-to-erode?onward=14-Sep-2025"
        );
        let mmt = HtmlSite::makemytrip();
        assert_eq!(
            mmt.search_path("Chennai", "Erode", date()),
            "/bus/search/Chennai/Erode/14-09-2025"
        );
    }

    #[tokio::test]
    async fn redbus_cheapest_from_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bus-tickets/chennai-to-madurai"))
            .and(query_param("onward", "14-Sep-2025"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<ul><li><span class="fare">₹700</span></li><li><span class="fare">₹560</span></li></ul>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig::default().with_base_url(server.uri());
        let provider = HtmlFareProvider::new(HtmlSite::redbus(), &config).unwrap();
        let result = provider.fetch(&route("Chennai", "MADURAI"), date()).await.unwrap();
        assert_eq!(
            result,
            ProviderResult::CheapestFare(Some(Fare::from_rupees(560)))
        );
    }

    #[tokio::test]
    async fn page_without_prices_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>No buses found</p>"))
            .mount(&server)
            .await;

        let config = ProviderConfig::default().with_base_url(server.uri());
        let provider = HtmlFareProvider::new(HtmlSite::makemytrip(), &config).unwrap();
        let fare = provider
            .get_cheapest_fare(&route("Chennai", "Salem"), date())
            .await
            .unwrap();
        assert_eq!(fare, None);
    }

    #[tokio::test]
    async fn unmapped_city_fails_closed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = ProviderConfig::default().with_base_url(server.uri());
        let provider = HtmlFareProvider::new(HtmlSite::redbus(), &config)
            .unwrap()
            .with_cities(CityTable::from_entries([("Chennai", "chennai".to_string())]));
        let result = provider
            .get_cheapest_fare(&route("Chennai", "Erode"), date())
            .await;
        assert!(matches!(result, Err(ProviderError::UnknownCity(_))));
    }

    #[tokio::test]
    async fn server_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = ProviderConfig::default().with_base_url(server.uri());
        let provider = HtmlFareProvider::new(HtmlSite::redbus(), &config).unwrap();
        let result = provider.fetch(&route("Chennai", "Salem"), date()).await;
        assert!(matches!(result, Err(ProviderError::Api { status: 500, .. })));
    }
}
