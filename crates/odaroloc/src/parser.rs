use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{HomepageDetails, RawProfile};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing expected element: {0}")]
    MissingField(String),
}

// Nav chrome that ends up inside committee anchors on the malformed legacy pages.
const COMMITTEE_DENYLIST: [&str; 3] = ["Top", "State Home", "Colorado Legislature"];

static RE_TRAILING_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*$").expect("invalid regex: trailing parenthetical"));
static RE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{3})(-|\))?(\d{3})-(\d{4})").expect("invalid regex: phone"));

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn clean_name(raw: &str) -> String {
    let collapsed = normalize_whitespace(raw);
    RE_TRAILING_PAREN.replace(&collapsed, "").trim().to_string()
}

/// Committee display names from raw link-label text. With `cleanup` the noisy
/// legacy labels are split on the "--" delimiter, denylisted chrome strings
/// dropped and blanks discarded; without it labels pass through trimmed.
pub(crate) fn committee_labels<I>(raw: I, cleanup: bool) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    raw.into_iter()
        .filter_map(|label| {
            let name = if cleanup {
                let (name, _) = label.split_once("--")?;
                name.trim().to_string()
            } else {
                label.trim().to_string()
            };
            if name.is_empty() || (cleanup && COMMITTEE_DENYLIST.contains(&name.as_str())) {
                return None;
            }
            Some(name)
        })
        .collect()
}

fn resolve_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", crate::BASE_URL, href)
    }
}

pub(crate) fn parse_directory(html: &str) -> Result<HashMap<String, String>, ParseError> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table#legislators-overview-table tbody tr").unwrap();
    let link_selector = Selector::parse("td a").unwrap();

    let mut pages = HashMap::new();
    for row in document.select(&row_selector) {
        let link = row
            .select(&link_selector)
            .next()
            .ok_or_else(|| ParseError::MissingField("directory row link".to_string()))?;
        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| ParseError::MissingField("directory row link href".to_string()))?;

        let district = row
            .text()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .unwrap_or_default()
            .to_string();

        pages.insert(district, resolve_url(href));
    }

    Ok(pages)
}

fn field_text(
    group: ElementRef,
    field_selector: &Selector,
    label: &str,
) -> Result<String, ParseError> {
    group
        .select(field_selector)
        .next()
        .map(|e| normalize_whitespace(&elem_text(e)))
        .ok_or_else(|| ParseError::MissingField(label.to_string()))
}

pub(crate) fn parse_profile(html: &str, url: &str) -> Result<RawProfile, ParseError> {
    let document = Html::parse_document(html);

    let main_selector = Selector::parse("div.main-content-section main").unwrap();
    let main = document
        .select(&main_selector)
        .next()
        .ok_or_else(|| ParseError::MissingField("main content section".to_string()))?;

    // The legislator-content block holds 2-3 field groups; the first is the
    // occupation, the second the party.
    let group_selector = Selector::parse("article div.legislator-content > div").unwrap();
    let field_selector = Selector::parse("div.field-items > div").unwrap();
    let groups: Vec<ElementRef> = main.select(&group_selector).collect();

    let occupation_group = *groups
        .first()
        .ok_or_else(|| ParseError::MissingField("occupation field group".to_string()))?;
    let party_group = *groups
        .get(1)
        .ok_or_else(|| ParseError::MissingField("party field group".to_string()))?;

    let occupation = field_text(occupation_group, &field_selector, "occupation")?;
    let party = field_text(party_group, &field_selector, "party")?;

    let name_selector = Selector::parse("article header h1").unwrap();
    let name = main
        .select(&name_selector)
        .next()
        .map(|e| clean_name(&elem_text(e)))
        .ok_or_else(|| ParseError::MissingField("name header".to_string()))?;

    let photo_selector =
        Selector::parse("div.legislator-body div.legislator-profile-picture img").unwrap();
    let photo_url = main
        .select(&photo_selector)
        .next()
        .and_then(|e| e.value().attr("src"))
        .map(str::to_string)
        .ok_or_else(|| ParseError::MissingField("profile picture".to_string()))?;

    let committee_selector = Selector::parse("div.committee-assignment").unwrap();
    let committees = committee_labels(main.select(&committee_selector).map(elem_text), false);

    let aside_selector = Selector::parse("div.main-content-section aside").unwrap();
    let sidebar = document
        .select(&aside_selector)
        .next()
        .ok_or_else(|| ParseError::MissingField("contact sidebar".to_string()))?;

    let email_selector =
        Selector::parse("#block-cga-legislators-legislator-contact div.contact-email a").unwrap();
    let email = sidebar
        .select(&email_selector)
        .next()
        .and_then(|e| e.value().attr("href"))
        .map(|href| href.trim_start_matches("mailto:").to_string())
        .ok_or_else(|| ParseError::MissingField("contact email".to_string()))?;

    let phone_selector = Selector::parse(
        "#block-cga-legislators-legislator-contact div.contact-phone div.field-items > div",
    )
    .unwrap();
    let phone = sidebar
        .select(&phone_selector)
        .next()
        .map(|e| normalize_whitespace(&elem_text(e)))
        .ok_or_else(|| ParseError::MissingField("contact phone".to_string()))?;

    Ok(RawProfile {
        name,
        party,
        occupation,
        photo_url,
        email: Some(email),
        phone: Some(phone),
        committees,
        homepage: url.to_string(),
    })
}

pub(crate) fn parse_homepage(html: &str) -> Result<HomepageDetails, ParseError> {
    let document = Html::parse_document(html);

    let email_selector = Selector::parse("a[href*='mailto']").unwrap();
    let email_href = document
        .select(&email_selector)
        .next()
        .and_then(|e| e.value().attr("href"))
        .ok_or_else(|| ParseError::MissingField("mailto link".to_string()))?;
    let email = email_href
        .split_once(':')
        .map(|(_, addr)| addr.to_string())
        .ok_or_else(|| ParseError::MissingField("mailto address".to_string()))?;

    let info_selector = Selector::parse("div[align='center']").unwrap();
    let info = document
        .select(&info_selector)
        .next()
        .ok_or_else(|| ParseError::MissingField("info block".to_string()))?;
    let phone = RE_PHONE
        .captures(&elem_text(info))
        .map(|caps| format!("{} {} {}", &caps[1], &caps[3], &caps[4]));

    let committee_selector = Selector::parse("a[href*='CLC'] font").unwrap();
    let committees = committee_labels(
        document
            .select(&committee_selector)
            .map(|e| normalize_whitespace(&elem_text(e))),
        true,
    );

    let photo_selector =
        Selector::parse("img[src*='.jpg'], img[src*='.jpeg'], img[src*='.png']").unwrap();
    let photo_url = document
        .select(&photo_selector)
        .next()
        .and_then(|e| e.value().attr("src"))
        .map(str::to_string)
        .ok_or_else(|| ParseError::MissingField("member photo".to_string()))?;

    Ok(HomepageDetails {
        email,
        phone,
        committees,
        photo_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_URL: &str = "http://leg.colorado.gov/legislators/irene-aguilar";

    fn profile_html() -> String {
        r#"
        <html><body>
        <div class="main-content-section">
          <main>
            <article>
              <header><h1>Irene   Aguilar
                (D-District 32)</h1></header>
              <div>
                <div class="legislator-content">
                  <div>
                    <div class="field-items"><div>Physician</div></div>
                  </div>
                  <div>
                    <div class="field-items"><div>Democratic</div></div>
                  </div>
                </div>
              </div>
              <div class="legislator-body">
                <div class="legislator-profile-picture">
                  <div><div><div>
                    <img src="http://leg.colorado.gov/sites/default/files/aguilar.jpg">
                  </div></div></div>
                </div>
              </div>
            </article>
            <div><div><div><div>
              <div class="committee-assignment">Health and Human Services</div>
              <div class="committee-assignment">Joint Budget Committee</div>
            </div></div></div></div>
          </main>
          <aside>
            <div>
              <div id="block-cga-legislators-legislator-contact">
                <div><div><div>
                  <div class="contact-email">
                    <a href="mailto:irene.aguilar.senate@state.co.us">Email</a>
                  </div>
                  <div class="contact-phone">
                    <div><div class="field-items"><div>303 866-4840</div></div></div>
                  </div>
                </div></div></div>
              </div>
            </div>
          </aside>
        </div>
        </body></html>
        "#
        .to_string()
    }

    #[test]
    fn normalize_whitespace_collapses_runs() {
        assert_eq!(
            normalize_whitespace("Irene \n\r Aguilar   (D)"),
            "Irene Aguilar (D)"
        );
    }

    #[test]
    fn normalize_whitespace_is_idempotent() {
        let once = normalize_whitespace("  a \n b\r\nc  ");
        assert_eq!(normalize_whitespace(&once), once);
    }

    #[test]
    fn clean_name_strips_trailing_parenthetical() {
        assert_eq!(clean_name("Jane Doe (D-District 5)"), "Jane Doe");
        assert_eq!(clean_name("Jane Doe"), "Jane Doe");
        assert_eq!(clean_name("Jane\nDoe  (R)"), "Jane Doe");
    }

    #[test]
    fn committee_cleanup_drops_denylist_and_blanks() {
        let raw = vec![
            "Agriculture, Livestock and Natural Resources -- Senate Committee".to_string(),
            "Top -- chrome".to_string(),
            "State Home -- chrome".to_string(),
            "Colorado Legislature -- chrome".to_string(),
            "   -- chrome".to_string(),
            "No delimiter here".to_string(),
            "Health and Human Services -- Senate Committee".to_string(),
        ];

        let cleaned = committee_labels(raw, true);
        assert_eq!(
            cleaned,
            vec![
                "Agriculture, Livestock and Natural Resources".to_string(),
                "Health and Human Services".to_string(),
            ]
        );
        assert!(cleaned.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn committee_labels_without_cleanup_keep_chrome() {
        let raw = vec!["Top".to_string(), "  Joint Budget Committee ".to_string()];
        assert_eq!(
            committee_labels(raw, false),
            vec!["Top".to_string(), "Joint Budget Committee".to_string()]
        );
    }

    #[test]
    fn directory_yields_one_entry_per_row() {
        let html = r#"
            <table id="legislators-overview-table">
              <thead><tr><th>District</th><th>Name</th></tr></thead>
              <tbody>
                <tr><td>1</td><td><a href="/legislators/irene-aguilar">Irene Aguilar</a></td></tr>
                <tr><td>2</td><td><a href="/legislators/john-doe">John Doe</a></td></tr>
                <tr><td>3</td><td><a href="/legislators/jane-roe">Jane Roe</a></td></tr>
              </tbody>
            </table>
        "#;

        let pages = parse_directory(html).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(
            pages.get("1").map(String::as_str),
            Some("http://leg.colorado.gov/legislators/irene-aguilar")
        );
        assert!(pages.values().all(|u| u.starts_with("http://leg.colorado.gov")));
    }

    #[test]
    fn directory_keeps_absolute_urls_verbatim() {
        let html = r#"
            <table id="legislators-overview-table"><tbody>
              <tr><td>9</td><td><a href="http://example.com/member">Member</a></td></tr>
            </tbody></table>
        "#;

        let pages = parse_directory(html).unwrap();
        assert_eq!(
            pages.get("9").map(String::as_str),
            Some("http://example.com/member")
        );
    }

    #[test]
    fn directory_row_without_anchor_is_an_error() {
        let html = r#"
            <table id="legislators-overview-table"><tbody>
              <tr><td>5</td><td>No link here</td></tr>
            </tbody></table>
        "#;

        assert!(matches!(
            parse_directory(html),
            Err(ParseError::MissingField(_))
        ));
    }

    #[test]
    fn directory_anchor_without_href_is_an_error() {
        let html = r#"
            <table id="legislators-overview-table"><tbody>
              <tr><td>5</td><td><a name="anchor-only">Jane Roe</a></td></tr>
            </tbody></table>
        "#;

        assert!(matches!(
            parse_directory(html),
            Err(ParseError::MissingField(_))
        ));
    }

    #[test]
    fn profile_extracts_all_fields() {
        let profile = parse_profile(&profile_html(), PROFILE_URL).unwrap();

        assert_eq!(profile.name, "Irene Aguilar");
        assert_eq!(profile.party, "Democratic");
        assert_eq!(profile.occupation, "Physician");
        assert_eq!(
            profile.photo_url,
            "http://leg.colorado.gov/sites/default/files/aguilar.jpg"
        );
        assert_eq!(
            profile.email.as_deref(),
            Some("irene.aguilar.senate@state.co.us")
        );
        assert_eq!(profile.phone.as_deref(), Some("303 866-4840"));
        assert_eq!(
            profile.committees,
            vec![
                "Health and Human Services".to_string(),
                "Joint Budget Committee".to_string(),
            ]
        );
        assert_eq!(profile.homepage, PROFILE_URL);
    }

    #[test]
    fn profile_missing_mailto_anchor_fails() {
        let html = profile_html().replace(
            r#"<a href="mailto:irene.aguilar.senate@state.co.us">Email</a>"#,
            "",
        );

        assert!(matches!(
            parse_profile(&html, PROFILE_URL),
            Err(ParseError::MissingField(field)) if field == "contact email"
        ));
    }

    #[test]
    fn profile_missing_party_group_fails() {
        let html = profile_html().replace(
            r#"<div>
                    <div class="field-items"><div>Democratic</div></div>
                  </div>"#,
            "",
        );

        assert!(parse_profile(&html, PROFILE_URL).is_err());
    }

    #[test]
    fn profile_missing_photo_fails() {
        let html = profile_html().replace(
            r#"<img src="http://leg.colorado.gov/sites/default/files/aguilar.jpg">"#,
            "",
        );

        assert!(matches!(
            parse_profile(&html, PROFILE_URL),
            Err(ParseError::MissingField(field)) if field == "profile picture"
        ));
    }

    #[test]
    fn homepage_extracts_cleaned_fields() {
        let html = r#"
            <html><body>
            <a href="http://www.leg.state.co.us/CLICS/CLC2013.nsf/commsumm"><font>
              Health and Human Services -- Senate Committee
            </font></a>
            <a href="http://www.leg.state.co.us/CLICS/CLC2013.nsf/top"><font>Top</font></a>
            <a href="http://www.leg.state.co.us/CLICS/CLC2013.nsf/chrome"><font>State Home -- nav</font></a>
            <div align="center">
              Capitol Phone: 303-866-4840<br>
              Room 346
            </div>
            <a href="mailto:irene.aguilar.senate@state.co.us">Send email</a>
            <img src="http://www.state.co.us/gov_dir/leg_dir/senate/members/aguilar.jpg">
            </body></html>
        "#;

        let details = parse_homepage(html).unwrap();
        assert_eq!(details.email, "irene.aguilar.senate@state.co.us");
        assert_eq!(details.phone.as_deref(), Some("303 866 4840"));
        assert_eq!(
            details.committees,
            vec!["Health and Human Services".to_string()]
        );
        assert_eq!(
            details.photo_url,
            "http://www.state.co.us/gov_dir/leg_dir/senate/members/aguilar.jpg"
        );
    }

    #[test]
    fn homepage_without_phone_number_yields_none() {
        let html = r#"
            <html><body>
            <div align="center">Room 346</div>
            <a href="mailto:someone@state.co.us">Send email</a>
            <img src="/members/photo.png">
            </body></html>
        "#;

        let details = parse_homepage(html).unwrap();
        assert_eq!(details.phone, None);
        assert!(details.committees.is_empty());
    }

    #[test]
    fn homepage_without_mailto_fails() {
        let html = r#"
            <html><body>
            <div align="center">303-866-4840</div>
            <img src="/members/photo.jpg">
            </body></html>
        "#;

        assert!(matches!(
            parse_homepage(html),
            Err(ParseError::MissingField(field)) if field == "mailto link"
        ));
    }
}
