mod parser;
pub mod scraper;
pub mod sink;
pub mod types;
pub mod utils;

pub use crate::scraper::WebScraper;

pub(crate) const BASE_URL: &str = "http://leg.colorado.gov";

/// Photo host used by the pre-redesign member homepages.
pub const LEGACY_IMAGE_BASE_URL: &str =
    "http://www.state.co.us/gov_dir/leg_dir/senate/members/";

pub const CAPITOL_ADDRESS: &str = "200 E. Colfax\nDenver, CO 80203";
