use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("Invalid chamber '{0}'. Accepted values: 'upper', 'senate', 'lower', 'house'")]
pub struct ChamberParseError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chamber {
    Upper,
    Lower,
}

impl Chamber {
    /// Numeric value the listing page's chamber filter expects.
    pub fn site_code(&self) -> &'static str {
        match self {
            Chamber::Upper => "2",
            Chamber::Lower => "1",
        }
    }
}

impl FromStr for Chamber {
    type Err = ChamberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upper" | "senate" => Ok(Chamber::Upper),
            "lower" | "house" => Ok(Chamber::Lower),
            _ => Err(ChamberParseError(s.to_string())),
        }
    }
}

impl Display for Chamber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chamber::Upper => write!(f, "Senate"),
            Chamber::Lower => write!(f, "House of Representatives"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("No term '{0}' in session metadata")]
    UnknownTerm(String),
    #[error("Term '{0}' has no sessions")]
    NoSessions(String),
    #[error("Failed to read metadata file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse metadata file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub sessions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMetadata {
    pub terms: Vec<Term>,
}

impl TermMetadata {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Current session of a term. The last listed session is taken as current.
    pub fn latest_session(&self, term: &str) -> Result<&str, MetadataError> {
        let matched = self
            .terms
            .iter()
            .rfind(|t| t.name == term)
            .ok_or_else(|| MetadataError::UnknownTerm(term.to_string()))?;

        matched
            .sessions
            .last()
            .map(String::as_str)
            .ok_or_else(|| MetadataError::NoSessions(term.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfile {
    pub name: String,
    pub party: String,
    pub occupation: String,
    pub photo_url: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub committees: Vec<String>,
    pub homepage: String,
}

impl Display for RawProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({})", self.name, self.party)?;
        writeln!(f, "  Occupation: {}", self.occupation)?;
        if let Some(email) = &self.email {
            writeln!(f, "  Email:      {}", email)?;
        }
        if let Some(phone) = &self.phone {
            writeln!(f, "  Phone:      {}", phone)?;
        }
        if !self.committees.is_empty() {
            writeln!(f, "  Committees: {}", self.committees.join(", "))?;
        }
        writeln!(f, "  Photo:      {}", self.photo_url)?;
        write!(f, "  Profile:    {}", self.homepage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomepageDetails {
    pub email: String,
    pub phone: Option<String>,
    pub committees: Vec<String>,
    pub photo_url: String,
}

impl Display for HomepageDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Email: {}", self.email)?;
        if let Some(phone) = &self.phone {
            writeln!(f, "Phone: {}", phone)?;
        }
        if !self.committees.is_empty() {
            writeln!(f, "Committees: {}", self.committees.join(", "))?;
        }
        write!(f, "Photo: {}", self.photo_url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficeKind {
    Capitol,
    District,
}

impl Display for OfficeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfficeKind::Capitol => write!(f, "capitol"),
            OfficeKind::District => write!(f, "district"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeRecord {
    pub kind: OfficeKind,
    pub name: String,
    pub phone: Option<String>,
    pub address: String,
    pub email: Option<String>,
}

impl OfficeRecord {
    pub fn capitol(phone: Option<String>, email: Option<String>) -> Self {
        Self {
            kind: OfficeKind::Capitol,
            name: "Capitol Office".to_string(),
            phone,
            address: crate::CAPITOL_ADDRESS.to_string(),
            email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislatorRecord {
    pub term: String,
    pub chamber: Chamber,
    pub district: String,
    pub full_name: String,
    pub party: String,
    pub occupation: String,
    pub photo_url: String,
    pub url: String,
    pub office: OfficeRecord,
    pub source: String,
}

impl LegislatorRecord {
    pub fn from_profile(
        term: &str,
        chamber: Chamber,
        district: &str,
        profile: RawProfile,
    ) -> Self {
        Self {
            term: term.to_string(),
            chamber,
            district: district.to_string(),
            full_name: profile.name,
            party: profile.party,
            occupation: profile.occupation,
            photo_url: profile.photo_url,
            url: profile.homepage.clone(),
            office: OfficeRecord::capitol(profile.phone, profile.email),
            source: profile.homepage,
        }
    }
}

impl Display for LegislatorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} ({}), {} district {}",
            self.full_name, self.party, self.chamber, self.district
        )?;
        writeln!(f, "     Occupation: {}", self.occupation)?;
        if let Some(phone) = &self.office.phone {
            writeln!(f, "     {}: {}", self.office.name, phone)?;
        }
        if let Some(email) = &self.office.email {
            writeln!(f, "     Email: {}", email)?;
        }
        write!(f, "     {}", self.url)
    }
}
