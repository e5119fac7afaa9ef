use crate::types::LegislatorRecord;

#[derive(Debug)]
pub struct ScrapeStats {
    pub democratic: usize,
    pub republican: usize,
    pub other: usize,
    pub total: usize,
}

impl ScrapeStats {
    pub fn from_records(records: &[LegislatorRecord]) -> ScrapeStats {
        ScrapeStats {
            democratic: records.iter().filter(|r| r.party == "Democratic").count(),
            republican: records.iter().filter(|r| r.party == "Republican").count(),
            other: records
                .iter()
                .filter(|r| r.party != "Democratic" && r.party != "Republican")
                .count(),
            total: records.len(),
        }
    }
}

impl std::fmt::Display for ScrapeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Democratic: {}", self.democratic)?;
        writeln!(f, "  Republican: {}", self.republican)?;
        writeln!(f, "  Other:      {}", self.other)?;
        writeln!(f, "  Total:      {}", self.total)
    }
}
