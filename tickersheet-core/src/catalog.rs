//! NIFTY index catalog — display name to Yahoo Finance symbol.
//!
//! The table is plain data: one `(display name, provider symbol)` pair per
//! line, grouped the way NSE groups its index families. Keep it sorted within
//! each group so diffs stay readable.

/// Every selectable index, in presentation order.
pub const NIFTY_INDICES: &[(&str, &str)] = &[
    // Broad market
    ("NIFTY 50", "^NSEI"),
    ("NIFTY NEXT 50", "^NIFTYNXT50"),
    ("NIFTY 100", "^CNX100"),
    ("NIFTY 200", "^CNX200"),
    ("NIFTY 500", "^CNX500"),
    ("NIFTY MIDCAP 50", "^NSMIDCP"),
    ("NIFTY MIDCAP 100", "^NIFTY_MIDCAP_100"),
    ("NIFTY SMALLCAP 100", "^NIFTY_SMLCAP_100"),
    // Banking & financial services
    ("NIFTY BANK", "^NSEBANK"),
    ("NIFTY FINANCIAL SERVICES", "^CNXFINANCE"),
    ("NIFTY PRIVATE BANK", "^NIFTYPVTBANK"),
    ("NIFTY PSU BANK", "^CNXPSUBANK"),
    ("NIFTY FINANCIAL SERVICES 25/50", "^NIFTY_FIN_SERVICE25_50"),
    // Sectoral
    ("NIFTY AUTO", "^CNXAUTO"),
    ("NIFTY IT", "^CNXIT"),
    ("NIFTY PHARMA", "^CNXPHARMA"),
    ("NIFTY FMCG", "^CNXFMCG"),
    ("NIFTY METAL", "^CNXMETAL"),
    ("NIFTY REALTY", "^CNXREALTY"),
    ("NIFTY MEDIA", "^CNXMEDIA"),
    ("NIFTY HEALTHCARE", "^CNXHEALTH"),
    ("NIFTY CONSUMER DURABLES", "^CNXCONSUMERDUR"),
    ("NIFTY OIL & GAS", "^CNXOILGAS"),
    // Energy & infrastructure
    ("NIFTY ENERGY", "^CNXENERGY"),
    ("NIFTY INFRASTRUCTURE", "^CNXINFRA"),
    ("NIFTY PSE", "^CNXPSE"),
    // Thematic
    ("NIFTY CONSUMPTION", "^CNXCONSUMPTION"),
    ("NIFTY COMMODITIES", "^CNXCOMMODITIES"),
    ("NIFTY SERVICES SECTOR", "^CNXSERVICE"),
    ("NIFTY MNC", "^CNXMNC"),
];

/// Look up the provider symbol for an index display name.
///
/// Matching is exact: the catalog keys are what the selection surfaces offer.
pub fn provider_symbol(name: &str) -> Option<&'static str> {
    NIFTY_INDICES
        .iter()
        .find(|(display, _)| *display == name)
        .map(|(_, symbol)| *symbol)
}

/// All display names in catalog order.
pub fn index_names() -> impl Iterator<Item = &'static str> {
    NIFTY_INDICES.iter().map(|(display, _)| *display)
}
