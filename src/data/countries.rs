/// Country names offered in the UI and the code used in `ISO_COUNTRY_CODE`.
///
/// EU member states plus EEA, Switzerland and the United Kingdom. TED uses
/// `UK` rather than `GB`.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("Austria", "AT"),
    ("Belgium", "BE"),
    ("Bulgaria", "BG"),
    ("Croatia", "HR"),
    ("Cyprus", "CY"),
    ("Czech Republic", "CZ"),
    ("Denmark", "DK"),
    ("Estonia", "EE"),
    ("Finland", "FI"),
    ("France", "FR"),
    ("Germany", "DE"),
    ("Greece", "GR"),
    ("Hungary", "HU"),
    ("Ireland", "IE"),
    ("Italy", "IT"),
    ("Latvia", "LV"),
    ("Lithuania", "LT"),
    ("Luxembourg", "LU"),
    ("Malta", "MT"),
    ("Netherlands", "NL"),
    ("Poland", "PL"),
    ("Portugal", "PT"),
    ("Romania", "RO"),
    ("Slovakia", "SK"),
    ("Slovenia", "SI"),
    ("Spain", "ES"),
    ("Sweden", "SE"),
    ("Norway", "NO"),
    ("Iceland", "IS"),
    ("Liechtenstein", "LI"),
    ("Switzerland", "CH"),
    ("United Kingdom", "UK"),
];

/// Code for a country name, e.g. `"Germany"` → `"DE"`.
pub fn code_for(name: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}

/// Name for a country code, e.g. `"DE"` → `"Germany"`.
pub fn name_for(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code))
        .map(|(name, _)| *name)
}

/// Normalise a configured entry, which may be either a name or a code.
pub fn resolve(entry: &str) -> Option<&'static str> {
    let entry = entry.trim();
    code_for(entry).or_else(|| name_for(entry).and_then(code_for))
}
