mod table;

use shared::{DiseaseClass, DiseaseInfo, DiseaseSeverity, DiseaseSummary};

use table::{
    DiseaseRecord, RECORDS, UNKNOWN_COST, UNKNOWN_DESCRIPTION, UNKNOWN_PREVENTION,
    UNKNOWN_RECOVERY, UNKNOWN_SYMPTOMS, UNKNOWN_TREATMENT,
};

/// Which rule of the lookup chain answered a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupRule {
    Exact,
    TokenOverlap,
    HealthyKeyword,
    Unknown,
}

impl LookupRule {
    pub const CHAIN: [LookupRule; 4] = [
        LookupRule::Exact,
        LookupRule::TokenOverlap,
        LookupRule::HealthyKeyword,
        LookupRule::Unknown,
    ];

    fn apply(self, kb: &KnowledgeBase, query: &str) -> Option<DiseaseInfo> {
        match self {
            LookupRule::Exact => kb.exact(query).cloned(),
            LookupRule::TokenOverlap => kb.token_overlap(query).cloned(),
            LookupRule::HealthyKeyword => query
                .to_lowercase()
                .contains("healthy")
                .then(|| kb.entry(DiseaseClass::Healthy).clone()),
            LookupRule::Unknown => Some(unknown_record(query)),
        }
    }
}

/// Read-only disease metadata, built once and shared by every call.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<DiseaseInfo>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase {
    pub fn new() -> Self {
        let entries = RECORDS.iter().map(record_info).collect();
        Self { entries }
    }

    pub fn entry(&self, class: DiseaseClass) -> &DiseaseInfo {
        &self.entries[class.index()]
    }

    /// Never fails; unmatched queries get a generic `Unknown` record.
    pub fn describe(&self, query: &str) -> DiseaseInfo {
        self.lookup(query).0
    }

    pub fn lookup(&self, query: &str) -> (DiseaseInfo, LookupRule) {
        for rule in LookupRule::CHAIN {
            if let Some(info) = rule.apply(self, query) {
                log::debug!("Disease lookup {:?} answered by {:?}", query, rule);
                return (info, rule);
            }
        }
        // Unknown always answers
        (unknown_record(query), LookupRule::Unknown)
    }

    pub fn list(&self) -> Vec<DiseaseSummary> {
        DiseaseClass::registered()
            .map(|class| {
                let info = self.entry(class);
                DiseaseSummary {
                    class_id: class,
                    display_name: info.name.clone(),
                    severity: info.severity,
                }
            })
            .collect()
    }

    fn exact(&self, query: &str) -> Option<&DiseaseInfo> {
        self.entries.iter().find(|info| info.class_id == query)
    }

    fn token_overlap(&self, query: &str) -> Option<&DiseaseInfo> {
        let query_tokens = tokens(query);
        if query_tokens.is_empty() {
            return None;
        }
        self.entries.iter().find(|info| {
            tokens(&info.class_id)
                .iter()
                .any(|token| query_tokens.contains(token))
        })
    }
}

fn tokens(value: &str) -> Vec<String> {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn title_case(value: &str) -> String {
    value
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn unknown_record(query: &str) -> DiseaseInfo {
    let name = title_case(query);
    DiseaseInfo {
        class_id: query.to_string(),
        name: if name.is_empty() { "Unknown Disease".to_string() } else { name },
        severity: DiseaseSeverity::Unknown,
        description: UNKNOWN_DESCRIPTION.to_string(),
        symptoms: to_strings(UNKNOWN_SYMPTOMS),
        treatment: to_strings(UNKNOWN_TREATMENT),
        prevention: to_strings(UNKNOWN_PREVENTION),
        recovery_time: UNKNOWN_RECOVERY.to_string(),
        cost_per_hectare: UNKNOWN_COST.to_string(),
    }
}

fn record_info(record: &DiseaseRecord) -> DiseaseInfo {
    DiseaseInfo {
        class_id: record.class.to_string(),
        name: record.name.to_string(),
        severity: record.severity,
        description: record.description.to_string(),
        symptoms: to_strings(record.symptoms),
        treatment: to_strings(record.treatment),
        prevention: to_strings(record.prevention),
        recovery_time: record.recovery_time.to_string(),
        cost_per_hectare: record.cost_per_hectare.to_string(),
    }
}
