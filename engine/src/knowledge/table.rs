use shared::{DiseaseClass, DiseaseSeverity};
use strum::EnumCount;

pub(crate) struct DiseaseRecord {
    pub class: DiseaseClass,
    pub name: &'static str,
    pub severity: DiseaseSeverity,
    pub description: &'static str,
    pub symptoms: &'static [&'static str],
    pub treatment: &'static [&'static str],
    pub prevention: &'static [&'static str],
    pub recovery_time: &'static str,
    pub cost_per_hectare: &'static str,
}

// Must stay in registration order.
pub(crate) const RECORDS: [DiseaseRecord; DiseaseClass::COUNT] = [
    DiseaseRecord {
        class: DiseaseClass::Healthy,
        name: "Healthy Plant",
        severity: DiseaseSeverity::None,
        description: "Plant appears to be healthy with no visible diseases",
        symptoms: &[],
        treatment: &[
            "Continue current care routine",
            "Monitor regularly for early signs",
            "Maintain good air circulation",
        ],
        prevention: &[
            "Regular inspection",
            "Proper watering",
            "Good air circulation",
            "Balanced nutrition",
        ],
        recovery_time: "N/A",
        cost_per_hectare: "$0",
    },
    DiseaseRecord {
        class: DiseaseClass::BacterialBlight,
        name: "Bacterial Leaf Blight",
        severity: DiseaseSeverity::High,
        description: "Bacterial disease that wilts seedlings and dries out leaf blades from the margins",
        symptoms: &[
            "Water-soaked streaks along leaf margins",
            "Yellow to white lesions with wavy edges",
            "Wilting of young seedlings",
        ],
        treatment: &[
            "Apply copper-based bactericide",
            "Remove affected leaves immediately",
            "Improve drainage to reduce moisture",
            "Space plants adequately for air circulation",
        ],
        prevention: &[
            "Use certified disease-free seed",
            "Avoid excess nitrogen fertilization",
            "Drain fields periodically",
        ],
        recovery_time: "14-21 days",
        cost_per_hectare: "$30-45",
    },
    DiseaseRecord {
        class: DiseaseClass::BrownSpot,
        name: "Brown Spot",
        severity: DiseaseSeverity::Medium,
        description: "Fungal disease favored by nutrient-poor soils and prolonged leaf wetness",
        symptoms: &[
            "Oval brown spots with gray centers",
            "Dark brown lesion margins",
            "Discolored or shriveled grains",
        ],
        treatment: &[
            "Apply fungicide containing mancozeb",
            "Remove infected plant debris",
            "Avoid overhead watering",
            "Ensure proper plant spacing",
        ],
        prevention: &[
            "Balanced fertilization with adequate potassium",
            "Plant resistant varieties",
            "Treat seed before sowing",
        ],
        recovery_time: "10-14 days",
        cost_per_hectare: "$20-30",
    },
    DiseaseRecord {
        class: DiseaseClass::LeafBlast,
        name: "Leaf Blast",
        severity: DiseaseSeverity::High,
        description: "Fungal disease that spreads quickly in humid weather and can reach the panicle",
        symptoms: &[
            "Diamond-shaped lesions with gray centers",
            "Brown to reddish lesion borders",
            "Collar and neck rot in severe cases",
        ],
        treatment: &[
            "Use tricyclazole or carbendazim fungicide",
            "Manage nitrogen fertilization",
            "Maintain field hygiene",
            "Use resistant varieties when possible",
        ],
        prevention: &[
            "Avoid late or excessive nitrogen",
            "Keep fields flooded where practical",
            "Plant resistant varieties",
        ],
        recovery_time: "14-18 days",
        cost_per_hectare: "$30-40",
    },
    DiseaseRecord {
        class: DiseaseClass::TungroVirus,
        name: "Rice Tungro Virus",
        severity: DiseaseSeverity::Critical,
        description: "Viral disease spread by green leafhoppers that stunts plants and cuts yield sharply",
        symptoms: &[
            "Yellow to orange leaf discoloration",
            "Stunted growth",
            "Reduced tillering",
        ],
        treatment: &[
            "Remove infected plants immediately",
            "Control green leafhopper vectors",
            "Use certified disease-free seeds",
            "Apply insecticides for vector control",
        ],
        prevention: &[
            "Synchronize planting with neighboring fields",
            "Control leafhopper populations early",
            "Plant resistant varieties",
        ],
        recovery_time: "21-28 days",
        cost_per_hectare: "$40-60",
    },
    DiseaseRecord {
        class: DiseaseClass::BacterialLeafStreak,
        name: "Bacterial Leaf Streak",
        severity: DiseaseSeverity::Medium,
        description: "Bacterial disease producing narrow streaks between leaf veins",
        symptoms: &[
            "Narrow translucent streaks between veins",
            "Yellow bacterial ooze on lesions",
            "Streaks turning brown and merging",
        ],
        treatment: &[
            "Apply streptomycin or copper compounds",
            "Remove infected leaves and debris",
            "Avoid working in wet fields",
            "Use resistant cultivars",
        ],
        prevention: &[
            "Use clean seed",
            "Avoid wounding plants during field work",
            "Balanced fertilization",
        ],
        recovery_time: "10-14 days",
        cost_per_hectare: "$20-35",
    },
];

pub(crate) const UNKNOWN_DESCRIPTION: &str = "Disease detected but specific information not available";
pub(crate) const UNKNOWN_SYMPTOMS: &[&str] = &[
    "Visible lesions or spots",
    "Discoloration of leaves",
    "Abnormal growth patterns",
];
pub(crate) const UNKNOWN_TREATMENT: &[&str] = &[
    "Consult agricultural expert",
    "Remove affected parts",
    "Apply general fungicide",
];
pub(crate) const UNKNOWN_PREVENTION: &[&str] = &[
    "Regular monitoring",
    "Good hygiene practices",
    "Proper plant spacing",
];
pub(crate) const UNKNOWN_RECOVERY: &str = "Variable";
pub(crate) const UNKNOWN_COST: &str = "Estimate needed";
