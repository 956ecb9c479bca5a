use shared::{DiseaseClass, DiseaseInfo, DiseaseSeverity, RecommendationPlan, Urgency};

use crate::config::RecommendationConfig;

const ADDITIONAL_RESOURCES: [&str; 3] = [
    "Consult local agricultural extension office",
    "Consider soil testing if problem persists",
    "Document progression with photos",
];

pub fn urgency_for(severity: DiseaseSeverity) -> Urgency {
    match severity {
        DiseaseSeverity::Critical => Urgency::Immediate,
        DiseaseSeverity::High => Urgency::Urgent,
        DiseaseSeverity::Medium | DiseaseSeverity::Unknown => Urgency::Moderate,
        DiseaseSeverity::Low => Urgency::Routine,
        DiseaseSeverity::None => Urgency::Preventive,
    }
}

pub fn monitoring_schedule(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Immediate => "Check daily for first week, then every 2-3 days",
        Urgency::Urgent => "Check every 2-3 days for first two weeks",
        Urgency::Moderate => "Check weekly for first month",
        Urgency::Routine => "Check bi-weekly",
        Urgency::Preventive => "Monthly inspection recommended",
    }
}

pub fn treatment_timeline(severity: DiseaseSeverity) -> &'static str {
    match severity {
        DiseaseSeverity::Critical => "24-48 hours for initial treatment, 1-2 weeks for results",
        DiseaseSeverity::High => "2-3 days for treatment, 1-3 weeks for improvement",
        DiseaseSeverity::Medium => "1 week for treatment, 2-4 weeks for results",
        DiseaseSeverity::Low => "1-2 weeks for treatment, 3-6 weeks for results",
        DiseaseSeverity::None => "Ongoing preventive care",
        DiseaseSeverity::Unknown => "1-2 weeks for treatment response",
    }
}

#[derive(Debug, Clone)]
pub struct Recommender {
    config: RecommendationConfig,
}

impl Recommender {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn is_low_confidence(&self, confidence: f64) -> bool {
        // NaN counts as low
        !(confidence >= self.config.low_confidence_threshold)
    }

    pub fn recommend(&self, info: &DiseaseInfo, confidence: f64) -> RecommendationPlan {
        let urgency = urgency_for(info.severity);
        let low_confidence = self.is_low_confidence(confidence);
        let healthy = is_healthy(info);

        let mut guidance = Vec::new();
        if low_confidence {
            let shown = if confidence.is_finite() { confidence.clamp(0.0, 1.0) } else { 0.0 };
            guidance.push(format!(
                "Low confidence prediction ({:.0}%). Retake the photo in good lighting and from several angles before treating this result as conclusive.",
                shown * 100.0
            ));
            guidance.push("Focus the image on the affected leaves and avoid blur or shadows.".to_string());
        }

        if healthy {
            guidance.extend(
                [
                    "Plant appears healthy. Continue current care routine.",
                    "Schedule regular monitoring to catch any issues early.",
                    "Maintain optimal growing conditions.",
                ]
                .map(String::from),
            );
        } else {
            if low_confidence {
                guidance.push(format!(
                    "Possible {} detected. Confirm the diagnosis before starting treatment.",
                    info.name
                ));
            } else {
                guidance.push(format!("{} detected. Act promptly to prevent spread.", info.name));
            }
            guidance.extend(
                [
                    "Consider laboratory confirmation for critical cases.",
                    "Consult with local agricultural extension services.",
                    "Adjust irrigation practices based on disease type.",
                    "Monitor neighboring plants for similar symptoms.",
                ]
                .map(String::from),
            );
            match info.severity {
                DiseaseSeverity::Critical => guidance
                    .push("URGENT: This disease can spread rapidly. Act immediately.".to_string()),
                DiseaseSeverity::High => {
                    guidance.push("High priority treatment needed within 24-48 hours.".to_string())
                }
                _ => {}
            }
        }

        RecommendationPlan {
            disease: info.name.clone(),
            urgency,
            immediate_actions: info.treatment.clone(),
            prevention_measures: info.prevention.clone(),
            timeline: treatment_timeline(info.severity).to_string(),
            monitoring_schedule: monitoring_schedule(urgency).to_string(),
            guidance,
            additional_resources: ADDITIONAL_RESOURCES.map(String::from).to_vec(),
        }
    }
}

fn is_healthy(info: &DiseaseInfo) -> bool {
    info.severity == DiseaseSeverity::None
        || info
            .class_id
            .parse::<DiseaseClass>()
            .is_ok_and(DiseaseClass::is_healthy)
}
