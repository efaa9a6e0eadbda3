//! Symptom checker payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_DURATION_DAYS, DEFAULT_SEVERITY};

/// A symptom recognised by the prediction model.
///
/// The server sends either bare names (`"headache"`) or objects; both forms
/// deserialize into this struct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "SymptomRepr")]
pub struct Symptom {
    pub name: String,
    pub display_name: Option<String>,
    pub severity: Option<u8>,
}

impl Symptom {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SymptomRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        display_name: Option<String>,
        #[serde(default)]
        severity: Option<u8>,
    },
}

impl From<SymptomRepr> for Symptom {
    fn from(repr: SymptomRepr) -> Self {
        match repr {
            SymptomRepr::Name(name) => Self {
                name,
                display_name: None,
                severity: None,
            },
            SymptomRepr::Full {
                name,
                display_name,
                severity,
            } => Self {
                name,
                display_name,
                severity,
            },
        }
    }
}

/// Body of `POST /symptoms/submit/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomSubmission {
    pub symptoms: Vec<String>,
    pub duration_days: u32,
    /// 1 = mild, 2 = moderate, 3 = severe
    pub severity: u8,
    pub on_medication: bool,
    pub generate_insights: bool,
}

impl SymptomSubmission {
    pub fn new(symptoms: Vec<String>, generate_insights: bool) -> Self {
        Self {
            symptoms,
            duration_days: DEFAULT_DURATION_DAYS,
            severity: DEFAULT_SEVERITY,
            on_medication: false,
            generate_insights,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopPrediction {
    pub disease: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmValidation {
    pub agrees_with_ml: bool,
    pub confidence_boost: f64,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Diagnosis payload returned by the prediction API. The client only renders
/// and archives it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub predicted_disease: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub precautions: Vec<String>,
    #[serde(default)]
    pub severity_score: Option<f64>,
    #[serde(default)]
    pub ml_confidence: Option<f64>,
    #[serde(default)]
    pub llm_validated: Option<bool>,
    #[serde(default)]
    pub llm_validation: Option<LlmValidation>,
    #[serde(default)]
    pub top_predictions: Vec<TopPrediction>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PredictionResult {
    /// The API reports confidence under either `confidence` or
    /// `confidence_score`.
    pub fn confidence(&self) -> f64 {
        self.confidence.or(self.confidence_score).unwrap_or(0.0)
    }
}

/// One archived symptom submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymptomRecord {
    pub id: Uuid,
    pub symptoms: Vec<String>,
    pub predicted_disease: String,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub top_predictions: Vec<TopPrediction>,
    #[serde(default)]
    pub llm_validated: Option<bool>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub precautions: Vec<String>,
}
