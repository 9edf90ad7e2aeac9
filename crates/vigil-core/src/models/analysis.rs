use serde::{Deserialize, Serialize};

/// Adult-content category of an image analysis result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdultSignals {
    pub is_adult_content: bool,
    pub is_racy_content: bool,
    pub is_gory_content: bool,
    #[serde(default)]
    pub adult_score: f64,
    #[serde(default)]
    pub racy_score: f64,
    #[serde(default)]
    pub gore_score: f64,
}

/// Analysis result. Only the adult category is requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageAnalysis {
    #[serde(default)]
    pub adult: Option<AdultSignals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Description result: ranked caption candidates plus optional tags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageDescription {
    #[serde(default)]
    pub captions: Vec<Caption>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ImageDescription {
    /// Highest-ranked caption, if the service returned any.
    pub fn first_caption(&self) -> Option<&Caption> {
        self.captions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_adult_signals_from_wire() {
        let signals: AdultSignals = serde_json::from_value(json!({
            "isAdultContent": false,
            "isRacyContent": true,
            "isGoryContent": false,
            "adultScore": 0.1,
            "racyScore": 0.8,
            "goreScore": 0.01
        }))
        .unwrap();
        assert!(signals.is_racy_content);
        assert!(!signals.is_adult_content);
        assert_eq!(signals.racy_score, 0.8);
    }

    #[test]
    fn test_first_caption() {
        let description = ImageDescription {
            captions: vec![
                Caption {
                    text: "a dog on a beach".to_string(),
                    confidence: 0.92,
                },
                Caption {
                    text: "a dog".to_string(),
                    confidence: 0.5,
                },
            ],
            tags: vec![],
        };
        assert_eq!(description.first_caption().unwrap().text, "a dog on a beach");
        assert!(ImageDescription::default().first_caption().is_none());
    }
}
